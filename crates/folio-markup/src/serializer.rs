//! Markup serializer.
//!
//! HTML output differs from XML output only in which empty elements may be
//! written self-closing: HTML void elements and anything inside foreign
//! content (`svg`, `math`) self-close, every other empty HTML element gets an
//! explicit end tag. Raw-text HTML elements (`style`, `script`) are written
//! without escaping.

use std::fmt::Write;

use crate::tree::TreeNode;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Html,
    Foreign,
    Xml,
}

/// Serialize an element (without its tail) as HTML.
pub fn to_html(node: &TreeNode) -> String {
    let mut out = String::with_capacity(1024);
    write_element(node, Mode::Html, &mut out);
    out
}

/// Serialize the content of a fragment root: its text and children, without
/// the wrapping element itself.
pub fn to_html_fragment(root: &TreeNode) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(&escape_html(&root.text));
    for child in &root.children {
        write_element(child, Mode::Html, &mut out);
        out.push_str(&escape_html(&child.tail));
    }
    out
}

/// Serialize an element (without its tail) as standalone XML.
pub fn to_xml(node: &TreeNode) -> String {
    let mut out = String::with_capacity(1024);
    write_element(node, Mode::Xml, &mut out);
    out
}

fn write_element(node: &TreeNode, mode: Mode, out: &mut String) {
    let mode = if mode == Mode::Html && matches!(node.local_name(), "svg" | "math") {
        Mode::Foreign
    } else {
        mode
    };

    out.push('<');
    out.push_str(&node.tag);
    for (key, value) in &node.attrs {
        write!(out, r#" {key}="{}""#, escape_attr(value)).unwrap();
    }

    let is_empty = node.children.is_empty() && node.text.is_empty();
    let self_closing = match mode {
        Mode::Html => VOID_ELEMENTS.contains(&node.tag.as_str()),
        Mode::Foreign | Mode::Xml => is_empty,
    };
    if self_closing {
        out.push_str(" />");
        return;
    }
    out.push('>');

    let raw_text = mode == Mode::Html && RAW_TEXT_ELEMENTS.contains(&node.tag.as_str());
    let escape = |text: &str| -> String {
        if raw_text {
            text.to_owned()
        } else {
            escape_html(text)
        }
    };

    // HTML integration point: foreignObject content is parsed as HTML again
    let child_mode = if mode == Mode::Foreign && node.local_name() == "foreignObject" {
        Mode::Html
    } else {
        mode
    };

    out.push_str(&escape(&node.text));
    for child in &node.children {
        write_element(child, child_mode, out);
        out.push_str(&escape(&child.tail));
    }

    write!(out, "</{}>", node.tag).unwrap();
}

/// Escape text for element content.
pub fn escape_html(text: &str) -> String {
    escape_xml(text, false)
}

/// Escape text for attribute values.
pub fn escape_attr(text: &str) -> String {
    escape_xml(text, true)
}

fn escape_xml(text: &str, escape_quotes: bool) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' if escape_quotes => result.push_str("&quot;"),
            _ => result.push(ch),
        }
    }
    result
}
