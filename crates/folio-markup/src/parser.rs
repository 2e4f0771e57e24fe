//! Tolerant markup parser built on `quick-xml`.
//!
//! Converter output is HTML rather than strict XML, so the reader runs with
//! end-name checking disabled, treats HTML void elements as self-closing
//! even without a trailing slash, and accepts valueless attributes.

use std::borrow::Cow;
use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::entities::{convert_html_entities, escape_bare_ampersands};
use crate::error::ParseError;
use crate::tree::TreeNode;

/// Tag of the synthetic element wrapping a parsed fragment.
const FRAGMENT_ROOT: &str = "root";

/// HTML elements that never have content or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Parse a hypertext fragment (any number of sibling nodes).
///
/// The result is a synthetic `root` element whose children are the
/// fragment's top-level elements and whose `text` is any leading text.
/// Bare ampersands, which HTML allows in text, are escaped first.
///
/// # Errors
///
/// Returns an error if the markup cannot be tokenized.
pub fn parse_fragment(html: &str) -> Result<TreeNode, ParseError> {
    let html = escape_bare_ampersands(&convert_html_entities(html));
    let wrapped = format!("<{FRAGMENT_ROOT}>{html}</{FRAGMENT_ROOT}>");
    parse_root(&mut reader_for(&wrapped))
}

/// Parse a standalone document (such as an SVG payload) and return its root
/// element. Prolog items (XML declaration, doctype, comments) are skipped.
///
/// # Errors
///
/// Returns an error if the markup cannot be tokenized or holds no element.
pub fn parse_document(markup: &str) -> Result<TreeNode, ParseError> {
    let markup = escape_bare_ampersands(&convert_html_entities(markup));
    parse_root(&mut reader_for(&markup))
}

fn reader_for(markup: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(markup);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    reader
}

/// Read up to the first element and parse it with its subtree.
fn parse_root<R: BufRead>(reader: &mut Reader<R>) -> Result<TreeNode, ParseError> {
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let tag = decode_tag(reader, e.name().as_ref());
                let attrs = decode_attrs(reader, &e);
                if is_void(&tag) {
                    return Ok(TreeNode {
                        tag,
                        attrs,
                        ..Default::default()
                    });
                }
                let mut node = parse_children(reader, &tag)?;
                node.tag = tag;
                node.attrs = attrs;
                return Ok(node);
            }
            Event::Empty(e) => {
                return Ok(TreeNode {
                    tag: decode_tag(reader, e.name().as_ref()),
                    attrs: decode_attrs(reader, &e),
                    ..Default::default()
                });
            }
            Event::Eof => return Err(ParseError::NoRootElement),
            _ => {}
        }
        buf.clear();
    }
}

/// Parse the content of an element up to its end tag.
///
/// The returned node carries `text` and `children`; the caller fills in the
/// tag and attributes.
fn parse_children<R: BufRead>(
    reader: &mut Reader<R>,
    parent_tag: &str,
) -> Result<TreeNode, ParseError> {
    let mut buf = Vec::new();
    let mut node = TreeNode::default();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let child_tag = decode_tag(reader, e.name().as_ref());
                let child_attrs = decode_attrs(reader, &e);
                let child = if is_void(&child_tag) {
                    TreeNode {
                        tag: child_tag,
                        attrs: child_attrs,
                        ..Default::default()
                    }
                } else {
                    let mut child = parse_children(reader, &child_tag)?;
                    child.tag = child_tag;
                    child.attrs = child_attrs;
                    child
                };
                node.children.push(child);
            }
            Event::Empty(e) => {
                node.children.push(TreeNode {
                    tag: decode_tag(reader, e.name().as_ref()),
                    attrs: decode_attrs(reader, &e),
                    ..Default::default()
                });
            }
            Event::Text(e) => {
                let text = reader.decoder().decode(&e)?;
                append_text(&mut node, &text);
            }
            Event::GeneralRef(e) => {
                let entity = reader.decoder().decode(&e)?.into_owned();
                append_text(&mut node, &decode_entity(&entity));
            }
            Event::CData(e) => {
                append_text(&mut node, &String::from_utf8_lossy(&e));
            }
            Event::End(e) => {
                let end_tag = decode_tag(reader, e.name().as_ref());
                if end_tag == parent_tag {
                    return Ok(node);
                }
                // Stray end tag (e.g. `</br>`) - ignore
            }
            Event::Eof => return Ok(node),
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
        buf.clear();
    }
}

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str())
}

fn decode_tag<R: BufRead>(reader: &Reader<R>, name: &[u8]) -> String {
    reader
        .decoder()
        .decode(name)
        .map_or_else(|_| String::from_utf8_lossy(name).into_owned(), Cow::into_owned)
}

fn decode_attrs<R: BufRead>(reader: &Reader<R>, e: &BytesStart) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    for attr in e.html_attributes().flatten() {
        let key = reader
            .decoder()
            .decode(attr.key.as_ref())
            .map_or_else(
                |_| String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                Cow::into_owned,
            );
        let value = attr.unescape_value().map_or_else(
            |_| String::from_utf8_lossy(&attr.value).into_owned(),
            Cow::into_owned,
        );
        attrs.push((key, value));
    }
    attrs
}

/// Append text to node's text or last child's tail.
fn append_text(node: &mut TreeNode, text: &str) {
    if let Some(last_child) = node.children.last_mut() {
        last_child.tail.push_str(text);
    } else {
        node.text.push_str(text);
    }
}

/// Decode XML entity references to their character values.
fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        s if s.starts_with('#') => {
            let code = if s.starts_with("#x") || s.starts_with("#X") {
                u32::from_str_radix(&s[2..], 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        _ => format!("&{entity};"),
    }
}
