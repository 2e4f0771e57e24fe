//! Print-compatibility rewriting of diagram SVG.
//!
//! The diagram tool lays out labels as HTML inside `foreignObject`, which
//! paginated renderers commonly drop. Each label is rewritten into a native
//! SVG `<text>` element centered in the box the `foreignObject` occupied.

use folio_markup::TreeNode;

/// Layout and typography of rewritten labels.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelStyle {
    /// Width assumed when a `foreignObject` has no usable width.
    pub default_width: f64,
    /// Height assumed when a `foreignObject` has no usable height.
    pub default_height: f64,
    /// Added to the vertical center to approximate the text baseline.
    pub baseline_offset: f64,
    /// Font size of label text.
    pub font_size: f64,
    /// Font family of label text.
    pub font_family: String,
    /// Fill color of label text.
    pub fill: String,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            default_width: 100.0,
            default_height: 24.0,
            baseline_offset: 4.0,
            font_size: 14.0,
            font_family: "sans-serif".to_owned(),
            fill: "#333333".to_owned(),
        }
    }
}

impl LabelStyle {
    /// Style rules injected at the start of every rewritten SVG.
    fn stylesheet(&self) -> String {
        format!(
            "text, tspan, .nodeLabel, .edgeLabel, .label, .mindmap-node text, .converted-text \
             {{ font-family: {family} !important; font-weight: normal !important; fill: {fill}; }} \
             .converted-text {{ fill: {fill}; }}",
            family = self.font_family,
            fill = self.fill,
        )
    }
}

/// Rewrite every `foreignObject` label under `svg` into an SVG `<text>` and
/// prepend a `<style>` element normalizing label typography.
///
/// A `foreignObject` whose label text is empty is left untouched. Returns
/// the number of labels rewritten.
pub fn make_print_compatible(svg: &mut TreeNode, style: &LabelStyle) -> usize {
    let rewritten = svg.replace_descendants(
        &|node: &TreeNode| node.local_name() == "foreignObject",
        &mut |object: &mut TreeNode| label_text(object, style),
    );
    svg.children
        .insert(0, TreeNode::new("style").with_text(style.stylesheet()));
    rewritten
}

fn label_text(object: &TreeNode, style: &LabelStyle) -> Option<TreeNode> {
    let label = extract_label(object);
    if label.is_empty() {
        return None;
    }

    let width = dimension(object, "width", style.default_width);
    let height = dimension(object, "height", style.default_height);

    Some(
        TreeNode::new("text")
            .with_attr("x", format_number(width / 2.0))
            .with_attr("y", format_number(height / 2.0 + style.baseline_offset))
            .with_attr("text-anchor", "middle")
            .with_attr("dominant-baseline", "middle")
            .with_attr("class", "converted-text")
            .with_attr("font-family", style.font_family.as_str())
            .with_attr("font-weight", "normal")
            .with_attr("font-size", format_number(style.font_size))
            .with_attr("fill", style.fill.as_str())
            .with_text(label),
    )
}

/// Label text: the paragraph inside the node label when there is one, else
/// the node label's text, else all text of the object. Whitespace-separated
/// pieces are trimmed and joined with single spaces.
fn extract_label(object: &TreeNode) -> String {
    match object.find(&|node: &TreeNode| node.has_class("nodeLabel")) {
        Some(label) => match label.find(&|node: &TreeNode| node.local_name() == "p") {
            Some(paragraph) => paragraph.stripped_text(),
            None => label.stripped_text(),
        },
        None => object.stripped_text(),
    }
}

fn dimension(node: &TreeNode, name: &str, default: f64) -> f64 {
    node.attr(name)
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(default)
}

fn format_number(value: f64) -> String {
    format!("{value}")
}
