//! Alert blockquote transform.
//!
//! A blockquote whose first marker-bearing text contains `[!NOTE]`,
//! `[!TIP]`, `[!IMPORTANT]`, `[!WARNING]` or `[!CAUTION]` becomes:
//!
//! ```html
//! <div class="alert alert-note"><div class="alert-title">Note</div>...former content...</div>
//! ```

use folio_markup::TreeNode;

/// Alert kind recognized in a blockquote marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
    /// `[!NOTE]`
    Note,
    /// `[!TIP]`
    Tip,
    /// `[!IMPORTANT]`
    Important,
    /// `[!WARNING]`
    Warning,
    /// `[!CAUTION]`
    Caution,
}

impl AlertKind {
    /// All kinds, in the order markers are tested.
    pub const ALL: [Self; 5] = [
        Self::Note,
        Self::Tip,
        Self::Important,
        Self::Warning,
        Self::Caution,
    ];

    /// Marker text, e.g. `[!NOTE]`.
    #[must_use]
    pub fn marker(self) -> &'static str {
        match self {
            Self::Note => "[!NOTE]",
            Self::Tip => "[!TIP]",
            Self::Important => "[!IMPORTANT]",
            Self::Warning => "[!WARNING]",
            Self::Caution => "[!CAUTION]",
        }
    }

    /// Lower-cased style class suffix, e.g. `note`.
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Tip => "tip",
            Self::Important => "important",
            Self::Warning => "warning",
            Self::Caution => "caution",
        }
    }

    /// Title shown in the callout, e.g. `Note`.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Note => "Note",
            Self::Tip => "Tip",
            Self::Important => "Important",
            Self::Warning => "Warning",
            Self::Caution => "Caution",
        }
    }

    /// First kind (in [`ALL`](Self::ALL) order) whose marker occurs in `text`.
    #[must_use]
    pub fn detect(text: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| text.contains(kind.marker()))
    }
}

/// Restructure every alert blockquote under `root` into a titled callout.
///
/// Blockquotes without a marker are left unchanged. Nested blockquotes are
/// handled too. Returns the number of alerts created.
pub fn transform_alerts(root: &mut TreeNode) -> usize {
    root.replace_descendants(
        &|node: &TreeNode| node.local_name() == "blockquote",
        &mut build_alert,
    )
}

fn build_alert(quote: &mut TreeNode) -> Option<TreeNode> {
    let has_marker = |text: &str| AlertKind::detect(text).is_some();
    let text = quote.find_text_mut(&has_marker)?;
    let kind = AlertKind::detect(text)?;
    *text = text.replacen(kind.marker(), "", 1).trim_start().to_owned();

    let title = TreeNode::new("div")
        .with_attr("class", "alert-title")
        .with_text(kind.title())
        .with_tail(std::mem::take(&mut quote.text));
    let mut children = Vec::with_capacity(quote.children.len() + 1);
    children.push(title);
    children.append(&mut quote.children);

    Some(
        TreeNode::new("div")
            .with_attr("class", format!("alert alert-{}", kind.class()))
            .with_children(children),
    )
}

#[cfg(test)]
mod tests {
    use folio_markup::{parse_fragment, to_html_fragment};
    use pretty_assertions::assert_eq;

    use super::*;

    fn transform(html: &str) -> (String, usize) {
        let mut root = parse_fragment(html).unwrap();
        let count = transform_alerts(&mut root);
        (to_html_fragment(&root), count)
    }

    #[test]
    fn test_every_kind() {
        for kind in AlertKind::ALL {
            let marker = kind.marker();
            let (html, count) = transform(&format!("<blockquote><p>{marker} Body text</p></blockquote>"));

            assert_eq!(count, 1);
            assert_eq!(
                html,
                format!(
                    r#"<div class="alert alert-{}"><div class="alert-title">{}</div><p>Body text</p></div>"#,
                    kind.class(),
                    kind.title()
                )
            );
        }
    }

    #[test]
    fn test_converter_shaped_markup() {
        let (html, _) = transform("<blockquote>\n<p>[!WARNING]\nDo not <em>touch</em>.</p>\n</blockquote>\n");

        assert_eq!(
            html,
            "<div class=\"alert alert-warning\"><div class=\"alert-title\">Warning</div>\n<p>Do not <em>touch</em>.</p>\n</div>\n"
        );
    }

    #[test]
    fn test_plain_blockquote_unchanged() {
        let input = "<blockquote>\n<p>Just a <em>quote</em> [NOTE]</p>\n</blockquote>\n";
        let (html, count) = transform(input);

        assert_eq!(count, 0);
        assert_eq!(html, input);
    }

    #[test]
    fn test_first_kind_in_order_wins() {
        let (html, _) = transform("<blockquote><p>[!WARNING] [!NOTE] both</p></blockquote>");

        assert!(html.starts_with(r#"<div class="alert alert-note">"#));
        assert!(html.contains("<p>[!WARNING]  both</p>"));
    }

    #[test]
    fn test_only_first_occurrence_stripped() {
        let (html, _) = transform("<blockquote><p>[!TIP] Use [!TIP] literally</p></blockquote>");

        assert!(html.contains("<p>Use [!TIP] literally</p>"));
    }

    #[test]
    fn test_marker_deeply_nested() {
        let (html, count) = transform(
            "<blockquote><div><p><strong>[!CAUTION]</strong> Hot</p></div></blockquote>",
        );

        assert_eq!(count, 1);
        assert_eq!(
            html,
            r#"<div class="alert alert-caution"><div class="alert-title">Caution</div><div><p><strong></strong> Hot</p></div></div>"#
        );
    }

    #[test]
    fn test_siblings_preserved() {
        let (html, _) = transform(
            "<p>Before</p>\n<blockquote><p>[!NOTE] Mid</p></blockquote>\n<p>After</p>",
        );

        assert_eq!(
            html,
            "<p>Before</p>\n<div class=\"alert alert-note\"><div class=\"alert-title\">Note</div><p>Mid</p></div>\n<p>After</p>"
        );
    }

    #[test]
    fn test_nested_alerts() {
        let (html, count) = transform(
            "<blockquote><p>[!NOTE] Outer</p><blockquote><p>[!TIP] Inner</p></blockquote></blockquote>",
        );

        assert_eq!(count, 2);
        assert!(html.contains(r#"<div class="alert alert-tip"><div class="alert-title">Tip</div><p>Inner</p></div>"#));
    }

    #[test]
    fn test_detect() {
        assert_eq!(AlertKind::detect("x [!IMPORTANT] y"), Some(AlertKind::Important));
        assert_eq!(AlertKind::detect("[!note]"), None);
        assert_eq!(AlertKind::detect("plain"), None);
    }
}
