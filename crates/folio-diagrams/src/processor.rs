//! Diagram placeholder processing.
//!
//! This module provides [`DiagramProcessor`], which replaces the diagram
//! placeholders of a converted fragment with rendered, print-compatible SVG.

use folio_markup::{TreeNode, parse_document};

use crate::cache::CachedRenderer;
use crate::compat::{LabelStyle, make_print_compatible};
use crate::consts::{ERROR_MARKER, PLACEHOLDER_CLASS, SOURCE_ATTR};
use crate::error::DiagramError;
use crate::renderer::DiagramRenderer;

/// Outcome of processing one fragment.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiagramReport {
    /// Placeholders replaced by SVG.
    pub rendered: usize,
    /// Placeholders left holding the error marker.
    pub failed: usize,
}

/// Replaces diagram placeholders with inline SVG.
///
/// A placeholder is any element with class `mermaid-container`; its source
/// is read from the `data-mermaid-source` attribute. Placeholders with an
/// empty source are left alone.
///
/// # Example
///
/// ```ignore
/// let processor = DiagramProcessor::new(cached_renderer)
///     .label_style(LabelStyle::default());
/// let report = processor.process(&mut fragment)?;
/// ```
pub struct DiagramProcessor<R> {
    renderer: CachedRenderer<R>,
    style: LabelStyle,
}

impl<R: DiagramRenderer> DiagramProcessor<R> {
    /// Create a processor rendering through `renderer`.
    #[must_use]
    pub fn new(renderer: CachedRenderer<R>) -> Self {
        Self {
            renderer,
            style: LabelStyle::default(),
        }
    }

    /// Set the typography of rewritten labels.
    #[must_use]
    pub fn label_style(mut self, style: LabelStyle) -> Self {
        self.style = style;
        self
    }

    /// The cached renderer in use.
    pub fn renderer(&self) -> &CachedRenderer<R> {
        &self.renderer
    }

    /// Replace every placeholder in `fragment`.
    ///
    /// A diagram that fails to render keeps its placeholder, whose content
    /// becomes a visible error marker; processing continues with the next
    /// diagram.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::Cache`] if the cache cannot be written and
    /// [`DiagramError::Parse`] if a rendered payload is not well-formed.
    pub fn process(&self, fragment: &mut TreeNode) -> Result<DiagramReport, DiagramError> {
        let mut report = DiagramReport::default();

        fragment.try_replace_descendants(
            &|node: &TreeNode| node.has_class(PLACEHOLDER_CLASS),
            &mut |container: &mut TreeNode| -> Result<Option<TreeNode>, DiagramError> {
                let source = container.attr(SOURCE_ATTR).unwrap_or_default().trim().to_owned();
                if source.is_empty() {
                    return Ok(None);
                }

                match self.renderer.render(&source) {
                    Ok(svg) => {
                        let mut root = parse_document(&svg)?;
                        make_print_compatible(&mut root, &self.style);
                        report.rendered += 1;
                        Ok(Some(root))
                    }
                    Err(DiagramError::Render(e)) => {
                        tracing::warn!(error = %e, "Diagram rendering failed");
                        container.set_text_content(ERROR_MARKER);
                        report.failed += 1;
                        Ok(None)
                    }
                    Err(e) => Err(e),
                }
            },
        )?;

        if report.rendered + report.failed > 0 {
            tracing::debug!(
                rendered = report.rendered,
                failed = report.failed,
                "Processed diagrams"
            );
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use folio_cache::{FileCache, NullCache};
    use folio_markup::{parse_fragment, to_html_fragment};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::cache::DiagramKey;
    use crate::error::RenderError;

    /// Renders every source to a fixed SVG, failing on sources containing
    /// `broken`, and records what it was asked to render.
    #[derive(Default)]
    struct FakeRenderer {
        seen: RefCell<Vec<String>>,
    }

    impl DiagramRenderer for FakeRenderer {
        fn render(&self, source: &str) -> Result<String, RenderError> {
            self.seen.borrow_mut().push(source.to_owned());
            if source.contains("broken") {
                return Err(RenderError::Failed("parse error on line 1".to_owned()));
            }
            Ok(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 50"><g><foreignObject width="100" height="24"><div><span class="nodeLabel"><p>Node</p></span></div></foreignObject></g></svg>"#.to_owned())
        }
    }

    fn processor(cache: Box<dyn folio_cache::CacheBucket>) -> DiagramProcessor<FakeRenderer> {
        DiagramProcessor::new(CachedRenderer::new(FakeRenderer::default(), cache))
    }

    fn placeholder(source: &str) -> String {
        format!(r#"<div class="mermaid-container" data-mermaid-source="{source}"></div>"#)
    }

    #[test]
    fn test_replaces_placeholder_with_svg() {
        let html = format!("<p>Before</p>\n{}\n<p>After</p>", placeholder("graph TD; A--&gt;B"));
        let mut fragment = parse_fragment(&html).unwrap();

        let report = processor(Box::new(NullCache)).process(&mut fragment).unwrap();

        assert_eq!(report, DiagramReport { rendered: 1, failed: 0 });
        let out = to_html_fragment(&fragment);
        assert!(out.starts_with("<p>Before</p>\n<svg"));
        assert!(out.ends_with("</svg>\n<p>After</p>"));
        assert!(out.contains(r#"class="converted-text""#));
        assert!(!out.contains("foreignObject"));
        assert!(!out.contains("mermaid-container"));
    }

    #[test]
    fn test_source_is_decoded_from_attribute() {
        let mut fragment = parse_fragment(&placeholder("graph TD; A--&gt;B")).unwrap();
        let processor = processor(Box::new(NullCache));

        processor.process(&mut fragment).unwrap();

        assert_eq!(
            *processor.renderer().renderer().seen.borrow(),
            vec!["graph TD; A-->B".to_owned()]
        );
    }

    #[test]
    fn test_failed_diagram_gets_error_marker() {
        let dir = TempDir::new().unwrap();
        let html = format!("{}{}", placeholder("graph TD; broken"), placeholder("pie"));
        let mut fragment = parse_fragment(&html).unwrap();

        let report = processor(Box::new(FileCache::new(dir.path(), "svg")))
            .process(&mut fragment)
            .unwrap();

        assert_eq!(report, DiagramReport { rendered: 1, failed: 1 });
        let container = &fragment.children[0];
        assert!(container.has_class("mermaid-container"));
        assert_eq!(container.text, "[Error rendering Mermaid diagram]");
        assert_eq!(fragment.children[1].tag, "svg");

        let failed_hash = DiagramKey {
            source: "graph TD; broken",
        }
        .compute_hash();
        assert!(!dir.path().join(format!("{failed_hash}.svg")).exists());
    }

    #[test]
    fn test_empty_source_is_skipped() {
        let html = r#"<div class="mermaid-container" data-mermaid-source="  "></div><div class="mermaid-container"></div>"#;
        let mut fragment = parse_fragment(html).unwrap();
        let processor = processor(Box::new(NullCache));

        let report = processor.process(&mut fragment).unwrap();

        assert_eq!(report, DiagramReport::default());
        assert!(processor.renderer().renderer().seen.borrow().is_empty());
        assert_eq!(to_html_fragment(&fragment), html);
    }

    #[test]
    fn test_second_run_uses_cache() {
        let dir = TempDir::new().unwrap();
        let html = placeholder("graph LR; X--&gt;Y");

        let mut first = parse_fragment(&html).unwrap();
        processor(Box::new(FileCache::new(dir.path(), "svg")))
            .process(&mut first)
            .unwrap();

        let second_processor = processor(Box::new(FileCache::new(dir.path(), "svg")));
        let mut second = parse_fragment(&html).unwrap();
        second_processor.process(&mut second).unwrap();

        assert!(second_processor.renderer().renderer().seen.borrow().is_empty());
        assert_eq!(to_html_fragment(&first), to_html_fragment(&second));
    }

    #[test]
    fn test_malformed_svg_is_fatal() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path(), "svg");
        let hash = DiagramKey { source: "pie" }.compute_hash();
        std::fs::create_dir_all(dir.path()).unwrap();
        std::fs::write(dir.path().join(format!("{hash}.svg")), "   ").unwrap();
        let mut fragment = parse_fragment(&placeholder("pie")).unwrap();

        let result = processor(Box::new(cache)).process(&mut fragment);

        assert!(matches!(result, Err(DiagramError::Parse(_))));
    }

    #[test]
    fn test_nested_placeholder_is_found() {
        let html = format!("<section><div>{}</div></section>", placeholder("pie"));
        let mut fragment = parse_fragment(&html).unwrap();

        let report = processor(Box::new(NullCache)).process(&mut fragment).unwrap();

        assert_eq!(report.rendered, 1);
        assert!(to_html_fragment(&fragment).starts_with("<section><div><svg"));
    }
}
