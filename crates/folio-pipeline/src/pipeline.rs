//! Per-document orchestration.

use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use folio_cache::FileCache;
use folio_config::{Config, DocumentConfig};
use folio_diagrams::{CachedRenderer, DiagramProcessor, DiagramRenderer, MermaidCli};
use folio_markup::{TreeNode, parse_fragment, to_html_fragment};
use folio_renderer::{
    CommandMathRenderer, ComposeOptions, DocumentComposer, MarkdownConverter, ThemeStore,
};

use crate::error::PipelineError;
use crate::page::{CommandPageRenderer, PageRenderer};

/// Title of a merged document.
pub const MERGED_TITLE: &str = "Merged Document";

/// Extension of the cache entries holding rendered diagrams.
const DIAGRAM_EXTENSION: &str = "svg";

/// Extension written when no paginated renderer is configured.
const HTML_EXTENSION: &str = "html";

/// Document-level settings shared by every document a pipeline produces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentSettings {
    /// Theme stylesheet name.
    pub theme: String,
    /// Running page header; `None` uses each document's title.
    pub header: Option<String>,
    /// Lay pages out in landscape orientation.
    pub landscape: bool,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            theme: "default".to_owned(),
            header: None,
            landscape: false,
        }
    }
}

impl From<&DocumentConfig> for DocumentSettings {
    fn from(config: &DocumentConfig) -> Self {
        Self {
            theme: config.theme.clone(),
            header: config.header().map(ToOwned::to_owned),
            landscape: config.landscape,
        }
    }
}

/// Markdown to paginated document pipeline.
///
/// Each document goes through: markdown conversion, diagram substitution,
/// alert and math transforms, themed composition, and finally the paginated
/// renderer. Without a paginated renderer the composed HTML is written next
/// to the requested output, with an `.html` extension.
///
/// # Example
///
/// ```ignore
/// let config = Config::load(None, None)?;
/// let pipeline = Pipeline::from_config(&config);
/// let written = pipeline.process(Path::new("guide.md"), Path::new("out/guide.pdf"))?;
/// ```
pub struct Pipeline {
    converter: MarkdownConverter,
    diagrams: DiagramProcessor<Box<dyn DiagramRenderer>>,
    composer: DocumentComposer,
    pages: Option<Box<dyn PageRenderer>>,
    document: DocumentSettings,
}

impl Pipeline {
    /// Create a pipeline from its stages, without a paginated renderer.
    #[must_use]
    pub fn new(
        diagrams: DiagramProcessor<Box<dyn DiagramRenderer>>,
        composer: DocumentComposer,
    ) -> Self {
        Self {
            converter: MarkdownConverter::new(),
            diagrams,
            composer,
            pages: None,
            document: DocumentSettings::default(),
        }
    }

    /// Build the production pipeline described by `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let cache_dir = config.diagrams.cache_dir();
        let mermaid = MermaidCli::new(&cache_dir)
            .command(config.diagrams.command.as_str())
            .theme(config.diagrams.theme.as_str())
            .background(config.diagrams.background.as_str())
            .scale(config.diagrams.scale)
            .timeout(config.diagrams.timeout());
        let renderer: Box<dyn DiagramRenderer> = Box::new(mermaid);
        let cache = Box::new(FileCache::new(&cache_dir, DIAGRAM_EXTENSION));
        let diagrams = DiagramProcessor::new(CachedRenderer::new(renderer, cache));

        let mut composer = DocumentComposer::new(ThemeStore::new(&config.document.styles_dir));
        if let Some(command) = config.math.command() {
            composer = composer.with_math_renderer(Box::new(CommandMathRenderer::new(command)));
        }

        let mut pipeline =
            Self::new(diagrams, composer).document(DocumentSettings::from(&config.document));
        if let Some(command) = config.pdf.command() {
            pipeline = pipeline.with_page_renderer(Box::new(
                CommandPageRenderer::new(command).args(config.pdf.args.clone()),
            ));
        }

        tracing::debug!(
            cache_dir = %cache_dir.display(),
            math = config.math.command().is_some(),
            pdf = config.pdf.command().is_some(),
            "Pipeline configured"
        );
        pipeline
    }

    /// Produce paginated output through `pages`.
    #[must_use]
    pub fn with_page_renderer(mut self, pages: Box<dyn PageRenderer>) -> Self {
        self.pages = Some(pages);
        self
    }

    /// Set the document-level settings.
    #[must_use]
    pub fn document(mut self, document: DocumentSettings) -> Self {
        self.document = document;
        self
    }

    /// Document-level settings in use.
    #[must_use]
    pub fn settings(&self) -> &DocumentSettings {
        &self.document
    }

    /// Whether output goes through a paginated renderer.
    #[must_use]
    pub fn has_page_renderer(&self) -> bool {
        self.pages.is_some()
    }

    /// Convert `markdown` into a finished, themed HTML document.
    ///
    /// The title is the first level-one heading, or else derived from
    /// `stem` (see [`title_from_stem`]).
    ///
    /// # Errors
    ///
    /// Returns an error if diagram processing hits a resource failure or a
    /// rendered payload cannot be parsed.
    pub fn render_html(&self, markdown: &str, stem: &str) -> Result<String, PipelineError> {
        let conversion = self.converter.convert(markdown);
        let title = conversion
            .title
            .unwrap_or_else(|| title_from_stem(stem));
        let mut fragment = self.prepare(&conversion.html)?;
        Ok(self
            .composer
            .compose_tree(&mut fragment, &self.compose_options(title)))
    }

    /// Convert the markdown file `input` and write the result for `output`.
    ///
    /// Returns the path actually written: `output` itself with a paginated
    /// renderer, or `output` with an `.html` extension without one.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read, the document cannot be
    /// built, or the output cannot be written or rendered.
    pub fn process(&self, input: &Path, output: &Path) -> Result<PathBuf, PipelineError> {
        tracing::info!(input = %input.display(), "Processing document");
        let markdown = read_markdown(input)?;
        let stem = input
            .file_stem()
            .map(|stem| stem.to_string_lossy())
            .unwrap_or_default();
        let html = self.render_html(&markdown, &stem)?;
        self.emit(&html, output)
    }

    /// Combine several markdown files into one document.
    ///
    /// Each input becomes `<section id="part-N">` with a page break after
    /// it, numbered from zero in input order. The document is titled
    /// [`MERGED_TITLE`].
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::NoInputs`] for an empty input list, and the
    /// errors of [`process`](Self::process) otherwise.
    pub fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<PathBuf, PipelineError> {
        if inputs.is_empty() {
            return Err(PipelineError::NoInputs);
        }
        tracing::info!(count = inputs.len(), output = %output.display(), "Merging documents");

        let mut body = String::new();
        for (index, input) in inputs.iter().enumerate() {
            let markdown = read_markdown(input)?;
            let conversion = self.converter.convert(&markdown);
            let mut fragment = self.prepare(&conversion.html)?;
            self.composer.transform(&mut fragment, &self.document.theme);

            if index > 0 {
                body.push('\n');
            }
            write!(
                body,
                "<section id=\"part-{index}\" style=\"page-break-after: always;\">{}</section>",
                to_html_fragment(&fragment)
            )
            .unwrap();
        }

        let html = self
            .composer
            .wrap(&body, &self.compose_options(MERGED_TITLE.to_owned()));
        self.emit(&html, output)
    }

    /// Parse a converted fragment and substitute its diagrams.
    fn prepare(&self, html: &str) -> Result<TreeNode, PipelineError> {
        let mut fragment = parse_fragment(html)?;
        let report = self.diagrams.process(&mut fragment)?;
        if report.failed > 0 {
            tracing::warn!(
                rendered = report.rendered,
                failed = report.failed,
                "Some diagrams could not be rendered"
            );
        } else {
            tracing::debug!(rendered = report.rendered, "Diagrams rendered");
        }
        Ok(fragment)
    }

    fn compose_options(&self, title: String) -> ComposeOptions {
        ComposeOptions::new(title)
            .theme(self.document.theme.as_str())
            .header(self.document.header.clone())
            .landscape(self.document.landscape)
    }

    /// Write `html` for `output`, through the paginated renderer if any.
    fn emit(&self, html: &str, output: &Path) -> Result<PathBuf, PipelineError> {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
        }

        let written = match &self.pages {
            Some(pages) => {
                pages.render(html, output)?;
                output.to_path_buf()
            }
            None => {
                let path = output.with_extension(HTML_EXTENSION);
                fs::write(&path, html).map_err(|e| PipelineError::io(&path, e))?;
                path
            }
        };

        tracing::info!(output = %written.display(), "Created document");
        Ok(written)
    }
}

fn read_markdown(path: &Path) -> Result<String, PipelineError> {
    fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))
}

/// Title derived from a file stem: `_` and `-` become spaces and every word
/// is capitalized, e.g. `release_notes-v2` becomes `Release Notes V2`.
#[must_use]
pub fn title_from_stem(stem: &str) -> String {
    stem.replace(['_', '-'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use folio_cache::NullCache;
    use folio_diagrams::{ERROR_MARKER, RenderError};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::error::PageRenderError;

    /// Fake diagram tool: fixed SVG, fails on sources containing "broken".
    struct FakeDiagrams;

    impl DiagramRenderer for FakeDiagrams {
        fn render(&self, source: &str) -> Result<String, RenderError> {
            if source.contains("broken") {
                return Err(RenderError::Failed("syntax error".to_owned()));
            }
            Ok(r#"<svg viewBox="0 0 10 10"><rect width="10" height="10"/></svg>"#.to_owned())
        }
    }

    /// Fake engine: records documents and writes a marker file.
    #[derive(Clone, Default)]
    struct FakePages {
        rendered: Rc<RefCell<Vec<(String, PathBuf)>>>,
    }

    impl PageRenderer for FakePages {
        fn render(&self, html: &str, output: &Path) -> Result<(), PageRenderError> {
            fs::write(output, b"%PDF-fake")?;
            self.rendered
                .borrow_mut()
                .push((html.to_owned(), output.to_path_buf()));
            Ok(())
        }
    }

    fn pipeline(styles: &Path) -> Pipeline {
        let renderer: Box<dyn DiagramRenderer> = Box::new(FakeDiagrams);
        let diagrams = DiagramProcessor::new(CachedRenderer::new(renderer, Box::new(NullCache)));
        Pipeline::new(diagrams, DocumentComposer::new(ThemeStore::new(styles)))
    }

    #[test]
    fn test_title_from_stem() {
        assert_eq!(title_from_stem("release_notes-v2"), "Release Notes V2");
        assert_eq!(title_from_stem("README"), "Readme");
        assert_eq!(title_from_stem("__"), "");
    }

    #[test]
    fn test_render_html_full_document() {
        let dir = TempDir::new().unwrap();
        let markdown = "# Setup Guide\n\n> [!WARNING]\n> Back up first.\n\n```mermaid\ngraph TD\n  A --> B\n```\n\nArea is $\\pi r^2$.\n";

        let html = pipeline(dir.path()).render_html(markdown, "setup").unwrap();

        assert!(html.contains("<title>Setup Guide</title>"));
        assert!(html.contains(r#"<div class="alert alert-warning"><div class="alert-title">Warning</div>"#));
        assert!(html.contains(r#"<svg viewBox="0 0 10 10">"#));
        assert!(!html.contains("mermaid-container"));
        assert!(html.contains("πr²"));
    }

    #[test]
    fn test_render_html_title_from_stem() {
        let dir = TempDir::new().unwrap();

        let html = pipeline(dir.path())
            .render_html("No heading here.\n", "travel_plan")
            .unwrap();

        assert!(html.contains("<title>Travel Plan</title>"));
        assert!(html.contains(r#"content: "Travel Plan";"#));
    }

    #[test]
    fn test_failed_diagram_keeps_document() {
        let dir = TempDir::new().unwrap();
        let markdown = "```mermaid\nbroken\n```\n\n```mermaid\ngraph LR\n  X --> Y\n```\n";

        let html = pipeline(dir.path()).render_html(markdown, "doc").unwrap();

        assert!(html.contains(ERROR_MARKER));
        assert!(html.contains(r#"<svg viewBox="0 0 10 10">"#));
    }

    #[test]
    fn test_raw_html_with_bare_ampersand() {
        let dir = TempDir::new().unwrap();
        let markdown = "# T\n\n<div>\nAT&T rocks\n</div>\n\nAfter.\n";

        let html = pipeline(dir.path()).render_html(markdown, "t").unwrap();

        assert!(html.contains("AT&amp;T rocks"));
        assert!(html.contains("<p>After.</p>"));
    }

    #[test]
    fn test_document_settings_applied() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("technical.css"), "body { background: #1e1e1e; }").unwrap();
        let pipeline = pipeline(dir.path()).document(DocumentSettings {
            theme: "technical".to_owned(),
            header: Some("ACME".to_owned()),
            landscape: true,
        });

        let html = pipeline.render_html("# Title\n", "doc").unwrap();

        assert!(html.contains("body { background: #1e1e1e; }"));
        assert!(html.contains(r#"content: "ACME";"#));
        assert!(html.contains("size: A4 landscape"));
    }

    #[test]
    fn test_process_without_engine_writes_html() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("notes.md");
        fs::write(&input, "# Notes\n\nBody.\n").unwrap();
        let output = dir.path().join("out").join("notes.pdf");

        let written = pipeline(dir.path()).process(&input, &output).unwrap();

        assert_eq!(written, dir.path().join("out").join("notes.html"));
        let html = fs::read_to_string(&written).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<p>Body.</p>"));
        assert!(!output.exists());
    }

    #[test]
    fn test_process_with_engine() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("notes.md");
        fs::write(&input, "# Notes\n").unwrap();
        let output = dir.path().join("notes.pdf");
        let pages = FakePages::default();

        let pipeline = pipeline(dir.path()).with_page_renderer(Box::new(pages.clone()));
        let written = pipeline.process(&input, &output).unwrap();

        assert_eq!(written, output);
        assert_eq!(fs::read(&output).unwrap(), b"%PDF-fake");
        let rendered = pages.rendered.borrow();
        assert_eq!(rendered.len(), 1);
        assert!(rendered[0].0.contains("<title>Notes</title>"));
    }

    #[test]
    fn test_process_missing_input() {
        let dir = TempDir::new().unwrap();

        let result = pipeline(dir.path()).process(
            &dir.path().join("missing.md"),
            &dir.path().join("x.pdf"),
        );

        assert!(matches!(result, Err(PipelineError::Io { .. })));
    }

    #[test]
    fn test_merge_sections() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("a.md");
        let second = dir.path().join("b.md");
        fs::write(&first, "# First\n\n> [!NOTE]\n> One.\n").unwrap();
        fs::write(&second, "# Second\n").unwrap();
        let output = dir.path().join("merged.pdf");

        let written = pipeline(dir.path())
            .merge(&[first, second], &output)
            .unwrap();

        let html = fs::read_to_string(written).unwrap();
        assert!(html.contains("<title>Merged Document</title>"));
        assert!(html.contains(r#"<section id="part-0" style="page-break-after: always;"><h1>First</h1>"#));
        assert!(html.contains(r#"<div class="alert alert-note">"#));
        assert!(html.contains("</section>\n<section id=\"part-1\" style=\"page-break-after: always;\"><h1>Second</h1>"));
    }

    #[test]
    fn test_merge_without_inputs() {
        let dir = TempDir::new().unwrap();

        let result = pipeline(dir.path()).merge(&[], &dir.path().join("merged.pdf"));

        assert!(matches!(result, Err(PipelineError::NoInputs)));
    }

    #[test]
    fn test_settings_from_config() {
        let config = DocumentConfig {
            theme: "technical".to_owned(),
            header: "  ".to_owned(),
            landscape: true,
            ..DocumentConfig::default()
        };

        let settings = DocumentSettings::from(&config);

        assert_eq!(
            settings,
            DocumentSettings {
                theme: "technical".to_owned(),
                header: None,
                landscape: true,
            }
        );
    }
}
