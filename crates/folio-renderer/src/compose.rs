//! Themed document composition.

use std::fmt::Write;

use folio_markup::{ParseError, TreeNode, escape_html, parse_fragment, to_html_fragment};

use crate::alert::transform_alerts;
use crate::math::{MathRenderer, MathTransform};
use crate::theme::{ThemeStore, math_color};

/// Palette of the alert callouts, emitted ahead of the theme stylesheet.
pub const ALERT_CSS: &str = "\
.alert { padding: 1em; margin: 1em 0; border-left: 4px solid; border-radius: 4px; }
.alert-title { font-weight: bold; margin-bottom: 0.5em; display: block; }
.alert-note { background: #e3f2fd; border-color: #2196f3; color: #0d47a1; }
.alert-tip { background: #f1f8e9; border-color: #8bc34a; color: #33691e; }
.alert-important { background: #f3e5f5; border-color: #9c27b0; color: #4a148c; }
.alert-warning { background: #fff3e0; border-color: #ff9800; color: #e65100; }
.alert-caution { background: #ffebee; border-color: #f44336; color: #b71c1c; }";

const LANDSCAPE_CSS: &str = "@page { size: A4 landscape !important; }";

/// Per-document composition options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposeOptions {
    /// Document title, used for `<title>` and as the default page header.
    pub title: String,
    /// Theme stylesheet name.
    pub theme: String,
    /// Running page header. `None` or empty falls back to the title.
    pub header: Option<String>,
    /// Lay pages out in landscape orientation.
    pub landscape: bool,
}

impl ComposeOptions {
    /// Options for a portrait document in the `default` theme.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            theme: "default".to_owned(),
            header: None,
            landscape: false,
        }
    }

    /// Set the theme name.
    #[must_use]
    pub fn theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    /// Set the running page header.
    #[must_use]
    pub fn header(mut self, header: Option<String>) -> Self {
        self.header = header;
        self
    }

    /// Set landscape orientation.
    #[must_use]
    pub fn landscape(mut self, landscape: bool) -> Self {
        self.landscape = landscape;
        self
    }

    fn header_text(&self) -> &str {
        match self.header.as_deref() {
            Some(header) if !header.trim().is_empty() => header,
            _ => &self.title,
        }
    }
}

/// Assembles finished, themed documents.
///
/// Composition runs the alert transform and then the math transform over
/// the fragment, and wraps the result in a document whose stylesheet is, in
/// order: alert palette, theme stylesheet, page header override, orientation
/// override.
pub struct DocumentComposer {
    themes: ThemeStore,
    math: Option<Box<dyn MathRenderer>>,
}

impl DocumentComposer {
    /// Create a composer reading themes from `themes`, with no math backend.
    #[must_use]
    pub fn new(themes: ThemeStore) -> Self {
        Self { themes, math: None }
    }

    /// Render math through `renderer` instead of only the Unicode fallback.
    #[must_use]
    pub fn with_math_renderer(mut self, renderer: Box<dyn MathRenderer>) -> Self {
        self.math = Some(renderer);
        self
    }

    /// Theme store in use.
    #[must_use]
    pub fn themes(&self) -> &ThemeStore {
        &self.themes
    }

    /// Full stylesheet of a document composed with `options`.
    #[must_use]
    pub fn stylesheet(&self, options: &ComposeOptions) -> String {
        let header_css = format!(
            "@page {{ @top-right {{ content: \"{}\"; }} }}",
            css_string(options.header_text())
        );
        let orientation_css = if options.landscape { LANDSCAPE_CSS } else { "" };
        let theme_css = self.themes.load(&options.theme);

        [
            ALERT_CSS,
            theme_css.as_str(),
            header_css.as_str(),
            orientation_css,
        ]
        .join("\n")
    }

    /// Apply the alert and math transforms to `fragment` in place.
    pub fn transform(&self, fragment: &mut TreeNode, theme: &str) {
        let alerts = transform_alerts(fragment);

        let mut math = MathTransform::new(math_color(theme));
        if let Some(renderer) = self.math.as_deref() {
            math = math.with_renderer(renderer);
        }
        let report = math.apply(fragment);

        tracing::debug!(
            alerts,
            math_rendered = report.rendered,
            math_fallback = report.fallback,
            "Transformed document"
        );
    }

    /// Wrap already transformed body HTML in the document template.
    #[must_use]
    pub fn wrap(&self, body: &str, options: &ComposeOptions) -> String {
        let mut out = String::with_capacity(body.len() + 2048);
        write!(
            out,
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<title>{title}</title>\n\
             <style>\n{css}\n</style>\n</head>\n<body>\n<div class=\"container\">\n{body}\n</div>\n</body>\n</html>\n",
            title = escape_html(&options.title),
            css = self.stylesheet(options),
        )
        .unwrap();
        out
    }

    /// Transform `fragment` and return the finished document.
    #[must_use]
    pub fn compose_tree(&self, fragment: &mut TreeNode, options: &ComposeOptions) -> String {
        self.transform(fragment, &options.theme);
        self.wrap(&to_html_fragment(fragment), options)
    }

    /// Parse `html`, transform it and return the finished document.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if `html` cannot be parsed.
    pub fn compose(&self, html: &str, options: &ComposeOptions) -> Result<String, ParseError> {
        let mut fragment = parse_fragment(html)?;
        Ok(self.compose_tree(&mut fragment, options))
    }
}

/// Escape `text` for a double-quoted CSS string.
fn css_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\a "),
            '<' => out.push_str("\\3c "),
            _ => out.push(ch),
        }
    }
    out
}
