//! Math expression transform.
//!
//! Math spans (class `arithmatex`) are rendered to SVG by a [`MathRenderer`]
//! when one is available. Whatever goes wrong, the span ends up holding a
//! Unicode approximation of the expression instead; math never fails a
//! document.

mod command;
mod error;
mod fallback;

pub use command::CommandMathRenderer;
pub use error::MathError;
pub use fallback::to_unicode;

use folio_markup::{TreeNode, parse_document};

/// Class marking a math span emitted by the converter.
const MATH_CLASS: &str = "arithmatex";

/// Delimiters stripped from raw math content.
const DELIMITERS: [&str; 5] = ["$$", r"\[", r"\]", r"\(", r"\)"];

/// Layout of a math expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MathLayout {
    /// Display math on its own line.
    Block,
    /// Math inside running text.
    Inline,
}

impl MathLayout {
    /// Classify raw math content by its delimiters.
    ///
    /// Content containing `\[` or `$$` is block-level; anything else is
    /// inline.
    #[must_use]
    pub fn classify(content: &str) -> Self {
        if content.contains(r"\[") || content.contains("$$") {
            Self::Block
        } else {
            Self::Inline
        }
    }

    /// Layout class set on a rendered SVG.
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Block => "math-block",
            Self::Inline => "math-inline",
        }
    }
}

/// Strip every math delimiter from `content` and trim the result.
#[must_use]
pub fn clean_delimiters(content: &str) -> String {
    DELIMITERS
        .iter()
        .fold(content.to_owned(), |acc, delimiter| acc.replace(delimiter, ""))
        .trim()
        .to_owned()
}

/// Renders a TeX expression to SVG.
pub trait MathRenderer {
    /// Render `tex` with glyphs filled in `color`.
    fn render(&self, tex: &str, layout: MathLayout, color: &str) -> Result<String, MathError>;
}

impl<R: MathRenderer + ?Sized> MathRenderer for Box<R> {
    fn render(&self, tex: &str, layout: MathLayout, color: &str) -> Result<String, MathError> {
        (**self).render(tex, layout, color)
    }
}

/// Outcome of transforming the math spans of a fragment.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MathReport {
    /// Spans replaced by SVG.
    pub rendered: usize,
    /// Spans holding the Unicode approximation.
    pub fallback: usize,
}

/// Replaces math spans with rendered SVG or Unicode text.
pub struct MathTransform<'a> {
    renderer: Option<&'a dyn MathRenderer>,
    color: &'a str,
}

impl<'a> MathTransform<'a> {
    /// Transform without a rendering backend: every span falls back to text.
    #[must_use]
    pub fn new(color: &'a str) -> Self {
        Self {
            renderer: None,
            color,
        }
    }

    /// Render spans through `renderer` before falling back.
    #[must_use]
    pub fn with_renderer(mut self, renderer: &'a dyn MathRenderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Transform every math span under `root`.
    pub fn apply(&self, root: &mut TreeNode) -> MathReport {
        let mut fallback = 0;
        let rendered = root.replace_descendants(
            &|node: &TreeNode| node.has_class(MATH_CLASS),
            &mut |span: &mut TreeNode| {
                let replacement = self.transform(span);
                if replacement.is_none() {
                    fallback += 1;
                }
                replacement
            },
        );
        MathReport { rendered, fallback }
    }

    fn transform(&self, span: &mut TreeNode) -> Option<TreeNode> {
        let content = span.text_content();
        let layout = MathLayout::classify(&content);
        let tex = clean_delimiters(&content);

        if !tex.is_empty()
            && let Some(renderer) = self.renderer
        {
            match render_svg(renderer, &tex, layout, self.color) {
                Ok(svg) => return Some(svg),
                Err(e) => tracing::warn!(tex = %tex, error = %e, "Math rendering failed"),
            }
        }

        tracing::debug!(tex = %tex, "Using Unicode math fallback");
        span.set_text_content(to_unicode(&tex));
        None
    }
}

fn render_svg(
    renderer: &dyn MathRenderer,
    tex: &str,
    layout: MathLayout,
    color: &str,
) -> Result<TreeNode, MathError> {
    let payload = renderer.render(tex, layout, color)?;
    let root = parse_document(&payload)?;
    let mut svg = if root.local_name() == "svg" {
        root
    } else {
        root.find(&|node: &TreeNode| node.local_name() == "svg")
            .cloned()
            .ok_or(MathError::NoSvg)?
    };
    svg.set_attr("class", format!("math-svg {}", layout.class()));
    Ok(svg)
}
