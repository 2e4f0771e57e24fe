//! Diagram rendering capability.

use crate::error::RenderError;

/// Turns diagram source text into an SVG payload.
///
/// The production implementation runs an external tool
/// ([`MermaidCli`](crate::MermaidCli)); tests substitute in-memory fakes.
pub trait DiagramRenderer {
    /// Render `source` to SVG text.
    fn render(&self, source: &str) -> Result<String, RenderError>;
}

impl<R: DiagramRenderer + ?Sized> DiagramRenderer for Box<R> {
    fn render(&self, source: &str) -> Result<String, RenderError> {
        (**self).render(source)
    }
}

impl<R: DiagramRenderer + ?Sized> DiagramRenderer for &R {
    fn render(&self, source: &str) -> Result<String, RenderError> {
        (**self).render(source)
    }
}
