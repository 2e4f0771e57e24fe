//! Markdown conversion and document composition for folio.
//!
//! The stages a converted document passes through after diagram
//! substitution live here:
//!
//! - [`MarkdownConverter`]: markdown to HTML fragment, leaving placeholders
//!   for diagrams and tagged spans for math
//! - [`transform_alerts`]: `[!KIND]` blockquotes to titled callouts
//! - [`MathTransform`]: math spans to SVG through a [`MathRenderer`], or to
//!   a Unicode approximation
//! - [`DocumentComposer`]: runs the transforms and wraps the fragment in a
//!   complete themed document
//!
//! # Example
//!
//! ```
//! use folio_renderer::{ComposeOptions, DocumentComposer, MarkdownConverter, ThemeStore};
//!
//! let conversion = MarkdownConverter::new().convert("# Guide\n\n> [!TIP]\n> Use a cache.\n");
//! let composer = DocumentComposer::new(ThemeStore::new("styles"));
//! let options = ComposeOptions::new(conversion.title.unwrap_or_default());
//!
//! let html = composer.compose(&conversion.html, &options).unwrap();
//! assert!(html.contains(r#"<div class="alert alert-tip">"#));
//! ```

mod alert;
mod compose;
mod convert;
mod math;
mod theme;

pub use alert::{AlertKind, transform_alerts};
pub use compose::{ALERT_CSS, ComposeOptions, DocumentComposer};
pub use convert::{Conversion, MarkdownConverter};
pub use math::{
    CommandMathRenderer, MathError, MathLayout, MathRenderer, MathReport, MathTransform,
    clean_delimiters, to_unicode,
};
pub use theme::{ThemeStore, math_color};
