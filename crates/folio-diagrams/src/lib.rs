//! Diagram rendering for folio.
//!
//! This crate turns diagram placeholders left in a converted document into
//! inline SVG that a paginated renderer can display:
//! - [`DiagramRenderer`] is the capability that turns diagram source into SVG
//!   text; [`MermaidCli`] implements it by running `mmdc`
//! - [`CachedRenderer`] memoizes renders on disk, keyed by [`DiagramKey`]
//! - [`make_print_compatible`] rewrites `foreignObject` labels into native
//!   SVG `<text>` elements
//! - [`DiagramProcessor`] finds placeholders in a fragment and substitutes
//!   the rendered, rewritten SVG (or a visible error marker)
//!
//! # Example
//!
//! ```ignore
//! use folio_cache::FileCache;
//! use folio_diagrams::{CachedRenderer, DiagramProcessor, MermaidCli};
//!
//! let cache_dir = std::env::temp_dir().join("folio-diagram-cache");
//! let renderer = CachedRenderer::new(
//!     MermaidCli::new(&cache_dir),
//!     Box::new(FileCache::new(&cache_dir, "svg")),
//! );
//! let processor = DiagramProcessor::new(renderer);
//!
//! let mut fragment = folio_markup::parse_fragment(html)?;
//! let report = processor.process(&mut fragment)?;
//! ```

mod cache;
mod compat;
mod consts;
mod error;
mod mermaid;
mod processor;
mod renderer;

pub use cache::{CachedRenderer, DiagramKey};
pub use compat::{LabelStyle, make_print_compatible};
pub use consts::{ERROR_MARKER, PLACEHOLDER_CLASS, SOURCE_ATTR};
pub use error::{DiagramError, RenderError};
pub use mermaid::MermaidCli;
pub use processor::{DiagramProcessor, DiagramReport};
pub use renderer::DiagramRenderer;
