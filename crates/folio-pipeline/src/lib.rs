//! Document pipeline for folio.
//!
//! [`Pipeline`] strings the stages of the other folio crates together:
//!
//! 1. markdown conversion ([`folio_renderer::MarkdownConverter`])
//! 2. diagram substitution ([`folio_diagrams::DiagramProcessor`])
//! 3. alert and math transforms plus themed composition
//!    ([`folio_renderer::DocumentComposer`])
//! 4. paginated rendering ([`PageRenderer`])
//!
//! It runs them for a single document ([`Pipeline::process`]), for every
//! matching file of a directory tree ([`Pipeline::batch`]), or for a set of
//! files combined into one document ([`Pipeline::merge`]).

mod batch;
mod error;
mod page;
mod pipeline;

pub use batch::{BatchOptions, BatchReport, collect_inputs};
pub use error::{PageRenderError, PipelineError};
pub use page::{CommandPageRenderer, PageRenderer};
pub use pipeline::{DocumentSettings, MERGED_TITLE, Pipeline, title_from_stem};
