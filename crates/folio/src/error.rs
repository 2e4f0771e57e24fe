//! CLI error types.

use folio_config::ConfigError;
use folio_pipeline::PipelineError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    #[error("{failed} of {total} documents failed to convert")]
    Batch { failed: usize, total: usize },

    #[error("{0}")]
    Validation(String),
}
