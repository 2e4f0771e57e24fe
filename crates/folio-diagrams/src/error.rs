//! Error types for diagram rendering.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use folio_markup::ParseError;

/// A single diagram could not be rendered.
///
/// Recoverable: the diagram is replaced by a visible error marker and the
/// rest of the document is processed normally. Nothing is cached for the
/// failed source, so the next run tries again.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The diagram tool could not be started (typically not installed).
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        /// Executable that was invoked.
        command: String,
        /// Underlying spawn error.
        source: io::Error,
    },

    /// The diagram tool exited unsuccessfully.
    #[error("diagram tool exited with {status}: {stderr}")]
    Exit {
        /// Exit status of the process.
        status: ExitStatus,
        /// Captured standard error output.
        stderr: String,
    },

    /// The diagram tool succeeded but wrote no output.
    #[error("diagram tool produced no output")]
    MissingOutput,

    /// The diagram tool ran longer than the configured limit and was killed.
    #[error("diagram tool timed out after {0:?}")]
    Timeout(Duration),

    /// Failure reported by a non-process renderer.
    #[error("{0}")]
    Failed(String),

    /// I/O error around the render (scratch files, configuration).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Tool configuration could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error from diagram processing.
///
/// Only [`DiagramError::Render`] is recoverable; the other variants are
/// resource-level failures that abort the document.
#[derive(Debug, thiserror::Error)]
pub enum DiagramError {
    /// Rendering one diagram failed.
    #[error("diagram rendering failed: {0}")]
    Render(#[from] RenderError),

    /// The cache directory could not be written.
    #[error("failed to write diagram cache entry {hash}: {source}")]
    Cache {
        /// Content hash of the entry.
        hash: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The rendered SVG could not be parsed.
    #[error("malformed diagram SVG: {0}")]
    Parse(#[from] ParseError),
}
