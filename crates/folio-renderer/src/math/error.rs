//! Math rendering errors.

use std::io;
use std::process::ExitStatus;

use folio_markup::ParseError;

/// Failure of the math rendering backend.
///
/// Always recovered: the expression falls back to its Unicode
/// approximation.
#[derive(Debug, thiserror::Error)]
pub enum MathError {
    /// The math tool could not be started.
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        /// Executable that was invoked.
        command: String,
        /// Underlying spawn error.
        source: io::Error,
    },

    /// The math tool exited unsuccessfully.
    #[error("math tool exited with {status}: {stderr}")]
    Exit {
        /// Exit status of the process.
        status: ExitStatus,
        /// Captured standard error output.
        stderr: String,
    },

    /// The math tool printed nothing.
    #[error("math tool produced no output")]
    EmptyOutput,

    /// The payload contains no `<svg>` element.
    #[error("math output contains no svg element")]
    NoSvg,

    /// The payload is not well-formed markup.
    #[error("malformed math SVG: {0}")]
    Parse(#[from] ParseError),

    /// Failure reported by a non-process backend.
    #[error("{0}")]
    Failed(String),
}
