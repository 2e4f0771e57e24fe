//! Pipeline error types.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use folio_diagrams::DiagramError;
use folio_markup::ParseError;

/// The paginated renderer failed to produce a document.
#[derive(Debug, thiserror::Error)]
pub enum PageRenderError {
    /// The renderer could not be started.
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        /// Executable that was invoked.
        command: String,
        /// Underlying spawn error.
        source: io::Error,
    },

    /// The renderer exited unsuccessfully.
    #[error("page renderer exited with {status}: {stderr}")]
    Exit {
        /// Exit status of the process.
        status: ExitStatus,
        /// Captured standard error output.
        stderr: String,
    },

    /// The renderer succeeded but wrote nothing at the output path.
    #[error("page renderer produced no output at {}", .0.display())]
    MissingOutput(PathBuf),

    /// I/O error around the render (scratch document).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Error that aborts a document.
///
/// Individual diagram and math failures never surface here; they are
/// recovered inside the document.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Diagram processing hit a resource failure.
    #[error(transparent)]
    Diagram(#[from] DiagramError),

    /// The converted fragment could not be parsed.
    #[error("malformed document markup: {0}")]
    Parse(#[from] ParseError),

    /// Reading an input or writing an output failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The paginated renderer failed.
    #[error("page rendering failed: {0}")]
    PageRender(#[from] PageRenderError),

    /// Batch file pattern is not a valid glob.
    #[error("invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// A merge was requested without inputs.
    #[error("no input documents")]
    NoInputs,
}

impl PipelineError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
