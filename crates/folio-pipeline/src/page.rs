//! Paginated rendering boundary.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::PageRenderError;

/// Turns a finished HTML document into a paginated file.
pub trait PageRenderer {
    /// Render `html` to `output`.
    fn render(&self, html: &str, output: &Path) -> Result<(), PageRenderError>;
}

impl<R: PageRenderer + ?Sized> PageRenderer for Box<R> {
    fn render(&self, html: &str, output: &Path) -> Result<(), PageRenderError> {
        (**self).render(html, output)
    }
}

/// [`PageRenderer`] that runs an external engine once per document.
///
/// Invocation: `<command> <args...> <in.html> <out>`. The document is written
/// to a scratch `.html` file that is removed afterwards.
#[derive(Clone, Debug)]
pub struct CommandPageRenderer {
    command: String,
    args: Vec<String>,
}

impl CommandPageRenderer {
    /// Create a renderer running `command`.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
        }
    }

    /// Set arguments placed before the input and output paths.
    #[must_use]
    pub fn args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    fn command_for(&self, input: &Path, output: &Path) -> Command {
        let mut command = Command::new(&self.command);
        command
            .args(&self.args)
            .arg(input)
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null());
        command
    }
}

impl PageRenderer for CommandPageRenderer {
    fn render(&self, html: &str, output: &Path) -> Result<(), PageRenderError> {
        let mut input = tempfile::Builder::new()
            .prefix("folio-")
            .suffix(".html")
            .tempfile()?;
        input.write_all(html.as_bytes())?;
        input.flush()?;

        let result = self
            .command_for(input.path(), output)
            .output()
            .map_err(|source| PageRenderError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if !result.status.success() {
            return Err(PageRenderError::Exit {
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_owned(),
            });
        }
        if !output.is_file() {
            return Err(PageRenderError::MissingOutput(output.to_path_buf()));
        }

        tracing::debug!(command = %self.command, output = %output.display(), "Rendered pages");
        Ok(())
    }
}
