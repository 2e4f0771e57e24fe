//! Math rendering through an external TeX-to-SVG command.

use std::process::{Command, Stdio};

use super::{MathError, MathLayout, MathRenderer};

/// [`MathRenderer`] that runs a command once per expression.
///
/// Invocation: `<command> [--inline] -- <tex>`. The `--` keeps expressions
/// such as `-x^2` from being read as options. The SVG is read from standard
/// output; every `currentColor` in it is replaced by the requested color.
#[derive(Clone, Debug)]
pub struct CommandMathRenderer {
    command: String,
}

impl CommandMathRenderer {
    /// Create a renderer running `command`.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn command_for(&self, tex: &str, layout: MathLayout) -> Command {
        let mut command = Command::new(&self.command);
        if layout == MathLayout::Inline {
            command.arg("--inline");
        }
        command.arg("--").arg(tex).stdin(Stdio::null());
        command
    }
}

impl MathRenderer for CommandMathRenderer {
    fn render(&self, tex: &str, layout: MathLayout, color: &str) -> Result<String, MathError> {
        let output = self
            .command_for(tex, layout)
            .output()
            .map_err(|source| MathError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(MathError::Exit {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        let svg = String::from_utf8_lossy(&output.stdout);
        if svg.trim().is_empty() {
            return Err(MathError::EmptyOutput);
        }
        Ok(svg.replace("currentColor", color))
    }
}
