//! `folio convert` command implementation.

use std::path::PathBuf;

use clap::Args;

use super::document::DocumentArgs;
use crate::error::CliError;
use crate::output::Output;

/// Output extension when `--output` is not given.
const DEFAULT_EXTENSION: &str = "pdf";

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Markdown file to convert.
    pub input: PathBuf,

    /// Output file (default: input with a .pdf extension).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub document: DocumentArgs,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is missing, configuration fails, or the
    /// document cannot be produced.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        if !self.input.is_file() {
            return Err(CliError::Validation(format!(
                "Input file not found: {}",
                self.input.display()
            )));
        }
        let target = self
            .output
            .unwrap_or_else(|| self.input.with_extension(DEFAULT_EXTENSION));

        let pipeline = self.document.pipeline(&output)?;
        let written = pipeline.process(&self.input, &target)?;

        output.success(&format!("Created: {}", written.display()));
        Ok(())
    }
}
