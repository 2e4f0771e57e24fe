//! `folio batch` command implementation.

use std::path::PathBuf;

use clap::Args;
use folio_pipeline::BatchOptions;

use super::document::DocumentArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the batch command.
#[derive(Args)]
pub(crate) struct BatchArgs {
    /// Directory to search for markdown files.
    pub input_dir: PathBuf,

    /// Directory to write documents to (default: the input directory).
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Glob pattern selecting files, relative to the input directory.
    #[arg(long, default_value = "*.md")]
    pub pattern: String,

    /// Only convert files directly inside the input directory.
    #[arg(long)]
    pub no_recursive: bool,

    #[command(flatten)]
    pub document: DocumentArgs,
}

impl BatchArgs {
    /// Execute the batch command.
    ///
    /// # Errors
    ///
    /// Returns an error if the input directory is missing, configuration
    /// fails, or any document fails to convert.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        if !self.input_dir.is_dir() {
            return Err(CliError::Validation(format!(
                "Input directory not found: {}",
                self.input_dir.display()
            )));
        }
        let output_dir = self.output_dir.unwrap_or_else(|| self.input_dir.clone());
        let options = BatchOptions::default()
            .pattern(self.pattern)
            .recursive(!self.no_recursive);
        tracing::debug!(?options, output_dir = %output_dir.display(), "Batch options");

        let pipeline = self.document.pipeline(&output)?;
        let report = pipeline.batch(&self.input_dir, &output_dir, &options)?;

        let total = report.converted + report.failed;
        if report.failed > 0 {
            output.warning(&format!(
                "Converted {} of {total} documents into {}",
                report.converted,
                output_dir.display()
            ));
            return Err(CliError::Batch {
                failed: report.failed,
                total,
            });
        }

        output.success(&format!(
            "Converted {total} documents into {}",
            output_dir.display()
        ));
        Ok(())
    }
}
