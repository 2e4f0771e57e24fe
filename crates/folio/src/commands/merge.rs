//! `folio merge` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use folio_pipeline::{BatchOptions, collect_inputs};

use super::document::DocumentArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the merge command.
#[derive(Args)]
pub(crate) struct MergeArgs {
    /// Markdown files, in order. A directory contributes its markdown files
    /// sorted by path.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output file.
    #[arg(short, long, default_value = "merged.pdf")]
    pub output: PathBuf,

    #[command(flatten)]
    pub document: DocumentArgs,
}

impl MergeArgs {
    /// Execute the merge command.
    ///
    /// # Errors
    ///
    /// Returns an error if an input is missing, configuration fails, or the
    /// merged document cannot be produced.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let inputs = expand_inputs(&self.inputs)?;
        output.info(&format!("Merging {} files", inputs.len()));

        let pipeline = self.document.pipeline(&output)?;
        let written = pipeline.merge(&inputs, &self.output)?;

        output.success(&format!("Created: {}", written.display()));
        Ok(())
    }
}

/// Replace each directory argument by the markdown files it contains.
fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, CliError> {
    let mut files = Vec::with_capacity(inputs.len());
    for input in inputs {
        if input.is_dir() {
            files.extend(collect_inputs(input, &BatchOptions::default())?);
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            return Err(missing(input));
        }
    }
    Ok(files)
}

fn missing(path: &Path) -> CliError {
    CliError::Validation(format!("Input not found: {}", path.display()))
}
