//! Batch conversion of a directory tree.

use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::error::PipelineError;
use crate::pipeline::Pipeline;

/// Extension of batch outputs; the configured engine decides the format.
const OUTPUT_EXTENSION: &str = "pdf";

/// Which files of an input directory a batch converts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchOptions {
    /// Glob matched against each file's path relative to the input directory.
    pub pattern: String,
    /// Descend into subdirectories.
    pub recursive: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            pattern: "*.md".to_owned(),
            recursive: true,
        }
    }
}

impl BatchOptions {
    /// Set the file pattern.
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    /// Set whether subdirectories are searched.
    #[must_use]
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }
}

/// Outcome of a batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    /// Documents written.
    pub converted: usize,
    /// Documents that failed and were skipped.
    pub failed: usize,
}

/// Files under `input_dir` matching `options`, sorted by path.
///
/// # Errors
///
/// Returns an error if the pattern is invalid or a directory cannot be read.
pub fn collect_inputs(input_dir: &Path, options: &BatchOptions) -> Result<Vec<PathBuf>, PipelineError> {
    let pattern = Pattern::new(&options.pattern)?;
    let mut files = Vec::new();
    walk(input_dir, input_dir, &pattern, options.recursive, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(
    root: &Path,
    dir: &Path,
    pattern: &Pattern,
    recursive: bool,
    files: &mut Vec<PathBuf>,
) -> Result<(), PipelineError> {
    let entries = fs::read_dir(dir).map_err(|e| PipelineError::io(dir, e))?;
    for entry in entries {
        let path = entry.map_err(|e| PipelineError::io(dir, e))?.path();
        if path.is_dir() {
            if recursive {
                walk(root, &path, pattern, recursive, files)?;
            }
        } else if path.is_file()
            && let Ok(relative) = path.strip_prefix(root)
            && pattern.matches_path(relative)
        {
            files.push(path);
        }
    }
    Ok(())
}

impl Pipeline {
    /// Convert every matching file under `input_dir` into a mirrored tree
    /// under `output_dir`.
    ///
    /// A document that fails is logged and counted; the batch carries on
    /// with the next one.
    ///
    /// # Errors
    ///
    /// Returns an error only if the inputs cannot be listed or the output
    /// directory cannot be created.
    pub fn batch(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        options: &BatchOptions,
    ) -> Result<BatchReport, PipelineError> {
        let inputs = collect_inputs(input_dir, options)?;
        tracing::info!(
            count = inputs.len(),
            input_dir = %input_dir.display(),
            pattern = %options.pattern,
            "Batch processing"
        );
        fs::create_dir_all(output_dir).map_err(|e| PipelineError::io(output_dir, e))?;

        let mut report = BatchReport::default();
        for input in &inputs {
            let relative = input.strip_prefix(input_dir).unwrap_or(input);
            let output = output_dir.join(relative).with_extension(OUTPUT_EXTENSION);
            match self.process(input, &output) {
                Ok(_) => report.converted += 1,
                Err(e) => {
                    tracing::warn!(input = %input.display(), error = %e, "Failed to convert document");
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            converted = report.converted,
            failed = report.failed,
            "Batch complete"
        );
        Ok(report)
    }
}
