//! Options shared by every command.

use std::path::PathBuf;

use clap::Args;
use folio_config::{CliSettings, Config};
use folio_pipeline::Pipeline;

use crate::error::CliError;
use crate::output::Output;

/// Configuration and document options.
#[derive(Args)]
pub(crate) struct DocumentArgs {
    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Theme stylesheet name (overrides config).
    #[arg(long, visible_alias = "style")]
    pub theme: Option<String>,

    /// Use landscape orientation.
    #[arg(long)]
    pub landscape: bool,

    /// Use portrait orientation (overrides config).
    #[arg(long, conflicts_with = "landscape")]
    pub portrait: bool,

    /// Running page header (default: document title).
    #[arg(long)]
    pub header: Option<String>,

    /// Directory holding theme stylesheets (overrides config).
    #[arg(long)]
    pub styles_dir: Option<PathBuf>,

    /// Diagram cache directory (overrides config).
    #[arg(long, env = "FOLIO_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Mermaid CLI executable (overrides config).
    #[arg(long, env = "FOLIO_MMDC")]
    pub diagram_command: Option<String>,

    /// TeX-to-SVG executable for math (overrides config).
    #[arg(long)]
    pub math_command: Option<String>,

    /// Paginated renderer executable (overrides config).
    #[arg(long, env = "FOLIO_PDF_ENGINE")]
    pub pdf_command: Option<String>,

    /// Enable verbose output (show per-document progress).
    #[arg(short, long)]
    pub verbose: bool,
}

impl DocumentArgs {
    /// Orientation override, if either flag was given.
    fn landscape_override(&self) -> Option<bool> {
        if self.landscape {
            Some(true)
        } else if self.portrait {
            Some(false)
        } else {
            None
        }
    }

    /// Load configuration with these options applied on top.
    pub(crate) fn load_config(self) -> Result<Config, CliError> {
        let landscape = self.landscape_override();
        let cli_settings = CliSettings {
            theme: self.theme,
            landscape,
            header: self.header,
            styles_dir: self.styles_dir,
            diagram_command: self.diagram_command,
            cache_dir: self.cache_dir,
            math_command: self.math_command,
            pdf_command: self.pdf_command,
        };

        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }

    /// Load configuration and build the pipeline it describes.
    pub(crate) fn pipeline(self, output: &Output) -> Result<Pipeline, CliError> {
        let config = self.load_config()?;

        if let Some(path) = &config.config_path {
            output.field("Config", path.display());
        }
        output.field(
            "Theme",
            format!(
                "{} ({})",
                config.document.theme,
                config.document.styles_dir.display()
            ),
        );
        output.field("Diagram cache", config.diagrams.cache_dir().display());

        let pipeline = Pipeline::from_config(&config);
        if !pipeline.has_page_renderer() {
            output.warning("No PDF engine configured: writing HTML documents instead");
        }
        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        document: DocumentArgs,
    }

    fn parse(args: &[&str]) -> DocumentArgs {
        TestCli::try_parse_from(std::iter::once("folio").chain(args.iter().copied()))
            .unwrap()
            .document
    }

    #[test]
    fn test_landscape_override() {
        assert_eq!(parse(&["--landscape"]).landscape_override(), Some(true));
        assert_eq!(parse(&["--portrait"]).landscape_override(), Some(false));
        assert_eq!(parse(&[]).landscape_override(), None);
    }

    #[test]
    fn test_missing_explicit_config() {
        let args = parse(&["--config", "/nonexistent/folio.toml"]);

        let result = args.load_config();

        assert!(matches!(
            result,
            Err(CliError::Config(folio_config::ConfigError::NotFound(_)))
        ));
    }
}
