//! Folio CLI - Markdown to print-ready documents.
//!
//! Provides commands for:
//! - `convert`: Convert one markdown file
//! - `batch`: Convert every markdown file under a directory
//! - `merge`: Combine several markdown files into one document

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BatchArgs, ConvertArgs, MergeArgs};
use output::Output;

/// Folio - Markdown to print-ready documents.
#[derive(Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a markdown file.
    Convert(ConvertArgs),
    /// Convert every matching markdown file under a directory.
    Batch(BatchArgs),
    /// Combine several markdown files into one document.
    Merge(MergeArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Convert(args) => args.document.verbose,
            Self::Batch(args) => args.document.verbose,
            Self::Merge(args) => args.document.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Convert(args) => args.execute(),
        Commands::Batch(args) => args.execute(),
        Commands::Merge(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
