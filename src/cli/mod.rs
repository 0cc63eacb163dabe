//! Command-line interface for csv-merge
//!
//! Provides `merge`, `info` and `completions` subcommands.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod completions;
mod info;
mod merge;
mod utils;

/// Concatenate the CSV files of a directory into a single file
#[derive(Parser)]
#[command(name = "csv-merge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge every matching file in a directory into one output file
    Merge(Box<merge::MergeArgs>),

    /// List the files a merge would read, in order, with their headers
    Info(info::InfoArgs),

    /// Print a shell completion script
    Completions(completions::CompletionsArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // A set RUST_LOG replaces the default level entirely; otherwise WARN, or DEBUG with --verbose.
    let default_level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(default_level.into()));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Merge(args) => merge::run(*args),
        Commands::Info(args) => info::run(args),
        Commands::Completions(args) => completions::run(args),
    }
}
