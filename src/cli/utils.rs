//! Shared CLI utilities.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use csv_merge::config::{load_config, merge_cli_with_config, CliOverrides};
use csv_merge::MergeOptions;
use std::path::PathBuf;

/// Options shared by every command that reads input files.
#[derive(Args)]
pub struct SourceArgs {
    /// Path to config file (csv-merge.toml or .csv-merge.yml)
    #[arg(short = 'c', long, value_name = "FILE", env = "CSV_MERGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Text encoding for every input file and the output [default: utf-8]
    #[arg(short = 'e', long, value_name = "NAME")]
    pub encoding: Option<String>,

    /// Field delimiter of the input files, also used for the output; `tab` for TAB [default: ,]
    #[arg(short = 'd', long, value_name = "CHAR")]
    pub delimiter: Option<String>,

    /// File name glob selecting the input files [default: *.csv]
    #[arg(short = 'p', long, value_name = "GLOB")]
    pub pattern: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Load config file and environment, apply the command line on top, validate.
pub fn resolve_options(source: &SourceArgs, overrides: CliOverrides) -> Result<MergeOptions> {
    let cwd = std::env::current_dir().context("Cannot determine current directory")?;
    let config = load_config(&cwd, source.config.as_deref())?;

    let overrides = CliOverrides {
        encoding: source.encoding.clone(),
        delimiter: source.delimiter.clone(),
        pattern: source.pattern.clone(),
        ..overrides
    };
    let merged = merge_cli_with_config(config, overrides);
    tracing::debug!("Effective configuration: {:?}", merged);

    Ok(merged.resolve()?)
}

/// "1 row", "3 rows"
pub fn plural(count: u64, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
