//! Merge command implementation

use anyhow::Result;
use clap::Args;
use csv_merge::config::{CliOverrides, LineEnding, Preset};
use csv_merge::utils::file_name_lossy;
use csv_merge::MergeSummary;
use std::path::PathBuf;

use super::utils::{plural, resolve_options, OutputFormat, SourceArgs};

#[derive(Args)]
pub struct MergeArgs {
    /// Directory containing the CSV files to merge
    #[arg(value_name = "INPUT_PATH")]
    pub input_path: PathBuf,

    /// File to write (created, or overwritten if it exists)
    #[arg(value_name = "OUTPUT_FILE")]
    pub output_file: PathBuf,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Field delimiter of the output file [default: same as --delimiter]
    #[arg(long, value_name = "CHAR")]
    pub output_delimiter: Option<String>,

    /// Quote every output field, not only fields that need it
    #[arg(long)]
    pub quote_all: bool,

    /// Start from a named bundle of settings; explicit flags still win
    #[arg(long, value_enum, value_name = "PRESET")]
    pub preset: Option<Preset>,

    /// Line terminator written after each output row [default: native]
    #[arg(long, value_enum, value_name = "STYLE")]
    pub line_ending: Option<LineEnding>,

    /// Fail when a file's header differs from the first file's header
    #[arg(long)]
    pub strict_headers: bool,

    /// Skip files that cannot be read and report them, instead of aborting
    #[arg(long)]
    pub skip_bad_files: bool,

    /// Format of the summary printed on success
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn run(args: MergeArgs) -> Result<()> {
    let overrides = CliOverrides {
        preset: args.preset,
        output_delimiter: args.output_delimiter,
        quote_all: args.quote_all,
        line_ending: args.line_ending,
        strict_headers: args.strict_headers,
        skip_bad_files: args.skip_bad_files,
        ..CliOverrides::default()
    };
    let options = resolve_options(&args.source, overrides)?;

    let summary = csv_merge::merge(&args.input_path, &args.output_file, &options)?;

    match args.format {
        OutputFormat::Text => print_summary(&summary),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }
    Ok(())
}

fn print_summary(summary: &MergeSummary) {
    println!(
        "Successfully combined {} into {}",
        plural(summary.files_merged() as u64, "file"),
        summary.output.display()
    );
    for file in &summary.files {
        println!("  {}: {}", file_name_lossy(&file.path), plural(file.rows, "row"));
    }
    if let Some(source) = &summary.header_source {
        println!(
            "Header from {} ({})",
            file_name_lossy(source),
            plural(summary.header.len() as u64, "field")
        );
    }
    println!("Data rows written: {}", summary.data_rows);

    if !summary.skipped.is_empty() {
        println!();
        println!("Skipped {}:", plural(summary.skipped.len() as u64, "file"));
        for skipped in &summary.skipped {
            println!("  {}: {}", file_name_lossy(&skipped.path), skipped.reason);
        }
    }
}
