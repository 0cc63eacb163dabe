//! Info command implementation

use anyhow::Result;
use clap::Args;
use csv::StringRecord;
use csv_merge::config::CliOverrides;
use csv_merge::merge::InputFile;
use csv_merge::scan::{InputScanner, ScanStats};
use csv_merge::utils::file_name_lossy;
use csv_merge::MergeError;
use serde::Serialize;
use std::path::PathBuf;

use super::utils::{resolve_options, OutputFormat, SourceArgs};

#[derive(Args)]
pub struct InfoArgs {
    /// Directory containing the CSV files
    #[arg(value_name = "INPUT_PATH")]
    pub input_path: PathBuf,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct FileReport {
    path: PathBuf,
    fields: Option<usize>,
    header_matches_first: Option<bool>,
    error: Option<String>,
}

#[derive(Serialize)]
struct InfoReport {
    directory: PathBuf,
    pattern: String,
    encoding: &'static str,
    files: Vec<FileReport>,
    stats: ScanStats,
}

pub fn run(args: InfoArgs) -> Result<()> {
    let options = resolve_options(&args.source, CliOverrides::default())?;

    let mut scanner = InputScanner::new(args.input_path.clone()).pattern(options.pattern.clone());
    let files = scanner.scan()?;
    if files.is_empty() {
        return Err(MergeError::NoInputFiles {
            dir: args.input_path.clone(),
            pattern: options.pattern.clone(),
        }
        .into());
    }

    // Header check only: no data rows are read and nothing is written.
    let mut first_header: Option<StringRecord> = None;
    let mut reports = Vec::with_capacity(files.len());
    for path in files {
        let header = InputFile::open(&path, &options).and_then(|mut input| input.read_header());
        let report = match header {
            Ok(header) => {
                let matches = match &first_header {
                    Some(first) => *first == header,
                    None => true,
                };
                let fields = header.len();
                if first_header.is_none() {
                    first_header = Some(header);
                }
                FileReport { path, fields: Some(fields), header_matches_first: Some(matches), error: None }
            }
            Err(err) => FileReport {
                path,
                fields: None,
                header_matches_first: None,
                error: Some(err.detail()),
            },
        };
        reports.push(report);
    }

    let report = InfoReport {
        directory: args.input_path,
        pattern: options.pattern.clone(),
        encoding: options.encoding.name(),
        files: reports,
        stats: scanner.stats().clone(),
    };

    match args.format {
        OutputFormat::Text => print_report(&report, first_header.as_ref()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn print_report(report: &InfoReport, header: Option<&StringRecord>) {
    println!("Directory: {}", report.directory.display());
    println!("Pattern: {}", report.pattern);
    println!("Encoding: {}", report.encoding);
    if let Some(header) = header {
        println!("Header: {}", header.iter().collect::<Vec<_>>().join(", "));
    }

    println!("Files in merge order:");
    for file in &report.files {
        let name = file_name_lossy(&file.path);
        match (&file.error, file.fields, file.header_matches_first) {
            (Some(error), _, _) => println!("  {name}: ERROR {error}"),
            (None, Some(fields), Some(false)) => {
                println!("  {name}: {fields} fields (header differs from first file)")
            }
            (None, Some(fields), _) => println!("  {name}: {fields} fields"),
            (None, None, _) => println!("  {name}"),
        }
    }

    let stats = &report.stats;
    println!("Statistics:");
    println!("  Entries seen: {}", stats.entries_seen);
    println!("  Files matched: {}", stats.files_matched);
    println!("  Skipped (pattern): {}", stats.skipped_pattern);
    println!("  Skipped (hidden): {}", stats.skipped_hidden);
    println!("  Skipped (not a file): {}", stats.skipped_not_file);
}
