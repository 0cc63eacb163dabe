//! Row-streaming merge of many CSV files into one
//!
//! The header row comes from the first input file (in discovery order); every
//! other file's header row is read and dropped. Data rows are copied
//! field-for-field, re-encoded with the output delimiter and quoting.

pub mod input;
pub mod sink;
pub mod summary;

pub use input::InputFile;
pub use sink::OutputSink;
pub use summary::{MergeSummary, MergedFile, SkippedFile};

use crate::config::MergeOptions;
use crate::error::{ErrorKind, MergeError};
use crate::scan::discover_inputs;
use csv::StringRecord;
use std::path::Path;

/// Merge every matching file in `input_dir` into `output_path`.
///
/// The output file is not touched unless at least one input file exists.
/// A failure after that point leaves the partially written output in place.
pub fn merge(
    input_dir: &Path,
    output_path: &Path,
    options: &MergeOptions,
) -> Result<MergeSummary, MergeError> {
    let result = run(input_dir, output_path, options);
    if let Err(err) = &result {
        tracing::error!("{}", err.detail());
    }
    result
}

fn run(
    input_dir: &Path,
    output_path: &Path,
    options: &MergeOptions,
) -> Result<MergeSummary, MergeError> {
    let inputs = discover_inputs(input_dir, &options.pattern, Some(output_path))?;
    if inputs.is_empty() {
        return Err(MergeError::NoInputFiles {
            dir: input_dir.to_path_buf(),
            pattern: options.pattern.clone(),
        });
    }

    tracing::info!("Merging {} files into {}", inputs.len(), output_path.display());

    let mut merger = Merger {
        options,
        sink: OutputSink::create(output_path, options)?,
        header: None,
        summary: MergeSummary::new(output_path),
    };
    for path in &inputs {
        merger.merge_file(path)?;
    }

    if merger.header.is_none() {
        return Err(MergeError::AllInputsSkipped {
            dir: input_dir.to_path_buf(),
            count: inputs.len(),
        });
    }
    tracing::info!(
        "Wrote {} records from {} files",
        merger.sink.rows_written(),
        merger.summary.files_merged()
    );
    merger.sink.finish()?;
    Ok(merger.summary)
}

struct Merger<'a> {
    options: &'a MergeOptions,
    sink: OutputSink,
    header: Option<StringRecord>,
    summary: MergeSummary,
}

impl Merger<'_> {
    fn merge_file(&mut self, path: &Path) -> Result<(), MergeError> {
        tracing::info!("Processing {}", path.display());

        let outcome = if self.options.skip_bad_files {
            self.copy_buffered(path)
        } else {
            self.copy_streaming(path)
        };

        match outcome {
            Ok(rows) => {
                tracing::debug!("Copied {} rows from {}", rows, path.display());
                self.summary.record_merged(path, rows);
                Ok(())
            }
            Err(err) if self.options.skip_bad_files && err.kind() == ErrorKind::Read => {
                tracing::warn!("Skipping {}", err.detail());
                self.summary.record_skipped(path, err.detail());
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Copy rows straight from the input to the output, one at a time.
    fn copy_streaming(&mut self, path: &Path) -> Result<u64, MergeError> {
        let mut input = InputFile::open(path, self.options)?;
        let header = input.read_header()?;
        self.accept_header(input.path(), header)?;

        let mut record = StringRecord::new();
        let mut rows = 0;
        while input.read_record(&mut record)? {
            self.sink.write(&record)?;
            rows += 1;
        }
        Ok(rows)
    }

    /// Read the whole file before writing any of it, so a file that fails
    /// halfway contributes no rows.
    fn copy_buffered(&mut self, path: &Path) -> Result<u64, MergeError> {
        let (header, rows) = {
            let mut input = InputFile::open(path, self.options)?;
            let header = input.read_header()?;
            (header, input.read_remaining()?)
        };
        self.accept_header(path, header)?;

        for record in &rows {
            self.sink.write(record)?;
        }
        Ok(rows.len() as u64)
    }

    fn accept_header(&mut self, path: &Path, header: StringRecord) -> Result<(), MergeError> {
        if self.header.is_none() {
            self.sink.write(&header)?;
            self.summary.header_source = Some(path.to_path_buf());
            self.summary.header = header.iter().map(str::to_string).collect();
            self.header = Some(header);
            return Ok(());
        }

        if let Some(first) = &self.header {
            if *first != header {
                if self.options.strict_headers {
                    return Err(MergeError::HeaderMismatch {
                        path: path.to_path_buf(),
                        expected: first.iter().map(str::to_string).collect(),
                        found: header.iter().map(str::to_string).collect(),
                    });
                }
                tracing::debug!("Header of {} differs from the first file", path.display());
            }
        }
        Ok(())
    }
}
