//! The merged output file

use crate::config::MergeOptions;
use crate::error::MergeError;
use crate::utils::EncodingWriter;
use csv::{StringRecord, Writer, WriterBuilder};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Output file opened fresh (truncated) for one merge.
pub struct OutputSink {
    path: PathBuf,
    writer: Writer<EncodingWriter<File>>,
    rows_written: u64,
}

impl OutputSink {
    pub fn create(path: &Path, options: &MergeOptions) -> Result<Self, MergeError> {
        let file = File::create(path).map_err(|e| MergeError::write(path, e))?;
        let writer = WriterBuilder::new()
            .delimiter(options.output_delimiter)
            .quote_style(options.quote.style())
            .terminator(options.line_ending.terminator())
            // Rows are passed through without column count checks.
            .flexible(true)
            .from_writer(options.encoding.encoder(file));
        tracing::debug!("Created output file {}", path.display());
        Ok(Self { path: path.to_path_buf(), writer, rows_written: 0 })
    }

    pub fn write(&mut self, record: &StringRecord) -> Result<(), MergeError> {
        self.writer.write_record(record).map_err(|e| MergeError::write(&self.path, e))?;
        self.rows_written += 1;
        Ok(())
    }

    /// Records written so far, header included.
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Flush everything to disk and close the file.
    pub fn finish(self) -> Result<(), MergeError> {
        let path = self.path;
        let encoder = self.writer.into_inner().map_err(|e| MergeError::write(&path, e.into_error()))?;
        encoder.finish().map_err(|e| MergeError::write(&path, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LineEnding, QuotePolicy};
    use std::fs;
    use tempfile::TempDir;

    fn record(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn quotes_only_when_needed_by_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.csv");
        let options = MergeOptions::default().line_ending(LineEnding::Lf);

        let mut sink = OutputSink::create(&path, &options).unwrap();
        sink.write(&record(&["id", "note"])).unwrap();
        sink.write(&record(&["1", "a,b"])).unwrap();
        sink.write(&record(&["2", "say \"hi\""])).unwrap();
        assert_eq!(sink.rows_written(), 3);
        sink.finish().unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "id,note\n1,\"a,b\"\n2,\"say \"\"hi\"\"\"\n");
    }

    #[test]
    fn quote_all_and_crlf() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.csv");
        let options = MergeOptions::default()
            .output_delimiter(b'|')
            .quote(QuotePolicy::Always)
            .line_ending(LineEnding::Crlf);

        let mut sink = OutputSink::create(&path, &options).unwrap();
        sink.write(&record(&["id", "name"])).unwrap();
        sink.write(&record(&["1", "Alice"])).unwrap();
        sink.finish().unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "\"id\"|\"name\"\r\n\"1\"|\"Alice\"\r\n");
    }

    #[test]
    fn ragged_records_are_written() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.csv");
        let options = MergeOptions::default().line_ending(LineEnding::Lf);

        let mut sink = OutputSink::create(&path, &options).unwrap();
        sink.write(&record(&["a", "b", "c"])).unwrap();
        sink.write(&record(&["1"])).unwrap();
        sink.finish().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a,b,c\n1\n");
    }

    #[test]
    fn create_truncates_existing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.csv");
        fs::write(&path, "old content that should vanish\n").unwrap();

        let options = MergeOptions::default().line_ending(LineEnding::Lf);
        let mut sink = OutputSink::create(&path, &options).unwrap();
        sink.write(&record(&["x"])).unwrap();
        sink.finish().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "x\n");
    }

    #[test]
    fn create_in_missing_directory_is_write_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("no-such-dir").join("out.csv");
        let err = OutputSink::create(&path, &MergeOptions::default()).err().unwrap();
        assert!(matches!(err, MergeError::FileWrite { .. }));
    }
}
