//! Reading one input file

use crate::config::MergeOptions;
use crate::error::MergeError;
use crate::utils::DecodingReader;
use csv::{Reader, ReaderBuilder, StringRecord};
use std::fs::File;
use std::path::{Path, PathBuf};

/// An open input file positioned before its header row.
///
/// The file handle is closed when this value is dropped, on success or error.
pub struct InputFile {
    path: PathBuf,
    reader: Reader<DecodingReader<File>>,
}

impl InputFile {
    pub fn open(path: &Path, options: &MergeOptions) -> Result<Self, MergeError> {
        let file = File::open(path).map_err(|e| MergeError::read(path, e))?;
        let reader = ReaderBuilder::new()
            .delimiter(options.input_delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(options.encoding.decoder(file));
        Ok(Self { path: path.to_path_buf(), reader })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the first row. A file without one is an [`MergeError::EmptyFile`].
    pub fn read_header(&mut self) -> Result<StringRecord, MergeError> {
        let mut header = StringRecord::new();
        if self.read_record(&mut header)? {
            Ok(header)
        } else {
            Err(MergeError::EmptyFile { path: self.path.clone() })
        }
    }

    /// Read the next row into `record`; `false` at end of input.
    pub fn read_record(&mut self, record: &mut StringRecord) -> Result<bool, MergeError> {
        self.reader.read_record(record).map_err(|e| MergeError::read(&self.path, e))
    }

    /// Read every remaining row.
    pub fn read_remaining(&mut self) -> Result<Vec<StringRecord>, MergeError> {
        let mut rows = Vec::new();
        let mut record = StringRecord::new();
        while self.read_record(&mut record)? {
            rows.push(record.clone());
        }
        Ok(rows)
    }
}
