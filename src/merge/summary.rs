//! Result of a successful merge

use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedFile {
    pub path: PathBuf,
    /// Data rows copied, header excluded.
    pub rows: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    pub output: PathBuf,
    /// File whose header row became the output header.
    pub header_source: Option<PathBuf>,
    pub header: Vec<String>,
    pub files: Vec<MergedFile>,
    pub skipped: Vec<SkippedFile>,
    pub data_rows: u64,
}

impl MergeSummary {
    pub(crate) fn new(output: &Path) -> Self {
        Self {
            output: output.to_path_buf(),
            header_source: None,
            header: Vec::new(),
            files: Vec::new(),
            skipped: Vec::new(),
            data_rows: 0,
        }
    }

    pub(crate) fn record_merged(&mut self, path: &Path, rows: u64) {
        self.files.push(MergedFile { path: path.to_path_buf(), rows });
        self.data_rows += rows;
    }

    pub(crate) fn record_skipped(&mut self, path: &Path, reason: String) {
        self.skipped.push(SkippedFile { path: path.to_path_buf(), reason });
    }

    /// Number of input files whose rows made it into the output.
    pub fn files_merged(&self) -> usize {
        self.files.len()
    }
}
