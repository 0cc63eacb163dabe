//! Error taxonomy for merge operations
//!
//! Every failure the merger can hit is a variant of [`MergeError`]. Callers that
//! only care about the broad category use [`MergeError::kind`].

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Coarse classification of a [`MergeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input directory holds no file matching the pattern.
    NoInputFiles,
    /// An input directory or input file could not be read.
    Read,
    /// The output file could not be created or written.
    Write,
    /// The supplied options are invalid.
    Config,
}

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("no files matching '{pattern}' found in {}", dir.display())]
    NoInputFiles { dir: PathBuf, pattern: String },

    #[error("cannot read input directory {}", path.display())]
    InputDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} is empty: no header row found", path.display())]
    EmptyFile { path: PathBuf },

    #[error(
        "header of {} does not match the first file: expected [{}], found [{}]",
        path.display(),
        expected.join(", "),
        found.join(", ")
    )]
    HeaderMismatch { path: PathBuf, expected: Vec<String>, found: Vec<String> },

    #[error("failed to write {}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("all {count} input files in {} failed and were skipped", dir.display())]
    AllInputsSkipped { dir: PathBuf, count: usize },

    #[error("invalid delimiter {value:?}: {reason}")]
    InvalidDelimiter { value: String, reason: &'static str },

    #[error("unknown encoding '{label}'")]
    UnknownEncoding { label: String },

    #[error("invalid file pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

impl MergeError {
    pub(crate) fn read(path: &Path, source: impl Into<csv::Error>) -> Self {
        Self::FileRead { path: path.to_path_buf(), source: source.into() }
    }

    pub(crate) fn write(path: &Path, source: impl Into<csv::Error>) -> Self {
        Self::FileWrite { path: path.to_path_buf(), source: source.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoInputFiles { .. } => ErrorKind::NoInputFiles,
            Self::InputDirectory { .. }
            | Self::FileRead { .. }
            | Self::EmptyFile { .. }
            | Self::HeaderMismatch { .. }
            | Self::AllInputsSkipped { .. } => ErrorKind::Read,
            Self::FileWrite { .. } => ErrorKind::Write,
            Self::InvalidDelimiter { .. }
            | Self::UnknownEncoding { .. }
            | Self::InvalidPattern { .. } => ErrorKind::Config,
        }
    }

    /// The file or directory the error is about, when there is one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NoInputFiles { dir, .. } | Self::AllInputsSkipped { dir, .. } => Some(dir),
            Self::InputDirectory { path, .. }
            | Self::FileRead { path, .. }
            | Self::EmptyFile { path }
            | Self::HeaderMismatch { path, .. }
            | Self::FileWrite { path, .. } => Some(path),
            Self::InvalidDelimiter { .. }
            | Self::UnknownEncoding { .. }
            | Self::InvalidPattern { .. } => None,
        }
    }

    /// Message plus the underlying cause, on one line.
    pub fn detail(&self) -> String {
        match std::error::Error::source(self) {
            Some(cause) => format!("{self}: {cause}"),
            None => self.to_string(),
        }
    }
}
