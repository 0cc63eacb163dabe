//! csv-merge: concatenate the CSV files of a directory into one file
//!
//! The header row of the first file (by file name) is written once, followed by
//! the data rows of every file. Inputs and output share one text encoding;
//! delimiter and quoting of the output are configurable.

pub mod config;
pub mod error;
pub mod merge;
pub mod scan;
pub mod utils;

pub use config::{MergeConfig, MergeOptions};
pub use error::{ErrorKind, MergeError};
pub use merge::{merge, MergeSummary};
