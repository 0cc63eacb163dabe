//! Input file discovery

use crate::error::MergeError;
use std::path::{Path, PathBuf};

pub mod scanner;

pub use scanner::{InputScanner, ScanStats};

/// List the files in `dir` matching `pattern`, sorted by name, leaving out `exclude`.
pub fn discover_inputs(
    dir: &Path,
    pattern: &str,
    exclude: Option<&Path>,
) -> Result<Vec<PathBuf>, MergeError> {
    InputScanner::new(dir.to_path_buf()).pattern(pattern).exclude(exclude).scan()
}
