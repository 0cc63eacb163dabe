//! Input file discovery

use crate::config::options::DEFAULT_PATTERN;
use crate::error::MergeError;
use globset::{Glob, GlobMatcher};
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Counters describing what a scan looked at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub entries_seen: usize,
    pub files_matched: usize,
    pub skipped_pattern: usize,
    pub skipped_hidden: usize,
    pub skipped_not_file: usize,
    pub skipped_excluded: usize,
}

/// Finds the input files of a merge: regular files directly inside one
/// directory whose name matches a glob.
pub struct InputScanner {
    root_path: PathBuf,
    pattern: String,
    exclude: Option<PathBuf>,
    stats: ScanStats,
}

impl InputScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            root_path,
            pattern: DEFAULT_PATTERN.to_string(),
            exclude: None,
            stats: ScanStats::default(),
        }
    }

    /// Set the file name glob (default `*.csv`)
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    /// Never report this path, even if it matches
    pub fn exclude(mut self, path: Option<&Path>) -> Self {
        self.exclude = path.map(Path::to_path_buf);
        self
    }

    fn build_matcher(&self) -> Result<GlobMatcher, MergeError> {
        let glob = Glob::new(&self.pattern).map_err(|source| MergeError::InvalidPattern {
            pattern: self.pattern.clone(),
            source,
        })?;
        Ok(glob.compile_matcher())
    }

    /// Scan the directory.
    ///
    /// Files are returned sorted by file name so the first file, and with it
    /// the output header, is the same on every platform.
    pub fn scan(&mut self) -> Result<Vec<PathBuf>, MergeError> {
        self.stats = ScanStats::default();
        let matcher = self.build_matcher()?;

        let metadata = self.root_path.metadata().map_err(|source| self.directory_error(source))?;
        if !metadata.is_dir() {
            return Err(self.directory_error(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "not a directory",
            )));
        }

        let walker = WalkDir::new(&self.root_path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        let mut files = Vec::new();
        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) if err.depth() == 0 => {
                    let source = err
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("directory loop detected"));
                    return Err(self.directory_error(source));
                }
                Err(err) => {
                    // A dangling symlink or unreadable entry cannot be an input.
                    tracing::debug!("Skipping unreadable entry: {}", err);
                    self.stats.entries_seen += 1;
                    self.stats.skipped_not_file += 1;
                    continue;
                }
            };
            self.stats.entries_seen += 1;

            let name = entry.file_name();
            if name.to_string_lossy().starts_with('.') {
                self.stats.skipped_hidden += 1;
                continue;
            }
            if !matcher.is_match(Path::new(name)) {
                self.stats.skipped_pattern += 1;
                continue;
            }
            if !entry.file_type().is_file() {
                self.stats.skipped_not_file += 1;
                continue;
            }
            if let Some(exclude) = &self.exclude {
                if crate::utils::is_same_path(entry.path(), exclude) {
                    tracing::debug!("Skipping output file {}", entry.path().display());
                    self.stats.skipped_excluded += 1;
                    continue;
                }
            }

            tracing::debug!("Discovered input {}", entry.path().display());
            files.push(entry.into_path());
        }

        self.stats.files_matched = files.len();
        Ok(files)
    }

    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    fn directory_error(&self, source: std::io::Error) -> MergeError {
        MergeError::InputDirectory { path: self.root_path.clone(), source }
    }
}
