//! Configuration loading and merging
//!
//! Settings come from defaults, an optional config file, `CSV_MERGE_*`
//! environment variables and CLI flags, in increasing precedence. The result
//! is validated into [`MergeOptions`] before any file is touched.

pub mod loader;
pub mod options;
pub mod overrides;

pub use loader::load_config;
pub use options::{
    parse_delimiter, LineEnding, MergeConfig, MergeOptions, Preset, QuotePolicy,
};
pub use overrides::{merge_cli_with_config, CliOverrides};
