//! Config file loading

use super::options::MergeConfig;
use anyhow::{Context, Result};
use figment::providers::{Env, Serialized};
use figment::Figment;
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix of environment variables that override config file values.
pub const ENV_PREFIX: &str = "CSV_MERGE_";

const SECTION: &str = "csv-merge";

/// Load configuration: defaults, then the config file, then `CSV_MERGE_*` variables.
///
/// An explicitly given `config_path` must parse. A file found by discovery in
/// `search_dir` that fails to parse is reported and ignored.
pub fn load_config(search_dir: &Path, config_path: Option<&Path>) -> Result<MergeConfig> {
    let file_config = load_config_file(search_dir, config_path)?;

    Figment::from(Serialized::defaults(file_config))
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]))
        .extract()
        .with_context(|| format!("Invalid {ENV_PREFIX}* environment variable"))
}

fn load_config_file(search_dir: &Path, config_path: Option<&Path>) -> Result<MergeConfig> {
    let config_path_provided = config_path.is_some();

    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(search_dir),
    };

    let Some(config_file) = discovered else {
        return Ok(MergeConfig::default());
    };

    let content = fs::read_to_string(&config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;

    let ext = config_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "toml" => parse_toml_config(&content, &config_file),
        "yaml" | "yml" => parse_yaml_config(&content, &config_file),
        other => Err(anyhow::anyhow!(
            "Unsupported config extension '.{}' for file {}",
            other,
            config_file.display()
        )),
    };

    match parsed {
        Ok(cfg) => {
            tracing::debug!("Loaded config from {}", config_file.display());
            Ok(cfg)
        }
        Err(e) if config_path_provided => Err(e),
        Err(e) => {
            tracing::warn!(
                "Ignoring auto-discovered config {}: {:#}",
                config_file.display(),
                e
            );
            Ok(MergeConfig::default())
        }
    }
}

/// Parse TOML config, accepting settings at the top level or under `[csv-merge]`.
fn parse_toml_config(content: &str, config_file: &Path) -> Result<MergeConfig> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("Invalid TOML syntax: {}", config_file.display()))?;

    let config_val = match raw.get(SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };

    config_val.try_into().with_context(|| format!("Invalid TOML config: {}", config_file.display()))
}

/// Parse YAML config, accepting settings at the top level or under `csv-merge:`.
fn parse_yaml_config(content: &str, config_file: &Path) -> Result<MergeConfig> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("Invalid YAML syntax: {}", config_file.display()))?;

    let config_val = match raw.get(SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };

    // An empty document parses as null; treat it as "no settings".
    if config_val.is_null() {
        return Ok(MergeConfig::default());
    }

    serde_yaml::from_value(config_val)
        .with_context(|| format!("Invalid YAML config: {}", config_file.display()))
}

fn discover_config(search_dir: &Path) -> Option<PathBuf> {
    let candidates = [
        "csv-merge.toml",
        ".csv-merge.toml",
        "csv-merge.yml",
        ".csv-merge.yml",
        "csv-merge.yaml",
        ".csv-merge.yaml",
    ];

    candidates.iter().map(|candidate| search_dir.join(candidate)).find(|path| path.exists())
}
