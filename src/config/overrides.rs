//! Command-line overrides on top of loaded configuration

use super::options::{LineEnding, MergeConfig, Preset};

/// Values given on the command line. `None`/`false` means "not given".
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub preset: Option<Preset>,
    pub encoding: Option<String>,
    pub delimiter: Option<String>,
    pub output_delimiter: Option<String>,
    pub quote_all: bool,
    pub line_ending: Option<LineEnding>,
    pub pattern: Option<String>,
    pub strict_headers: bool,
    pub skip_bad_files: bool,
}

/// Apply CLI values over `config`. A preset is applied first so explicit
/// flags still win over it.
pub fn merge_cli_with_config(mut config: MergeConfig, cli: CliOverrides) -> MergeConfig {
    if let Some(preset) = cli.preset {
        config.apply_preset(preset);
    }
    if let Some(encoding) = cli.encoding {
        config.encoding = encoding;
    }
    if let Some(delimiter) = cli.delimiter {
        config.delimiter = delimiter;
    }
    if let Some(output_delimiter) = cli.output_delimiter {
        config.output_delimiter = Some(output_delimiter);
    }
    if let Some(line_ending) = cli.line_ending {
        config.line_ending = line_ending;
    }
    if let Some(pattern) = cli.pattern {
        config.pattern = pattern;
    }
    // Boolean switches can only turn a setting on.
    config.quote_all |= cli.quote_all;
    config.strict_headers |= cli.strict_headers;
    config.skip_bad_files |= cli.skip_bad_files;
    config
}
