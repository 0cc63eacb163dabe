//! Configuration values and their validated form

use crate::error::MergeError;
use crate::utils::TextEncoding;
use globset::Glob;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENCODING: &str = "utf-8";
pub const DEFAULT_DELIMITER: &str = ",";
pub const DEFAULT_PATTERN: &str = "*.csv";

/// Line terminator written after every output record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// `\r\n` on Windows, `\n` elsewhere
    #[default]
    Native,
    Lf,
    Crlf,
}

impl LineEnding {
    pub fn terminator(self) -> csv::Terminator {
        match self {
            LineEnding::Lf => csv::Terminator::Any(b'\n'),
            LineEnding::Crlf => csv::Terminator::CRLF,
            LineEnding::Native if cfg!(windows) => csv::Terminator::CRLF,
            LineEnding::Native => csv::Terminator::Any(b'\n'),
        }
    }
}

/// Which output fields get wrapped in quotes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuotePolicy {
    /// Only fields holding the delimiter, a quote or a line break.
    #[default]
    Necessary,
    /// Every field.
    Always,
}

impl QuotePolicy {
    pub fn style(self) -> csv::QuoteStyle {
        match self {
            QuotePolicy::Necessary => csv::QuoteStyle::Necessary,
            QuotePolicy::Always => csv::QuoteStyle::Always,
        }
    }
}

/// Named bundles of settings matching the historical variants of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// Comma in, comma out, minimal quoting
    Standard,
    /// Comma in, pipe out, every field quoted
    PipeQuoted,
}

/// User-facing configuration, as read from files, environment and flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    pub encoding: String,
    pub delimiter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_delimiter: Option<String>,
    pub quote_all: bool,
    pub line_ending: LineEnding,
    pub pattern: String,
    pub strict_headers: bool,
    pub skip_bad_files: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            encoding: DEFAULT_ENCODING.to_string(),
            delimiter: DEFAULT_DELIMITER.to_string(),
            output_delimiter: None,
            quote_all: false,
            line_ending: LineEnding::Native,
            pattern: DEFAULT_PATTERN.to_string(),
            strict_headers: false,
            skip_bad_files: false,
        }
    }
}

impl MergeConfig {
    pub fn apply_preset(&mut self, preset: Preset) {
        match preset {
            Preset::Standard => {}
            Preset::PipeQuoted => {
                self.delimiter = ",".to_string();
                self.output_delimiter = Some("|".to_string());
                self.quote_all = true;
            }
        }
    }

    /// Validate every field and produce the options the merger runs with.
    pub fn resolve(&self) -> Result<MergeOptions, MergeError> {
        let encoding = TextEncoding::for_label(&self.encoding)
            .ok_or_else(|| MergeError::UnknownEncoding { label: self.encoding.clone() })?;
        let input_delimiter = parse_delimiter(&self.delimiter)?;
        let output_delimiter = match &self.output_delimiter {
            Some(value) => parse_delimiter(value)?,
            None => input_delimiter,
        };
        Glob::new(&self.pattern).map_err(|source| MergeError::InvalidPattern {
            pattern: self.pattern.clone(),
            source,
        })?;

        let quote = if self.quote_all { QuotePolicy::Always } else { QuotePolicy::Necessary };
        Ok(MergeOptions::default()
            .encoding(encoding)
            .delimiter(input_delimiter)
            .output_delimiter(output_delimiter)
            .quote(quote)
            .line_ending(self.line_ending)
            .pattern(self.pattern.as_str())
            .strict_headers(self.strict_headers)
            .skip_bad_files(self.skip_bad_files))
    }
}

/// Parse a delimiter given as a single character.
///
/// `tab` and `\t` are accepted for TAB since a literal tab is awkward to type.
pub fn parse_delimiter(value: &str) -> Result<u8, MergeError> {
    let invalid = |reason| MergeError::InvalidDelimiter { value: value.to_string(), reason };

    let c = match value {
        "tab" | "\\t" => '\t',
        _ => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                (None, _) => return Err(invalid("delimiter is empty (spell TAB as 'tab')")),
                (Some(_), Some(_)) => return Err(invalid("delimiter must be a single character")),
            }
        }
    };

    if !c.is_ascii() {
        return Err(invalid("delimiter must be an ASCII character"));
    }
    if matches!(c, '"' | '\r' | '\n') {
        return Err(invalid("quote and line break characters cannot delimit fields"));
    }
    Ok(c as u8)
}

/// Validated settings for one merge.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOptions {
    pub encoding: TextEncoding,
    pub input_delimiter: u8,
    pub output_delimiter: u8,
    pub quote: QuotePolicy,
    pub line_ending: LineEnding,
    pub pattern: String,
    pub strict_headers: bool,
    pub skip_bad_files: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            encoding: TextEncoding::utf8(),
            input_delimiter: b',',
            output_delimiter: b',',
            quote: QuotePolicy::Necessary,
            line_ending: LineEnding::Native,
            pattern: DEFAULT_PATTERN.to_string(),
            strict_headers: false,
            skip_bad_files: false,
        }
    }
}

impl MergeOptions {
    /// Set one delimiter for both reading and writing
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.input_delimiter = delimiter;
        self.output_delimiter = delimiter;
        self
    }

    pub fn output_delimiter(mut self, delimiter: u8) -> Self {
        self.output_delimiter = delimiter;
        self
    }

    pub fn encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn quote(mut self, quote: QuotePolicy) -> Self {
        self.quote = quote;
        self
    }

    pub fn line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn strict_headers(mut self, strict: bool) -> Self {
        self.strict_headers = strict;
        self
    }

    pub fn skip_bad_files(mut self, skip: bool) -> Self {
        self.skip_bad_files = skip;
        self
    }
}
