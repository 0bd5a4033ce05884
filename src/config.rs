//! Configuration of [`Logger`] instances.
//!
//! A [`Config`] is a plain structure with named fields. Each setter is a pure
//! mutation of that structure, so the order in which options are applied
//! never matters.
//!
//! # Examples
//! ```
//! # use calltrail::{Config, Logger};
//! let config = Config::new()
//!     .exclude_patterns(["generated::"])
//!     .skip_patterns(["log_helper"])
//!     .use_buffered_sinks(true);
//!
//! let logger = Logger::new(config);
//! assert!(logger.sinks().has_no_output());
//! ```
//!
//! The default instance reads its configuration from the environment, see
//! [`Config::from_env`].
//!
//! [`Logger`]: crate::Logger
use crate::error::ConfigError;
use crate::rules::Rules;
use std::env::{self, VarError};

/// Comma-separated exclude patterns.
pub const EXCLUDE_VAR: &str = "CALLTRAIL_EXCLUDE";
/// Comma-separated skip patterns.
pub const SKIP_VAR: &str = "CALLTRAIL_SKIP";
/// Comma-separated break patterns.
pub const BREAK_VAR: &str = "CALLTRAIL_BREAK";
/// `1`/`true` to capture output in buffers instead of the standard streams.
pub const BUFFERED_VAR: &str = "CALLTRAIL_BUFFERED";

/// Options applied when constructing a [`Logger`][crate::Logger].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Patterns that suppress a trace when they match its caller.
    pub exclude_patterns: Vec<String>,
    /// Patterns for frames left out of the breadcrumb. Added to the
    /// defaults in [`DEFAULT_SKIPS`][crate::rules::DEFAULT_SKIPS].
    pub skip_patterns: Vec<String>,
    /// Patterns that end the stack walk. Added to the defaults in
    /// [`DEFAULT_BREAKS`][crate::rules::DEFAULT_BREAKS].
    pub break_patterns: Vec<String>,
    /// Whether the sinks start out redirected to capture buffers.
    pub use_buffered_sinks: bool,
}

impl Config {
    /// Returns a configuration with no custom rules, writing to the standard
    /// streams.
    pub fn new() -> Self {
        Config::default()
    }

    /// Reads the configuration from the `CALLTRAIL_*` environment variables.
    ///
    /// Unset variables leave the corresponding field at its default. Empty
    /// items in a pattern list are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable isn't valid unicode, or if
    /// `CALLTRAIL_BUFFERED` isn't one of `1`, `0`, `true`, `false`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::new();

        if let Some(value) = var(EXCLUDE_VAR)? {
            config.exclude_patterns = split_patterns(&value);
        }
        if let Some(value) = var(SKIP_VAR)? {
            config.skip_patterns = split_patterns(&value);
        }
        if let Some(value) = var(BREAK_VAR)? {
            config.break_patterns = split_patterns(&value);
        }
        if let Some(value) = var(BUFFERED_VAR)? {
            config.use_buffered_sinks = parse_flag(BUFFERED_VAR, &value)?;
        }

        Ok(config)
    }

    /// Sets the exclude patterns.
    pub fn exclude_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the user skip patterns.
    pub fn skip_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the user break patterns.
    pub fn break_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.break_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets whether output is captured in buffers.
    pub fn use_buffered_sinks(mut self, buffered: bool) -> Self {
        self.use_buffered_sinks = buffered;
        self
    }

    /// Builds the classification rules described by this configuration.
    pub fn rules(&self) -> Rules {
        let mut rules = Rules::new();
        rules.set_excludes(self.exclude_patterns.iter().cloned());
        rules.set_skips(self.skip_patterns.iter().cloned());
        rules.set_breaks(self.break_patterns.iter().cloned());
        rules
    }
}

fn var(name: &'static str) -> Result<Option<String>, ConfigError> {
    match env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode { var: name }),
    }
}

fn split_patterns(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|pattern| !pattern.is_empty())
        .map(String::from)
        .collect()
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            var: name,
            value: value.to_string(),
        }),
    }
}
