use std::error::Error;
use std::fmt;

/// Error returned by [`Config::from_env`][from_env].
///
/// [from_env]: crate::config::Config::from_env
#[derive(Debug)]
pub enum ConfigError {
    /// The variable is set but its value isn't valid unicode.
    NotUnicode {
        /// Name of the offending environment variable.
        var: &'static str,
    },
    /// The variable holds something other than a boolean flag.
    InvalidFlag {
        /// Name of the offending environment variable.
        var: &'static str,
        /// The rejected value.
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::NotUnicode { var } => {
                write!(f, "environment variable `{}` is not valid unicode", var)
            }
            ConfigError::InvalidFlag { var, value } => write!(
                f,
                "environment variable `{}` expects `1`, `0`, `true` or `false`, found `{}`",
                var, value
            ),
        }
    }
}

impl Error for ConfigError {}
