//! Rendering of trace records into text.
//!
//! See [`Formatter`] for more details.
use crate::trail::Trail;
use crate::{cfg_chrono, cfg_json};
#[cfg(feature = "chrono")]
use chrono::{DateTime, Utc};
#[cfg(feature = "serde")]
use serde::Serialize;
use std::error::Error;

mod pretty;
pub use pretty::Pretty;

cfg_json! {
    mod json;
    pub use json::Json;
}

/// Everything known about one trace call once the stack has been walked.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Record {
    /// The rendered breadcrumb, empty if no frame survived.
    pub(crate) breadcrumb: String,

    /// Nesting depth of the call, see [`Trail::depth`].
    pub(crate) depth: usize,

    /// The formatted message, trimmed.
    pub(crate) message: String,

    /// When the trace call happened.
    #[cfg(feature = "chrono")]
    #[cfg_attr(feature = "serde", serde(serialize_with = "ser::timestamp"))]
    pub(crate) timestamp: DateTime<Utc>,
}

impl Record {
    /// Builds a record from a walked trail and the caller's message.
    pub fn new(trail: &Trail, message: impl Into<String>) -> Self {
        Record {
            breadcrumb: trail.breadcrumb(),
            depth: trail.depth(),
            message: message.into(),
            #[cfg(feature = "chrono")]
            timestamp: Utc::now(),
        }
    }

    /// The rendered breadcrumb, e.g. `[leaf:3] (root:9)`.
    pub fn breadcrumb(&self) -> &str {
        &self.breadcrumb
    }

    /// Nesting depth of the call.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The trimmed message.
    pub fn message(&self) -> &str {
        &self.message
    }

    cfg_chrono! {
        /// When the trace call happened.
        pub fn timestamp(&self) -> DateTime<Utc> {
            self.timestamp
        }
    }
}

/// Format a [`Record`] into a `String`.
///
/// This trait is implemented for all `Fn(&Record) -> Result<String, E>`
/// types, where `E: Error + Send + Sync`.
///
/// # Examples
/// ```
/// # use calltrail::{Config, Logger};
/// # use calltrail::formatter::Record;
/// let logger = Logger::new(Config::new().use_buffered_sinks(true))
///     .with_formatter(|record: &Record| {
///         Ok::<_, std::fmt::Error>(format!("{} | {}\n", record.breadcrumb(), record.message()))
///     });
///
/// let breadcrumb = calltrail::trail!(logger: &logger, "custom");
/// assert_eq!(logger.sinks().read_err(), format!("{} | custom\n", breadcrumb));
/// ```
pub trait Formatter {
    /// The error type if the `Record` cannot be stringified.
    type Error: Error + Send + Sync + 'static;

    /// Stringifies the `Record`, or returns an error.
    ///
    /// # Errors
    ///
    /// If the `Record` cannot be formatted to a string, an error is returned.
    fn fmt(&self, record: &Record) -> Result<String, Self::Error>;
}

impl<F, E> Formatter for F
where
    F: Fn(&Record) -> Result<String, E>,
    E: Error + Send + Sync + 'static,
{
    type Error = E;

    #[inline]
    fn fmt(&self, record: &Record) -> Result<String, E> {
        self(record)
    }
}

#[cfg(all(feature = "serde", feature = "chrono"))]
mod ser {
    use chrono::{DateTime, Utc};
    use serde::Serializer;

    pub(crate) fn timestamp<S: Serializer>(
        timestamp: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&timestamp.to_rfc3339())
    }
}
