//! Annotate ad-hoc debug messages with the chain of functions that led to
//! them.
//!
//! # Overview
//!
//! Sprinkling prints through a program is often the quickest way to see what
//! it does, but the output quickly loses track of *who* printed *what*.
//! `calltrail` walks the call stack on every message and prints it under a
//! breadcrumb of its callers, innermost first, indented by how deep the call
//! is nested:
//! ```txt
//! [serve:12] (main:5)
//!   listening on 8080
//!
//!   [handle:40] (serve:14) (main:5)
//!     accepted connection
//!
//! ```
//! This crate is meant for development and tests. It is not a structured
//! logging framework: for that, see [`tracing`].
//!
//! # Getting started
//!
//! The [`trail!`] macro takes the same arguments as [`format!`], writes the
//! annotated message to stderr and returns the breadcrumb:
//! ```
//! fn serve(port: u16) {
//!     calltrail::trail!("listening on {}", port);
//! }
//! # serve(8080);
//! ```
//!
//! # Shaping the breadcrumb
//!
//! Each frame on the stack is rendered as a descriptor of the form
//! `function '<path>' (line <n>): file '<path>'` and matched against three
//! lists of substring patterns, in this order:
//!
//! * **exclude**: if the caller of the trace matches, nothing is printed at
//!   all. Further up the stack, matching frames are merely hidden.
//! * **break**: the walk stops here, keeping what was collected so far.
//! * **skip**: the frame is left out of the breadcrumb, and doesn't count
//!   towards the indentation.
//!
//! The logger's own frames and the runtime's entry points are covered by
//! built-in patterns, see [`DEFAULT_SKIPS`] and [`DEFAULT_BREAKS`].
//! ```
//! # use calltrail::{Config, Logger};
//! let logger = Logger::new(
//!     Config::new()
//!         .skip_patterns(["log_helper"])
//!         .use_buffered_sinks(true),
//! );
//!
//! fn log_helper(logger: &Logger, message: &str) -> String {
//!     calltrail::trail!(logger: logger, "{}", message)
//! }
//!
//! fn startup(logger: &Logger) -> String {
//!     log_helper(logger, "starting")
//! }
//!
//! let breadcrumb = startup(&logger);
//! assert!(breadcrumb.starts_with("[startup:"));
//! ```
//!
//! # Capturing output
//!
//! Every [`Logger`] owns two [`Sinks`](sink::Sinks), for normal and error
//! output, which write to the standard streams until redirected into
//! buffers. Tests can then read back exactly what was written.
//! ```
//! # use calltrail::{Config, Logger};
//! # use calltrail::frame::Unavailable;
//! let logger = Logger::with_provider(Config::new().use_buffered_sinks(true), Unavailable);
//!
//! calltrail::trail!(logger: &logger, "  hello  ");
//! assert_eq!(logger.sinks().read_err(), "  hello\n\n");
//!
//! logger.sinks().reset();
//! assert!(logger.sinks().has_no_output());
//! ```
//!
//! # Feature flags
//!
//! * `full`: Enables all features listed below.
//! * `json`: Enables the [`Json`](formatter::Json) formatter.
//! * `chrono`: Stamps every record with the time of the trace call.
//!
//! # Configuration from the environment
//!
//! The default instance returned by [`global`] reads
//! `CALLTRAIL_EXCLUDE`, `CALLTRAIL_SKIP` and `CALLTRAIL_BREAK` as
//! comma-separated pattern lists, and `CALLTRAIL_BUFFERED` as a flag. See
//! [`Config::from_env`].
//!
//! [`DEFAULT_SKIPS`]: rules::DEFAULT_SKIPS
//! [`DEFAULT_BREAKS`]: rules::DEFAULT_BREAKS
#[doc(hidden)]
#[macro_use]
mod cfg;
#[macro_use]
mod macros;

pub mod config;
pub mod error;
pub mod formatter;
pub mod frame;
pub mod logger;
pub mod name;
pub mod rules;
pub mod sink;
pub mod trail;

pub use crate::config::Config;
pub use crate::error::ConfigError;
pub use crate::logger::{global, replace_global, Logger};
pub use crate::trail::strip_line_numbers;
