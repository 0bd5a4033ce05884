//! Logger instances and the process-wide default instance.
use crate::config::Config;
use crate::formatter::{Formatter, Pretty, Record};
use crate::frame::{FrameProvider, StackWalker};
use crate::rules::Rules;
use crate::sink::Sinks;
use crate::trail;
use once_cell::sync::Lazy;
use std::fmt;
use std::io::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Prints messages annotated with the chain of functions that called it.
///
/// A `Logger` bundles classification [`Rules`], a pair of [`Sinks`], the
/// [`FrameProvider`] used to walk the stack and the [`Formatter`] used to
/// render each trace.
///
/// A `Logger` is meant for one caller at a time; share it across threads
/// only behind your own lock, the way [`global`] does.
///
/// # Examples
/// ```
/// # use calltrail::{Config, Logger};
/// let logger = Logger::new(Config::new().use_buffered_sinks(true));
///
/// fn connect(logger: &Logger) -> String {
///     calltrail::trail!(logger: logger, "connecting to {}", "db")
/// }
///
/// let breadcrumb = connect(&logger);
/// assert!(breadcrumb.starts_with("[connect:"));
/// assert!(logger.sinks().read_err().contains("  connecting to db\n\n"));
/// ```
#[derive(Debug)]
pub struct Logger<P = StackWalker, F = Pretty> {
    rules: Rules,
    sinks: Sinks,
    provider: P,
    formatter: F,
}

impl Logger {
    /// Creates a logger that walks the live call stack.
    pub fn new(config: Config) -> Self {
        Logger::with_provider(config, StackWalker::new())
    }
}

impl Default for Logger {
    fn default() -> Self {
        Logger::new(Config::default())
    }
}

impl<P> Logger<P, Pretty>
where
    P: FrameProvider,
{
    /// Creates a logger that takes its frames from `provider`.
    ///
    /// # Examples
    ///
    /// A provider that can't walk the stack degrades to printing the bare
    /// message:
    /// ```
    /// # use calltrail::{Config, Logger};
    /// # use calltrail::frame::Unavailable;
    /// let logger = Logger::with_provider(Config::new().use_buffered_sinks(true), Unavailable);
    ///
    /// assert_eq!(logger.trace(format_args!("no stack")), "");
    /// assert_eq!(logger.sinks().read_err(), "  no stack\n\n");
    /// ```
    pub fn with_provider(config: Config, provider: P) -> Self {
        let sinks = if config.use_buffered_sinks {
            Sinks::buffered()
        } else {
            Sinks::new()
        };

        Logger {
            rules: config.rules(),
            sinks,
            provider,
            formatter: Pretty::new(),
        }
    }
}

impl<P, F> Logger<P, F>
where
    P: FrameProvider,
    F: Formatter,
{
    /// Replaces the formatter.
    ///
    /// See the [`Formatter`] trait for details on possible inputs.
    pub fn with_formatter<F2>(self, formatter: F2) -> Logger<P, F2>
    where
        F2: Formatter,
    {
        Logger {
            rules: self.rules,
            sinks: self.sinks,
            provider: self.provider,
            formatter,
        }
    }

    /// Writes `args` to the error sink, annotated with the calling functions,
    /// and returns the breadcrumb.
    ///
    /// The message is trimmed. Nothing is written and an empty string is
    /// returned if the direct caller matches an exclude pattern. Formatting
    /// or write failures are reported through [`tracing`] and never reach the
    /// caller.
    ///
    /// Most code calls this through [`trail!`][crate::trail!].
    #[inline(never)]
    pub fn trace(&self, args: fmt::Arguments<'_>) -> String {
        let message = args.to_string();

        let trail = match trail::build(&self.provider, &self.rules) {
            Some(trail) => trail,
            None => return String::new(),
        };

        let record = Record::new(&trail, message.trim());
        let breadcrumb = record.breadcrumb().to_string();

        match self.formatter.fmt(&record) {
            Ok(text) => {
                if let Err(error) = self.sinks.err().write_all(text.as_bytes()) {
                    tracing::warn!(%error, "failed to write trace");
                }
            }
            Err(error) => tracing::warn!(%error, "failed to format trace"),
        }

        breadcrumb
    }

    /// The classification rules.
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Mutable access to the classification rules.
    pub fn rules_mut(&mut self) -> &mut Rules {
        &mut self.rules
    }

    /// Replaces the exclude patterns.
    pub fn set_excludes<I, S>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules.set_excludes(patterns);
    }

    /// Replaces the user skip patterns.
    pub fn set_skips<I, S>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules.set_skips(patterns);
    }

    /// Replaces the user break patterns.
    pub fn set_breaks<I, S>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules.set_breaks(patterns);
    }

    /// The output sinks.
    pub fn sinks(&self) -> &Sinks {
        &self.sinks
    }

    /// Mutable access to the output sinks, e.g. to redirect them.
    pub fn sinks_mut(&mut self) -> &mut Sinks {
        &mut self.sinks
    }
}

static GLOBAL: Lazy<Mutex<Logger>> = Lazy::new(|| {
    let config = Config::from_env().unwrap_or_else(|error| {
        tracing::warn!(%error, "ignoring calltrail environment configuration");
        Config::default()
    });
    Mutex::new(Logger::new(config))
});

/// Returns the process-wide default [`Logger`].
///
/// The instance is created on first access from [`Config::from_env`], and
/// the returned guard keeps other threads out until it is dropped. Don't
/// hold it across a [`trail!`][crate::trail!] call without an explicit
/// `logger:`, since that macro locks the default instance itself.
///
/// # Examples
/// ```
/// calltrail::global().sinks_mut().redirect_to_buffers();
///
/// calltrail::trail!("hello from {}", "main");
///
/// let captured = calltrail::global().sinks().read_err();
/// assert!(captured.ends_with("  hello from main\n\n"));
/// ```
pub fn global() -> MutexGuard<'static, Logger> {
    GLOBAL.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Swaps the default [`Logger`] for `logger`, returning the previous one.
///
/// Tests use this to start from a fresh instance.
pub fn replace_global(logger: Logger) -> Logger {
    std::mem::replace(&mut *global(), logger)
}
