/// Prints a message annotated with the chain of calling functions, and
/// returns the breadcrumb.
///
/// Arguments are the same as for [`format!`]. Without a `logger:` argument
/// the process-wide default instance from [`global`] is used, which means
/// this macro locks it for the duration of the call. The message is
/// formatted before the lock is taken, so arguments may call `trail!`
/// themselves.
///
/// # Examples
///
/// Tracing through the default instance:
/// ```
/// fn load(path: &str) {
///     calltrail::trail!("loading {}", path);
/// }
///
/// load("config.toml");
/// ```
/// ```txt
///   [load:2] (main:5)
///     loading config.toml
///
/// ```
///
/// Tracing through a specific instance:
/// ```
/// # use calltrail::{Config, Logger};
/// let logger = Logger::new(Config::new().use_buffered_sinks(true));
///
/// let breadcrumb = calltrail::trail!(logger: &logger, "answer: {}", 42);
/// assert!(!breadcrumb.is_empty());
/// assert!(logger.sinks().read_err().contains("  answer: 42\n"));
/// ```
///
/// [`global`]: crate::global
#[macro_export]
macro_rules! trail {
    (logger: $logger:expr, $($arg:tt)+) => {
        $logger.trace(::std::format_args!($($arg)+))
    };
    ($($arg:tt)+) => {{
        // Rendered before locking, the arguments may trace themselves.
        let message = ::std::format!($($arg)+);
        $crate::global().trace(::std::format_args!("{}", message))
    }};
}
