use crate::formatter::{Formatter, Record};
use std::fmt::{self, Write};

/// Format records as an indented breadcrumb line followed by the message.
///
/// Each nesting level indents by two spaces. The message sits two more
/// spaces in, and a blank line closes the block:
/// ```txt
/// [handle:40] (serve:12) (main:5)
///   accepted connection
///
///   [parse:88] (handle:41) (serve:12) (main:5)
///     bad header
///
/// ```
/// When no frame survived the breadcrumb line is left out entirely.
#[derive(Clone, Copy, Debug, Default)]
pub struct Pretty {
    _priv: (),
}

impl Pretty {
    /// Returns a new [`Pretty`] formatter.
    pub const fn new() -> Self {
        Pretty { _priv: () }
    }
}

impl Formatter for Pretty {
    type Error = fmt::Error;

    fn fmt(&self, record: &Record) -> Result<String, fmt::Error> {
        let indent = record.depth() * 2;
        let mut writer = String::with_capacity(
            2 * indent + record.breadcrumb().len() + record.message().len() + 8,
        );

        if !record.breadcrumb().is_empty() {
            writeln!(writer, "{:indent$}{}", "", record.breadcrumb(), indent = indent)?;
        }
        write!(writer, "{:indent$}  {}\n\n", "", record.message(), indent = indent)?;

        Ok(writer)
    }
}
