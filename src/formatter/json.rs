use crate::formatter::{Formatter, Record};

/// Format records as JSON objects, one per line.
///
/// ```json
/// {"breadcrumb":"[handle:40] (serve:12)","depth":1,"message":"accepted connection"}
/// ```
/// With the `chrono` feature the object also carries an RFC 3339
/// `timestamp`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Json {
    pretty: bool,
}

impl Json {
    /// Returns a [`Json`] formatter writing compact objects.
    pub const fn compact() -> Self {
        Json { pretty: false }
    }

    /// Returns a [`Json`] formatter writing indented objects.
    pub const fn pretty() -> Self {
        Json { pretty: true }
    }
}

impl Formatter for Json {
    type Error = serde_json::Error;

    fn fmt(&self, record: &Record) -> Result<String, serde_json::Error> {
        let mut json = if self.pretty {
            serde_json::to_string_pretty(record)?
        } else {
            serde_json::to_string(record)?
        };
        json.push('\n');
        Ok(json)
    }
}
