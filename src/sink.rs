//! Redirectable output streams.
//!
//! Every [`Logger`] owns a pair of [`Sink`]s, one for normal output and one
//! for errors. They write to stdout and stderr until redirected into
//! [`CaptureBuffer`]s, after which everything written can be read back.
//!
//! [`Logger`]: crate::Logger
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing_subscriber::fmt::MakeWriter;

/// A shared in-memory byte buffer.
///
/// Clones refer to the same buffer, so a handle can be kept around to
/// inspect what a [`Sink`] captured.
#[derive(Clone, Debug, Default)]
pub struct CaptureBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    /// Returns a new, empty [`CaptureBuffer`].
    pub fn new() -> Self {
        CaptureBuffer::default()
    }

    /// Returns everything written so far, decoded lossily as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    /// Returns `true` if nothing was written since creation or the last
    /// [`clear`](CaptureBuffer::clear).
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Discards the contents, keeping the buffer itself.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.bytes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Where a [`Sink`] sends its output.
#[derive(Clone, Debug)]
pub enum Sink {
    /// The process's standard output.
    Stdout,
    /// The process's standard error.
    Stderr,
    /// An in-memory buffer.
    Captured(CaptureBuffer),
}

impl Sink {
    /// Returns the capture buffer if this sink was redirected.
    pub fn buffer(&self) -> Option<&CaptureBuffer> {
        match self {
            Sink::Captured(buffer) => Some(buffer),
            _ => None,
        }
    }

    /// Returns `true` if the sink writes to a standard stream.
    pub fn is_std(&self) -> bool {
        self.buffer().is_none()
    }

    /// Returns the captured text, or an empty string for standard streams.
    pub fn contents(&self) -> String {
        self.buffer().map(CaptureBuffer::contents).unwrap_or_default()
    }
}

impl<'a> MakeWriter<'a> for Sink {
    type Writer = SinkWriter;

    fn make_writer(&'a self) -> Self::Writer {
        match self {
            Sink::Stdout => SinkWriter::Stdout(io::stdout()),
            Sink::Stderr => SinkWriter::Stderr(io::stderr()),
            Sink::Captured(buffer) => SinkWriter::Captured(buffer.clone()),
        }
    }
}

/// The [`Write`] handle produced by a [`Sink`].
#[derive(Debug)]
pub enum SinkWriter {
    /// Writes to stdout.
    Stdout(io::Stdout),
    /// Writes to stderr.
    Stderr(io::Stderr),
    /// Writes into a capture buffer.
    Captured(CaptureBuffer),
}

impl SinkWriter {
    /// Returns `true` if this writer goes to a standard stream.
    pub fn is_std(&self) -> bool {
        !matches!(self, SinkWriter::Captured(_))
    }
}

impl Write for SinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            SinkWriter::Stdout(w) => w.write(buf),
            SinkWriter::Stderr(w) => w.write(buf),
            SinkWriter::Captured(w) => w.write(buf),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            SinkWriter::Stdout(w) => w.write_all(buf),
            SinkWriter::Stderr(w) => w.write_all(buf),
            SinkWriter::Captured(w) => w.write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            SinkWriter::Stdout(w) => w.flush(),
            SinkWriter::Stderr(w) => w.flush(),
            SinkWriter::Captured(w) => w.flush(),
        }
    }
}

/// The output and error sinks of one logger.
///
/// # Examples
/// ```
/// # use calltrail::sink::Sinks;
/// # use std::io::Write;
/// let mut sinks = Sinks::new();
/// assert!(sinks.err().is_std());
///
/// sinks.redirect_to_buffers();
/// write!(sinks.err(), "captured")?;
/// assert_eq!(sinks.read_err(), "captured");
///
/// sinks.reset();
/// assert!(sinks.has_no_output());
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct Sinks {
    out: Sink,
    err: Sink,
}

impl Sinks {
    /// Returns sinks writing to stdout and stderr.
    pub const fn new() -> Self {
        Sinks {
            out: Sink::Stdout,
            err: Sink::Stderr,
        }
    }

    /// Returns sinks that are already redirected to fresh buffers.
    pub fn buffered() -> Self {
        let mut sinks = Sinks::new();
        sinks.redirect_to_buffers();
        sinks
    }

    /// A writer for normal messages.
    pub fn out(&self) -> SinkWriter {
        self.out.make_writer()
    }

    /// A writer for error messages. Traces are written here.
    pub fn err(&self) -> SinkWriter {
        self.err.make_writer()
    }

    /// The normal output sink.
    pub fn out_sink(&self) -> &Sink {
        &self.out
    }

    /// The error output sink.
    pub fn err_sink(&self) -> &Sink {
        &self.err
    }

    /// Handle to the normal output buffer, if redirected.
    pub fn out_buffer(&self) -> Option<CaptureBuffer> {
        self.out.buffer().cloned()
    }

    /// Handle to the error output buffer, if redirected.
    pub fn err_buffer(&self) -> Option<CaptureBuffer> {
        self.err.buffer().cloned()
    }

    /// Sends both streams into new, empty buffers.
    pub fn redirect_to_buffers(&mut self) {
        self.out = Sink::Captured(CaptureBuffer::new());
        self.err = Sink::Captured(CaptureBuffer::new());
    }

    /// Returns the captured normal output, or an empty string if the sink
    /// was never redirected.
    pub fn read_out(&self) -> String {
        self.out.contents()
    }

    /// Returns the captured error output, or an empty string if the sink
    /// was never redirected.
    pub fn read_err(&self) -> String {
        self.err.contents()
    }

    /// Clears captured output. The redirection itself stays in place, and
    /// sinks that write to standard streams are left alone.
    pub fn reset(&self) {
        for buffer in [self.out.buffer(), self.err.buffer()].into_iter().flatten() {
            buffer.clear();
        }
    }

    /// Returns `true` if neither sink captured anything.
    pub fn has_no_output(&self) -> bool {
        self.read_out().is_empty() && self.read_err().is_empty()
    }
}

impl Default for Sinks {
    fn default() -> Self {
        Sinks::new()
    }
}
