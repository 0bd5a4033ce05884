//! Access to the frames of the current call stack.
//!
//! See [`FrameProvider`] for more details.
use std::fmt;

/// One entry of the call stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Fully qualified, demangled name of the function, without hash suffix.
    pub function: String,
    /// Source file the function lives in, or an empty string if unknown.
    pub file: String,
    /// Line of the call site within `file`, or `0` if unknown.
    pub line: u32,
}

impl Frame {
    /// Creates a new [`Frame`].
    pub fn new(function: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Frame {
            function: function.into(),
            file: file.into(),
            line,
        }
    }

    /// Renders the string that classification patterns are matched against.
    ///
    /// The descriptor is never displayed, it only exists so that patterns
    /// can refer to the function, the file, or the line.
    ///
    /// # Examples
    /// ```
    /// # use calltrail::frame::Frame;
    /// let frame = Frame::new("app::server::run", "src/server.rs", 12);
    /// assert_eq!(
    ///     frame.descriptor(),
    ///     "function 'app::server::run' (line 12): file 'src/server.rs'"
    /// );
    /// ```
    pub fn descriptor(&self) -> String {
        format!(
            "function '{}' (line {}): file '{}'",
            self.function, self.line, self.file
        )
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{})", self.function, self.file, self.line)
    }
}

/// A source of call stack frames.
///
/// `frame(0)` is the innermost frame, and each increment of `skip` moves one
/// frame towards the bottom of the stack. Returning `None` means there are no
/// more frames, which also covers a stack that can't be walked at all.
///
/// This trait is implemented for all `Fn(usize) -> Option<Frame>` types,
/// which makes test doubles short to write.
///
/// # Examples
/// ```
/// # use calltrail::frame::{Frame, FrameProvider};
/// let stack = vec![
///     Frame::new("app::leaf", "src/lib.rs", 3),
///     Frame::new("app::root", "src/lib.rs", 9),
/// ];
/// let provider = move |skip: usize| stack.get(skip).cloned();
///
/// assert_eq!(provider.frame(1).map(|f| f.line), Some(9));
/// assert!(provider.frame(2).is_none());
/// ```
pub trait FrameProvider {
    /// Returns the frame `skip` levels below the innermost one, if any.
    fn frame(&self, skip: usize) -> Option<Frame>;
}

impl<F> FrameProvider for F
where
    F: Fn(usize) -> Option<Frame>,
{
    #[inline]
    fn frame(&self, skip: usize) -> Option<Frame> {
        self(skip)
    }
}

/// A [`FrameProvider`] that walks the live call stack of the current thread.
///
/// Frame 0 is the function that called [`frame`](FrameProvider::frame);
/// the walker's own frames and the unwinder beneath them are never
/// reported. Each resolved symbol counts as one frame, so functions inlined
/// into their callers still show up.
#[derive(Clone, Copy, Debug, Default)]
pub struct StackWalker {
    _priv: (),
}

impl StackWalker {
    /// Returns a new [`StackWalker`].
    pub const fn new() -> Self {
        StackWalker { _priv: () }
    }
}

impl FrameProvider for StackWalker {
    #[inline(never)]
    fn frame(&self, skip: usize) -> Option<Frame> {
        let mut walk = Walk::new(skip);

        backtrace::trace(|raw| {
            let mut resolved = false;
            backtrace::resolve_frame(raw, |symbol| {
                resolved = true;
                walk.visit(Some(symbol));
            });
            if !resolved {
                walk.visit(None);
            }
            walk.found.is_none()
        });

        walk.found
    }
}

// Matches `<calltrail::frame::StackWalker as ...>::frame` and its closures.
const OWN_FRAME: &str = "calltrail::frame::StackWalker as ";

struct Walk {
    skip: usize,
    index: usize,
    inside: bool,
    past: bool,
    found: Option<Frame>,
}

impl Walk {
    fn new(skip: usize) -> Self {
        Walk {
            skip,
            index: 0,
            inside: false,
            past: false,
            found: None,
        }
    }

    fn visit(&mut self, symbol: Option<&backtrace::Symbol>) {
        let function = symbol
            .and_then(backtrace::Symbol::name)
            .map(|name| format!("{:#}", name));

        // Everything up to and including the walker's own frames is
        // unwinder machinery.
        if !self.past {
            if function.as_deref().map_or(false, |f| f.contains(OWN_FRAME)) {
                self.inside = true;
                return;
            }
            if !self.inside {
                return;
            }
            self.past = true;
        }

        if self.found.is_some() {
            return;
        }

        if self.index == self.skip {
            let file = symbol
                .and_then(backtrace::Symbol::filename)
                .map(|path| path.display().to_string())
                .unwrap_or_default();
            let line = symbol.and_then(backtrace::Symbol::lineno).unwrap_or(0);
            self.found = Some(Frame::new(
                function.unwrap_or_else(|| UNKNOWN.to_string()),
                file,
                line,
            ));
        }
        self.index += 1;
    }
}

/// A [`FrameProvider`] for which stack walking never succeeds.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unavailable;

impl FrameProvider for Unavailable {
    fn frame(&self, _skip: usize) -> Option<Frame> {
        None
    }
}

const UNKNOWN: &str = "<unknown>";
