//! Walking the call stack into a breadcrumb trail.
//!
//! See [`build`] for more details.
use crate::frame::FrameProvider;
use crate::name;
use crate::rules::{Rules, Verdict};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{self, Write};

/// A frame that survived classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// Canonical display name, see [`name::canonicalize`].
    pub name: String,
    /// Line of the call site.
    pub line: u32,
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.line)
    }
}

/// The result of walking the stack for one trace call.
///
/// `entries` are ordered innermost first: the direct caller of the trace
/// operation, then its caller, and so on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Trail {
    entries: Vec<Entry>,
    walked: usize,
    initial_skip_count: usize,
    later_skip_count: usize,
}

impl Trail {
    /// The surviving frames, innermost first.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Returns `true` if no frame survived.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of frames the walk advanced over, whatever their verdict.
    pub fn walked(&self) -> usize {
        self.walked
    }

    /// Number of skipped frames seen before the first surviving frame.
    pub fn initial_skip_count(&self) -> usize {
        self.initial_skip_count
    }

    /// Number of skipped frames seen after the first surviving frame.
    pub fn later_skip_count(&self) -> usize {
        self.later_skip_count
    }

    /// Nesting depth of the trace call, zero for an outermost caller.
    ///
    /// Skipped frames never count, so a chain renders at the same depth
    /// whether or not its helpers are skipped. Frames excluded after the
    /// first survivor still count.
    pub fn depth(&self) -> usize {
        self.walked
            .saturating_sub(self.initial_skip_count + self.later_skip_count + 1)
    }

    /// Renders the entries as `[inner:1] (outer:2) (outermost:3)`, or an
    /// empty string if there are none.
    pub fn breadcrumb(&self) -> String {
        let mut breadcrumb = String::new();
        for (i, entry) in self.entries.iter().enumerate() {
            // Writing into a `String` can't fail.
            let _ = if i == 0 {
                write!(breadcrumb, "[{}]", entry)
            } else {
                write!(breadcrumb, " ({})", entry)
            };
        }
        breadcrumb
    }

    fn skip(&mut self) {
        if self.entries.is_empty() {
            self.initial_skip_count += 1;
        } else {
            self.later_skip_count += 1;
        }
    }
}

/// Walks the frames of `provider` through `rules`.
///
/// Returns `None` if the first candidate frame, i.e. the first one that isn't
/// skipped, is excluded: such calls must not be traced at all. Otherwise the
/// walk goes on until the provider runs out of frames or a break pattern
/// matches, and the collected [`Trail`] is returned.
///
/// A closure that does nothing but call the function it is defined in, with
/// only skipped frames between it and the break, is part of the runtime
/// boundary and is dropped. This is how the test harness wraps every
/// `#[test]` function, so a trace made directly from a test sits at depth
/// zero like one made from `main`.
///
/// A provider that fails straight away yields an empty trail, never an error.
///
/// # Examples
/// ```
/// # use calltrail::frame::Frame;
/// # use calltrail::rules::Rules;
/// let stack = vec![
///     Frame::new("app::util::helper", "src/util.rs", 7),
///     Frame::new("app::run", "src/lib.rs", 21),
///     Frame::new("app::main", "src/main.rs", 4),
/// ];
/// let provider = move |skip: usize| stack.get(skip).cloned();
///
/// let mut rules = Rules::new();
/// rules.add_skip("helper");
///
/// let trail = calltrail::trail::build(&provider, &rules).unwrap();
/// assert_eq!(trail.breadcrumb(), "[run:21] (main:4)");
/// assert_eq!(trail.depth(), 1);
/// ```
#[inline(never)]
pub fn build<P>(provider: &P, rules: &Rules) -> Option<Trail>
where
    P: FrameProvider + ?Sized,
{
    let mut trail = Trail::default();
    // Raw name of the last kept frame.
    let mut last_kept: Option<String> = None;
    // Counters to roll back to if the last entry turns out to be a wrapper.
    let mut wrapper: Option<(usize, usize)> = None;

    while let Some(frame) = provider.frame(trail.walked) {
        let descriptor = frame.descriptor();

        match rules.classify(&descriptor) {
            Verdict::Exclude if trail.is_empty() => {
                tracing::debug!(frame = %frame, "trace suppressed by exclude rule");
                return None;
            }
            Verdict::Exclude => {
                tracing::trace!(frame = %frame, "excluded");
                wrapper = None;
            }
            Verdict::Break => {
                tracing::trace!(frame = %frame, "break");
                if let Some((walked, later_skip_count)) = wrapper {
                    trail.entries.pop();
                    trail.walked = walked;
                    trail.later_skip_count = later_skip_count;
                }
                break;
            }
            Verdict::Skip => {
                tracing::trace!(frame = %frame, "skipped");
                trail.skip();
            }
            Verdict::Keep => {
                let owner = name::closure_owner(&frame.function);
                wrapper = match (owner, &last_kept) {
                    (Some(owner), Some(caller)) if owner == name::without_hash(caller) => {
                        Some((trail.walked, trail.later_skip_count))
                    }
                    _ => None,
                };
                trail.entries.push(Entry {
                    name: name::canonicalize(&frame.function),
                    line: frame.line,
                });
                last_kept = Some(frame.function);
            }
        }

        trail.walked += 1;
    }

    Some(trail)
}

static LINE_NUMBER: Lazy<Regex> = Lazy::new(|| name::compile(r":\d+([\])])"));

/// Replaces the line numbers of every breadcrumb entry in `text` with `_`.
///
/// Handy for asserting on the shape of a call chain without tying a test to
/// the exact lines it was written on.
///
/// # Examples
/// ```
/// # use calltrail::trail::strip_line_numbers;
/// assert_eq!(
///     strip_line_numbers("[parse:88] (handle:41)\n  bad header\n\n"),
///     "[parse:_] (handle:_)\n  bad header\n\n"
/// );
/// ```
pub fn strip_line_numbers(text: &str) -> String {
    LINE_NUMBER.replace_all(text, ":_$1").into_owned()
}
