//! Classification of stack frames into excluded, break, skipped or kept.
//!
//! See [`Rules`] for more details.

/// Skip patterns that every [`Rules`] carries in front of the user's ones.
///
/// They hide the logger's own frames and the `FnOnce` shims that sit between
/// closures and their callers.
pub const DEFAULT_SKIPS: &[&str] = &[
    "'calltrail::",
    "'<calltrail::",
    "core::ops::function::FnOnce",
];

/// Break patterns that every [`Rules`] carries in front of the user's ones.
///
/// The Rust runtime calls `main`, test functions and thread closures through
/// `__rust_begin_short_backtrace`, so nothing below it belongs to the caller.
pub const DEFAULT_BREAKS: &[&str] = &["__rust_begin_short_backtrace", "'std::rt::lang_start"];

/// What the trail builder should do with a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The frame matched an exclude pattern.
    Exclude,
    /// The frame matched a break pattern.
    Break,
    /// The frame matched a skip pattern.
    Skip,
    /// The frame matched nothing and belongs in the breadcrumb.
    Keep,
}

/// Three ordered sets of substring patterns matched against frame
/// descriptors.
///
/// Patterns are evaluated exclude before break before skip: a frame that
/// matches both an exclude and a skip pattern is excluded.
///
/// # Examples
/// ```
/// # use calltrail::rules::{Rules, Verdict};
/// let mut rules = Rules::new();
/// rules.add_exclude("noisy");
/// rules.add_skip("helper");
///
/// assert_eq!(rules.classify("function 'app::noisy_helper'"), Verdict::Exclude);
/// assert_eq!(rules.classify("function 'app::helper'"), Verdict::Skip);
/// assert_eq!(rules.classify("function 'app::main'"), Verdict::Keep);
/// ```
#[derive(Clone, Debug)]
pub struct Rules {
    excludes: Vec<String>,
    breaks: Vec<String>,
    skips: Vec<String>,
}

impl Rules {
    /// Returns rules holding only the default skip and break patterns.
    pub fn new() -> Self {
        Rules {
            excludes: Vec::new(),
            breaks: DEFAULT_BREAKS.iter().map(|s| s.to_string()).collect(),
            skips: DEFAULT_SKIPS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replaces the exclude patterns.
    pub fn set_excludes<I, S>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes = patterns.into_iter().map(Into::into).collect();
    }

    /// Replaces the user break patterns. The defaults are kept.
    pub fn set_breaks<I, S>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.breaks.truncate(DEFAULT_BREAKS.len());
        self.breaks.extend(patterns.into_iter().map(Into::into));
    }

    /// Replaces the user skip patterns. The defaults are kept.
    pub fn set_skips<I, S>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skips.truncate(DEFAULT_SKIPS.len());
        self.skips.extend(patterns.into_iter().map(Into::into));
    }

    /// Appends an exclude pattern.
    pub fn add_exclude(&mut self, pattern: impl Into<String>) {
        self.excludes.push(pattern.into());
    }

    /// Appends a break pattern.
    pub fn add_break(&mut self, pattern: impl Into<String>) {
        self.breaks.push(pattern.into());
    }

    /// Appends a skip pattern.
    pub fn add_skip(&mut self, pattern: impl Into<String>) {
        self.skips.push(pattern.into());
    }

    /// All exclude patterns, in matching order.
    pub fn excludes(&self) -> &[String] {
        &self.excludes
    }

    /// All break patterns, defaults first.
    pub fn breaks(&self) -> &[String] {
        &self.breaks
    }

    /// All skip patterns, defaults first.
    pub fn skips(&self) -> &[String] {
        &self.skips
    }

    /// Returns `true` if `descriptor` contains an exclude pattern.
    pub fn is_excluded(&self, descriptor: &str) -> bool {
        matches(&self.excludes, descriptor)
    }

    /// Returns `true` if `descriptor` contains a break pattern.
    pub fn is_break(&self, descriptor: &str) -> bool {
        matches(&self.breaks, descriptor)
    }

    /// Returns `true` if `descriptor` contains a skip pattern.
    pub fn is_skip(&self, descriptor: &str) -> bool {
        matches(&self.skips, descriptor)
    }

    /// Classifies a frame descriptor.
    pub fn classify(&self, descriptor: &str) -> Verdict {
        if self.is_excluded(descriptor) {
            Verdict::Exclude
        } else if self.is_break(descriptor) {
            Verdict::Break
        } else if self.is_skip(descriptor) {
            Verdict::Skip
        } else {
            Verdict::Keep
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Rules::new()
    }
}

fn matches(patterns: &[String], descriptor: &str) -> bool {
    patterns
        .iter()
        .any(|pattern| descriptor.contains(pattern.as_str()))
}
