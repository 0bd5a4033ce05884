//! Shortening of fully qualified function names for display.
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static HASH: Lazy<Regex> = Lazy::new(|| compile(r"::h[0-9a-f]{16}$"));
static INSIDE_CLOSURE: Lazy<Regex> =
    Lazy::new(|| compile(r"^.*(?:\{\{closure\}\}|\{closure#\d+\})::"));
static LEGACY_CLOSURE: Lazy<Regex> = Lazy::new(|| compile(r"^(?:.*::)?\{\{closure\}\}$"));
static CLOSURE: Lazy<Regex> = Lazy::new(|| compile(r"^(?:.*::)?\{closure#(\d+)\}$"));
static CLOSURE_OWNER: Lazy<Regex> =
    Lazy::new(|| compile(r"^(.*)::(?:\{\{closure\}\}|\{closure#\d+\})$"));
static QUALIFIED_SELF: Lazy<Regex> = Lazy::new(|| compile(r"^<(.+?)(?: as .+)?>::"));
static MODULE_PATH: Lazy<Regex> = Lazy::new(|| compile(r"^(?:[a-z_][a-z0-9_]*::)+"));

/// The prefix shared by every closure placeholder.
pub const CLOSURE_PLACEHOLDER: &str = "{closure";

/// Turns a fully qualified function name into the short form shown in
/// breadcrumbs.
///
/// * Closures collapse to `{closure}`, or `{closure#N}` when the symbol
///   carries a closure number, which is kept as is.
/// * `<Type as Trait>::method` is read as `Type::method`.
/// * Items defined inside a closure lose the path of their enclosing
///   closures, so `run::{{closure}}::inner` reads as `inner`.
/// * The module path is dropped, leaving `Type::method` for associated
///   functions and just the name for free functions.
///
/// # Examples
/// ```
/// # use calltrail::name::canonicalize;
/// assert_eq!(canonicalize("app::net::Server::listen"), "Server::listen");
/// assert_eq!(canonicalize("app::net::listen"), "listen");
/// assert_eq!(canonicalize("app::net::listen::{{closure}}"), "{closure}");
/// assert_eq!(canonicalize("app::net::listen::{closure#2}"), "{closure#2}");
/// assert_eq!(canonicalize("<app::Server as core::fmt::Debug>::fmt"), "Server::fmt");
/// assert_eq!(canonicalize("app::net::listen::{{closure}}::accept"), "accept");
/// ```
pub fn canonicalize(function: &str) -> String {
    let name = without_hash(function);
    let name = INSIDE_CLOSURE.replace(&name, "");
    let name = LEGACY_CLOSURE.replace(&name, "{closure}");
    let name = CLOSURE.replace(&name, "{closure#$1}");

    if is_closure(&name) {
        return name.into_owned();
    }

    let name = QUALIFIED_SELF.replace(&name, "$1::");
    MODULE_PATH.replace(&name, "").into_owned()
}

/// Returns `true` if `name` is a closure placeholder produced by
/// [`canonicalize`].
pub fn is_closure(name: &str) -> bool {
    name.starts_with(CLOSURE_PLACEHOLDER)
}

/// Returns the path of the function a closure is defined in, or `None` if
/// `function` isn't a closure.
///
/// # Examples
/// ```
/// # use calltrail::name::closure_owner;
/// assert_eq!(closure_owner("app::run::{{closure}}").as_deref(), Some("app::run"));
/// assert_eq!(closure_owner("app::run::{closure#1}").as_deref(), Some("app::run"));
/// assert_eq!(closure_owner("app::run"), None);
/// ```
pub fn closure_owner(function: &str) -> Option<String> {
    CLOSURE_OWNER
        .captures(&without_hash(function))
        .and_then(|captures| captures.get(1))
        .map(|owner| owner.as_str().to_string())
}

/// Strips a trailing legacy-mangling hash such as `::h0123456789abcdef`.
pub(crate) fn without_hash(function: &str) -> Cow<'_, str> {
    HASH.replace(function, "")
}

#[allow(clippy::expect_used)]
pub(crate) fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern is valid")
}
