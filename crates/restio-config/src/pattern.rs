//! Wildcard URL pattern compilation and matching.
//!
//! This module provides [`UrlPattern`] for selecting resources by URL using
//! glob-style wildcards. A pattern is resolved against a service base URL,
//! escaped, translated to a regex once at construction time, and matched by
//! substring search against a resource's absolute URL string.
//!
//! Three wildcards are recognized:
//!
//! - `*` matches within a single path segment (no `/`, `:`, or `?`)
//! - `**` matches across path segments (no `:` or `?`)
//! - `**/` matches zero or more whole segments ending in `/`, so
//!   `/foo/**/bar` also matches `/foo/bar`
//!
//! Query strings are ignored for matching purposes: the compiled matcher
//! must end at end-of-string or at the start of a query component.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use restio_core::{RestioError, RestioResult};

/// Recognizes patterns that already carry a URL scheme (`https:`, `ws:`, ...).
static SCHEME: Lazy<Regex> = Lazy::new(|| Regex::new("^[a-z]+:").expect("scheme regex"));

/// A wildcard URL pattern compiled to a regex matcher.
///
/// Compilation happens once, at construction; the matcher is immutable
/// thereafter. Matching is a substring search of the compiled regex against
/// the candidate URL, so a pattern resolved to an absolute URL is anchored
/// in practice by its scheme and host.
///
/// # Examples
///
/// ```
/// use restio_config::UrlPattern;
///
/// let p = UrlPattern::compile("/items/*", Some("https://api.example.com/")).unwrap();
/// assert!(p.matches("https://api.example.com/items/5"));
/// assert!(!p.matches("https://api.example.com/items/5/reviews"));
/// ```
pub struct UrlPattern {
    /// The original wildcard pattern text
    pattern: String,
    /// The compiled matcher
    regex: Regex,
}

impl fmt::Debug for UrlPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlPattern")
            .field("pattern", &self.pattern)
            .field("regex", &self.regex.as_str())
            .finish()
    }
}

impl UrlPattern {
    /// Compiles a wildcard pattern, resolving it against `base` if relative.
    ///
    /// A pattern that starts with a scheme (`^[a-z]+:`) is taken as-is.
    /// Otherwise, when a base is supplied, one leading `/` is stripped from
    /// the pattern and the base URL string (which should end in `/`) is
    /// prepended. A relative pattern with no base is compiled unresolved and
    /// relies on the substring search to match anywhere in the URL.
    ///
    /// # Errors
    ///
    /// Returns [`RestioError::InvalidPattern`] if the translated regex does
    /// not compile. Since every literal is escaped first, this indicates a
    /// translator bug rather than bad caller input; it surfaces at
    /// registration time so a broken matcher is never silently kept.
    pub fn compile(pattern: &str, base: Option<&str>) -> RestioResult<Self> {
        let resolved = if SCHEME.is_match(pattern) {
            pattern.to_string()
        } else if let Some(base) = base {
            let stripped = pattern.strip_prefix('/').unwrap_or(pattern);
            format!("{base}{stripped}")
        } else {
            pattern.to_string()
        };

        // Escape literals first so the wildcard substitutions below operate
        // on a fixed, known encoding of `*`.
        let escaped = regex::escape(&resolved);
        let translated = escaped
            .replace(r"\*\*/", "([^:?]*/|)")
            .replace(r"\*\*", "[^:?]*")
            .replace(r"\*", "[^/:?]*");
        let translated = format!("{translated}($|\\?)");

        let regex = Regex::new(&translated).map_err(|e| RestioError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Returns the original wildcard pattern text.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the compiled regex.
    pub const fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Tests the pattern against an absolute URL string.
    pub fn matches(&self, url: &str) -> bool {
        self.regex.is_match(url)
    }
}
