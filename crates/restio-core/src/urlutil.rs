//! URL normalization and base-relative joining.
//!
//! Resource identity in restio is keyed by the *normalized* absolute URL
//! string: scheme and host are lowercased, default ports dropped, and
//! percent-encoding canonicalized by the [`url`] crate. A string that cannot
//! be parsed as an absolute URL normalizes to the empty-string sentinel key,
//! so every unrepresentable URL aliases onto a single identity slot.

use url::Url;

use crate::error::{RestioError, RestioResult};

/// Parses `raw` as an absolute URL, rejecting anything unparseable.
///
/// # Errors
///
/// Returns [`RestioError::InvalidUrl`] if `raw` is not an absolute URL.
pub fn parse_url(raw: &str) -> RestioResult<Url> {
    Url::parse(raw).map_err(|e| RestioError::InvalidUrl(format!("{raw}: {e}")))
}

/// Normalizes `raw` into the identity-cache key form.
///
/// Returns the canonical string of the parsed URL, or the empty string when
/// `raw` is not a representable absolute URL. The empty-string sentinel means
/// all invalid URLs share one cache slot; callers that want rejection instead
/// of aliasing should use [`parse_url`].
pub fn normalize_url(raw: &str) -> String {
    Url::parse(raw).map_or_else(|_| String::new(), |u| u.as_str().to_string())
}

/// Joins a path onto a base URL string.
///
/// At most one leading `/` is stripped from `path` before concatenation, so
/// `join_to_base("https://api.example.com/", "/items")` and
/// `join_to_base("https://api.example.com/", "items")` produce the same
/// result. The base is expected to carry its trailing slash (see
/// [`ensure_trailing_slash`]); no RFC 3986 relative resolution is performed.
pub fn join_to_base(base: &str, path: &str) -> String {
    let path = path.strip_prefix('/').unwrap_or(path);
    format!("{base}{path}")
}

/// Returns `base` with exactly its original content plus a trailing `/` if
/// one was missing.
pub fn ensure_trailing_slash(base: &str) -> String {
    if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    }
}
