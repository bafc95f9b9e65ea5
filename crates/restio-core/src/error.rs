//! Core error types for restio.
//!
//! This module provides the [`RestioError`] enum shared by all restio crates,
//! together with the [`RestioResult`] alias. Configuration resolution itself
//! never fails; errors here surface at registration time (a wildcard pattern
//! that does not translate to a valid matcher) or from strict URL helpers.

use thiserror::Error;

/// The primary error type for the restio library.
///
/// Most of the library is infallible by design: resolving a configuration
/// always produces a value, and looking up a resource by URL degrades to a
/// sentinel key rather than failing. The remaining failure points are
/// registration-time pattern compilation and strict URL parsing.
#[derive(Error, Debug)]
pub enum RestioError {
    /// A wildcard URL pattern could not be turned into a valid matcher.
    ///
    /// This indicates a programming error in the pattern (or the translator)
    /// and is reported at registration time: silently accepting a broken
    /// pattern would produce a rule that never matches or matches everything.
    #[error("Invalid URL pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// The original wildcard pattern as supplied by the caller.
        pattern: String,
        /// Why the compiled matcher was rejected.
        reason: String,
    },

    /// A URL string could not be parsed as an absolute URL.
    ///
    /// Only the strict helpers report this; the identity-cache path maps
    /// unparseable URLs to the empty-string sentinel key instead.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A response payload conversion failed.
    ///
    /// Carried by payload conversion helpers so that the external pipeline
    /// executor has a uniform error to propagate.
    #[error("Transform error: {0}")]
    Transform(String),
}

/// A convenience type alias for `Result<T, RestioError>`.
pub type RestioResult<T> = Result<T, RestioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_pattern_display() {
        let err = RestioError::InvalidPattern {
            pattern: "/foo/**".into(),
            reason: "unbalanced group".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid URL pattern `/foo/**`: unbalanced group"
        );
    }

    #[test]
    fn test_invalid_url_display() {
        let err = RestioError::InvalidUrl("not a url".into());
        assert_eq!(err.to_string(), "Invalid URL: not a url");
    }

    #[test]
    fn test_transform_display() {
        let err = RestioError::Transform("expected JSON".into());
        assert!(err.to_string().contains("expected JSON"));
    }
}
