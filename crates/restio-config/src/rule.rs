//! Configuration rules: a URL predicate paired with a configurer.
//!
//! Rules are immutable once registered and are always applied in
//! registration order. The four registration shapes exposed by the service
//! layer (global, exact URL, wildcard pattern, arbitrary predicate) all
//! reduce to a [`ConfigRule`] built from one of the predicate constructors
//! here.

use std::fmt;
use std::sync::Arc;

use crate::config::ResourceConfig;
use crate::pattern::UrlPattern;

/// A predicate over a resource's normalized absolute URL string.
///
/// Resources whose URL could not be represented carry the empty string, so
/// a predicate sees `""` for those.
pub type ConfigPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// A function that mutates a configuration builder.
///
/// Configurers may capture external state; when that state changes without
/// the rule list changing, callers signal it with
/// [`ConfigRegistry::invalidate`](crate::ConfigRegistry::invalidate).
pub type Configurer = Arc<dyn Fn(&mut ResourceConfig) + Send + Sync>;

/// One registered configuration rule.
pub struct ConfigRule {
    description: String,
    predicate: ConfigPredicate,
    configurer: Configurer,
}

impl fmt::Debug for ConfigRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigRule")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl ConfigRule {
    /// Creates a rule from its parts.
    pub fn new(
        description: impl Into<String>,
        predicate: ConfigPredicate,
        configurer: Configurer,
    ) -> Self {
        Self {
            description: description.into(),
            predicate,
            configurer,
        }
    }

    /// Returns the human-readable description used in debug logging.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Tests whether this rule applies to the given URL.
    pub fn matches(&self, url: &str) -> bool {
        (self.predicate)(url)
    }

    /// Runs the configurer against a builder.
    pub fn apply(&self, config: &mut ResourceConfig) {
        (self.configurer)(config);
    }
}

/// A predicate that matches every resource, including sentinel-keyed ones.
pub fn match_all() -> ConfigPredicate {
    Arc::new(|_| true)
}

/// A predicate that matches exactly one normalized URL.
pub fn match_url(url: impl Into<String>) -> ConfigPredicate {
    let url = url.into();
    Arc::new(move |candidate| candidate == url)
}

/// A predicate backed by a compiled wildcard pattern.
pub fn match_pattern(pattern: UrlPattern) -> ConfigPredicate {
    Arc::new(move |candidate| pattern.matches(candidate))
}
