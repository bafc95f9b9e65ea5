//! The ordered, versioned rule registry.
//!
//! A [`ConfigRegistry`] owns an append-only sequence of [`ConfigRule`]s and
//! a monotonically increasing version counter. Registering a rule bumps the
//! version; [`ConfigRegistry::invalidate`] bumps it without touching the
//! rule list, for configurers whose captured external state has changed.
//! Both operations are O(1) side effects; recomputation cost is deferred
//! to the next resolution of each affected resource.
//!
//! The counter is a field of the registry instance, never process-global,
//! so independent registries in one process cannot cross-invalidate.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::config::ResourceConfig;
use crate::rule::ConfigRule;

/// Ordered configuration rules plus the version counter that stamps
/// memoized resolutions.
#[derive(Debug, Default)]
pub struct ConfigRegistry {
    rules: RwLock<Vec<ConfigRule>>,
    version: AtomicU64,
}

impl ConfigRegistry {
    /// Creates an empty registry at version 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule and invalidates.
    ///
    /// Rule order is registration order and never changes afterwards; there
    /// is no deregistration at this layer.
    pub fn register(&self, rule: ConfigRule) {
        let mut rules = self.rules.write().expect("registry lock poisoned");
        tracing::debug!(description = rule.description(), "registering configuration rule");
        rules.push(rule);
        drop(rules);
        self.bump();
    }

    /// Invalidates all memoized configurations without changing the rules.
    ///
    /// Use this when a configurer's captured state has changed. The call is
    /// O(1); each resource recomputes lazily on its next resolution.
    pub fn invalidate(&self) {
        self.bump();
        tracing::debug!(version = self.version(), "configuration invalidated");
    }

    /// Returns the current version. A memoized value stamped with an older
    /// version is stale.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Returns the number of registered rules.
    pub fn rule_count(&self) -> usize {
        self.rules.read().expect("registry lock poisoned").len()
    }

    /// Applies every rule matching `url` to `config`, in registration
    /// order, returning how many matched.
    ///
    /// Later matching rules observe fields set by earlier ones, so the last
    /// writer among matching rules wins per field.
    pub fn apply_matching(&self, url: &str, config: &mut ResourceConfig) -> usize {
        let rules = self.rules.read().expect("registry lock poisoned");
        let mut matched = 0;
        for rule in rules.iter() {
            if rule.matches(url) {
                tracing::trace!(description = rule.description(), url, "applying rule");
                rule.apply(config);
                matched += 1;
            }
        }
        matched
    }

    fn bump(&self) {
        self.version.fetch_add(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::rule::{match_all, match_url};

    fn set_header_rule(name: &'static str, value: &'static str) -> ConfigRule {
        ConfigRule::new(
            format!("{name}: {value}"),
            match_all(),
            Arc::new(move |config: &mut ResourceConfig| {
                config.set_header(name, value);
            }),
        )
    }

    #[test]
    fn test_starts_at_version_zero() {
        let registry = ConfigRegistry::new();
        assert_eq!(registry.version(), 0);
        assert_eq!(registry.rule_count(), 0);
    }

    #[test]
    fn test_register_bumps_version() {
        let registry = ConfigRegistry::new();
        registry.register(set_header_rule("X", "a"));
        assert_eq!(registry.version(), 1);
        assert_eq!(registry.rule_count(), 1);

        registry.register(set_header_rule("Y", "b"));
        assert_eq!(registry.version(), 2);
        assert_eq!(registry.rule_count(), 2);
    }

    #[test]
    fn test_invalidate_bumps_without_rule_change() {
        let registry = ConfigRegistry::new();
        registry.register(set_header_rule("X", "a"));
        let before = registry.version();

        registry.invalidate();
        assert_eq!(registry.version(), before + 1);
        assert_eq!(registry.rule_count(), 1);
    }

    #[test]
    fn test_versions_are_per_instance() {
        let a = ConfigRegistry::new();
        let b = ConfigRegistry::new();
        a.invalidate();
        a.invalidate();
        assert_eq!(a.version(), 2);
        assert_eq!(b.version(), 0);
    }

    #[test]
    fn test_apply_matching_in_registration_order() {
        let registry = ConfigRegistry::new();
        registry.register(set_header_rule("X", "a"));
        registry.register(set_header_rule("X", "b"));

        let mut config = ResourceConfig::default();
        let matched = registry.apply_matching("https://api.example.com/items", &mut config);
        assert_eq!(matched, 2);
        // Last registered writer wins.
        assert_eq!(config.headers.get("X").unwrap(), "b");
    }

    #[test]
    fn test_apply_matching_skips_non_matching() {
        let registry = ConfigRegistry::new();
        registry.register(ConfigRule::new(
            "items only",
            match_url("https://api.example.com/items"),
            Arc::new(|config: &mut ResourceConfig| config.set_header("X", "items")),
        ));

        let mut config = ResourceConfig::default();
        let matched = registry.apply_matching("https://api.example.com/users", &mut config);
        assert_eq!(matched, 0);
        assert!(config.headers.is_empty());
    }
}
