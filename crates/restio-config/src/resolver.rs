//! Version-stamped memoized configuration resolution.
//!
//! Each resource keeps a [`CachedConfig`] slot: the last computed value and
//! the registry version it was computed at. Resolution compares that stamp
//! against the registry's current version and only reapplies the rules on a
//! mismatch. Given the same rule list, predicates, and URL, resolution is
//! deterministic; side effects live only in the user-supplied configurers.

use restio_core::logging::resolve_span;

use crate::config::ResourceConfig;
use crate::registry::ConfigRegistry;

/// A memoized configuration value with its version stamp.
///
/// `computed_at <= registry.version()` always holds; equality means the
/// value is current. The slot is overwritten in place on every mismatch;
/// it is superseded, never deleted.
#[derive(Debug, Clone)]
pub struct CachedConfig {
    value: ResourceConfig,
    computed_at: u64,
}

impl CachedConfig {
    /// Returns the memoized configuration value.
    pub const fn value(&self) -> &ResourceConfig {
        &self.value
    }

    /// Returns the registry version this value was computed at.
    pub const fn computed_at(&self) -> u64 {
        self.computed_at
    }
}

/// Resolves the effective configuration for `url`, memoizing into `slot`.
///
/// On the cheap path (slot present, stamp current) no rule is evaluated.
/// Otherwise a fresh default builder has every matching rule's configurer
/// applied in registration order, and the result is stored back into `slot`
/// stamped with the registry's current version. Resolution never fails: with
/// zero matching rules the default [`ResourceConfig`] is returned.
pub fn resolve(
    url: &str,
    slot: &mut Option<CachedConfig>,
    registry: &ConfigRegistry,
) -> ResourceConfig {
    let current = registry.version();
    if let Some(cached) = slot.as_ref() {
        if cached.computed_at == current {
            return cached.value.clone();
        }
    }

    let span = resolve_span(url);
    let _guard = span.enter();

    let mut value = ResourceConfig::default();
    let matched = registry.apply_matching(url, &mut value);
    tracing::debug!(version = current, matched, "recomputed configuration");

    *slot = Some(CachedConfig {
        value: value.clone(),
        computed_at: current,
    });
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use crate::rule::{match_all, match_url, ConfigRule};

    const URL: &str = "https://api.example.com/items";

    fn counting_rule(count: &Arc<AtomicUsize>) -> ConfigRule {
        let count = Arc::clone(count);
        ConfigRule::new(
            "counting",
            match_all(),
            Arc::new(move |config: &mut ResourceConfig| {
                count.fetch_add(1, Ordering::SeqCst);
                config.set_header("X-Count", "yes");
            }),
        )
    }

    #[test]
    fn test_zero_rules_yields_default() {
        let registry = ConfigRegistry::new();
        let mut slot = None;

        let config = resolve(URL, &mut slot, &registry);
        assert_eq!(config.expiration_time, Duration::from_secs(30));
        assert_eq!(config.retry_time, Duration::from_secs(1));
        assert!(config.headers.is_empty());
        assert_eq!(slot.as_ref().unwrap().computed_at(), 0);
    }

    #[test]
    fn test_memoized_until_version_changes() {
        let registry = ConfigRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));
        registry.register(counting_rule(&count));

        let mut slot = None;
        resolve(URL, &mut slot, &registry);
        resolve(URL, &mut slot, &registry);
        resolve(URL, &mut slot, &registry);

        // The configurer ran exactly once; later calls hit the cheap path.
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invalidate_forces_recompute_at_new_version() {
        let registry = ConfigRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));
        registry.register(counting_rule(&count));

        let mut slot = None;
        resolve(URL, &mut slot, &registry);
        let stamped = slot.as_ref().unwrap().computed_at();

        registry.invalidate();
        resolve(URL, &mut slot, &registry);

        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(slot.as_ref().unwrap().computed_at(), stamped + 1);
    }

    #[test]
    fn test_registration_after_resolution_is_picked_up() {
        let registry = ConfigRegistry::new();
        let mut slot = None;
        resolve(URL, &mut slot, &registry);

        registry.register(ConfigRule::new(
            "auth",
            match_all(),
            Arc::new(|config: &mut ResourceConfig| {
                config.set_header("Authorization", "Bearer t");
            }),
        ));

        let config = resolve(URL, &mut slot, &registry);
        assert_eq!(config.headers.get("Authorization").unwrap(), "Bearer t");
    }

    #[test]
    fn test_last_matching_writer_wins() {
        let registry = ConfigRegistry::new();
        registry.register(ConfigRule::new(
            "rule A",
            match_all(),
            Arc::new(|config: &mut ResourceConfig| config.set_header("X", "a")),
        ));
        registry.register(ConfigRule::new(
            "rule B",
            match_all(),
            Arc::new(|config: &mut ResourceConfig| config.set_header("X", "b")),
        ));

        let mut slot = None;
        let config = resolve(URL, &mut slot, &registry);
        assert_eq!(config.headers.get("X").unwrap(), "b");
    }

    #[test]
    fn test_non_matching_rules_leave_defaults() {
        let registry = ConfigRegistry::new();
        registry.register(ConfigRule::new(
            "other resource",
            match_url("https://api.example.com/users"),
            Arc::new(|config: &mut ResourceConfig| {
                config.expiration_time = Duration::from_secs(300);
            }),
        ));

        let mut slot = None;
        let config = resolve(URL, &mut slot, &registry);
        assert_eq!(config.expiration_time, Duration::from_secs(30));
    }

    #[test]
    fn test_configurer_capturing_external_state() {
        let registry = ConfigRegistry::new();
        let token = Arc::new(std::sync::RwLock::new(String::from("first")));
        let captured = Arc::clone(&token);
        registry.register(ConfigRule::new(
            "token from external state",
            match_all(),
            Arc::new(move |config: &mut ResourceConfig| {
                let token = captured.read().expect("token lock poisoned");
                config.set_header("X-Token", token.clone());
            }),
        ));

        let mut slot = None;
        let config = resolve(URL, &mut slot, &registry);
        assert_eq!(config.headers.get("X-Token").unwrap(), "first");

        // Mutating captured state alone is invisible until invalidation.
        *token.write().expect("token lock poisoned") = "second".into();
        let config = resolve(URL, &mut slot, &registry);
        assert_eq!(config.headers.get("X-Token").unwrap(), "first");

        registry.invalidate();
        let config = resolve(URL, &mut slot, &registry);
        assert_eq!(config.headers.get("X-Token").unwrap(), "second");
    }
}
