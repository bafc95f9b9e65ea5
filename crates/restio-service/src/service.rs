//! The service owner object.
//!
//! A [`Service`] is the long-lived object a client application creates per
//! API it talks to. It owns the configuration registry and the resource
//! identity cache, and exposes the public registration and lookup surface:
//! the four `configure*` registration shapes, explicit invalidation,
//! resource lookup by path or absolute URL, and bulk wipe operations.

use std::fmt;
use std::sync::Arc;

use url::Url;

use restio_cache::WeakCache;
use restio_config::{
    match_all, match_pattern, match_url, ConfigRegistry, ConfigRule, ResourceConfig, UrlPattern,
};
use restio_core::urlutil::{ensure_trailing_slash, join_to_base, parse_url};
use restio_core::RestioResult;

use crate::resource::Resource;

/// The owning object for one remote API: configuration rules plus the
/// resource identity cache.
///
/// Each service carries its own registry and version counter; independent
/// services in one process never cross-invalidate.
pub struct Service {
    /// Normalized base URL string, always ending in `/`.
    base: Option<String>,
    registry: Arc<ConfigRegistry>,
    resources: WeakCache<Resource>,
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("base", &self.base)
            .field("rules", &self.registry.rule_count())
            .field("resources", &self.resources)
            .finish()
    }
}

impl Service {
    /// Creates a service rooted at `base`.
    ///
    /// The base is parsed, normalized, and given a trailing `/` so that
    /// path joining and pattern resolution are uniform.
    ///
    /// # Errors
    ///
    /// Returns [`RestioError::InvalidUrl`](restio_core::RestioError) if
    /// `base` is not an absolute URL.
    pub fn new(base: &str) -> RestioResult<Self> {
        let base = parse_url(base)?;
        Ok(Self {
            base: Some(ensure_trailing_slash(base.as_str())),
            registry: Arc::new(ConfigRegistry::new()),
            resources: WeakCache::new(),
        })
    }

    /// Creates a service with no base URL.
    ///
    /// Resources must then be addressed by absolute URL, and relative
    /// wildcard patterns are matched unresolved (by substring).
    pub fn new_unbased() -> Self {
        Self {
            base: None,
            registry: Arc::new(ConfigRegistry::new()),
            resources: WeakCache::new(),
        }
    }

    /// Returns the normalized base URL string, if the service has one.
    pub fn base_url(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Returns the configuration registry shared by this service's
    /// resources.
    pub const fn registry(&self) -> &Arc<ConfigRegistry> {
        &self.registry
    }

    // ── Registration ─────────────────────────────────────────────────

    /// Registers a rule that applies to every resource of this service.
    pub fn configure(&self, configurer: impl Fn(&mut ResourceConfig) + Send + Sync + 'static) {
        self.registry.register(ConfigRule::new(
            "all resources",
            match_all(),
            Arc::new(configurer),
        ));
    }

    /// Registers a rule for resources whose URL matches a wildcard pattern.
    ///
    /// Relative patterns are resolved against the service base; the pattern
    /// text doubles as the rule description.
    ///
    /// # Errors
    ///
    /// Returns [`RestioError::InvalidPattern`](restio_core::RestioError) if
    /// the pattern does not translate to a valid matcher.
    pub fn configure_pattern(
        &self,
        pattern: &str,
        configurer: impl Fn(&mut ResourceConfig) + Send + Sync + 'static,
    ) -> RestioResult<()> {
        let compiled = UrlPattern::compile(pattern, self.base.as_deref())?;
        self.registry.register(ConfigRule::new(
            pattern,
            match_pattern(compiled),
            Arc::new(configurer),
        ));
        Ok(())
    }

    /// Registers a rule for exactly one resource, matched by its normalized
    /// URL.
    pub fn configure_resource(
        &self,
        resource: &Resource,
        configurer: impl Fn(&mut ResourceConfig) + Send + Sync + 'static,
    ) {
        let url = resource.url().to_string();
        self.registry.register(ConfigRule::new(
            url.clone(),
            match_url(url),
            Arc::new(configurer),
        ));
    }

    /// Registers a rule with an arbitrary URL predicate.
    ///
    /// The predicate receives the resource's normalized absolute URL string
    /// (`""` for sentinel resources).
    pub fn configure_matching(
        &self,
        description: &str,
        predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
        configurer: impl Fn(&mut ResourceConfig) + Send + Sync + 'static,
    ) {
        self.registry.register(ConfigRule::new(
            description,
            Arc::new(predicate),
            Arc::new(configurer),
        ));
    }

    /// Invalidates every memoized configuration owned by this service.
    ///
    /// O(1): bumps the registry version; each resource recomputes lazily on
    /// its next [`Resource::configuration`] call. Use this when state
    /// captured by a configurer has changed without the rule list changing.
    pub fn invalidate_configuration(&self) {
        self.registry.invalidate();
    }

    // ── Resource lookup ──────────────────────────────────────────────

    /// Returns the resource for a path relative to the service base.
    ///
    /// At most one leading `/` is stripped from `path` before joining. On a
    /// service without a base URL the path is treated as absolute.
    pub fn resource(&self, path: &str) -> Arc<Resource> {
        match &self.base {
            Some(base) => self.resource_from_url(&join_to_base(base, path)),
            None => self.resource_from_url(path),
        }
    }

    /// Returns the resource for an absolute URL.
    ///
    /// The URL is normalized and used as the identity-cache key: while any
    /// external owner holds the returned `Arc`, subsequent lookups of an
    /// equal URL return the identical instance.
    ///
    /// An unparseable URL degrades to the empty-string sentinel key, so
    /// *all* unrepresentable URLs alias onto one shared resource. This is a
    /// known hazard of the sentinel policy; use
    /// [`Service::try_resource_from_url`] to reject such URLs instead.
    pub fn resource_from_url(&self, url: &str) -> Arc<Resource> {
        let parsed = Url::parse(url).ok();
        let key = parsed.as_ref().map_or("", Url::as_str).to_string();
        let registry = Arc::clone(&self.registry);
        self.resources
            .get(&key, move || Resource::new(parsed, registry))
    }

    /// Like [`Service::resource_from_url`], but rejects unparseable URLs
    /// rather than aliasing them onto the sentinel slot.
    ///
    /// # Errors
    ///
    /// Returns [`RestioError::InvalidUrl`](restio_core::RestioError) if
    /// `url` is not an absolute URL.
    pub fn try_resource_from_url(&self, url: &str) -> RestioResult<Arc<Resource>> {
        parse_url(url)?;
        Ok(self.resource_from_url(url))
    }

    /// Resolves the effective configuration for an absolute URL.
    ///
    /// Shorthand for looking up the resource and asking it; the result is
    /// memoized on the resource's identity slot like any other resolution.
    pub fn configuration_for_url(&self, url: &str) -> ResourceConfig {
        self.resource_from_url(url).configuration()
    }

    /// Returns a snapshot of all currently live resources, in no particular
    /// order.
    pub fn resources(&self) -> Vec<Arc<Resource>> {
        self.resources.values()
    }

    /// Compacts the identity cache by dropping slots whose resource has
    /// been released by every external owner. Returns the number removed.
    pub fn flush_unused_resources(&self) -> usize {
        self.resources.flush_unused()
    }

    // ── Bulk operations ──────────────────────────────────────────────

    /// Invokes [`Resource::wipe`] on every live resource for which
    /// `predicate` returns `true`.
    ///
    /// Already-reclaimed resources no longer exist and are never visited.
    pub fn wipe_resources(&self, predicate: impl Fn(&Resource) -> bool) {
        for resource in self.resources.values() {
            if predicate(&resource) {
                resource.wipe();
            }
        }
    }

    /// Invokes [`Resource::wipe`] on every live resource.
    pub fn wipe_all(&self) {
        self.wipe_resources(|_| true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use restio_core::RestioError;

    #[test]
    fn test_new_normalizes_base() {
        let service = Service::new("https://API.Example.com").unwrap();
        assert_eq!(service.base_url(), Some("https://api.example.com/"));
    }

    #[test]
    fn test_new_rejects_relative_base() {
        assert!(matches!(
            Service::new("/not/absolute"),
            Err(RestioError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_resource_joins_against_base() {
        let service = Service::new("https://api.example.com").unwrap();
        assert_eq!(
            service.resource("/items").url(),
            "https://api.example.com/items"
        );
        assert_eq!(
            service.resource("items").url(),
            "https://api.example.com/items"
        );
    }

    #[test]
    fn test_unbased_service_takes_absolute_paths() {
        let service = Service::new_unbased();
        assert!(service.base_url().is_none());
        assert_eq!(
            service.resource("https://other.example.org/x").url(),
            "https://other.example.org/x"
        );
    }

    #[test]
    fn test_try_resource_from_url_rejects_invalid() {
        let service = Service::new_unbased();
        assert!(service.try_resource_from_url("not a url").is_err());
        assert!(service
            .try_resource_from_url("https://api.example.com/items")
            .is_ok());
    }

    #[test]
    fn test_invalid_urls_alias_to_sentinel() {
        let service = Service::new_unbased();
        let a = service.resource_from_url("💥 not a url");
        let b = service.resource_from_url("a different bad url");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.url(), "");
    }

    #[test]
    fn test_configure_pattern_reports_description() {
        let service = Service::new("https://api.example.com").unwrap();
        service
            .configure_pattern("/items/*", |config| {
                config.set_header("Accept", "application/json");
            })
            .unwrap();
        assert_eq!(service.registry().rule_count(), 1);
    }

    #[test]
    fn test_configuration_for_url() {
        let service = Service::new("https://api.example.com").unwrap();
        service.configure(|config| config.set_header("Accept", "text/plain"));
        let config = service.configuration_for_url("https://api.example.com/items");
        assert_eq!(config.headers.get("Accept").unwrap(), "text/plain");
    }

    #[test]
    fn test_configure_resource_is_exact() {
        let service = Service::new("https://api.example.com").unwrap();
        let items = service.resource("/items");
        service.configure_resource(&items, |config| {
            config.set_header("X-Only", "items");
        });

        assert_eq!(
            items.configuration().headers.get("X-Only").unwrap(),
            "items"
        );
        let detail = service.resource("/items/5");
        assert!(detail.configuration().headers.get("X-Only").is_none());
    }
}
