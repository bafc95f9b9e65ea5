//! Resource handles.
//!
//! A [`Resource`] represents one remote resource identified by URL. Handles
//! are created by [`Service`](crate::Service) lookups and shared via `Arc`;
//! the service's identity cache holds only weak references, so a resource
//! lives exactly as long as its external owners do.

use std::fmt;
use std::sync::{Arc, RwLock};

use url::Url;

use restio_config::{resolve, CachedConfig, ConfigRegistry, Payload, ResourceConfig};

/// One remote resource: a normalized URL plus memoized per-resource state.
///
/// A resource with an unrepresentable URL carries no [`Url`] at all and
/// reports an empty string from [`Resource::url`]; every such resource
/// shares the sentinel identity slot (see
/// [`Service::resource_from_url`](crate::Service::resource_from_url)).
pub struct Resource {
    url: Option<Url>,
    registry: Arc<ConfigRegistry>,
    cached_config: RwLock<Option<CachedConfig>>,
    latest_payload: RwLock<Option<Payload>>,
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cached = self
            .cached_config
            .read()
            .expect("resource lock poisoned")
            .as_ref()
            .map(CachedConfig::computed_at);
        f.debug_struct("Resource")
            .field("url", &self.url())
            .field("config_version", &cached)
            .finish_non_exhaustive()
    }
}

impl Resource {
    pub(crate) fn new(url: Option<Url>, registry: Arc<ConfigRegistry>) -> Self {
        Self {
            url,
            registry,
            cached_config: RwLock::new(None),
            latest_payload: RwLock::new(None),
        }
    }

    /// Returns the normalized absolute URL string, or `""` for a resource
    /// whose URL could not be represented.
    pub fn url(&self) -> &str {
        self.url.as_ref().map_or("", Url::as_str)
    }

    /// Returns the parsed URL, if this resource has a representable one.
    pub const fn parsed_url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Returns the effective configuration for this resource.
    ///
    /// The value is memoized against the owning registry's version: a call
    /// after an unchanged version returns the cached value without
    /// evaluating any rule, while a registration or invalidation since the
    /// last call triggers reapplication of all matching rules in
    /// registration order.
    pub fn configuration(&self) -> ResourceConfig {
        let mut slot = self.cached_config.write().expect("resource lock poisoned");
        resolve(self.url(), &mut slot, &self.registry)
    }

    /// Returns the version stamp of the memoized configuration, if any has
    /// been computed yet.
    pub fn configuration_version(&self) -> Option<u64> {
        self.cached_config
            .read()
            .expect("resource lock poisoned")
            .as_ref()
            .map(CachedConfig::computed_at)
    }

    /// Records the latest payload produced for this resource.
    ///
    /// Called by the external request layer after a response has passed its
    /// transform pipeline; this crate never populates it itself.
    pub fn set_payload(&self, payload: Payload) {
        *self.latest_payload.write().expect("resource lock poisoned") = Some(payload);
    }

    /// Returns the latest recorded payload, if any.
    pub fn payload(&self) -> Option<Payload> {
        self.latest_payload
            .read()
            .expect("resource lock poisoned")
            .clone()
    }

    /// Resets this resource: drops the latest payload and the memoized
    /// configuration, as if the resource had just been created.
    pub fn wipe(&self) {
        tracing::debug!(url = self.url(), "wiping resource");
        *self.latest_payload.write().expect("resource lock poisoned") = None;
        *self.cached_config.write().expect("resource lock poisoned") = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource_for(url: &str, registry: &Arc<ConfigRegistry>) -> Resource {
        Resource::new(Some(Url::parse(url).unwrap()), Arc::clone(registry))
    }

    #[test]
    fn test_url_accessors() {
        let registry = Arc::new(ConfigRegistry::new());
        let r = resource_for("https://api.example.com/items", &registry);
        assert_eq!(r.url(), "https://api.example.com/items");
        assert!(r.parsed_url().is_some());

        let sentinel = Resource::new(None, registry);
        assert_eq!(sentinel.url(), "");
        assert!(sentinel.parsed_url().is_none());
    }

    #[test]
    fn test_configuration_is_memoized_per_resource() {
        let registry = Arc::new(ConfigRegistry::new());
        let r = resource_for("https://api.example.com/items", &registry);

        assert!(r.configuration_version().is_none());
        r.configuration();
        assert_eq!(r.configuration_version(), Some(0));

        registry.invalidate();
        r.configuration();
        assert_eq!(r.configuration_version(), Some(1));
    }

    #[test]
    fn test_wipe_clears_payload_and_config() {
        let registry = Arc::new(ConfigRegistry::new());
        let r = resource_for("https://api.example.com/items", &registry);
        r.set_payload(Payload::Text("cached body".into()));
        r.configuration();

        r.wipe();
        assert!(r.payload().is_none());
        assert!(r.configuration_version().is_none());
    }

    #[test]
    fn test_debug_shows_url() {
        let registry = Arc::new(ConfigRegistry::new());
        let r = resource_for("https://api.example.com/items", &registry);
        assert!(format!("{r:?}").contains("https://api.example.com/items"));
    }
}
