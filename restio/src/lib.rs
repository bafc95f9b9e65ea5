//! # restio
//!
//! Rule-based resource configuration and identity caching for REST clients.
//!
//! This is the meta-crate that re-exports the restio sub-crates for
//! convenient access. You can depend on `restio` to get everything, or on
//! individual crates for finer-grained control.
//!
//! ## Overview
//!
//! A [`Service`](service::Service) owns ordered configuration rules and a
//! weakly-owned identity cache of [`Resource`](service::Resource) handles:
//!
//! ```
//! use restio::service::Service;
//!
//! let github = Service::new("https://api.github.com").unwrap();
//! github.configure(|config| {
//!     config.set_header("Accept", "application/vnd.github+json");
//! });
//! github.configure_pattern("/repos/**", |config| {
//!     config.expiration_time = std::time::Duration::from_secs(120);
//! }).unwrap();
//!
//! let repo = github.resource("/repos/rust-lang/rust");
//! let config = repo.configuration();
//! assert_eq!(config.expiration_time.as_secs(), 120);
//! ```

/// Core types: errors, logging setup, URL helpers.
pub use restio_core as core;

/// Configuration engine: wildcard patterns, rules, registry, resolver.
#[cfg(feature = "config")]
pub use restio_config as config;

/// Weakly-owned, key-addressed identity cache.
#[cfg(feature = "cache")]
pub use restio_cache as cache;

/// The service owner object and resource handles.
#[cfg(feature = "service")]
pub use restio_service as service;
