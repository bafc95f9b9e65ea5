//! # restio-service
//!
//! The owning object tying restio together. A [`Service`] holds a
//! [`ConfigRegistry`](restio_config::ConfigRegistry) of ordered
//! configuration rules and a weakly-owned identity cache of [`Resource`]
//! handles, guaranteeing at most one live handle per normalized URL while
//! any external owner retains it.
//!
//! ```
//! use restio_service::Service;
//! use std::sync::Arc;
//!
//! let service = Service::new("https://api.example.com").unwrap();
//! service.configure_pattern("/items/*", |config| {
//!     config.set_header("Accept", "application/json");
//! }).unwrap();
//!
//! let item = service.resource("/items/5");
//! assert_eq!(item.url(), "https://api.example.com/items/5");
//! assert_eq!(
//!     item.configuration().headers.get("Accept").unwrap(),
//!     "application/json"
//! );
//!
//! // Identity is stable while the handle is externally held.
//! assert!(Arc::ptr_eq(&item, &service.resource("/items/5")));
//! ```

pub mod resource;
pub mod service;

pub use resource::Resource;
pub use service::Service;
