//! # restio-core
//!
//! Core types, error definitions, logging setup, and URL helpers for the
//! restio resource-configuration library. This crate has no dependency on
//! the other restio crates and provides the foundation for all of them.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`logging`] - Tracing-based logging integration
//! - [`urlutil`] - URL normalization and base-relative joining

pub mod error;
pub mod logging;
pub mod urlutil;

// Re-export the most commonly used types at the crate root.
pub use error::{RestioError, RestioResult};
pub use urlutil::{join_to_base, normalize_url};
