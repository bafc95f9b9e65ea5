//! # restio-config
//!
//! The configuration resolution engine for restio. A caller registers
//! ordered, predicate-matched configuration rules against a
//! [`ConfigRegistry`]; resolving a URL applies every matching rule, in
//! registration order, to a fresh [`ResourceConfig`] builder. Results are
//! memoized per resource and stamped with the registry's version counter,
//! so a rule registration or an explicit [`ConfigRegistry::invalidate`]
//! lazily forces recomputation on the next resolution.
//!
//! ## Modules
//!
//! - [`pattern`] - Wildcard URL patterns compiled to regex matchers
//! - [`config`] - The configuration value aggregate and its collaborator types
//! - [`rule`] - Rules: description + URL predicate + configurer
//! - [`registry`] - The ordered, versioned rule registry
//! - [`resolver`] - Version-stamped memoized resolution

pub mod config;
pub mod pattern;
pub mod registry;
pub mod resolver;
pub mod rule;

pub use config::{
    Payload, PipelineStage, PlannedRequest, RequestDecorator, ResourceConfig, ResponseTransformer,
    TransformPipeline,
};
pub use pattern::UrlPattern;
pub use registry::ConfigRegistry;
pub use resolver::{resolve, CachedConfig};
pub use rule::{match_all, match_pattern, match_url, ConfigPredicate, ConfigRule, Configurer};
