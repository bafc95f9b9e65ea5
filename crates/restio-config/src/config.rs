//! The configuration value aggregate and its collaborator types.
//!
//! [`ResourceConfig`] is what resolution produces: cache timings, headers,
//! an ordered request-decorator chain, and an ordered response-transform
//! pipeline. This crate only builds and stores these values; the transport
//! layer consumes the headers, timings, and decorators when it executes a
//! request, and an external pipeline executor runs the transform stages.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use restio_core::{RestioError, RestioResult};

/// A function applied to an outgoing request sketch before transport
/// executes it. Decorators run in the order they were added by configurers.
pub type RequestDecorator = Arc<dyn Fn(&mut PlannedRequest) + Send + Sync>;

/// A single response-transformation step: maps a payload to a payload or
/// fails. Stored in stage order; an external executor invokes these.
pub type ResponseTransformer = Arc<dyn Fn(Payload) -> RestioResult<Payload> + Send + Sync>;

/// A plain-data sketch of an outgoing request.
///
/// The transport layer builds its real request from this after the
/// decorator chain has run. Keeping it plain data (and serializable) is
/// what lets the configuration core stay free of any transport dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedRequest {
    /// The HTTP method, uppercase (`GET`, `POST`, ...).
    pub method: String,
    /// The absolute request URL.
    pub url: String,
    /// Request headers. Insertion order is irrelevant.
    pub headers: HashMap<String, String>,
}

impl PlannedRequest {
    /// Creates a request sketch with no headers.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: HashMap::new(),
        }
    }

    /// Applies a configuration to this sketch: the configured headers are
    /// merged in (request-local headers win), then the decorator chain runs
    /// in order. Pure data plumbing; nothing is sent.
    #[must_use]
    pub fn decorated(mut self, config: &ResourceConfig) -> Self {
        for (name, value) in &config.headers {
            self.headers
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
        for decorator in &config.request_decorators {
            decorator(&mut self);
        }
        self
    }
}

/// A response body at some stage of the transform pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Raw bytes as received from transport.
    Bytes(Vec<u8>),
    /// Decoded text.
    Text(String),
    /// Parsed JSON.
    Json(serde_json::Value),
}

impl Payload {
    /// Returns the text content, if this payload is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the JSON value, if this payload is already parsed JSON.
    pub const fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Converts the payload into JSON, parsing text or bytes as needed.
    ///
    /// # Errors
    ///
    /// Returns [`RestioError::Transform`] if the content is not valid JSON.
    pub fn into_json(self) -> RestioResult<serde_json::Value> {
        match self {
            Self::Json(v) => Ok(v),
            Self::Text(s) => {
                serde_json::from_str(&s).map_err(|e| RestioError::Transform(e.to_string()))
            }
            Self::Bytes(b) => {
                serde_json::from_slice(&b).map_err(|e| RestioError::Transform(e.to_string()))
            }
        }
    }
}

/// One named stage of the response-transform pipeline.
///
/// A stage holds an ordered list of transformers. The pipeline executor
/// (outside this crate) runs each stage's transformers in order.
#[derive(Clone, Default)]
pub struct PipelineStage {
    key: String,
    transformers: Vec<ResponseTransformer>,
}

impl fmt::Debug for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineStage")
            .field("key", &self.key)
            .field("transformers", &self.transformers.len())
            .finish_non_exhaustive()
    }
}

impl PipelineStage {
    /// Creates an empty stage with the given key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            transformers: Vec::new(),
        }
    }

    /// Returns the stage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Appends a transformer to this stage.
    pub fn add(&mut self, transformer: ResponseTransformer) {
        self.transformers.push(transformer);
    }

    /// Returns the transformers in execution order.
    pub fn transformers(&self) -> &[ResponseTransformer] {
        &self.transformers
    }

    /// Returns the number of transformers in this stage.
    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    /// Returns `true` if this stage has no transformers.
    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }
}

/// The ordered list of transform stages for a resource.
///
/// Stage order is insertion order; configurers typically append to existing
/// stages via [`ResourceConfig::append_transformer`].
#[derive(Clone, Default)]
pub struct TransformPipeline {
    stages: Vec<PipelineStage>,
}

impl fmt::Debug for TransformPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.stages.iter().map(PipelineStage::key).collect();
        f.debug_struct("TransformPipeline")
            .field("stages", &keys)
            .finish()
    }
}

impl TransformPipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stages in execution order.
    pub fn stages(&self) -> &[PipelineStage] {
        &self.stages
    }

    /// Returns the stage with the given key, if present.
    pub fn stage(&self, key: &str) -> Option<&PipelineStage> {
        self.stages.iter().find(|s| s.key == key)
    }

    /// Returns a mutable reference to the stage with the given key.
    pub fn stage_mut(&mut self, key: &str) -> Option<&mut PipelineStage> {
        self.stages.iter_mut().find(|s| s.key == key)
    }

    /// Returns the stage with the given key, appending an empty one if absent.
    pub fn ensure_stage(&mut self, key: &str) -> &mut PipelineStage {
        if let Some(idx) = self.stages.iter().position(|s| s.key == key) {
            &mut self.stages[idx]
        } else {
            self.stages.push(PipelineStage::new(key));
            self.stages.last_mut().expect("just pushed")
        }
    }

    /// Returns the number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns `true` if the pipeline has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

/// The effective configuration for one resource.
///
/// This is the value configurers mutate and resolution returns. The default
/// is what a resource gets when no rule matches it.
///
/// # Examples
///
/// ```
/// use restio_config::ResourceConfig;
/// use std::time::Duration;
///
/// let mut config = ResourceConfig::default();
/// assert_eq!(config.expiration_time, Duration::from_secs(30));
/// config.set_header("Accept", "application/json");
/// ```
#[derive(Clone)]
pub struct ResourceConfig {
    /// How long a fetched value stays fresh before transport refetches.
    pub expiration_time: Duration,
    /// Minimum delay before transport retries a failed request.
    pub retry_time: Duration,
    /// Headers attached to every request for the resource.
    pub headers: HashMap<String, String>,
    /// Ordered request decorators, run by transport before sending.
    pub request_decorators: Vec<RequestDecorator>,
    /// Ordered transform stages, run by the pipeline executor.
    pub transform_pipeline: TransformPipeline,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            expiration_time: Duration::from_secs(30),
            retry_time: Duration::from_secs(1),
            headers: HashMap::new(),
            request_decorators: Vec::new(),
            transform_pipeline: TransformPipeline::new(),
        }
    }
}

impl fmt::Debug for ResourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceConfig")
            .field("expiration_time", &self.expiration_time)
            .field("retry_time", &self.retry_time)
            .field("headers", &self.headers)
            .field("request_decorators", &self.request_decorators.len())
            .field("transform_pipeline", &self.transform_pipeline)
            .finish()
    }
}

impl ResourceConfig {
    /// Sets a header, replacing any previous value for the same name.
    ///
    /// Later matching rules observe and may overwrite headers set by
    /// earlier ones, so among matching rules the last writer wins.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Removes a header set by an earlier rule. Returns the removed value.
    pub fn remove_header(&mut self, name: &str) -> Option<String> {
        self.headers.remove(name)
    }

    /// Appends a request decorator to the chain.
    pub fn decorate_requests(
        &mut self,
        decorator: impl Fn(&mut PlannedRequest) + Send + Sync + 'static,
    ) {
        self.request_decorators.push(Arc::new(decorator));
    }

    /// Appends a transformer to the named pipeline stage, creating the
    /// stage at the end of the pipeline if it does not exist yet.
    pub fn append_transformer(
        &mut self,
        stage_key: &str,
        transformer: impl Fn(Payload) -> RestioResult<Payload> + Send + Sync + 'static,
    ) {
        self.transform_pipeline
            .ensure_stage(stage_key)
            .add(Arc::new(transformer));
    }
}
