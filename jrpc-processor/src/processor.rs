//! The JSON-RPC request processor
//!
//! [`Processor`] turns incoming messages into outgoing ones. It is stateless
//! per call: everything it needs lives in its registries and configuration,
//! so one instance (or cheap clones of it) can serve any number of concurrent
//! callers.
//!
//! # Processing Rules
//!
//! For a single envelope:
//!
//! 1. not an object, or `method` missing / not a string, or `id` not a
//!    string, number or null → `-32600 Invalid Request`, no `id`
//! 2. no handler for `method` → `-32601 Method not found: <method>`, `id` echoed
//! 3. handler fails with `Error::InvalidParams` → `-32602`, anything else
//!    (including a panic) → `-32603`, `id` echoed
//! 4. success with an `id` → result envelope; success without one → no output
//!
//! A top-level array is a batch when batch expansion is on: each element is
//! processed by the rules above and the outputs are collected in input order.
//!
//! # Method Scopes
//!
//! Secondary registries can be mounted under a scope with
//! [`Processor::set_scope`]. A method `a/b/name` whose directory part `a/b`
//! is a mounted scope is looked up as `name` in that scope's registry;
//! anything else is looked up verbatim in the default registry.
//!
//! # Examples
//!
//! ```rust
//! use jrpc_processor::{from_typed_fn, MethodRegistry, Processor};
//!
//! # async fn example() {
//! let mut registry = MethodRegistry::new();
//! registry.register("something", from_typed_fn(|word: String| async move {
//!     Ok(format!("{}, please", word))
//! }));
//!
//! let processor = Processor::new(registry);
//! let output = processor
//!     .process_string(r#"{"method":"something","id":"ID","params":"yes"}"#)
//!     .await;
//! assert_eq!(output, r#"{"id":"ID","jsonrpc":"2.0","result":"yes, please"}"#);
//! # }
//! ```

use crate::batch::{BatchMode, BatchProcessor};
use crate::builder::ProcessorBuilder;
use crate::handler::Handler;
use crate::metrics::ProcessorMetrics;
use crate::middleware::{MiddlewareChain, MiddlewareContext};
use crate::registry::MethodRegistry;
use futures::FutureExt;
use jrpc_core::{codec, Error, Id, JsonRpcErrorData, JsonRpcResponse, Result};
use serde_json::{json, Value};
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

/// Method names with this prefix are protocol-reserved
const RESERVED_PREFIX: &str = "$/";

/// Emitted when an outgoing message cannot be serialized
const INTERNAL_ERROR_FALLBACK: &str =
    r#"{"jsonrpc":"2.0","error":{"code":-32603,"message":"Internal error"}}"#;

/// Outcome of processing one input
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// One response or error envelope
    Single(JsonRpcResponse),
    /// Batch output in input order; may be empty
    Batch(Vec<JsonRpcResponse>),
    /// Nothing to send (a successful notification)
    None,
}

impl Reply {
    /// True if there is nothing to send
    pub fn is_none(&self) -> bool {
        matches!(self, Reply::None)
    }

    /// The reply as a JSON value, `None` if there is nothing to send
    ///
    /// Uses the same serialization as [`Reply::to_json_string`], so both
    /// renderings of a reply always agree.
    pub fn into_value(self) -> Option<Value> {
        let encoded = match &self {
            Reply::Single(response) => codec::to_value(response),
            Reply::Batch(responses) => codec::to_value(responses),
            Reply::None => return None,
        };

        Some(encoded.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to serialize reply");
            internal_error_fallback()
        }))
    }

    /// The reply as JSON text, empty if there is nothing to send
    pub fn to_json_string(&self) -> Result<String> {
        match self {
            Reply::Single(response) => codec::encode_response(response),
            Reply::Batch(responses) => codec::encode_batch_responses(responses),
            Reply::None => Ok(String::new()),
        }
    }
}

/// Check that a scope name can be the directory part of a method name
pub(crate) fn validate_scope(scope: &str) -> Result<()> {
    if scope.is_empty() || scope.starts_with('/') || scope.ends_with('/') {
        return Err(Error::Internal(format!("Invalid method scope: {:?}", scope)));
    }
    Ok(())
}

fn internal_error_fallback() -> Value {
    json!({"jsonrpc": "2.0", "error": {"code": -32603, "message": "Internal error"}})
}

/// JSON-RPC 2.0 message processor
///
/// Cloning is cheap and clones share handlers. See the module docs for the
/// processing rules.
#[derive(Clone)]
pub struct Processor {
    registry: MethodRegistry,
    scopes: HashMap<String, MethodRegistry>,
    middleware: MiddlewareChain,
    batch: BatchProcessor,
    metrics: Option<Arc<ProcessorMetrics>>,
}

impl Processor {
    /// Create a processor over a registry with default settings
    pub fn new(registry: MethodRegistry) -> Self {
        Self {
            registry,
            scopes: HashMap::new(),
            middleware: MiddlewareChain::new(),
            batch: BatchProcessor::default(),
            metrics: None,
        }
    }

    /// Start configuring a processor
    pub fn builder() -> ProcessorBuilder {
        ProcessorBuilder::new()
    }

    pub(crate) fn from_parts(
        registry: MethodRegistry,
        scopes: HashMap<String, MethodRegistry>,
        middleware: MiddlewareChain,
        batch: BatchProcessor,
        metrics: Option<Arc<ProcessorMetrics>>,
    ) -> Self {
        Self {
            registry,
            scopes,
            middleware,
            batch,
            metrics,
        }
    }

    /// Mount a registry under a scope, replacing any previous one
    ///
    /// Methods named `<scope>/<name>` are then resolved as `<name>` in
    /// `registry`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Internal` if the scope name is empty or starts or ends
    /// with `/`; such a scope could never match a method name.
    pub fn set_scope(&mut self, scope: impl Into<String>, registry: MethodRegistry) -> Result<()> {
        let scope = scope.into();
        validate_scope(&scope)?;
        tracing::debug!(scope = %scope, methods = registry.len(), "Mounting method scope");
        self.scopes.insert(scope, registry);
        Ok(())
    }

    /// The default registry
    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    /// Mounted scope names, sorted
    pub fn scopes(&self) -> Vec<String> {
        let mut scopes: Vec<String> = self.scopes.keys().cloned().collect();
        scopes.sort();
        scopes
    }

    /// Batch evaluation mode
    pub fn batch_mode(&self) -> BatchMode {
        self.batch.mode()
    }

    /// True if `method` resolves to a handler
    pub fn has_method(&self, method: &str) -> bool {
        self.resolve(method).is_some()
    }

    /// Process JSON text and return JSON text
    ///
    /// Empty text yields empty text. Unparsable text yields a serialized
    /// parse error. Otherwise the parsed value is processed with batch
    /// expansion on, and a reply with nothing to send yields empty text.
    #[tracing::instrument(skip(self, text), fields(len = text.len()))]
    pub async fn process_string(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let reply = match codec::parse(text) {
            Ok(value) => self.process_action(value, true).await,
            Err(_) => Reply::Single(self.error_response(JsonRpcErrorData::parse_error(), None)),
        };

        reply.to_json_string().unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to serialize reply");
            INTERNAL_ERROR_FALLBACK.to_string()
        })
    }

    /// Process one structured input
    ///
    /// With `expand_array` set, a top-level array is processed as a batch:
    /// an empty array is a single invalid-request error, an oversized one is
    /// rejected as a whole, and otherwise the reply is a (possibly empty)
    /// `Reply::Batch`. Without it an array is an invalid request like any
    /// other non-object. Never fails: every problem becomes an error envelope.
    pub async fn process_action(&self, input: Value, expand_array: bool) -> Reply {
        match input {
            Value::Array(elements) if expand_array => self.process_batch(elements).await,
            other => match self.process_envelope(other).await {
                Some(response) => Reply::Single(response),
                None => Reply::None,
            },
        }
    }

    async fn process_batch(&self, elements: Vec<Value>) -> Reply {
        if elements.is_empty() {
            tracing::debug!("Rejecting empty batch");
            return Reply::Single(self.error_response(JsonRpcErrorData::invalid_request(), None));
        }

        if let Err(e) = self.batch.check_size(elements.len()) {
            let error = match e {
                Error::BatchSizeExceeded { limit, actual } => {
                    JsonRpcErrorData::batch_size_exceeded(limit, actual)
                }
                _ => JsonRpcErrorData::invalid_request(),
            };
            return Reply::Single(self.error_response(error, None));
        }

        if let Some(metrics) = &self.metrics {
            metrics.record_batch(elements.len() as u64, self.batch.mode().as_str());
        }

        let responses = self
            .batch
            .process(elements, |element| self.process_envelope(element))
            .await;
        Reply::Batch(responses)
    }

    /// Process one envelope; nested arrays are invalid requests
    async fn process_envelope(&self, value: Value) -> Option<JsonRpcResponse> {
        let call = match codec::decode_call(value) {
            Ok(call) => call,
            Err(e) => {
                tracing::debug!(error = %e, "Rejecting invalid envelope");
                return Some(self.error_response(JsonRpcErrorData::invalid_request(), None));
            }
        };

        let (method, params, id) = call.into_parts();
        self.dispatch(method, params, id).await
    }

    #[tracing::instrument(skip(self, params))]
    async fn dispatch(&self, method: String, params: Option<Value>, id: Option<Id>) -> Option<JsonRpcResponse> {
        let Some(handler) = self.resolve(&method) else {
            if id.is_none() && method.starts_with(RESERVED_PREFIX) {
                tracing::trace!("Ignoring reserved notification");
                return None;
            }
            tracing::debug!("Method not found");
            return Some(self.error_response(JsonRpcErrorData::method_not_found(&method), id));
        };

        let ctx = match &id {
            Some(id) => MiddlewareContext::with_request_id(method.as_str(), params, id.clone()),
            None => MiddlewareContext::new(method.as_str(), params),
        };

        let start = Instant::now();
        let outcome = AssertUnwindSafe(
            self.middleware
                .execute(ctx, move |ctx| handler.handle(ctx.params)),
        )
        .catch_unwind()
        .await;

        let result = outcome.unwrap_or_else(|panic| {
            let message = panic_message(&*panic);
            tracing::error!(panic = %message, "Handler panicked");
            Err(Error::Internal(message))
        });

        if let Some(metrics) = &self.metrics {
            let status = if result.is_ok() { "success" } else { "error" };
            metrics.record_request(&method, status, start.elapsed().as_secs_f64());
        }

        match (result, id) {
            (Ok(_), None) => None,
            (Ok(value), Some(id)) => Some(JsonRpcResponse::success(value, id)),
            (Err(e), id) => {
                tracing::debug!(error = %e, "Handler failed");
                Some(self.error_response(handler_error(e), id))
            }
        }
    }

    fn resolve(&self, method: &str) -> Option<Arc<dyn Handler>> {
        if let Some((scope, name)) = method.rsplit_once('/') {
            if let Some(registry) = self.scopes.get(scope) {
                return registry.get(name);
            }
        }
        self.registry.get(method)
    }

    fn error_response(&self, error: JsonRpcErrorData, id: Option<Id>) -> JsonRpcResponse {
        if let Some(metrics) = &self.metrics {
            metrics.record_error(error.code);
        }
        JsonRpcResponse::error(error, id)
    }
}

impl std::fmt::Debug for Processor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Processor")
            .field("registry", &self.registry)
            .field("scopes", &self.scopes())
            .field("middleware", &self.middleware.len())
            .field("batch", &self.batch)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

/// Map a handler failure onto the wire
fn handler_error(error: Error) -> JsonRpcErrorData {
    match error {
        Error::InvalidParams(msg) => JsonRpcErrorData::invalid_params(msg),
        Error::Internal(msg) => JsonRpcErrorData::internal_error(msg),
        other => JsonRpcErrorData::internal_error(other.to_string()),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        format!("handler panicked: {}", msg)
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        format!("handler panicked: {}", msg)
    } else {
        "handler panicked".to_string()
    }
}
