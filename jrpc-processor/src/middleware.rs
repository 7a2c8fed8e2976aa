//! Middleware around handler invocation
//!
//! Middleware sees every dispatched call after envelope validation and method
//! lookup, and before the handler runs. Each middleware can:
//! - inspect or rewrite the method's params
//! - short-circuit with its own result value
//! - fail the call (mapped to an error envelope like a handler failure)
//! - leave metadata for the middleware after it
//!
//! `pre_handle` runs in registration order, the handler next, then
//! `post_handle` in reverse order. A short-circuit skips the handler and
//! every `post_handle`.
//!
//! # Built-in Middleware
//!
//! - **TracingMiddleware**: logs the start and outcome of each call
//! - **CountingMiddleware**: counts calls that reached the chain
//!
//! # Examples
//!
//! ```rust
//! use jrpc_processor::{MiddlewareChain, TracingMiddleware};
//!
//! let mut chain = MiddlewareChain::new();
//! chain.add_sync(TracingMiddleware::new());
//! assert_eq!(chain.len(), 1);
//! ```

use async_trait::async_trait;
use jrpc_core::{Id, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Action to take after `pre_handle`
#[derive(Debug, Clone)]
pub enum MiddlewareAction {
    /// Continue to the next middleware or the handler
    Continue,
    /// Skip the handler and use this value as the call's result
    ShortCircuit(Value),
}

/// Per-call information handed to middleware
#[derive(Debug, Clone)]
pub struct MiddlewareContext {
    /// Method name as it appeared in the envelope
    pub method: String,
    /// Params passed to the handler; middleware may replace them
    pub params: Option<Value>,
    /// Envelope id, `None` for notifications
    pub request_id: Option<Id>,
    /// Metadata for passing data between middleware
    pub metadata: HashMap<String, Value>,
}

impl MiddlewareContext {
    /// Create a context for a notification
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            method: method.into(),
            params,
            request_id: None,
            metadata: HashMap::new(),
        }
    }

    /// Create a context for a request with an id
    pub fn with_request_id(method: impl Into<String>, params: Option<Value>, request_id: Id) -> Self {
        Self {
            request_id: Some(request_id),
            ..Self::new(method, params)
        }
    }

    /// Insert metadata that can be read by subsequent middleware
    pub fn insert_metadata(&mut self, key: impl Into<String>, value: Value) {
        self.metadata.insert(key.into(), value);
    }

    /// Get metadata by key
    pub fn get_metadata(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// True if the call expects a response
    pub fn is_request(&self) -> bool {
        self.request_id.is_some()
    }
}

/// Async middleware
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Called before the handler
    async fn pre_handle(&self, ctx: &mut MiddlewareContext) -> Result<MiddlewareAction>;

    /// Called after the handler with its outcome
    async fn post_handle(&self, ctx: &mut MiddlewareContext, result: &Result<Value>) -> Result<()>;
}

/// Middleware without async work
pub trait SyncMiddleware: Send + Sync {
    /// Called before the handler
    fn pre_handle(&self, ctx: &mut MiddlewareContext) -> Result<MiddlewareAction>;

    /// Called after the handler with its outcome
    fn post_handle(&self, ctx: &mut MiddlewareContext, result: &Result<Value>) -> Result<()>;
}

struct SyncMiddlewareAdapter<T: SyncMiddleware> {
    inner: T,
}

#[async_trait]
impl<T: SyncMiddleware + 'static> Middleware for SyncMiddlewareAdapter<T> {
    async fn pre_handle(&self, ctx: &mut MiddlewareContext) -> Result<MiddlewareAction> {
        self.inner.pre_handle(ctx)
    }

    async fn post_handle(&self, ctx: &mut MiddlewareContext, result: &Result<Value>) -> Result<()> {
        self.inner.post_handle(ctx, result)
    }
}

/// Ordered middleware list
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an async middleware
    pub fn add(&mut self, middleware: Arc<dyn Middleware>) {
        self.middlewares.push(middleware);
    }

    /// Append a sync middleware
    pub fn add_sync<T: SyncMiddleware + 'static>(&mut self, middleware: T) {
        self.middlewares
            .push(Arc::new(SyncMiddlewareAdapter { inner: middleware }));
    }

    /// Run the chain around `handler`
    ///
    /// The handler receives the context as left by the last `pre_handle`.
    /// A `pre_handle` error aborts the call with that error; `post_handle`
    /// errors are logged and otherwise ignored so every middleware runs.
    pub async fn execute<F, Fut>(&self, mut ctx: MiddlewareContext, handler: F) -> Result<Value>
    where
        F: FnOnce(MiddlewareContext) -> Fut + Send,
        Fut: std::future::Future<Output = Result<Value>> + Send,
    {
        for middleware in &self.middlewares {
            match middleware.pre_handle(&mut ctx).await? {
                MiddlewareAction::Continue => continue,
                MiddlewareAction::ShortCircuit(value) => {
                    tracing::debug!(method = %ctx.method, "Call short-circuited by middleware");
                    return Ok(value);
                }
            }
        }

        let result = handler(ctx.clone()).await;

        for middleware in self.middlewares.iter().rev() {
            if let Err(e) = middleware.post_handle(&mut ctx, &result).await {
                tracing::warn!(method = %ctx.method, error = %e, "Middleware post_handle failed");
            }
        }

        result
    }

    /// Number of middleware in the chain
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    /// True if the chain is empty
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }
}

/// Logs the start and the outcome of every call
#[derive(Debug, Default)]
pub struct TracingMiddleware;

impl TracingMiddleware {
    /// Create a new tracing middleware
    pub fn new() -> Self {
        Self
    }
}

impl SyncMiddleware for TracingMiddleware {
    fn pre_handle(&self, ctx: &mut MiddlewareContext) -> Result<MiddlewareAction> {
        tracing::debug!(
            method = %ctx.method,
            request_id = ?ctx.request_id,
            "Call started"
        );
        Ok(MiddlewareAction::Continue)
    }

    fn post_handle(&self, ctx: &mut MiddlewareContext, result: &Result<Value>) -> Result<()> {
        match result {
            Ok(_) => tracing::info!(
                method = %ctx.method,
                request_id = ?ctx.request_id,
                "Call completed"
            ),
            Err(e) => tracing::warn!(
                method = %ctx.method,
                request_id = ?ctx.request_id,
                error = %e,
                "Call failed"
            ),
        }
        Ok(())
    }
}

/// Counts calls that entered the chain
///
/// Clones share the same counter, so keep one clone to read it after handing
/// the other to the processor.
#[derive(Debug, Clone, Default)]
pub struct CountingMiddleware {
    request_count: Arc<AtomicU64>,
}

impl CountingMiddleware {
    /// Create a counter starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls counted so far
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Middleware for CountingMiddleware {
    async fn pre_handle(&self, _ctx: &mut MiddlewareContext) -> Result<MiddlewareAction> {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        Ok(MiddlewareAction::Continue)
    }

    async fn post_handle(&self, _ctx: &mut MiddlewareContext, _result: &Result<Value>) -> Result<()> {
        Ok(())
    }
}
