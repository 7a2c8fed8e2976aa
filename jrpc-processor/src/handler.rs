//! Handler trait and constructors for JSON-RPC methods
//!
//! A handler is the uniform callable behind a method name: it accepts the
//! envelope's `params` (or `None` when absent) and resolves to a result value
//! or a typed failure. The processor maps failures onto the wire:
//!
//! - `Error::InvalidParams` → -32602 (Invalid params)
//! - any other `Error` → -32603 (Internal error)
//!
//! # Creating Handlers
//!
//! 1. **from_fn**: wrap an async closure over raw `serde_json::Value`
//! 2. **from_typed_fn**: wrap an async closure with serde conversion of params and result
//! 3. **#[handler]**: attribute macro from `jrpc-macros` generating a `from_typed_fn` factory
//!
//! # Examples
//!
//! ```rust
//! use jrpc_processor::{from_fn, from_typed_fn};
//! use serde::Deserialize;
//!
//! let version = from_fn(|_params| async move {
//!     Ok(serde_json::json!(env!("CARGO_PKG_VERSION")))
//! });
//!
//! #[derive(Deserialize)]
//! struct Range { start: u64, end: u64 }
//!
//! let len = from_typed_fn(|range: Range| async move {
//!     Ok(range.end.saturating_sub(range.start))
//! });
//! ```

use jrpc_core::{Error, Result};
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future returned by [`Handler::handle`]
///
/// Boxing gives every handler the same type so they can share one map.
pub type HandlerResult = Pin<Box<dyn Future<Output = Result<Value>> + Send>>;

/// A method implementation
///
/// # Concurrency
///
/// The processor holds handlers behind `Arc` and may invoke the same handler
/// from several tasks at once (concurrent callers, or a parallel batch).
/// Handlers must therefore be safe for concurrent invocation; shared state
/// needs its own synchronization. The processor imposes no timeout: a
/// handler that never resolves stalls the call that dispatched it.
pub trait Handler: Send + Sync {
    /// Handle one invocation
    ///
    /// `params` is `None` when the envelope had no `params` member.
    fn handle(&self, params: Option<Value>) -> HandlerResult;
}

/// [`Handler`] backed by an async closure over raw JSON
///
/// Usually built through [`from_fn`].
pub struct FnHandler<F> {
    func: F,
}

impl<F> FnHandler<F> {
    /// Wrap a closure
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(Option<Value>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    fn handle(&self, params: Option<Value>) -> HandlerResult {
        Box::pin((self.func)(params))
    }
}

/// Create a handler from an async closure over raw JSON values
///
/// # Examples
///
/// ```rust
/// use jrpc_processor::from_fn;
///
/// let echo = from_fn(|params| async move {
///     Ok(params.unwrap_or_default())
/// });
/// ```
pub fn from_fn<F, Fut>(func: F) -> Box<dyn Handler>
where
    F: Fn(Option<Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    Box::new(FnHandler::new(func))
}

/// Create a handler with serde conversion of params and result
///
/// Params are deserialized into `P`; absent params deserialize from JSON
/// `null`, which suits `()` and `Option<T>` parameter types. A positional
/// `params` array deserializes into a tuple or `Vec`, a single scalar into
/// the matching scalar type.
///
/// # Errors
///
/// - params that do not deserialize into `P` → `Error::InvalidParams`
/// - a result that does not serialize → `Error::Serialization`
/// - errors from `func` pass through unchanged
///
/// # Examples
///
/// ```rust
/// use jrpc_processor::from_typed_fn;
///
/// let please = from_typed_fn(|word: String| async move {
///     Ok(format!("{}, please", word))
/// });
/// ```
pub fn from_typed_fn<P, R, F, Fut>(func: F) -> Box<dyn Handler>
where
    P: serde::de::DeserializeOwned + Send + 'static,
    R: serde::Serialize + Send + 'static,
    F: Fn(P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R>> + Send + 'static,
{
    let func = Arc::new(func);

    from_fn(move |params: Option<Value>| {
        let func = Arc::clone(&func);
        async move {
            let params: P = serde_json::from_value(params.unwrap_or(Value::Null))
                .map_err(|e| Error::InvalidParams(e.to_string()))?;

            let result = func(params).await?;

            serde_json::to_value(result).map_err(|e| Error::Serialization(e.to_string()))
        }
    })
}
