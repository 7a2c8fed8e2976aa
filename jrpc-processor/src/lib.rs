//! JSON-RPC 2.0 request processor
//!
//! This crate maps incoming JSON-RPC messages to registered handlers and
//! produces the matching outgoing messages. It is transport-agnostic: feed it
//! text with [`Processor::process_string`] or parsed values with
//! [`Processor::process_action`], and send whatever comes back.
//!
//! # Core Features
//!
//! - **Method Registry**: explicit name → handler map, plus scoped registries
//! - **Envelope Validation**: malformed input becomes a JSON-RPC error envelope
//! - **Batch Processing**: sequential or concurrent, order-preserving, size-limited
//! - **Notifications**: successful notifications produce no output
//! - **Middleware**: interceptors around every handler call
//! - **Observability**: `tracing` spans/events and OpenTelemetry metrics
//!
//! # Quick Start
//!
//! ```rust
//! use jrpc_processor::{from_typed_fn, Processor};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct AddParams { a: i32, b: i32 }
//!
//! # async fn example() -> jrpc_core::Result<()> {
//! let processor = Processor::builder()
//!     .handler("add", from_typed_fn(|p: AddParams| async move {
//!         Ok(p.a + p.b)
//!     }))
//!     .build()?;
//!
//! let output = processor
//!     .process_string(r#"{"jsonrpc":"2.0","method":"add","params":{"a":5,"b":3},"id":1}"#)
//!     .await;
//! assert_eq!(output, r#"{"id":1,"jsonrpc":"2.0","result":8}"#);
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! `Processor` is `Send + Sync` and cheap to clone. It keeps no per-call
//! state, so concurrent calls are independent as long as the handlers
//! themselves tolerate concurrent invocation. No timeout is applied; wrap
//! calls in `tokio::time::timeout` or similar when one is needed.

mod batch;
mod builder;
mod handler;
mod metrics;
mod middleware;
mod processor;
mod registry;

pub use batch::{BatchMode, BatchProcessor};
pub use builder::ProcessorBuilder;
pub use handler::{from_fn, from_typed_fn, FnHandler, Handler, HandlerResult};
pub use metrics::ProcessorMetrics;
pub use middleware::{
    CountingMiddleware, Middleware, MiddlewareAction, MiddlewareChain, MiddlewareContext,
    SyncMiddleware, TracingMiddleware,
};
pub use processor::{Processor, Reply};
pub use registry::{MethodRegistry, RegistryBuilder};
