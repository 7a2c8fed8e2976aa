//! Core JSON-RPC 2.0 types and codec for jrpc
//!
//! This crate holds everything about the protocol that does not involve
//! dispatching:
//!
//! - **Types**: request, notification and response envelopes and the `Id` they share
//! - **Codec**: text parsing/serialization and request envelope validation
//! - **Error handling**: the application `Error` and the wire-level error object
//! - **Observability**: tracing subscriber and OpenTelemetry provider setup
//!
//! The `jrpc-processor` crate builds the request processor on top of it.
//!
//! # Example
//!
//! ```rust
//! use jrpc_core::{codec, Id, JsonRpcResponse};
//! use serde_json::json;
//!
//! let call = codec::decode_call(json!({"method": "add", "params": [5, 3], "id": 1})).unwrap();
//! assert_eq!(call.method(), "add");
//!
//! let response = JsonRpcResponse::success(json!(8), Id::from(1i64));
//! assert_eq!(
//!     codec::encode_response(&response).unwrap(),
//!     r#"{"id":1,"jsonrpc":"2.0","result":8}"#
//! );
//! ```

pub mod codec;
pub mod error;
pub mod observability;
pub mod types;

pub use error::{Error, ErrorCode, JsonRpcErrorData, Result};
pub use observability::{init_observability, shutdown_observability, ObservabilityConfig};
pub use types::{
    Id, JsonRpcCall, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION,
};
