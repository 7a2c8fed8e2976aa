//! JSON-RPC 2.0 envelope types
//!
//! This module holds the data structures that travel on the wire
//! (https://www.jsonrpc.org/specification):
//!
//! 1. **Request**: a call that expects a response, correlated by `id`
//! 2. **Notification**: a call without `id`; a successful result is not reported
//! 3. **Response**: either a `result` or an `error`, never both
//!
//! [`JsonRpcCall`] is the validated form of an incoming envelope and is what
//! the processor dispatches on.
//!
//! # Request IDs
//!
//! An `id` is echoed back verbatim, JSON type included. Numeric ids are kept
//! as [`serde_json::Number`] so that integers, large unsigned values and
//! floats all survive the round trip unchanged.

use crate::error::JsonRpcErrorData;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use std::fmt;

/// The protocol version literal carried by every envelope
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 request ID
///
/// Serialized untagged, so `Id::Number(1)` is the JSON number `1` and
/// `Id::String("1".into())` is the JSON string `"1"`. The two never compare
/// equal.
///
/// # Examples
///
/// ```rust
/// use jrpc_core::Id;
///
/// let id1: Id = "req-123".into();
/// let id2: Id = 42i64.into();
///
/// assert_eq!(id1.to_string(), "\"req-123\"");
/// assert_eq!(id2.to_string(), "42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    /// String identifier
    String(String),
    /// Numeric identifier, integer or float
    Number(Number),
    /// Explicit `null`; permitted by JSON-RPC 2.0 but discouraged
    Null,
}

impl Id {
    /// Recover an id from a raw JSON value
    ///
    /// Returns `None` for booleans, arrays and objects, which are not valid
    /// request identifiers.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Id::String(s.clone())),
            Value::Number(n) => Some(Id::Number(n.clone())),
            Value::Null => Some(Id::Null),
            _ => None,
        }
    }
}

impl fmt::Display for Id {
    /// JSON-like rendering: strings quoted, numbers as-is, `null`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::String(s) => write!(f, "\"{}\"", s),
            Id::Number(n) => write!(f, "{}", n),
            Id::Null => write!(f, "null"),
        }
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id::String(s)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::String(s.to_string())
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id::Number(n.into())
    }
}

impl From<u64> for Id {
    fn from(n: u64) -> Self {
        Id::Number(n.into())
    }
}

/// Deserialize a field that distinguishes "absent" from "present but null"
///
/// Used together with `#[serde(default)]`: a missing field stays `None`,
/// while an explicit `null` becomes `Some(..)` of the null representation.
fn deserialize_present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// JSON-RPC 2.0 request message
///
/// # Examples
///
/// ```rust
/// use jrpc_core::{JsonRpcRequest, Id};
/// use serde_json::json;
///
/// let req = JsonRpcRequest::new(
///     "subtract",
///     Some(json!({"minuend": 42, "subtrahend": 23})),
///     Id::from(1i64),
/// );
/// assert_eq!(req.jsonrpc, "2.0");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Always "2.0"
    pub jsonrpc: String,
    /// Name of the method to invoke
    pub method: String,
    /// Optional parameters, omitted from the wire when `None`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    /// Identifier echoed by the response
    pub id: Id,
}

impl JsonRpcRequest {
    /// Create a new request; `jsonrpc` is set to "2.0"
    pub fn new(method: impl Into<String>, params: Option<Value>, id: Id) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id,
        }
    }
}

/// JSON-RPC 2.0 notification message
///
/// A notification carries no `id`. It is still dispatched, but a successful
/// result is discarded instead of being reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcNotification {
    /// Always "2.0"
    pub jsonrpc: String,
    /// Name of the method to invoke
    pub method: String,
    /// Optional parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcNotification {
    /// Create a new notification; `jsonrpc` is set to "2.0"
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC 2.0 response message
///
/// Exactly one of `result` / `error` is present, enforced by the
/// constructors. `id` is `None` only for errors raised before the request's
/// identity could be trusted (parse errors, malformed envelopes); in that
/// case the member is left out of the serialized form.
///
/// Members serialize in the order `id`, `jsonrpc`, `result`/`error`.
///
/// # Examples
///
/// ```rust
/// use jrpc_core::{JsonRpcResponse, JsonRpcErrorData, Id};
/// use serde_json::json;
///
/// let success = JsonRpcResponse::success(json!({"value": 42}), Id::from(1i64));
/// assert!(success.is_success());
///
/// let error = JsonRpcResponse::error(JsonRpcErrorData::invalid_request(), None);
/// assert!(error.is_error());
/// assert_eq!(
///     serde_json::to_string(&error).unwrap(),
///     r#"{"jsonrpc":"2.0","error":{"code":-32600,"message":"Invalid Request"}}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Echoed request id; absent when the request could not be identified
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Id>,
    /// Always "2.0"
    pub jsonrpc: String,
    /// Method result, present only on success (may be JSON `null`)
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub result: Option<Value>,
    /// Error object, present only on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcErrorData>,
}

impl JsonRpcResponse {
    /// Create a successful response echoing `id`
    pub fn success(result: Value, id: Id) -> Self {
        Self {
            id: Some(id),
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response; pass `None` when the request id is unknown
    pub fn error(error: JsonRpcErrorData, id: Option<Id>) -> Self {
        Self {
            id,
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
        }
    }

    /// True if `result` is present
    pub fn is_success(&self) -> bool {
        self.result.is_some()
    }

    /// True if `error` is present
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// A validated incoming envelope
///
/// Produced by [`crate::codec::decode_call`]; the presence of an `id`
/// decides the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonRpcCall {
    /// Envelope carrying an `id`
    Request(JsonRpcRequest),
    /// Envelope without `id`
    Notification(JsonRpcNotification),
}

impl JsonRpcCall {
    /// Method name of the call
    pub fn method(&self) -> &str {
        match self {
            JsonRpcCall::Request(req) => &req.method,
            JsonRpcCall::Notification(notif) => &notif.method,
        }
    }

    /// Request id, `None` for notifications
    pub fn id(&self) -> Option<&Id> {
        match self {
            JsonRpcCall::Request(req) => Some(&req.id),
            JsonRpcCall::Notification(_) => None,
        }
    }

    /// True for notifications
    pub fn is_notification(&self) -> bool {
        matches!(self, JsonRpcCall::Notification(_))
    }

    /// Split into method, params and optional id
    pub fn into_parts(self) -> (String, Option<Value>, Option<Id>) {
        match self {
            JsonRpcCall::Request(req) => (req.method, req.params, Some(req.id)),
            JsonRpcCall::Notification(notif) => (notif.method, notif.params, None),
        }
    }
}

impl From<JsonRpcRequest> for JsonRpcCall {
    fn from(req: JsonRpcRequest) -> Self {
        JsonRpcCall::Request(req)
    }
}

impl From<JsonRpcNotification> for JsonRpcCall {
    fn from(notif: JsonRpcNotification) -> Self {
        JsonRpcCall::Notification(notif)
    }
}
