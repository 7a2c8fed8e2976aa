//! Error types for jrpc
//!
//! Two layers of errors live here:
//!
//! - **Error**: application-level failures raised by handlers, middleware and
//!   the codec (uses thiserror)
//! - **JsonRpcErrorData**: the `error` member of a JSON-RPC 2.0 error envelope
//!
//! # Error Codes
//!
//! The processor only ever emits the five codes reserved by JSON-RPC 2.0,
//! enumerated by [`ErrorCode`]:
//!
//! - `-32700`: Parse error (invalid JSON text)
//! - `-32600`: Invalid Request (not a valid request envelope)
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//!
//! # Examples
//!
//! ```rust
//! use jrpc_core::{Error, ErrorCode, JsonRpcErrorData};
//!
//! let error = Error::InvalidParams("expected a string".into());
//! assert_eq!(error.code(), ErrorCode::InvalidParams);
//!
//! let wire = JsonRpcErrorData::method_not_found("unknownMethod");
//! assert_eq!(wire.code, -32601);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type for jrpc operations
pub type Result<T> = std::result::Result<T, Error>;

/// Application-level error type
///
/// Handlers return this type to signal failure. The processor maps every
/// variant onto one of the five JSON-RPC codes via [`Error::code`]; for a
/// dispatched handler only two outcomes are possible: `InvalidParams`
/// becomes `-32602`, anything else becomes `-32603`.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Error that is already in wire format
    #[error("JSON-RPC error: {0}")]
    JsonRpc(#[from] JsonRpcErrorData),

    /// Serialization or deserialization error
    ///
    /// Raised when a handler's return value cannot be turned into JSON, or
    /// when an envelope cannot be encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The value is not a well-formed request envelope
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No handler is registered under the requested method name
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// The method exists but its parameters have the wrong shape
    ///
    /// `from_typed_fn` raises this automatically when params fail to
    /// deserialize into the handler's parameter type.
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Unexpected failure while executing a method
    #[error("Internal error: {0}")]
    Internal(String),

    /// Batch holds more envelopes than the configured limit
    #[error("Batch size limit exceeded: limit={limit}, actual={actual}")]
    BatchSizeExceeded {
        /// The maximum allowed batch size
        limit: usize,
        /// The actual batch size that was rejected
        actual: usize,
    },
}

impl Error {
    /// The JSON-RPC code this error maps onto
    ///
    /// Wire-format errors carrying a code outside the reserved five are
    /// reported as internal errors.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::JsonRpc(data) => ErrorCode::from_code(data.code).unwrap_or(ErrorCode::InternalError),
            Error::Serialization(_) | Error::Internal(_) => ErrorCode::InternalError,
            Error::InvalidRequest(_) | Error::BatchSizeExceeded { .. } => ErrorCode::InvalidRequest,
            Error::MethodNotFound(_) => ErrorCode::MethodNotFound,
            Error::InvalidParams(_) => ErrorCode::InvalidParams,
        }
    }
}

/// The fixed set of JSON-RPC 2.0 error codes
///
/// The numeric values are part of the wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorCode {
    /// Invalid JSON was received
    ParseError = -32700,
    /// The JSON sent is not a valid request envelope
    InvalidRequest = -32600,
    /// The method does not exist / is not available
    MethodNotFound = -32601,
    /// Invalid method parameter(s)
    InvalidParams = -32602,
    /// Internal JSON-RPC error
    InternalError = -32603,
}

impl ErrorCode {
    /// Numeric wire value
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Default human-readable message for the code
    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::ParseError => "Parse error",
            ErrorCode::InvalidRequest => "Invalid Request",
            ErrorCode::MethodNotFound => "Method not found",
            ErrorCode::InvalidParams => "Invalid params",
            ErrorCode::InternalError => "Internal error",
        }
    }

    /// Look up a reserved code by its numeric value
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -32700 => Some(ErrorCode::ParseError),
            -32600 => Some(ErrorCode::InvalidRequest),
            -32601 => Some(ErrorCode::MethodNotFound),
            -32602 => Some(ErrorCode::InvalidParams),
            -32603 => Some(ErrorCode::InternalError),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The `error` member of a JSON-RPC 2.0 error envelope
///
/// Contains exactly `code` and `message`. The optional `data` member of
/// JSON-RPC 2.0 is never produced by this crate.
///
/// # Examples
///
/// ```rust
/// use jrpc_core::{ErrorCode, JsonRpcErrorData};
///
/// let error = JsonRpcErrorData::from_code(ErrorCode::InvalidRequest);
/// assert_eq!(error.code, -32600);
/// assert_eq!(error.message, "Invalid Request");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRpcErrorData {
    /// Numeric error code
    pub code: i32,

    /// Short description of the error
    pub message: String,
}

impl JsonRpcErrorData {
    /// Create an error object with an arbitrary code and message
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create an error object carrying the code's default message
    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code.code(), code.message())
    }

    /// Parse error (-32700)
    ///
    /// The input text was not valid JSON.
    pub fn parse_error() -> Self {
        Self::from_code(ErrorCode::ParseError)
    }

    /// Invalid request (-32600) with the default message
    pub fn invalid_request() -> Self {
        Self::from_code(ErrorCode::InvalidRequest)
    }

    /// Method not found (-32601)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jrpc_core::JsonRpcErrorData;
    ///
    /// let error = JsonRpcErrorData::method_not_found("calculateFoo");
    /// assert_eq!(error.message, "Method not found: calculateFoo");
    /// ```
    pub fn method_not_found(method: impl AsRef<str>) -> Self {
        Self::new(
            ErrorCode::MethodNotFound.code(),
            format!("Method not found: {}", method.as_ref()),
        )
    }

    /// Invalid params (-32602)
    pub fn invalid_params(msg: impl AsRef<str>) -> Self {
        Self::new(
            ErrorCode::InvalidParams.code(),
            format!("Invalid params: {}", msg.as_ref()),
        )
    }

    /// Internal error (-32603)
    pub fn internal_error(msg: impl AsRef<str>) -> Self {
        Self::new(
            ErrorCode::InternalError.code(),
            format!("Internal error: {}", msg.as_ref()),
        )
    }

    /// Batch size exceeded, reported as an invalid request (-32600)
    pub fn batch_size_exceeded(limit: usize, actual: usize) -> Self {
        Self::new(
            ErrorCode::InvalidRequest.code(),
            format!("Batch size limit exceeded: limit={}, actual={}", limit, actual),
        )
    }

    /// The reserved code this object carries, if any
    pub fn error_code(&self) -> Option<ErrorCode> {
        ErrorCode::from_code(self.code)
    }
}

impl fmt::Display for JsonRpcErrorData {
    /// Formats as "[code] message", e.g. "[-32601] Method not found: foo"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for JsonRpcErrorData {}
