//! Codec for JSON-RPC text and envelope validation
//!
//! This module is the only place where text meets structured values:
//!
//! - [`parse`] / [`serialize`] wrap `serde_json` and map failures onto
//!   JSON-RPC errors (`-32700` for unparsable text)
//! - [`decode_call`] validates an arbitrary value as a request envelope and
//!   turns it into a [`JsonRpcCall`]
//! - the `encode_*` / `decode_*` helpers are typed conveniences for callers
//!   that build or inspect envelopes directly
//!
//! # Envelope Validation Order
//!
//! `decode_call` checks, in order: the value is an object, `method` is
//! present and a string, and `id` (if present) is a string, number or null.
//! The envelope's `id` is not looked at before `method` is confirmed, so a
//! rejected envelope never leaks its `id` into the error response.
//!
//! # Examples
//!
//! ```rust
//! use jrpc_core::codec;
//!
//! let value = codec::parse(r#"{"method":"ping","id":1}"#).unwrap();
//! let call = codec::decode_call(value).unwrap();
//! assert_eq!(call.method(), "ping");
//!
//! assert!(codec::parse("{not json").is_err());
//! ```

use crate::error::{Error, JsonRpcErrorData, Result};
use crate::types::{Id, JsonRpcCall, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parse JSON text into a structured value
///
/// # Errors
///
/// Returns `Error::JsonRpc` carrying a parse error (-32700) if the text is
/// not valid JSON.
pub fn parse(data: &str) -> Result<Value> {
    serde_json::from_str(data).map_err(|e| {
        tracing::debug!(error = %e, "Rejecting unparsable input");
        Error::JsonRpc(JsonRpcErrorData::parse_error())
    })
}

/// Serialize a structured value to compact JSON text
pub fn serialize(value: &Value) -> Result<String> {
    encode(value)
}

/// Encode any serializable message to a JSON string
///
/// # Errors
///
/// Returns `Error::Serialization` if the message cannot be serialized.
pub fn encode<T: Serialize>(msg: &T) -> Result<String> {
    serde_json::to_string(msg).map_err(|e| Error::Serialization(e.to_string()))
}

/// Convert any serializable message into a structured value
///
/// # Errors
///
/// Returns `Error::Serialization` if the message cannot be represented as
/// JSON.
pub fn to_value<T: Serialize>(msg: &T) -> Result<Value> {
    serde_json::to_value(msg).map_err(|e| Error::Serialization(e.to_string()))
}

/// Decode a JSON string to a specific type
pub fn decode_as<'de, T: Deserialize<'de>>(data: &'de str) -> Result<T> {
    serde_json::from_str(data).map_err(|e| Error::Serialization(e.to_string()))
}

/// Encode a request to JSON
pub fn encode_request(req: &JsonRpcRequest) -> Result<String> {
    encode(req)
}

/// Encode a notification to JSON
pub fn encode_notification(notif: &JsonRpcNotification) -> Result<String> {
    encode(notif)
}

/// Encode a response to JSON
///
/// # Examples
///
/// ```rust
/// use jrpc_core::{codec, JsonRpcResponse, Id};
/// use serde_json::json;
///
/// let response = JsonRpcResponse::success(json!(42), Id::from(1i64));
/// let json = codec::encode_response(&response).unwrap();
/// assert_eq!(json, r#"{"id":1,"jsonrpc":"2.0","result":42}"#);
/// ```
pub fn encode_response(resp: &JsonRpcResponse) -> Result<String> {
    encode(resp)
}

/// Decode a response from JSON
pub fn decode_response(data: &str) -> Result<JsonRpcResponse> {
    decode_as(data)
}

/// Encode a batch of responses as a JSON array
pub fn encode_batch_responses(responses: &[JsonRpcResponse]) -> Result<String> {
    encode(&responses)
}

/// Validate a structured value as a request envelope
///
/// Absent `params` stays `None`; an explicit `"params": null` is passed on
/// as `Some(Value::Null)`. An explicit `"id": null` makes the envelope a
/// request (echoing `null`), not a notification. The `jsonrpc` member is
/// not required.
///
/// # Errors
///
/// Returns `Error::InvalidRequest` describing why the value is not an
/// envelope. Callers report it as a plain -32600 with no `id`.
///
/// # Examples
///
/// ```rust
/// use jrpc_core::{codec, Id};
/// use serde_json::json;
///
/// let call = codec::decode_call(json!({"method": "add", "id": "a1"})).unwrap();
/// assert_eq!(call.id(), Some(&Id::from("a1")));
///
/// let call = codec::decode_call(json!({"method": "log"})).unwrap();
/// assert!(call.is_notification());
///
/// assert!(codec::decode_call(json!({"id": 1})).is_err());
/// assert!(codec::decode_call(json!("not an object")).is_err());
/// ```
pub fn decode_call(value: Value) -> Result<JsonRpcCall> {
    let mut object = match value {
        Value::Object(object) => object,
        other => {
            return Err(Error::InvalidRequest(format!(
                "expected an object, got {}",
                value_kind(&other)
            )))
        }
    };

    let method = match object.remove("method") {
        Some(Value::String(method)) => method,
        Some(other) => {
            return Err(Error::InvalidRequest(format!(
                "'method' must be a string, got {}",
                value_kind(&other)
            )))
        }
        None => return Err(Error::InvalidRequest("missing 'method'".to_string())),
    };

    let params = object.remove("params");

    match object.get("id") {
        None => Ok(JsonRpcCall::Notification(JsonRpcNotification::new(method, params))),
        Some(raw) => {
            let id = Id::from_value(raw).ok_or_else(|| {
                Error::InvalidRequest(format!(
                    "'id' must be a string, number or null, got {}",
                    value_kind(raw)
                ))
            })?;
            Ok(JsonRpcCall::Request(JsonRpcRequest::new(method, params, id)))
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;

    #[test]
    fn test_parse_valid_text() {
        let value = parse(r#"{"method":"something","id":"ID","params":"yes"}"#).unwrap();
        assert_eq!(value["method"], "something");
        assert_eq!(value["params"], "yes");
    }

    #[test]
    fn test_parse_invalid_text_is_parse_error() {
        for input in ["not valid json", "{\"method\":", "", "[1,2"] {
            match parse(input) {
                Err(e) => assert_eq!(e.code(), ErrorCode::ParseError),
                Ok(v) => panic!("Expected parse error for {:?}, got {}", input, v),
            }
        }
    }

    #[test]
    fn test_parse_scalars() {
        assert_eq!(parse("1234").unwrap(), json!(1234));
        assert_eq!(parse("false").unwrap(), json!(false));
        assert_eq!(parse("\"String is invalid\"").unwrap(), json!("String is invalid"));
    }

    #[test]
    fn test_serialize_value() {
        assert_eq!(serialize(&json!([])).unwrap(), "[]");
        assert_eq!(serialize(&json!({"a": 1})).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn test_decode_call_request() {
        let call = decode_call(json!({"method": "something", "id": "ID", "params": "yes"})).unwrap();
        match call {
            JsonRpcCall::Request(req) => {
                assert_eq!(req.method, "something");
                assert_eq!(req.id, Id::from("ID"));
                assert_eq!(req.params, Some(json!("yes")));
            }
            other => panic!("Expected request, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_call_notification() {
        let call = decode_call(json!({"jsonrpc": "2.0", "method": "notify"})).unwrap();
        assert!(call.is_notification());
        assert_eq!(call.method(), "notify");
    }

    #[test]
    fn test_decode_call_null_id_is_request() {
        let call = decode_call(json!({"method": "m", "id": null})).unwrap();
        assert_eq!(call.id(), Some(&Id::Null));
    }

    #[test]
    fn test_decode_call_null_params_are_kept() {
        let (_, params, _) = decode_call(json!({"method": "m", "params": null}))
            .unwrap()
            .into_parts();
        assert_eq!(params, Some(Value::Null));

        let (_, params, _) = decode_call(json!({"method": "m"})).unwrap().into_parts();
        assert_eq!(params, None);
    }

    #[test]
    fn test_decode_call_rejects_non_objects() {
        for value in [json!("String is invalid"), json!(1234), json!(false), json!(2.75), Value::Null, json!([])] {
            let err = decode_call(value).unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidRequest);
        }
    }

    #[test]
    fn test_decode_call_rejects_bad_method() {
        let err = decode_call(json!({"id": 1})).unwrap_err();
        assert!(err.to_string().contains("missing 'method'"));

        let err = decode_call(json!({"method": 5, "id": 1})).unwrap_err();
        assert!(err.to_string().contains("must be a string"));
    }

    #[test]
    fn test_decode_call_rejects_bad_id() {
        for id in [json!(true), json!([1]), json!({"n": 1})] {
            let err = decode_call(json!({"method": "m", "id": id})).unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidRequest);
        }
    }

    #[test]
    fn test_encode_decode_response_error() {
        let resp = JsonRpcResponse::error(
            JsonRpcErrorData::method_not_found("unknown"),
            Some(Id::from(99i64)),
        );
        let encoded = encode_response(&resp).unwrap();
        let decoded = decode_response(&encoded).unwrap();

        assert_eq!(decoded, resp);
        assert!(decoded.is_error());
    }

    #[test]
    fn test_reencoding_is_stable() {
        let resp = JsonRpcResponse::success(json!({"nested": [1, "two", null]}), Id::from("x"));
        let first = encode_response(&resp).unwrap();
        let second = encode_response(&decode_response(&first).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_encode_batch_responses() {
        let batch = vec![
            JsonRpcResponse::success(json!(1), Id::from(1i64)),
            JsonRpcResponse::error(JsonRpcErrorData::invalid_request(), None),
        ];
        let encoded = encode_batch_responses(&batch).unwrap();
        assert!(encoded.starts_with('['));
        assert!(encoded.ends_with(']'));

        let decoded: Vec<JsonRpcResponse> = decode_as(&encoded).unwrap();
        assert_eq!(decoded, batch);

        assert_eq!(encode_batch_responses(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_encode_request_and_notification() {
        let req = JsonRpcRequest::new("test", Some(json!({"a": 1})), Id::from(1i64));
        let encoded = encode_request(&req).unwrap();
        let decoded: JsonRpcRequest = decode_as(&encoded).unwrap();
        assert_eq!(decoded, req);

        let notif = JsonRpcNotification::new("tick", None);
        let encoded = encode_notification(&notif).unwrap();
        assert_eq!(encoded, r#"{"jsonrpc":"2.0","method":"tick"}"#);
    }
}
