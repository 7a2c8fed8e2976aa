//! Common test utilities for jrpc-processor integration tests
//!
//! Provides a registry of small handlers and helpers for asserting on the
//! JSON envelopes the processor emits.

#![allow(dead_code)]

use jrpc_core::Error;
use jrpc_processor::{from_fn, from_typed_fn, MethodRegistry, Processor};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
pub struct SubtractParams {
    pub minuend: i64,
    pub subtrahend: i64,
}

/// Registry with the handlers used across the integration tests
///
/// - `something(x)` → `x + ", please"`
/// - `subtract` with positional `[a, b]` or named `{minuend, subtrahend}` params
/// - `echo` returns its params (or `null`)
/// - `fail` always fails with an internal error
/// - `reject` always fails with invalid params
/// - `explode` panics
pub fn test_registry() -> MethodRegistry {
    let mut registry = MethodRegistry::new();

    registry.register(
        "something",
        from_typed_fn(|word: String| async move { Ok(format!("{}, please", word)) }),
    );
    registry.register(
        "subtract",
        from_fn(|params| async move {
            match params {
                Some(Value::Array(args)) => {
                    let (a, b): (i64, i64) = serde_json::from_value(Value::Array(args))
                        .map_err(|e| Error::InvalidParams(e.to_string()))?;
                    Ok(Value::from(a - b))
                }
                Some(named) => {
                    let p: SubtractParams = serde_json::from_value(named)
                        .map_err(|e| Error::InvalidParams(e.to_string()))?;
                    Ok(Value::from(p.minuend - p.subtrahend))
                }
                None => Err(Error::InvalidParams("expected two numbers".to_string())),
            }
        }),
    );
    registry.register("echo", from_fn(|params| async move { Ok(params.unwrap_or_default()) }));
    registry.register(
        "fail",
        from_fn(|_| async { Err(Error::Internal("deliberate failure".to_string())) }),
    );
    registry.register(
        "reject",
        from_fn(|_| async { Err(Error::InvalidParams("never valid".to_string())) }),
    );
    registry.register("explode", from_fn(explode));

    registry
}

async fn explode(_params: Option<Value>) -> jrpc_core::Result<Value> {
    panic!("handler blew up");
}

/// Processor over [`test_registry`] with default settings
pub fn test_processor() -> Processor {
    Processor::new(test_registry())
}

/// Parse processor output text
pub fn parse(text: &str) -> Value {
    serde_json::from_str(text).expect("processor output should be valid JSON")
}

/// Assert `envelope` is an error envelope with `code` and the given `id`
///
/// `id: None` asserts the `id` member is absent.
pub fn assert_error(envelope: &Value, code: i64, id: Option<Value>) {
    assert_eq!(envelope["jsonrpc"], "2.0", "envelope: {}", envelope);
    assert_eq!(envelope["error"]["code"], code, "envelope: {}", envelope);
    assert!(envelope["error"]["message"].is_string(), "envelope: {}", envelope);
    assert!(envelope.get("result").is_none(), "envelope: {}", envelope);
    assert_eq!(envelope.get("id").cloned(), id, "envelope: {}", envelope);
}

/// Assert `envelope` is a success envelope with `result` and `id`
pub fn assert_result(envelope: &Value, result: Value, id: Value) {
    assert_eq!(envelope["jsonrpc"], "2.0", "envelope: {}", envelope);
    assert_eq!(envelope["result"], result, "envelope: {}", envelope);
    assert!(envelope.get("error").is_none(), "envelope: {}", envelope);
    assert_eq!(envelope["id"], id, "envelope: {}", envelope);
}
