//! Processor integration tests: single envelopes and text processing

mod common;

use common::{assert_error, assert_result, parse, test_processor, test_registry};
use jrpc_processor::{MethodRegistry, Processor, Reply};
use serde_json::{json, Value};

#[tokio::test]
async fn test_process_string_literal_output() {
    let processor = test_processor();

    let output = processor
        .process_string(r#"{"method":"something","id":"ID","params":"yes"}"#)
        .await;

    assert_eq!(output, r#"{"id":"ID","jsonrpc":"2.0","result":"yes, please"}"#);
}

#[tokio::test]
async fn test_process_string_parse_error() {
    let processor = test_processor();

    for input in ["not json", "{\"method\":\"something\"", "[1, 2", "   "] {
        let output = parse(&processor.process_string(input).await);
        assert_error(&output, -32700, None);
        assert_eq!(output["error"]["message"], "Parse error");
    }
}

#[tokio::test]
async fn test_process_string_empty_input() {
    assert_eq!(test_processor().process_string("").await, "");
}

#[tokio::test]
async fn test_process_string_notification_is_empty() {
    let output = test_processor()
        .process_string(r#"{"jsonrpc":"2.0","method":"something","params":"quiet"}"#)
        .await;
    assert_eq!(output, "");
}

#[tokio::test]
async fn test_non_object_inputs_are_invalid_requests() {
    let processor = test_processor();

    for input in [
        json!("String is invalid"),
        json!(1234),
        json!(false),
        json!(2.5),
        Value::Null,
    ] {
        let reply = processor.process_action(input.clone(), false).await;
        let output = reply.into_value().expect("invalid input must produce output");
        assert_error(&output, -32600, None);
        assert_eq!(output["error"]["message"], "Invalid Request");
    }
}

#[tokio::test]
async fn test_scalar_text_inputs_are_invalid_requests() {
    let processor = test_processor();

    for input in ["\"String is invalid\"", "1234", "false", "null"] {
        let output = parse(&processor.process_string(input).await);
        assert_error(&output, -32600, None);
    }
}

#[tokio::test]
async fn test_missing_or_non_string_method() {
    let processor = test_processor();

    for input in [
        json!({"id": 1}),
        json!({"method": 42, "id": 1}),
        json!({"method": null, "id": 1}),
        json!({"method": ["something"], "id": 1}),
    ] {
        let output = processor.process_action(input, false).await.into_value().unwrap();
        // The id is not trusted until the method has been validated
        assert_error(&output, -32600, None);
    }
}

#[tokio::test]
async fn test_invalid_id_types() {
    let processor = test_processor();

    for id in [json!(true), json!([1]), json!({"n": 1})] {
        let input = json!({"method": "something", "params": "x", "id": id});
        let output = processor.process_action(input, false).await.into_value().unwrap();
        assert_error(&output, -32600, None);
    }
}

#[tokio::test]
async fn test_method_not_found() {
    let processor = test_processor();

    let output = processor
        .process_action(json!({"method": "nothing", "id": 1}), false)
        .await
        .into_value()
        .unwrap();

    assert_error(&output, -32601, Some(json!(1)));
    assert_eq!(output["error"]["message"], "Method not found: nothing");
}

#[tokio::test]
async fn test_method_not_found_notification_reports_without_id() {
    let output = test_processor()
        .process_action(json!({"method": "nothing"}), false)
        .await
        .into_value()
        .unwrap();

    assert_error(&output, -32601, None);
}

#[tokio::test]
async fn test_id_type_preserved() {
    let processor = test_processor();

    for id in [json!("ID"), json!(7), json!(-3), json!(1.5), json!(u64::MAX), json!("")] {
        let input = json!({"method": "something", "params": "yes", "id": id.clone()});
        let output = processor.process_action(input, false).await.into_value().unwrap();
        assert_result(&output, json!("yes, please"), id);
    }
}

#[tokio::test]
async fn test_null_id_is_request() {
    let reply = test_processor()
        .process_action(json!({"method": "echo", "params": [1], "id": null}), false)
        .await;

    let output = reply.into_value().expect("null id expects a response");
    assert_eq!(output.get("id"), Some(&Value::Null));
    assert_eq!(output["result"], json!([1]));
}

#[tokio::test]
async fn test_positional_and_named_params() {
    let processor = test_processor();

    let output = parse(
        &processor
            .process_string(r#"{"jsonrpc":"2.0","method":"subtract","params":[42,23],"id":1}"#)
            .await,
    );
    assert_result(&output, json!(19), json!(1));

    let output = parse(
        &processor
            .process_string(
                r#"{"jsonrpc":"2.0","method":"subtract","params":{"subtrahend":23,"minuend":42},"id":3}"#,
            )
            .await,
    );
    assert_result(&output, json!(19), json!(3));
}

#[tokio::test]
async fn test_params_absent_vs_null() {
    let processor = test_processor();

    let output = processor
        .process_action(json!({"method": "echo", "id": 1}), false)
        .await
        .into_value()
        .unwrap();
    assert_result(&output, Value::Null, json!(1));

    // Missing params for a typed handler is a parameter-shape failure
    let output = processor
        .process_action(json!({"method": "something", "id": 2}), false)
        .await
        .into_value()
        .unwrap();
    assert_error(&output, -32602, Some(json!(2)));
}

#[tokio::test]
async fn test_invalid_params() {
    let processor = test_processor();

    let output = processor
        .process_action(json!({"method": "something", "params": {"not": "a string"}, "id": "p"}), false)
        .await
        .into_value()
        .unwrap();
    assert_error(&output, -32602, Some(json!("p")));

    let output = processor
        .process_action(json!({"method": "reject", "id": "q"}), false)
        .await
        .into_value()
        .unwrap();
    assert_error(&output, -32602, Some(json!("q")));
    assert_eq!(output["error"]["message"], "Invalid params: never valid");
}

#[tokio::test]
async fn test_internal_error() {
    let output = test_processor()
        .process_action(json!({"method": "fail", "id": 9}), false)
        .await
        .into_value()
        .unwrap();

    assert_error(&output, -32603, Some(json!(9)));
    assert_eq!(output["error"]["message"], "Internal error: deliberate failure");
}

#[tokio::test]
async fn test_handler_panic_is_internal_error() {
    let processor = test_processor();

    let output = processor
        .process_action(json!({"method": "explode", "id": 5}), false)
        .await
        .into_value()
        .unwrap();
    assert_error(&output, -32603, Some(json!(5)));
    assert!(output["error"]["message"]
        .as_str()
        .unwrap()
        .contains("handler blew up"));

    // The processor keeps working after a panic
    let output = processor
        .process_action(json!({"method": "something", "params": "still", "id": 6}), false)
        .await
        .into_value()
        .unwrap();
    assert_result(&output, json!("still, please"), json!(6));
}

#[tokio::test]
async fn test_failed_notification_reports_without_id() {
    let output = test_processor()
        .process_action(json!({"method": "fail"}), false)
        .await
        .into_value()
        .unwrap();
    assert_error(&output, -32603, None);
}

#[tokio::test]
async fn test_reserved_notifications_are_ignored() {
    let processor = test_processor();

    let reply = processor
        .process_action(json!({"method": "$/cancelRequest", "params": {"id": 1}}), false)
        .await;
    assert_eq!(reply, Reply::None);

    // With an id the caller still gets exactly one response
    let output = processor
        .process_action(json!({"method": "$/cancelRequest", "id": 4}), false)
        .await
        .into_value()
        .unwrap();
    assert_error(&output, -32601, Some(json!(4)));
}

#[tokio::test]
async fn test_reserved_method_with_handler_is_dispatched() {
    let mut registry = MethodRegistry::new();
    registry.register(
        "$/ping",
        jrpc_processor::from_fn(|_| async { Ok(json!("pong")) }),
    );
    let processor = Processor::new(registry);

    let output = processor
        .process_action(json!({"method": "$/ping", "id": 1}), false)
        .await
        .into_value()
        .unwrap();
    assert_result(&output, json!("pong"), json!(1));
}

#[tokio::test]
async fn test_scoped_methods() {
    let mut scoped = MethodRegistry::new();
    scoped.register(
        "didOpen",
        jrpc_processor::from_fn(|params| async move { Ok(json!({"opened": params})) }),
    );

    let mut processor = Processor::new(test_registry());
    processor.set_scope("textDocument", scoped).unwrap();

    let output = processor
        .process_action(json!({"method": "textDocument/didOpen", "params": "a.txt", "id": 1}), false)
        .await
        .into_value()
        .unwrap();
    assert_result(&output, json!({"opened": "a.txt"}), json!(1));

    // A mounted scope does not fall back to the default registry
    let output = processor
        .process_action(json!({"method": "textDocument/something", "params": "x", "id": 2}), false)
        .await
        .into_value()
        .unwrap();
    assert_error(&output, -32601, Some(json!(2)));
    assert_eq!(output["error"]["message"], "Method not found: textDocument/something");

    // Unknown scopes are looked up verbatim in the default registry
    let output = processor
        .process_action(json!({"method": "workspace/didOpen", "id": 3}), false)
        .await
        .into_value()
        .unwrap();
    assert_error(&output, -32601, Some(json!(3)));
    assert_eq!(output["error"]["message"], "Method not found: workspace/didOpen");
}

#[tokio::test]
async fn test_processing_is_idempotent() {
    let processor = test_processor();
    let input = r#"{"jsonrpc":"2.0","method":"subtract","params":[7,2],"id":"same"}"#;

    let first = processor.process_string(input).await;
    let second = processor.process_string(input).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_output_reparses_to_same_envelope() {
    let processor = test_processor();

    let text = processor
        .process_string(r#"{"method":"nothing","id":[1]}"#)
        .await;
    let reparsed: jrpc_core::JsonRpcResponse = serde_json::from_str(&text).unwrap();
    assert_eq!(jrpc_core::codec::encode_response(&reparsed).unwrap(), text);
}

#[tokio::test]
async fn test_concurrent_callers() {
    let processor = test_processor();

    let mut tasks = Vec::new();
    for i in 0..20i64 {
        let processor = processor.clone();
        tasks.push(tokio::spawn(async move {
            let input = json!({"method": "subtract", "params": [i, 1], "id": i});
            processor.process_action(input, false).await.into_value().unwrap()
        }));
    }

    for (i, task) in tasks.into_iter().enumerate() {
        let output = task.await.unwrap();
        let i = i as i64;
        assert_result(&output, json!(i - 1), json!(i));
    }
}
