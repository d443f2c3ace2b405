use crate::*;
use serde_json::Value;
use serde_json::json;

fn to_value<T: serde::Serialize>(message: &T) -> Value {
    serde_json::to_value(message).expect("serializable")
}

// ============================================================================
//  CONSTRUCTORS
// ============================================================================

#[test]
fn test_call_message_shape() {
    let call = make_call_message("sum", Params::from(vec![json!(1), json!(2)]), Some(Id::new("a")));

    assert_eq!(
        to_value(&call),
        json!({"method": "sum", "params": [1, 2], "id": "a", "jsonrpc": "2.0"})
    );
    assert!(!call.is_notification());
}

#[test]
fn test_notification_omits_id() {
    let call = make_call_message("ping", Params::from(json!({"k": "v"})), None);

    assert_eq!(to_value(&call), json!({"method": "ping", "params": {"k": "v"}, "jsonrpc": "2.0"}));
    assert!(call.is_notification());
}

#[test]
fn test_result_message_shape() {
    let result = make_result_message(Id::new("r1"), json!({"ok": true}));

    assert_eq!(to_value(&result), json!({"result": {"ok": true}, "id": "r1", "jsonrpc": "2.0"}));
}

#[test]
fn test_error_message_null_id_without_data() {
    let error = make_error_message(None, code::PARSE_ERROR, "unexpected end", None);

    assert_eq!(
        to_value(&error),
        json!({"error": {"code": -32700, "message": "unexpected end"}, "id": null, "jsonrpc": "2.0"})
    );
}

#[test]
fn test_error_message_carries_data() {
    let error = make_error_message(Some(Id::new("e")), code::HANDLER_ERROR, "boom", Some(json!([1])));

    assert_eq!(
        to_value(&error),
        json!({"error": {"code": -32000, "message": "boom", "data": [1]}, "id": "e", "jsonrpc": "2.0"})
    );
}

#[test]
fn test_error_object_helpers() {
    let err = ErrorObject::method_not_found();
    assert_eq!(err.code, -32601);
    assert_eq!(err.message, "method not found");
    assert_eq!(err.to_string(), "method not found (code -32601)");

    assert_eq!(ErrorObject::invalid_params("x").code, code::INVALID_PARAMS);
    assert_eq!(ErrorObject::invalid_request("x").code, code::INVALID_REQUEST);
    assert_eq!(ErrorObject::parse_error("x").code, code::PARSE_ERROR);
}

// ============================================================================
//  VERSION TAG
// ============================================================================

#[test]
fn test_version_rejects_other_tags() {
    let err = serde_json::from_value::<CallMessage>(json!({"method": "x", "jsonrpc": "1.0"})).unwrap_err();
    assert!(err.to_string().contains("unsupported jsonrpc version"));

    let missing = serde_json::from_value::<ResultMessage>(json!({"result": 1, "id": "a"}));
    assert!(missing.is_err());
}

#[test]
fn test_version_matches_raw_member() {
    assert!(Version::matches(&json!("2.0")));
    assert!(!Version::matches(&json!("2")));
    assert!(!Version::matches(&json!(2.0)));
}

// ============================================================================
//  CODEC
// ============================================================================

#[test]
fn test_decode_parse_failure() {
    match decode("{not json") {
        Err(Error::Parse(description)) => assert!(!description.is_empty()),
        other => panic!("Expected Parse error, got {:?}", other),
    }
}

#[test]
fn test_decode_single_and_batch() {
    assert_eq!(decode(r#"{"a": 1}"#).unwrap(), Decoded::Single(json!({"a": 1})));
    assert_eq!(decode("[1, {}]").unwrap(), Decoded::Batch(vec![json!(1), json!({})]));
    assert_eq!(decode("[]").unwrap(), Decoded::Batch(vec![]));
}

#[test]
fn test_decode_does_not_validate_shape() {
    // Shape checks belong to the endpoint.
    assert_eq!(decode("42").unwrap(), Decoded::Single(json!(42)));
}

#[test]
fn test_encode_batch_is_array() {
    let frame = Frame::Batch(vec![
        make_result_message(Id::new("1"), json!("a")).into(),
        make_error_message(Some(Id::new("2")), code::METHOD_NOT_FOUND, "method not found", None).into(),
    ]);

    let text = encode(&frame).unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();

    assert_eq!(
        value,
        json!([
            {"result": "a", "id": "1", "jsonrpc": "2.0"},
            {"error": {"code": -32601, "message": "method not found"}, "id": "2", "jsonrpc": "2.0"}
        ])
    );
}

#[test]
fn test_encode_single_is_object() {
    let text = encode_message(&make_call_message("m", Params::default(), None).into()).unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();

    assert_eq!(value, json!({"method": "m", "params": [], "jsonrpc": "2.0"}));
}

#[test]
fn test_message_deserializes_by_shape() {
    let result: Message = serde_json::from_value(json!({"result": 1, "id": "a", "jsonrpc": "2.0"})).unwrap();
    assert!(matches!(result, Message::Result(_)));

    let error: Message = serde_json::from_value(
        json!({"error": {"code": 1, "message": "m"}, "id": null, "jsonrpc": "2.0"}),
    ).unwrap();
    assert!(matches!(error, Message::Error(ErrorMessage { id: None, .. })));

    let call: Message = serde_json::from_value(json!({"method": "m", "id": "c", "jsonrpc": "2.0"})).unwrap();
    assert_eq!(call.id(), Some(&Id::new("c")));
}

// ============================================================================
//  PARAMS & IDS
// ============================================================================

#[test]
fn test_params_from_wire() {
    assert_eq!(Params::from_wire(None), Some(Params::Positional(vec![])));
    assert_eq!(Params::from_wire(Some(&Value::Null)), Some(Params::Positional(vec![])));
    assert_eq!(Params::from_wire(Some(&json!([1]))), Some(Params::Positional(vec![json!(1)])));
    assert!(matches!(Params::from_wire(Some(&json!({"a": 1}))), Some(Params::Named(_))));
    assert_eq!(Params::from_wire(Some(&json!(5))), None);
    assert_eq!(Params::from_wire(Some(&json!("x"))), None);
}

#[test]
fn test_params_from_scalar_is_single_argument() {
    assert_eq!(Params::from(json!("x")), Params::Positional(vec![json!("x")]));
    assert_eq!(Params::from(Value::Null), Params::default());
}

#[test]
fn test_params_parse_and_arg() {
    let positional = Params::from(json!([1, "two"]));
    let (a, b): (i64, String) = positional.parse().unwrap();
    assert_eq!((a, b.as_str()), (1, "two"));
    assert_eq!(positional.arg::<i64>(0).unwrap(), 1);
    assert_eq!(positional.arg::<Option<i64>>(5).unwrap(), None);
    assert!(positional.arg::<i64>(1).is_err());

    #[derive(serde::Deserialize)]
    struct Point { x: i64, y: i64 }
    let named = Params::from(json!({"x": 3, "y": 4}));
    let point: Point = named.parse().unwrap();
    assert_eq!((point.x, point.y), (3, 4));
    assert_eq!(named.get_named("x"), Some(&json!(3)));
    assert_eq!(named.get(0), None);
}

#[test]
fn test_random_ids_are_distinct_hex() {
    let a = Id::random();
    let b = Id::random();

    assert_ne!(a, b);
    assert_eq!(a.as_str().len(), 32);
    assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
}
