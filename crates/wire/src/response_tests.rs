// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

use super::*;

#[test]
fn success_response_omits_error_field() {
    let response = Response::success(serde_json::json!({"pong": true}), Some(1));
    let json = serde_json::to_string(&response).expect("serialize");
    assert!(!json.contains("\"error\""));
    assert!(json.contains("\"result\""));
}

#[test]
fn error_response_omits_result_field() {
    let response = Response::error(-32601, "method not found", None, Some(1));
    let json = serde_json::to_string(&response).expect("serialize");
    assert!(!json.contains("\"result\""));
    assert!(json.contains("\"error\""));
}

#[test]
fn domain_error_maps_to_its_documented_code() {
    let err = DomainError::DeviceNotFound {
        requested: "/dev/video9".into(),
        available: vec!["/dev/video0".into()],
    };
    let response = Response::from_domain_error(&err, Some(3));
    assert_eq!(response.error.as_ref().map(|e| e.code), Some(-32002));
}

// Backward-compat style deserialization check: a response missing the
// `data` field on its error object still decodes.
#[test]
fn error_without_data_field_decodes() {
    let json = r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32602,"message":"bad params"}}"#;
    let response: Response = serde_json::from_str(json).expect("deserialize");
    assert!(response.is_error());
    assert_eq!(response.error.unwrap().data, None);
}
