//! Functional tests for the request normalization contract.
//!
//! Each case feeds one scripted response through the RequestClient and
//! checks what the caller observes.

use lowcode_request::{
    HttpFailure, HttpRequest, Method, RequestClient, RequestError, RequestOptions,
};
use lowcode_test_utils::ScriptedTransport;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;

fn client_with(status: u16, body: &str) -> RequestClient {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_response(status, body);
    RequestClient::new(transport)
}

async fn call(client: &RequestClient, method: Method) -> Result<Value, RequestError> {
    client
        .request(
            HttpRequest::new(method, "https://api.test/resource"),
            RequestOptions::new(),
        )
        .await
}

#[tokio::test]
async fn ok_resolves_to_body() {
    let value = call(&client_with(200, r#"{"a":1}"#), Method::Get).await.unwrap();
    assert_eq!(value, json!({"a": 1}));
}

#[tokio::test]
async fn not_found_rejects_with_code_and_data() {
    let err = call(&client_with(404, r#"{"msg":"nf"}"#), Method::Get)
        .await
        .unwrap_err();
    assert_eq!(
        err.failure(),
        Some(&HttpFailure::with_data(404, json!({"msg": "nf"})))
    );
    assert_eq!(
        serde_json::to_value(err.failure().unwrap()).unwrap(),
        json!({"code": 404, "data": {"msg": "nf"}})
    );
}

#[tokio::test]
async fn no_content_resolves_only_for_delete() {
    let value = call(&client_with(204, ""), Method::Delete).await.unwrap();
    assert_eq!(value, json!({"success": true}));

    let err = call(&client_with(204, ""), Method::Get).await.unwrap_err();
    assert_eq!(err.failure(), Some(&HttpFailure::new(204)));
}

#[tokio::test]
async fn server_error_without_json_body_has_no_data() {
    let err = call(&client_with(500, "Internal Server Error"), Method::Post)
        .await
        .unwrap_err();
    assert_eq!(err.failure(), Some(&HttpFailure::new(500)));
}

#[tokio::test]
async fn null_success_body_is_rejected() {
    let err = call(&client_with(200, "null"), Method::Get).await.unwrap_err();
    assert!(matches!(err, RequestError::Flagged(Value::Null)));
}

#[tokio::test]
async fn unmapped_status_resolves_to_null() {
    let value = call(&client_with(503, r#"{"retry":true}"#), Method::Get)
        .await
        .unwrap();
    assert_eq!(value, Value::Null);
}

#[tokio::test]
async fn offline_transport_propagates_original_error() {
    let client = RequestClient::new(Arc::new(ScriptedTransport::new()));
    let err = call(&client, Method::Get).await.unwrap_err();
    assert!(matches!(err, RequestError::Transport(_)));
}
