//! Status-code based response normalization
//!
//! | Status | Result |
//! |--------|--------|
//! | 200, 201, 202 | body decoded as JSON; a falsy body or `__success: false` rejects |
//! | 204 + DELETE | `{"success": true}` |
//! | 204 otherwise | rejected with `{code: 204}` |
//! | 400, 401, 403, 404, 406, 410, 422, 500 | rejected with `{code, data?}` |
//! | anything else | `null` |

use crate::error::{HttpFailure, RequestError, RequestResult};
use crate::types::{Method, RawResponse};
use serde_json::{json, Value};

/// Field a body uses to flag itself as a failure
pub const SUCCESS_MARKER: &str = "__success";

/// Statuses whose body is decoded as the success value
pub const SUCCESS_STATUSES: [u16; 3] = [200, 201, 202];

/// Statuses normalized into a failure record
pub const FAILURE_STATUSES: [u16; 8] = [400, 401, 403, 404, 406, 410, 422, 500];

/// Map a raw response into the delivered value or a failure
///
/// # Errors
/// - `RequestError::Status` for 204 on a non-DELETE call and for mapped
///   failure statuses
/// - `RequestError::Flagged` when a success body is falsy or carries `__success: false`
/// - `RequestError::Decode` when a success body is not JSON
pub fn normalize(method: Method, response: &RawResponse) -> RequestResult<Value> {
    let status = response.status;

    if SUCCESS_STATUSES.contains(&status) {
        let value: Value = serde_json::from_slice(&response.body)?;
        return deliver(value);
    }

    if status == 204 {
        return if method == Method::Delete {
            Ok(json!({ "success": true }))
        } else {
            Err(HttpFailure::new(status).into())
        };
    }

    if FAILURE_STATUSES.contains(&status) {
        let failure = match serde_json::from_slice::<Value>(&response.body) {
            Ok(data) => HttpFailure::with_data(status, data),
            Err(_) => HttpFailure::new(status),
        };
        return Err(failure.into());
    }

    tracing::warn!(status, %method, "unmapped status resolved to null");
    Ok(Value::Null)
}

/// JavaScript truthiness of a JSON value
///
/// `null`, `false`, `0` and `""` are falsy; arrays and objects, even empty
/// ones, are truthy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Reject a falsy body, strip the failure marker and reject, or deliver the
/// value untouched
fn deliver(value: Value) -> RequestResult<Value> {
    match value {
        absent if !is_truthy(&absent) => Err(RequestError::Flagged(absent)),
        Value::Object(mut map) if map.get(SUCCESS_MARKER) == Some(&Value::Bool(false)) => {
            map.remove(SUCCESS_MARKER);
            Err(RequestError::Flagged(Value::Object(map)))
        }
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn response(status: u16, body: &str) -> RawResponse {
        RawResponse::new(status, body.as_bytes().to_vec())
    }

    #[test]
    fn ok_body_is_delivered() {
        let value = normalize(Method::Get, &response(200, r#"{"a":1}"#)).unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn created_and_accepted_are_success() {
        for status in [201, 202] {
            let value = normalize(Method::Post, &response(status, "[1,2]")).unwrap();
            assert_eq!(value, json!([1, 2]));
        }
    }

    #[test]
    fn ok_with_invalid_json_is_decode_error() {
        let err = normalize(Method::Get, &response(200, "<html>")).unwrap_err();
        assert!(matches!(err, RequestError::Decode(_)));
    }

    #[test]
    fn ok_body_flagged_as_failure_is_rejected_without_marker() {
        let err = normalize(
            Method::Get,
            &response(200, r#"{"__success":false,"reason":"quota"}"#),
        )
        .unwrap_err();
        match err {
            RequestError::Flagged(value) => assert_eq!(value, json!({"reason": "quota"})),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn falsy_success_bodies_are_rejected() {
        for (status, body, expected) in [
            (200, "null", Value::Null),
            (200, "false", json!(false)),
            (201, "0", json!(0)),
            (202, "\"\"", json!("")),
        ] {
            match normalize(Method::Get, &response(status, body)) {
                Err(RequestError::Flagged(value)) => assert_eq!(value, expected),
                other => panic!("{status} {body}: unexpected result {other:?}"),
            }
        }
    }

    #[test]
    fn empty_containers_are_delivered() {
        assert_eq!(normalize(Method::Get, &response(200, "[]")).unwrap(), json!([]));
        assert_eq!(normalize(Method::Get, &response(200, "{}")).unwrap(), json!({}));
    }

    #[test]
    fn truthiness_follows_javascript() {
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!(true)));
    }

    #[test]
    fn truthy_marker_is_kept() {
        let value = normalize(Method::Get, &response(200, r#"{"__success":true}"#)).unwrap();
        assert_eq!(value, json!({"__success": true}));
    }

    #[test]
    fn no_content_on_delete_is_success() {
        let value = normalize(Method::Delete, &RawResponse::empty(204)).unwrap();
        assert_eq!(value, json!({"success": true}));
    }

    #[test]
    fn no_content_on_get_is_failure() {
        let err = normalize(Method::Get, &RawResponse::empty(204)).unwrap_err();
        assert_eq!(err.failure(), Some(&HttpFailure::new(204)));
    }

    #[test]
    fn mapped_failure_carries_decoded_body() {
        let err = normalize(Method::Get, &response(404, r#"{"msg":"nf"}"#)).unwrap_err();
        assert_eq!(
            err.failure(),
            Some(&HttpFailure::with_data(404, json!({"msg": "nf"})))
        );
    }

    #[test]
    fn mapped_failure_without_json_body_has_no_data() {
        for status in FAILURE_STATUSES {
            let err = normalize(Method::Post, &response(status, "Internal")).unwrap_err();
            assert_eq!(err.failure(), Some(&HttpFailure::new(status)));
        }
    }

    #[test]
    fn unmapped_status_resolves_to_null() {
        for status in [203, 302, 409, 429, 502, 503] {
            let value = normalize(Method::Get, &response(status, r#"{"x":1}"#)).unwrap();
            assert_eq!(value, Value::Null);
        }
    }
}
