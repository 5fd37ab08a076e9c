//! Tests for `ApiRequest` and `ApiResponse`.

use super::request::decode_body;
use super::{ApiError, ApiRequest, ApiResponse};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;

mod api_request {
    use super::*;

    #[test]
    fn constructors_set_method_and_path() {
        assert_eq!(ApiRequest::get("/users").method, http::Method::GET);
        assert_eq!(ApiRequest::post("/users").method, http::Method::POST);
        assert_eq!(ApiRequest::put("/users/1").method, http::Method::PUT);
        assert_eq!(ApiRequest::delete("/users/1").path, "/users/1");
    }

    #[test]
    fn with_header_replaces_previous_value() {
        let req = ApiRequest::get("/")
            .with_header(
                http::header::ACCEPT,
                http::HeaderValue::from_static("text/plain"),
            )
            .with_header(
                http::header::ACCEPT,
                http::HeaderValue::from_static("application/json"),
            );

        assert_eq!(req.headers.get_all(http::header::ACCEPT).iter().count(), 1);
        assert_eq!(req.headers[http::header::ACCEPT], "application/json");
    }

    #[test]
    fn with_json_serializes_body() {
        #[derive(Serialize)]
        struct NewWallet<'a> {
            #[serde(rename = "Currency")]
            currency: &'a str,
        }

        let req = ApiRequest::post("/wallets")
            .with_json(&NewWallet { currency: "EUR" })
            .unwrap();

        assert_eq!(req.body, Some(json!({"Currency": "EUR"})));
    }

    #[test]
    fn overrides_are_recorded() {
        let req = ApiRequest::get("/")
            .with_timeout(Duration::from_secs(3))
            .with_retry_policy(crate::retry::RetryPolicy::new().with_max_attempts(1))
            .with_optional_query("page", None)
            .with_query("per_page", "10");

        assert_eq!(req.timeout, Some(Duration::from_secs(3)));
        assert_eq!(req.retry.unwrap().max_attempts, 1);
        assert_eq!(req.query.len(), 2);
    }
}

mod api_response {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Wallet {
        #[serde(rename = "Id")]
        id: String,
    }

    fn response(body: Option<Value>) -> ApiResponse {
        ApiResponse {
            status: http::StatusCode::OK,
            headers: http::HeaderMap::new(),
            body,
        }
    }

    #[test]
    fn json_decodes_typed_body() {
        let wallet: Wallet = response(Some(json!({"Id": "w_1"}))).json().unwrap();
        assert_eq!(wallet.id, "w_1");
    }

    #[test]
    fn empty_body_decodes_as_none_or_unit() {
        let wallet: Option<Wallet> = response(None).json().unwrap();
        assert!(wallet.is_none());

        response(None).json::<()>().unwrap();
        assert!(response(None).is_empty());
    }

    #[test]
    fn empty_body_for_struct_is_decode_error() {
        let result: Result<Wallet, _> = response(None).json();
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }
}

mod body_decoding {
    use super::*;

    #[test]
    fn empty_and_whitespace_bodies_are_absent() {
        assert_eq!(decode_body(b""), None);
        assert_eq!(decode_body(b"  \n"), None);
    }

    #[test]
    fn json_body_is_parsed() {
        assert_eq!(decode_body(br#"{"a":1}"#), Some(json!({"a": 1})));
    }

    #[test]
    fn non_json_body_falls_back_to_string() {
        assert_eq!(
            decode_body(b"<html>oops</html>"),
            Some(Value::String("<html>oops</html>".into()))
        );
    }
}
