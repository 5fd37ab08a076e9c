//! Tests for the API error taxonomy.

use super::error::{decode_error_body, parse_retry_after};
use super::{ApiError, ErrorBody, FieldErrors, RetryOnTransient};
use crate::retry::ShouldRetry;
use crate::transport::HttpError;
use serde_json::json;
use std::time::Duration;

fn map(status: u16) -> ApiError {
    ApiError::from_status(status, ErrorBody::new("boom"), FieldErrors::new(), None)
}

mod from_status {
    use super::*;

    #[test]
    fn documented_codes_map_to_dedicated_kinds() {
        assert!(matches!(map(400), ApiError::Validation { status: 400, .. }));
        assert!(matches!(map(422), ApiError::Validation { status: 422, .. }));
        assert!(matches!(map(401), ApiError::Authentication(_)));
        assert!(matches!(map(403), ApiError::Authorization(_)));
        assert!(matches!(map(404), ApiError::NotFound(_)));
        assert!(matches!(map(429), ApiError::RateLimited { .. }));
        assert!(matches!(map(500), ApiError::Status { status: 500, .. }));
    }

    #[test]
    fn other_codes_keep_status_on_generic_kind() {
        for status in [402, 409, 418, 502, 503, 599] {
            assert!(
                matches!(map(status), ApiError::Status { status: s, .. } if s == status),
                "status {status}"
            );
        }
    }

    #[test]
    fn mapping_is_deterministic() {
        for status in 100..600 {
            assert_eq!(map(status).status_code(), Some(status));
        }
    }

    #[test]
    fn validation_keeps_field_errors() {
        let mut errors = FieldErrors::new();
        errors.insert("Email".into(), vec!["is required".into()]);

        let error = ApiError::from_status(400, ErrorBody::new("invalid"), errors.clone(), None);

        assert_eq!(error.field_errors(), Some(&errors));
    }

    #[test]
    fn rate_limit_keeps_retry_after() {
        let error = ApiError::from_status(
            429,
            ErrorBody::new("slow down"),
            FieldErrors::new(),
            Some(Duration::from_secs(12)),
        );

        assert_eq!(error.retry_after(), Some(Duration::from_secs(12)));
    }

    #[test]
    fn retry_after_is_dropped_for_other_kinds() {
        let error = ApiError::from_status(
            503,
            ErrorBody::new("busy"),
            FieldErrors::new(),
            Some(Duration::from_secs(12)),
        );

        assert_eq!(error.retry_after(), None);
    }

    #[test]
    fn body_is_exposed_for_status_kinds() {
        let error = ApiError::from_status(
            404,
            ErrorBody::new("no such user").with_code("resource_not_found"),
            FieldErrors::new(),
            None,
        );

        let body = error.body().unwrap();
        assert_eq!(body.message, "no such user");
        assert_eq!(body.code.as_deref(), Some("resource_not_found"));
    }
}

mod classification {
    use super::*;

    #[test]
    fn timeout_refines_network() {
        let timeout = ApiError::Timeout {
            duration: Duration::from_secs(5),
        };

        assert!(timeout.is_network());
        assert!(ApiError::network("reset").is_network());
        assert!(!map(500).is_network());
        assert_eq!(timeout.status_code(), None);
    }

    #[test]
    fn transient_errors_are_retryable() {
        assert!(ApiError::network("dns").is_retryable());
        assert!(
            ApiError::Timeout {
                duration: Duration::from_secs(1)
            }
            .is_retryable()
        );
        assert!(map(429).is_retryable());
        assert!(map(500).is_retryable());
        assert!(map(503).is_retryable());
    }

    #[test]
    fn deterministic_errors_are_not_retryable() {
        for status in [400, 401, 403, 404, 409, 418, 422] {
            assert!(!map(status).is_retryable(), "status {status}");
        }
        assert!(!ApiError::Cancelled.is_retryable());
        assert!(!ApiError::InvalidRequest("bad".into()).is_retryable());
    }

    #[test]
    fn default_predicate_forwards_retry_after() {
        let error = ApiError::from_status(
            429,
            ErrorBody::new("slow"),
            FieldErrors::new(),
            Some(Duration::from_secs(3)),
        );

        assert!(RetryOnTransient.should_retry(&error));
        assert_eq!(RetryOnTransient.retry_after(&error), Some(Duration::from_secs(3)));
    }

    #[test]
    fn transport_errors_convert() {
        let timeout = ApiError::from_transport(HttpError::Timeout(None), Duration::from_secs(9));
        assert!(matches!(timeout, ApiError::Timeout { duration } if duration == Duration::from_secs(9)));

        let known = ApiError::from_transport(
            HttpError::Timeout(Some(Duration::from_secs(2))),
            Duration::from_secs(9),
        );
        assert!(matches!(known, ApiError::Timeout { duration } if duration == Duration::from_secs(2)));

        let network = ApiError::from_transport(
            HttpError::Connection(Box::new(std::io::Error::other("refused"))),
            Duration::from_secs(9),
        );
        assert!(matches!(network, ApiError::Network { source: Some(_), .. }));
    }

    #[test]
    fn display_includes_context() {
        assert_eq!(map(404).to_string(), "Not found: boom");
        assert_eq!(map(502).to_string(), "API error (502): boom");
        assert_eq!(
            ApiError::Timeout {
                duration: Duration::from_millis(250)
            }
            .to_string(),
            "Request timed out after 250ms"
        );
    }
}

mod error_body {
    use super::*;

    #[test]
    fn lowercase_keys_are_decoded() {
        let body = json!({
            "message": "One or several required parameters are missing",
            "code": "param_error",
            "details": {"hint": "check Email"},
            "errors": {"Email": "required", "Tag": ["too long", "invalid"]}
        });

        let (decoded, errors) = decode_error_body(Some(&body), "Bad Request");

        assert_eq!(decoded.message, "One or several required parameters are missing");
        assert_eq!(decoded.code.as_deref(), Some("param_error"));
        assert_eq!(decoded.details, Some(json!({"hint": "check Email"})));
        assert_eq!(errors["Email"], vec!["required"]);
        assert_eq!(errors["Tag"], vec!["too long", "invalid"]);
    }

    #[test]
    fn error_key_is_used_when_message_is_absent() {
        let body = json!({"error": "invalid_token"});
        let (decoded, _) = decode_error_body(Some(&body), "Unauthorized");
        assert_eq!(decoded.message, "invalid_token");
    }

    #[test]
    fn provider_capitalised_keys_are_fallbacks() {
        let body = json!({
            "Message": "The ressource does not exist",
            "Type": "ressource_not_found",
            "Errors": {"RessourceNotFound": "Cannot find the user"}
        });

        let (decoded, errors) = decode_error_body(Some(&body), "Not Found");

        assert_eq!(decoded.message, "The ressource does not exist");
        assert_eq!(decoded.code.as_deref(), Some("ressource_not_found"));
        assert_eq!(errors["RessourceNotFound"], vec!["Cannot find the user"]);
    }

    #[test]
    fn missing_body_uses_reason_phrase() {
        let (decoded, errors) = decode_error_body(None, "Service Unavailable");

        assert_eq!(decoded.message, "Service Unavailable");
        assert!(decoded.code.is_none());
        assert!(errors.is_empty());
    }

    #[test]
    fn plain_text_body_becomes_message() {
        let body = json!("upstream connect error");
        let (decoded, _) = decode_error_body(Some(&body), "Bad Gateway");
        assert_eq!(decoded.message, "upstream connect error");
    }

    #[test]
    fn malformed_errors_entries_are_skipped() {
        let body = json!({"errors": {"Amount": 12, "Currency": "unsupported"}});
        let (_, errors) = decode_error_body(Some(&body), "Bad Request");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors["Currency"], vec!["unsupported"]);
    }
}

mod retry_after_header {
    use super::*;

    #[test]
    fn parses_whole_seconds() {
        assert_eq!(parse_retry_after(Some("30")), Some(Duration::from_secs(30)));
        assert_eq!(parse_retry_after(Some(" 5 ")), Some(Duration::from_secs(5)));
    }

    #[test]
    fn ignores_missing_or_http_date_values() {
        assert_eq!(parse_retry_after(None), None);
        assert_eq!(parse_retry_after(Some("Wed, 21 Oct 2015 07:28:00 GMT")), None);
        assert_eq!(parse_retry_after(Some("-1")), None);
    }
}
