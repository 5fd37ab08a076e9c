//! Tests for the transport message types and the `HttpClient` seam.

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};
use std::time::Duration;

fn sandbox_url() -> url::Url {
    url::Url::parse("https://api.sandbox.mangopay.com/v2.01/").unwrap()
}

fn get(url: url::Url) -> HttpRequest {
    HttpRequest::new(http::Method::GET, url)
}

mod http_request {
    use super::*;

    #[test]
    fn new_creates_request_with_method_and_url() {
        let req = HttpRequest::new(http::Method::PUT, sandbox_url());

        assert_eq!(req.method, http::Method::PUT);
        assert_eq!(req.url, sandbox_url());
        assert!(req.headers.is_empty());
        assert!(req.body.is_none());
        assert!(req.timeout.is_none());
    }

    #[test]
    fn with_timeout_sets_timeout() {
        let req = get(sandbox_url()).with_timeout(Duration::from_secs(12));
        assert_eq!(req.timeout, Some(Duration::from_secs(12)));
    }

    #[test]
    fn with_header_appends_multiple_values_for_same_name() {
        let req = get(sandbox_url())
            .with_header(
                http::header::ACCEPT,
                http::HeaderValue::from_static("text/plain"),
            )
            .with_header(
                http::header::ACCEPT,
                http::HeaderValue::from_static("application/json"),
            );

        assert_eq!(req.headers.get_all(http::header::ACCEPT).iter().count(), 2);
    }

    #[test]
    fn builder_pattern_chains_correctly() {
        let req = HttpRequest::new(http::Method::POST, sandbox_url())
            .with_body(b"{}".to_vec())
            .with_header(
                http::header::AUTHORIZATION,
                http::HeaderValue::from_static("Bearer token"),
            );

        assert_eq!(req.body, Some(b"{}".to_vec()));
        assert!(req.headers.contains_key(http::header::AUTHORIZATION));
    }
}

mod http_response {
    use super::*;

    #[test]
    fn is_success_only_for_2xx() {
        for status in [http::StatusCode::OK, http::StatusCode::NO_CONTENT] {
            let resp = HttpResponse::new(status, http::HeaderMap::new(), vec![]);
            assert!(resp.is_success(), "Expected {status} to be success");
        }
        for status in [
            http::StatusCode::BAD_REQUEST,
            http::StatusCode::TOO_MANY_REQUESTS,
            http::StatusCode::BAD_GATEWAY,
        ] {
            let resp = HttpResponse::new(status, http::HeaderMap::new(), vec![]);
            assert!(!resp.is_success(), "Expected {status} to not be success");
        }
    }

    #[test]
    fn header_str_reads_first_value() {
        let mut headers = http::HeaderMap::new();
        headers.insert(http::header::RETRY_AFTER, http::HeaderValue::from_static("7"));
        let resp = HttpResponse::new(http::StatusCode::TOO_MANY_REQUESTS, headers, vec![]);

        assert_eq!(resp.header_str(http::header::RETRY_AFTER), Some("7"));
        assert_eq!(resp.header_str("x-missing"), None);
    }
}

mod http_error {
    use super::*;
    use std::error::Error;

    #[test]
    fn connection_error_preserves_source() {
        let error = HttpError::Connection(Box::new(std::io::Error::other("reset by peer")));

        assert!(error.to_string().contains("Connection error"));
        assert!(error.source().unwrap().to_string().contains("reset by peer"));
    }

    #[test]
    fn timeout_displays_duration_when_known() {
        assert_eq!(HttpError::Timeout(None).to_string(), "Request timed out");
        assert_eq!(
            HttpError::Timeout(Some(Duration::from_millis(1500))).to_string(),
            "Request timed out after 1500ms"
        );
    }

    #[test]
    fn invalid_request_displays_reason() {
        let error = HttpError::InvalidRequest("missing scheme".to_string());
        assert!(error.to_string().contains("missing scheme"));
        assert!(error.source().is_none());
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpError>();
    }
}

mod http_client_trait {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingClient {
        calls: AtomicUsize,
    }

    impl HttpClient for CountingClient {
        async fn request(&self, _req: HttpRequest) -> Result<HttpResponse, HttpError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(HttpResponse::new(
                http::StatusCode::OK,
                http::HeaderMap::new(),
                vec![],
            ))
        }
    }

    #[tokio::test]
    async fn arc_wrapped_client_delegates() {
        let client = Arc::new(CountingClient {
            calls: AtomicUsize::new(0),
        });
        let shared = Arc::clone(&client);

        shared.request(get(sandbox_url())).await.unwrap();
        shared.request(get(sandbox_url())).await.unwrap();

        assert_eq!(client.calls.load(Ordering::SeqCst), 2);
    }
}
