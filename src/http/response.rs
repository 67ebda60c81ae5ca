//! HTTP response building module
//!
//! Pure mapping from a request `Outcome` to status, headers and JSON body.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::CONTENT_TYPE;
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};
use serde::Serialize;
use serde_json::json;

use crate::chat::ChatResult;
use crate::handler::{ChatOutcome, Outcome};

/// CORS headers attached to every chat response
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type, Authorization"),
];

pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Only POST method is allowed";
pub const REQUEST_FAILED_MESSAGE: &str =
    "Failed to process request. Check if the request body is valid JSON.";

const JSON_CONTENT_TYPE: &str = "application/json";
const INTERNAL_ERROR_BODY: &str = r#"{"error":"Internal Server Error"}"#;

/// Build the response for a request outcome
pub fn build_response(outcome: &Outcome) -> Response<Full<Bytes>> {
    match outcome {
        Outcome::Routed(chat) => build_chat_response(chat),
        Outcome::NotFound => build_404_response(),
        Outcome::InternalError => build_500_response(),
    }
}

/// Status code chosen for a chat outcome
pub fn chat_status(outcome: &ChatOutcome) -> StatusCode {
    match outcome {
        ChatOutcome::Preflight => StatusCode::NO_CONTENT,
        ChatOutcome::MethodRejected => StatusCode::METHOD_NOT_ALLOWED,
        ChatOutcome::RequestFailed { .. } => StatusCode::BAD_REQUEST,
        ChatOutcome::Completed(result) => {
            if result.success {
                StatusCode::OK
            } else {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

fn build_chat_response(outcome: &ChatOutcome) -> Response<Full<Bytes>> {
    let status = chat_status(outcome);
    match outcome {
        ChatOutcome::Preflight => with_cors(Response::builder().status(status))
            .body(Full::new(Bytes::new()))
            .unwrap_or_else(|e| {
                log_build_error("OPTIONS", &e);
                Response::new(Full::new(Bytes::new()))
            }),
        ChatOutcome::MethodRejected => build_json_response(
            status,
            &json!({ "error": METHOD_NOT_ALLOWED_MESSAGE }),
            true,
        ),
        ChatOutcome::RequestFailed { details } => build_json_response(
            status,
            &ChatResult::failure(REQUEST_FAILED_MESSAGE, details),
            true,
        ),
        ChatOutcome::Completed(result) => build_json_response(status, result, true),
    }
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_json_response(StatusCode::NOT_FOUND, &json!({ "error": "Not Found" }), false)
}

/// Build 500 Internal Server Error response
///
/// Only reachable from the chat paths, so it carries the CORS headers too.
pub fn build_500_response() -> Response<Full<Bytes>> {
    with_cors(Response::builder())
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
        .body(Full::new(Bytes::from_static(INTERNAL_ERROR_BODY.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error("500", &e);
            Response::new(Full::new(Bytes::from_static(INTERNAL_ERROR_BODY.as_bytes())))
        })
}

/// Build compact JSON response, falling back to 500 if serialization fails
fn build_json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
    cors: bool,
) -> Response<Full<Bytes>> {
    let json = match serde_json::to_string(body) {
        Ok(j) => j,
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            return build_500_response();
        }
    };

    let mut builder = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, JSON_CONTENT_TYPE);
    if cors {
        builder = with_cors(builder);
    }

    builder.body(Full::new(Bytes::from(json))).unwrap_or_else(|e| {
        log_build_error(status.as_str(), &e);
        build_500_response()
    })
}

fn with_cors(builder: Builder) -> Builder {
    CORS_HEADERS
        .iter()
        .fold(builder, |b, (name, value)| b.header(*name, *value))
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::Value;

    async fn body_json(response: Response<Full<Bytes>>) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn assert_cors(response: &Response<Full<Bytes>>) {
        for (name, value) in CORS_HEADERS {
            assert_eq!(response.headers()[name], value, "header {name}");
        }
    }

    #[tokio::test]
    async fn test_preflight_is_empty_with_cors_only() {
        let response = build_response(&Outcome::Routed(ChatOutcome::Preflight));
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_cors(&response);
        assert!(response.headers().get(CONTENT_TYPE).is_none());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_method_rejected() {
        let response = build_response(&Outcome::Routed(ChatOutcome::MethodRejected));
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_cors(&response);
        assert_eq!(response.headers()[CONTENT_TYPE], JSON_CONTENT_TYPE);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Only POST method is allowed"})
        );
    }

    #[tokio::test]
    async fn test_request_failed_carries_details() {
        let response = build_response(&Outcome::Routed(ChatOutcome::RequestFailed {
            details: "expected value at line 1 column 1".to_string(),
        }));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_cors(&response);
        assert_eq!(
            body_json(response).await,
            json!({
                "success": false,
                "error": REQUEST_FAILED_MESSAGE,
                "details": "expected value at line 1 column 1"
            })
        );
    }

    #[tokio::test]
    async fn test_completed_status_follows_success_flag() {
        let ok: ChatResult = serde_json::from_value(json!({"success": true, "output": "hi"})).unwrap();
        let response = build_response(&Outcome::Routed(ChatOutcome::Completed(ok)));
        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response);
        assert_eq!(body_json(response).await, json!({"success": true, "output": "hi"}));

        let failed: ChatResult =
            serde_json::from_value(json!({"success": false, "error": "quota exceeded"})).unwrap();
        let response = build_response(&Outcome::Routed(ChatOutcome::Completed(failed)));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_cors(&response);
        assert_eq!(
            body_json(response).await,
            json!({"success": false, "error": "quota exceeded"})
        );
    }

    #[tokio::test]
    async fn test_not_found_and_internal_error() {
        let response = build_response(&Outcome::NotFound);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[CONTENT_TYPE], JSON_CONTENT_TYPE);
        assert!(response.headers().get("Access-Control-Allow-Origin").is_none());
        assert_eq!(body_json(response).await, json!({"error": "Not Found"}));

        let response = build_response(&Outcome::InternalError);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_cors(&response);
        assert_eq!(body_json(response).await, json!({"error": "Internal Server Error"}));
    }
}
