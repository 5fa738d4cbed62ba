//! API errors with structured JSON bodies.
//!
//! Internal failures are logged with full detail but reach the client only as
//! a fixed code and message.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use medguide_ai::InferenceError;
use medguide_chat::ChatError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Inference failed: {0}")]
    Inference(#[from] InferenceError),
    #[error("Chat assistant not configured")]
    ChatDisabled,
    #[error("Chat provider failed: {0}")]
    Upstream(#[from] ChatError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::Inference(err) => {
                tracing::error!(error = %err, "inference failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INFERENCE_FAILED",
                    "Could not produce a prediction for these symptoms".to_string(),
                )
            }
            ApiError::ChatDisabled => (
                StatusCode::SERVICE_UNAVAILABLE,
                "CHAT_DISABLED",
                "The chat assistant is not available".to_string(),
            ),
            ApiError::Upstream(err) => {
                tracing::warn!(error = %err, "chat provider failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "The chat assistant could not answer right now".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn bad_request_returns_400_with_detail() {
        let response = ApiError::BadRequest("missing body".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert_eq!(json["error"]["message"], "missing body");
    }

    #[tokio::test]
    async fn inference_error_hides_detail() {
        let err = ApiError::from(InferenceError::Backend("segfault in tree 3".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "INFERENCE_FAILED");
        assert!(!json["error"]["message"].as_str().unwrap().contains("segfault"));
    }

    #[tokio::test]
    async fn upstream_error_hides_detail() {
        let err = ApiError::from(ChatError::Server {
            status: 401,
            body: "invalid api key sk-123".into(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "UPSTREAM_ERROR");
        assert!(!json["error"]["message"].as_str().unwrap().contains("sk-123"));
    }

    #[tokio::test]
    async fn chat_disabled_returns_503() {
        let response = ApiError::ChatDisabled.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "CHAT_DISABLED");
    }
}
