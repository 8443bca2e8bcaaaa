//! JSON error responses.
//!
//! # Responsibilities
//! - Map handler failures to status codes
//! - Render `{ "message": ..., "field": ... }` bodies the shell understands
//!
//! # Design Decisions
//! - `field` is only present for input validation failures
//! - Internal errors are logged where they happen; the body stays generic

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
}

/// An error rendered as a JSON body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                message: message.into(),
                field: None,
            },
        }
    }

    /// 400 pointing at the offending input field.
    pub fn validation(message: impl Into<String>, field: &'static str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                message: message.into(),
                field: Some(field),
            },
        }
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_omitted_when_absent() {
        let body = serde_json::to_value(ErrorBody {
            message: "Proxy fetch failed".into(),
            field: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "message": "Proxy fetch failed" }));
    }

    #[tokio::test]
    async fn test_validation_response() {
        let response = ApiError::validation("URL is required", "url").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "URL is required", "field": "url" }));
    }
}
