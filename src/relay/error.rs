//! Errors surfaced by the relay route.
//!
//! Resolution failures of individual references inside a document are not
//! errors at this level: the rewriters keep the original value and move on.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::http::response::ApiError;

#[derive(Debug, Error)]
pub enum RelayError {
    /// The `url` input was missing, empty, or not a URL after normalization.
    #[error("invalid target: {0}")]
    InvalidTarget(&'static str),

    /// Connection, DNS, timeout, redirect or body read failure.
    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(#[source] reqwest::Error),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::InvalidTarget(_) => StatusCode::BAD_REQUEST,
            RelayError::UpstreamUnreachable(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match self {
            RelayError::InvalidTarget(message) => ApiError::validation(message, "url"),
            RelayError::UpstreamUnreachable(_) => {
                ApiError::new(StatusCode::BAD_GATEWAY, "Proxy fetch failed")
            }
        }
        .into_response()
    }
}
