//! Authentication gate.
//! Every relay and session-history call must pass through here first.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::AuthConfig;
use crate::http::response::ApiError;

/// Identity attached to requests that passed the gate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: String,
}

/// Bearer-token gate built from configuration.
#[derive(Debug)]
pub struct AuthGate {
    enabled: bool,
    anonymous_user: String,
    tokens: HashMap<String, String>,
}

impl AuthGate {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            enabled: config.enabled,
            anonymous_user: config.anonymous_user.clone(),
            tokens: config
                .tokens
                .iter()
                .map(|t| (t.token.clone(), t.user_id.clone()))
                .collect(),
        }
    }

    /// Identify the caller, or `None` when the request must be rejected.
    pub fn authenticate(&self, headers: &HeaderMap) -> Option<AuthenticatedUser> {
        if !self.enabled {
            return Some(AuthenticatedUser {
                id: self.anonymous_user.clone(),
            });
        }

        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))?;

        self.tokens
            .get(token.trim())
            .map(|user_id| AuthenticatedUser { id: user_id.clone() })
    }
}

pub async fn require_user(
    State(gate): State<Arc<AuthGate>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match gate.authenticate(req.headers()) {
        Some(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        None => {
            tracing::warn!(path = %req.uri().path(), "Rejected unauthenticated request");
            ApiError::new(StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
        }
    }
}
