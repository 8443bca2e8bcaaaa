//! Session history routes used by the shell's history drawer.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::security::auth::AuthenticatedUser;
use crate::sessions::{NewSession, StoreError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionBody {
    #[serde(default)]
    pub url: String,
    pub title: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ClearedSessions {
    pub deleted: usize,
}

fn store_failure(err: StoreError) -> Response {
    tracing::error!(error = %err, "Session store failure");
    ApiError::internal().into_response()
}

pub async fn list_sessions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Response {
    match state.store.list(&user.id) {
        Ok(sessions) => Json(sessions).into_response(),
        Err(e) => store_failure(e),
    }
}

pub async fn create_session(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Result<Json<CreateSessionBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return ApiError::new(rejection.status(), rejection.body_text()).into_response();
        }
    };

    if body.url.trim().is_empty() {
        return ApiError::validation("URL is required", "url").into_response();
    }

    let new_session = NewSession {
        user_id: user.id,
        url: body.url,
        title: body.title,
        is_active: body.is_active.unwrap_or(true),
    };

    match state.store.create(new_session) {
        Ok(session) => {
            tracing::debug!(id = session.id, user = %session.user_id, "Session recorded");
            (StatusCode::CREATED, Json(session)).into_response()
        }
        Err(e) => store_failure(e),
    }
}

pub async fn delete_session(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Response {
    match state.store.delete(id, &user.id) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => ApiError::new(StatusCode::NOT_FOUND, "Session not found").into_response(),
        Err(e) => store_failure(e),
    }
}

/// `DELETE /api/sessions`: forget the caller's whole history.
pub async fn clear_sessions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Response {
    match state.store.delete_by_user(&user.id) {
        Ok(deleted) => {
            tracing::info!(user = %user.id, deleted, "Session history cleared");
            Json(ClearedSessions { deleted }).into_response()
        }
        Err(e) => store_failure(e),
    }
}
