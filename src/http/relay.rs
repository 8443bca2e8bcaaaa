use std::time::Instant;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Extension,
};

use crate::http::request::request_id;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::relay::{self, ProxyRequest, RelayError, RewriteContext};
use crate::security::auth::AuthenticatedUser;

/// `GET /relay?url=<target>`: fetch the target and rewrite it for the shell.
pub async fn relay_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    query: Result<Query<ProxyRequest>, QueryRejection>,
    headers: HeaderMap,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&headers).to_string();

    // A repeated or malformed `url` parameter is a validation failure, not
    // an extractor error.
    let request = match query {
        Ok(Query(request)) => request,
        Err(rejection) => {
            tracing::info!(
                request_id = %request_id,
                user = %user.id,
                error = %rejection.body_text(),
                "Rejected relay query"
            );
            let error = ApiError::validation("Invalid URL", "url");
            metrics::record_request("error", error.status().as_u16(), start_time);
            return error.into_response();
        }
    };

    match relay_once(&state, &request, &headers).await {
        Ok((kind, response)) => {
            tracing::info!(
                request_id = %request_id,
                user = %user.id,
                url = %request.target_url,
                status = response.status().as_u16(),
                kind = kind.as_str(),
                "Relayed"
            );
            metrics::record_request(kind.as_str(), response.status().as_u16(), start_time);
            response
        }
        Err(err) => {
            tracing::info!(
                request_id = %request_id,
                user = %user.id,
                url = %request.target_url,
                error = %err,
                "Relay failed"
            );
            metrics::record_request("error", err.status().as_u16(), start_time);
            err.into_response()
        }
    }
}

async fn relay_once(
    state: &AppState,
    request: &ProxyRequest,
    headers: &HeaderMap,
) -> Result<(relay::ContentKind, Response), RelayError> {
    let target = relay::normalize(&request.target_url)?;
    let upstream = state
        .fetcher
        .fetch(&target, headers.get(header::USER_AGENT))
        .await?;

    let kind = relay::ContentKind::detect(upstream.content_type_str());
    let ctx = RewriteContext::new(&target, &*state.proxy_endpoint);

    Ok((kind, relay::emit(upstream, &ctx, &state.embedding_headers)))
}
