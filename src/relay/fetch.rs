//! Upstream fetching.
//!
//! # Responsibilities
//! - Issue the outbound GET for a normalized target
//! - Follow redirects; only the final response is surfaced
//! - Enforce connect and total timeouts
//! - Buffer the complete body for the rewriters
//!
//! # Design Decisions
//! - No retries: one failure signal per relay call
//! - The fetch future lives inside the handler future, so a caller
//!   disconnect drops the outbound request with it

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use reqwest::redirect::Policy;
use url::Url;

use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::relay::error::RelayError;
use crate::relay::target::NormalizedTarget;

/// Fully buffered response from the target.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// Where the redirect chain ended.
    pub final_url: Url,
}

impl UpstreamResponse {
    pub fn content_type_str(&self) -> Option<&str> {
        self.content_type.as_ref().and_then(|v| v.to_str().ok())
    }
}

/// Outbound HTTP client for relay calls.
#[derive(Debug, Clone)]
pub struct UpstreamFetcher {
    client: reqwest::Client,
    default_user_agent: HeaderValue,
}

impl UpstreamFetcher {
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .redirect(Policy::limited(config.max_redirects))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));

        if !config.honor_env_proxy {
            builder = builder.no_proxy();
        }

        let default_user_agent = HeaderValue::from_str(&config.default_user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("web-relay"));

        Ok(Self {
            client: builder.build()?,
            default_user_agent,
        })
    }

    /// Fetch `target`, forwarding the caller's User-Agent when present.
    pub async fn fetch(
        &self,
        target: &NormalizedTarget,
        user_agent: Option<&HeaderValue>,
    ) -> Result<UpstreamResponse, RelayError> {
        let user_agent = user_agent
            .cloned()
            .unwrap_or_else(|| self.default_user_agent.clone());

        let response = self
            .client
            .get(target.url().clone())
            .header(header::USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|err| fetch_failed(target, err))?;

        let status = response.status();
        let headers = response.headers().clone();
        let final_url = response.url().clone();
        let body = response
            .bytes()
            .await
            .map_err(|err| fetch_failed(target, err))?;

        tracing::debug!(
            url = %target,
            final_url = %final_url,
            status = %status,
            bytes = body.len(),
            "Upstream fetch complete"
        );

        Ok(UpstreamResponse {
            status,
            content_type: headers.get(header::CONTENT_TYPE).cloned(),
            headers,
            body,
            final_url,
        })
    }
}

fn fetch_failed(target: &NormalizedTarget, err: reqwest::Error) -> RelayError {
    tracing::warn!(
        url = %target,
        timeout = err.is_timeout(),
        connect = err.is_connect(),
        redirect = err.is_redirect(),
        error = %err,
        "Proxy fetch failed"
    );
    metrics::record_upstream_failure();
    RelayError::UpstreamUnreachable(err)
}
