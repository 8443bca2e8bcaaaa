//! Response emission.
//!
//! Picks a rewriter from the upstream content type, forces the embedding
//! headers and hands the body back with the upstream status code.

use axum::body::Body;
use axum::http::{header, HeaderValue};
use axum::response::Response;

use crate::observability::metrics;
use crate::relay::fetch::UpstreamResponse;
use crate::relay::policy::RewriteContext;
use crate::relay::{css, html};
use crate::security::headers::EmbeddingHeaders;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// How a response body is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Html,
    Css,
    Passthrough,
}

impl ContentKind {
    /// HTML wins over CSS; anything else is passed through.
    pub fn detect(content_type: Option<&str>) -> Self {
        let Some(content_type) = content_type else {
            return ContentKind::Passthrough;
        };
        let content_type = content_type.to_ascii_lowercase();
        if content_type.contains("text/html") {
            ContentKind::Html
        } else if content_type.contains("text/css") {
            ContentKind::Css
        } else {
            ContentKind::Passthrough
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Html => "html",
            ContentKind::Css => "css",
            ContentKind::Passthrough => "passthrough",
        }
    }
}

/// Build the caller-facing response for an upstream response.
pub fn emit(
    upstream: UpstreamResponse,
    ctx: &RewriteContext,
    overrides: &EmbeddingHeaders,
) -> Response {
    let kind = ContentKind::detect(upstream.content_type_str());
    let content_type = upstream
        .content_type
        .clone()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));

    let body = match kind {
        ContentKind::Html | ContentKind::Css => {
            let text = String::from_utf8_lossy(&upstream.body);
            let rewritten = if kind == ContentKind::Html {
                html::rewrite(&text, ctx)
            } else {
                css::rewrite(&text, ctx)
            };

            tracing::debug!(
                kind = kind.as_str(),
                input_bytes = upstream.body.len(),
                output_bytes = rewritten.len(),
                "Body rewritten"
            );
            metrics::record_rewrite(kind.as_str(), rewritten.len());

            Body::from(rewritten)
        }
        ContentKind::Passthrough => Body::from(upstream.body),
    };

    let mut response = Response::new(body);
    *response.status_mut() = upstream.status;
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, content_type);
    overrides.apply(headers);
    response
}
