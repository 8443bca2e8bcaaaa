//! Embedding header overrides.
//!
//! # Responsibilities
//! - Force `X-Frame-Options` so relayed pages render inside the shell's frame
//! - Force a `Content-Security-Policy` loose enough for relayed sub-resources
//!
//! # Design Decisions
//! - Values are validated once at startup, then cloned per response
//! - Upstream values for these headers are never forwarded

use axum::http::header::{self, InvalidHeaderValue};
use axum::http::{HeaderMap, HeaderValue};

use crate::config::RelayEndpointConfig;

/// Header values applied to every relayed response.
#[derive(Debug, Clone)]
pub struct EmbeddingHeaders {
    frame_options: HeaderValue,
    content_security_policy: HeaderValue,
}

impl EmbeddingHeaders {
    pub fn from_config(config: &RelayEndpointConfig) -> Result<Self, InvalidHeaderValue> {
        Ok(Self {
            frame_options: HeaderValue::from_str(&config.frame_options)?,
            content_security_policy: HeaderValue::from_str(&config.content_security_policy)?,
        })
    }

    /// Overwrite both headers on `headers`.
    pub fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(header::X_FRAME_OPTIONS, self.frame_options.clone());
        headers.insert(
            header::CONTENT_SECURITY_POLICY,
            self.content_security_policy.clone(),
        );
    }
}

impl Default for EmbeddingHeaders {
    fn default() -> Self {
        Self {
            frame_options: HeaderValue::from_static("ALLOWALL"),
            content_security_policy: HeaderValue::from_static(
                "default-src * 'unsafe-inline' 'unsafe-eval' data: blob:;",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_upstream_values() {
        let mut headers = HeaderMap::new();
        headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
        headers.append(header::CONTENT_SECURITY_POLICY, HeaderValue::from_static("frame-ancestors 'none'"));
        headers.append(header::CONTENT_SECURITY_POLICY, HeaderValue::from_static("default-src 'self'"));

        EmbeddingHeaders::default().apply(&mut headers);

        assert_eq!(headers[header::X_FRAME_OPTIONS], "ALLOWALL");
        let csp: Vec<_> = headers.get_all(header::CONTENT_SECURITY_POLICY).iter().collect();
        assert_eq!(csp, vec!["default-src * 'unsafe-inline' 'unsafe-eval' data: blob:;"]);
    }

    #[test]
    fn test_defaults_match_config_defaults() {
        let from_config = EmbeddingHeaders::from_config(&RelayEndpointConfig::default()).unwrap();
        let default = EmbeddingHeaders::default();
        assert_eq!(from_config.frame_options, default.frame_options);
        assert_eq!(from_config.content_security_policy, default.content_security_policy);
    }
}
