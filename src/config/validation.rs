//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check that enabled features carry the settings they need
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;

use crate::config::schema::{RelayConfig, StorageBackend};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("relay.endpoint_path must start with '/', carry no query and not shadow a built-in route: '{0}'")]
    InvalidEndpointPath(String),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("timeouts.request_secs ({inbound}) must exceed upstream.request_timeout_secs ({upstream})")]
    InboundTimeoutTooShort { inbound: u64, upstream: u64 },

    #[error("auth.enabled requires at least one token")]
    NoAuthTokens,

    #[error("auth.tokens[{0}] has an empty token or user_id")]
    BlankAuthToken(usize),

    #[error("storage.backend = \"sqlite\" requires storage.sqlite_path")]
    MissingSqlitePath,

    #[error("{0} is not a valid header value")]
    InvalidHeaderValue(&'static str),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    let path = &config.relay.endpoint_path;
    if !path.starts_with('/')
        || path.contains('?')
        || path == "/health"
        || path.starts_with("/api/sessions")
    {
        errors.push(ValidationError::InvalidEndpointPath(path.clone()));
    }

    if HeaderValue::from_str(&config.relay.frame_options).is_err() {
        errors.push(ValidationError::InvalidHeaderValue("relay.frame_options"));
    }
    if HeaderValue::from_str(&config.relay.content_security_policy).is_err() {
        errors.push(ValidationError::InvalidHeaderValue("relay.content_security_policy"));
    }
    if HeaderValue::from_str(&config.upstream.default_user_agent).is_err() {
        errors.push(ValidationError::InvalidHeaderValue("upstream.default_user_agent"));
    }

    if config.upstream.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("upstream.request_timeout_secs"));
    }
    if config.upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("upstream.connect_timeout_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.request_secs"));
    } else if config.timeouts.request_secs <= config.upstream.request_timeout_secs {
        errors.push(ValidationError::InboundTimeoutTooShort {
            inbound: config.timeouts.request_secs,
            upstream: config.upstream.request_timeout_secs,
        });
    }

    if config.auth.enabled {
        if config.auth.tokens.is_empty() {
            errors.push(ValidationError::NoAuthTokens);
        }
        for (i, token) in config.auth.tokens.iter().enumerate() {
            if token.token.trim().is_empty() || token.user_id.trim().is_empty() {
                errors.push(ValidationError::BlankAuthToken(i));
            }
        }
    }

    if config.storage.backend == StorageBackend::Sqlite
        && config.storage.sqlite_path.as_deref().map_or(true, |p| p.trim().is_empty())
    {
        errors.push(ValidationError::MissingSqlitePath);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
