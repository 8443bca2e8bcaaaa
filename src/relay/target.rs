//! Target normalization.
//!
//! Turns whatever the shell typed into the address bar into an absolute URL.
//! Bare hosts get `https://`; anything already carrying `http://` or
//! `https://` is kept verbatim.

use std::fmt;

use serde::Deserialize;
use url::Url;

use crate::relay::error::RelayError;

const DEFAULT_SCHEME_PREFIX: &str = "https://";

/// Query parameters of the relay route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProxyRequest {
    /// Absolute or bare target, e.g. `example.com/page`.
    #[serde(rename = "url", default)]
    pub target_url: String,
}

/// An absolute target URL, used both for fetching and as the rewrite base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTarget {
    normalized: String,
    url: Url,
}

impl NormalizedTarget {
    /// The normalized input string.
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// The parsed form.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for NormalizedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}

fn has_http_scheme(raw: &str) -> bool {
    let starts_with = |prefix: &str| {
        raw.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    };
    starts_with("http://") || starts_with("https://")
}

/// Normalize a caller-supplied target.
pub fn normalize(raw: &str) -> Result<NormalizedTarget, RelayError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(RelayError::InvalidTarget("URL is required"));
    }

    let normalized = if has_http_scheme(raw) {
        raw.to_string()
    } else {
        format!("{DEFAULT_SCHEME_PREFIX}{raw}")
    };

    let url = Url::parse(&normalized).map_err(|_| RelayError::InvalidTarget("Invalid URL"))?;

    Ok(NormalizedTarget { normalized, url })
}
