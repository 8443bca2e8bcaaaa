//! Rewrite policy tables and the per-request rewrite context.

use url::Url;

use crate::relay::target::NormalizedTarget;

/// HTML attributes whose value is a single URL routed back through the relay.
pub const LINK_ATTRIBUTES: &[&str] = &["href", "src", "action"];

/// HTML attribute holding a comma-separated candidate list.
pub const SRCSET_ATTRIBUTE: &str = "srcset";

/// HTML attribute values with these prefixes never hit the network through the relay.
pub const HTML_SKIP_PREFIXES: &[&str] = &["#", "data:", "mailto:"];

/// `url(...)` values with these prefixes are left alone.
pub const CSS_SKIP_PREFIXES: &[&str] = &["#", "data:"];

/// Immutable inputs shared by the HTML and CSS rewriters for one request.
#[derive(Debug, Clone)]
pub struct RewriteContext {
    base_url: Url,
    proxy_endpoint: String,
}

impl RewriteContext {
    pub fn new(target: &NormalizedTarget, proxy_endpoint: impl Into<String>) -> Self {
        Self {
            base_url: target.url().clone(),
            proxy_endpoint: proxy_endpoint.into(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn proxy_endpoint(&self) -> &str {
        &self.proxy_endpoint
    }

    /// Resolve a (possibly relative) reference against the base.
    pub fn resolve(&self, reference: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(reference)
    }

    /// Relay URL for an absolute target.
    pub fn proxied(&self, absolute: &Url) -> String {
        format!(
            "{}{}",
            self.proxy_endpoint,
            urlencoding::encode(absolute.as_str())
        )
    }

    /// Rewrite one reference, or `None` when it must be kept as written.
    pub fn rewrite_reference(&self, value: &str, skip_prefixes: &[&str]) -> Option<String> {
        let value = value.trim();
        if value.is_empty() || skip_prefixes.iter().any(|p| value.starts_with(p)) {
            return None;
        }

        match self.resolve(value) {
            Ok(absolute) => Some(self.proxied(&absolute)),
            Err(err) => {
                tracing::trace!(value = %value, error = %err, "Keeping unresolvable reference");
                None
            }
        }
    }
}
