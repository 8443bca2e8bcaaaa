//! Relay subsystem: fetch a third-party resource and rewrite it so every
//! same-document reference routes back through the relay.
//!
//! # Data Flow
//! ```text
//! GET /relay?url=<target>
//!     → target.rs (normalize: bare host → https://, parse)
//!     → fetch.rs (GET upstream, follow redirects, buffer body)
//!     → emit.rs (pick rewriter by content type, force embedding headers)
//!         → html.rs (attributes, srcset, <base>, <style>)
//!         → css.rs (url(...) tokens)
//!         → passthrough (everything else, bytes untouched)
//! ```
//!
//! # Design Decisions
//! - Stateless: every value here lives for one inbound call
//! - Rewriting never fails the response; unresolvable references stay as written
//! - Policy (rewritten attributes, skipped prefixes) lives in policy.rs tables

pub mod css;
pub mod emit;
pub mod error;
pub mod fetch;
pub mod html;
pub mod policy;
pub mod target;

pub use emit::{emit, ContentKind};
pub use error::RelayError;
pub use fetch::{UpstreamFetcher, UpstreamResponse};
pub use policy::RewriteContext;
pub use target::{normalize, NormalizedTarget, ProxyRequest};
