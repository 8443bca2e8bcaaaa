//! Web content relay.
//!
//! Fetches third-party pages on behalf of a browser shell and rewrites
//! every reference in them so follow-up loads come back through the relay.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;
pub mod security;
pub mod sessions;

pub use config::schema::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
