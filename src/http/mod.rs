//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → security::auth (resolve the caller)
//!     → relay.rs (fetch + rewrite) | sessions.rs (history) | status.rs
//!     → response.rs (JSON error bodies)
//!     → Send to client
//! ```

pub mod relay;
pub mod request;
pub mod response;
pub mod server;
pub mod sessions;
pub mod status;

pub use request::{MakeRelayRequestId, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{AppState, HttpServer, ServerError};
