//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → auth.rs (bearer token → AuthenticatedUser, or 401)
//!     → handler
//! Relayed response:
//!     → headers.rs (framing overrides so the shell can embed the page)
//! ```
//!
//! # Design Decisions
//! - Fail closed: an unknown token is rejected, never downgraded to anonymous
//! - Framing overrides are applied last and always win over upstream values

pub mod auth;
pub mod headers;

pub use auth::{AuthGate, AuthenticatedUser};
pub use headers::EmbeddingHeaders;
