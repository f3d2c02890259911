//! # submission-diff-shared
//!
//! Foundational types used by every other crate in the workspace:
//!
//! - Error envelope and the shared `Result` alias
//! - Request-scoped context (correlation id + cooperative cancellation)
//! - Validation traits used at the API boundary
//!
//! This crate has no workspace dependencies.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod context;
pub mod errors;
pub mod result;
pub mod validation;

pub use context::{CancellationToken, CorrelationId, RequestContext};
pub use errors::{
    ErrorClass, ErrorCode, ErrorEnvelope, ErrorKind, ErrorMetadata, UnexpectedError,
    normalize_unexpected_error,
};
pub use result::Result;
pub use validation::{Validate, Validated, ValidationError};

/// Returns the shared crate version.
#[must_use]
pub const fn shared_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
