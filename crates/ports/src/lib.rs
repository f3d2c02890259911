//! # submission-diff-ports
//!
//! Port traits for the submission-diff hexagonal architecture.
//!
//! This crate defines the interfaces between the domain and infrastructure
//! layers. It depends only on `domain` and `shared`.

use std::future::Future;
use std::pin::Pin;

/// Boxed future used by port traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Returns the ports crate version.
#[must_use]
pub const fn ports_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub mod logger;
pub mod store;

pub use logger::*;
pub use store::*;

// Re-export domain types used in port signatures, so adapter crates can
// implement ports without depending on `submission-diff-domain` directly.
pub use submission_diff_domain::{
    NamedFile, RevisionQuery, RevisionScope, SubmissionId, SubmissionRevision,
};
