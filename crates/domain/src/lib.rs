//! # submission-diff-domain
//!
//! Domain model for comparing the source files of submission revisions:
//!
//! - **Primitives** - `SubmissionId`, `TeamId`, `ProblemId`, `LanguageId`
//! - **Files** - `NamedFile` and rank ordering helpers
//! - **Classification** - `classify` producing a `FileChangeSet`
//! - **Revisions** - `SubmissionRevision` and previous-revision selection
//! - **Comparison** - `SubmissionComparison` pairing a submission with its earlier revisions
//!
//! ## Dependency Rules
//!
//! - Depends only on `shared` crate
//! - Pure domain logic with no I/O

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub use submission_diff_shared::shared_crate_version;

pub mod classify;
pub mod comparison;
pub mod file;
pub mod primitives;
pub mod revision;

pub use classify::{ChangedPair, FileChangeSet, classify};
pub use comparison::{RevisionDiff, SubmissionComparison};
pub use file::{NamedFile, find_duplicate_rank, order_by_rank};
pub use primitives::{LanguageId, PrimitiveError, ProblemId, SubmissionId, TeamId};
pub use revision::{RevisionQuery, RevisionScope, SubmissionRevision, select_previous_revision};

/// Returns the domain crate version.
#[must_use]
pub const fn domain_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
