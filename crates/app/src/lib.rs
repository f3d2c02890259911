//! # submission-diff-app
//!
//! Application use cases for comparing submission revisions.
//! This crate depends on `ports`, `domain`, and `shared`.

pub mod classify_files;
pub mod compare_submission;
mod logging;

pub use classify_files::{ClassifyFilesDeps, ClassifyFilesInput, classify_files};
pub use compare_submission::{CompareSubmissionDeps, CompareSubmissionInput, compare_submission};

/// Returns the app crate version.
#[must_use]
pub const fn app_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
