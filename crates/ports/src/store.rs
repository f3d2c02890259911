//! Submission storage boundary contracts.

use crate::BoxFuture;
use submission_diff_domain::{NamedFile, RevisionQuery, SubmissionId, SubmissionRevision};
use submission_diff_shared::{RequestContext, Result};

/// Read access to the source files of stored submissions.
pub trait SubmissionFileStore: Send + Sync {
    /// Files of one submission, in rank order.
    ///
    /// Unknown submissions fail with `core:not_found`.
    fn files_of<'a>(
        &'a self,
        ctx: &'a RequestContext,
        submission_id: &'a SubmissionId,
    ) -> BoxFuture<'a, Result<Vec<NamedFile>>>;
}

/// Read access to submission revision metadata.
pub trait SubmissionRevisionStore: Send + Sync {
    /// Metadata of one submission.
    ///
    /// Unknown submissions fail with `core:not_found`.
    fn revision<'a>(
        &'a self,
        ctx: &'a RequestContext,
        submission_id: &'a SubmissionId,
    ) -> BoxFuture<'a, Result<SubmissionRevision>>;

    /// Every stored revision matching `query`, in any order.
    fn revisions_of<'a>(
        &'a self,
        ctx: &'a RequestContext,
        query: &'a RevisionQuery,
    ) -> BoxFuture<'a, Result<Vec<SubmissionRevision>>>;
}
