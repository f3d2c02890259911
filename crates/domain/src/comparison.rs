//! Outcome of comparing a submission against its earlier revisions.

use crate::{FileChangeSet, SubmissionRevision};

/// Changes of the current submission relative to one earlier revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionDiff {
    /// Revision the current files were compared against.
    pub revision: SubmissionRevision,
    /// Classification of current files against that revision's files.
    pub changes: FileChangeSet,
}

/// Comparison of one submission against its previous and original revisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionComparison {
    /// Submission being inspected.
    pub submission: SubmissionRevision,
    /// Latest earlier revision in the same lineage, if any.
    ///
    /// `None` for a first revision. No diff against an empty file list is
    /// produced, so callers wanting "every file added" must derive it.
    pub previous: Option<RevisionDiff>,
    /// Submission this one was edited from, if any.
    pub original: Option<RevisionDiff>,
}

impl SubmissionComparison {
    /// Returns true when neither comparison target exists.
    #[must_use]
    pub const fn is_first_revision(&self) -> bool {
        self.previous.is_none() && self.original.is_none()
    }
}
