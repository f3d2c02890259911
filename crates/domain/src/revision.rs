//! Submission revisions and the rules for picking comparison targets.

use crate::{LanguageId, ProblemId, SubmissionId, TeamId};
use serde::{Deserialize, Serialize};

/// Metadata of one submission revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRevision {
    /// Submission identifier.
    pub id: SubmissionId,
    /// Submitting team.
    pub team_id: TeamId,
    /// Problem the submission targets.
    pub problem_id: ProblemId,
    /// Language of the source files.
    pub language_id: LanguageId,
    /// Submit time in milliseconds since the Unix epoch.
    pub submit_time_ms: i64,
    /// Submission this one was edited from, for jury edits and resubmissions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_submission_id: Option<SubmissionId>,
    /// Entry point (main class or file), when the language needs one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_point: Option<Box<str>>,
}

/// Which submissions count as earlier revisions of the same work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevisionScope {
    /// Submissions of one team.
    Team(TeamId),
    /// Edits derived from one original submission, regardless of team.
    EditsOf(SubmissionId),
}

/// Candidate filter for earlier revisions of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionQuery {
    /// Problem all candidates must share.
    pub problem_id: ProblemId,
    /// Language all candidates must share.
    pub language_id: LanguageId,
    /// Team or edit lineage.
    pub scope: RevisionScope,
}

impl RevisionQuery {
    /// Query for the earlier revisions of `current`.
    ///
    /// Edited submissions are compared within their edit lineage; everything
    /// else within the submitting team.
    #[must_use]
    pub fn previous_of(current: &SubmissionRevision) -> Self {
        let scope = current.original_submission_id.as_ref().map_or_else(
            || RevisionScope::Team(current.team_id.clone()),
            |original| RevisionScope::EditsOf(original.clone()),
        );
        Self {
            problem_id: current.problem_id.clone(),
            language_id: current.language_id.clone(),
            scope,
        }
    }

    /// Returns true when `revision` belongs to the queried lineage.
    #[must_use]
    pub fn matches(&self, revision: &SubmissionRevision) -> bool {
        if revision.problem_id != self.problem_id || revision.language_id != self.language_id {
            return false;
        }
        match &self.scope {
            RevisionScope::Team(team_id) => revision.team_id == *team_id,
            RevisionScope::EditsOf(original) => {
                revision.original_submission_id.as_ref() == Some(original)
            },
        }
    }
}

/// Pick the latest revision submitted strictly before `current`.
///
/// Candidates outside [`RevisionQuery::previous_of`] are ignored, as is
/// `current` itself. Equal submit times resolve to the later candidate.
#[must_use]
pub fn select_previous_revision<'a>(
    current: &SubmissionRevision,
    candidates: &'a [SubmissionRevision],
) -> Option<&'a SubmissionRevision> {
    let query = RevisionQuery::previous_of(current);
    candidates
        .iter()
        .filter(|candidate| candidate.id != current.id)
        .filter(|candidate| candidate.submit_time_ms < current.submit_time_ms)
        .filter(|candidate| query.matches(candidate))
        .max_by_key(|candidate| candidate.submit_time_ms)
}
