//! Compare a stored submission against its previous and original revisions.

use crate::logging::{change_counts, duration_ms, field, log_failure};
use std::sync::Arc;
use std::time::Instant;
use submission_diff_domain::{
    NamedFile, RevisionDiff, RevisionQuery, SubmissionComparison, SubmissionId,
    SubmissionRevision, classify, select_previous_revision,
};
use submission_diff_ports::{LogFields, LoggerPort, SubmissionFileStore, SubmissionRevisionStore};
use submission_diff_shared::{RequestContext, Result};

/// Input payload for comparing a submission.
#[derive(Debug, Clone)]
pub struct CompareSubmissionInput {
    /// Submission to compare.
    pub submission_id: SubmissionId,
}

/// Dependencies required by compare-submission.
#[derive(Clone)]
pub struct CompareSubmissionDeps {
    /// Source file reader.
    pub file_store: Arc<dyn SubmissionFileStore>,
    /// Revision metadata reader.
    pub revision_store: Arc<dyn SubmissionRevisionStore>,
    /// Optional logger.
    pub logger: Option<Arc<dyn LoggerPort>>,
}

/// Classify a submission's files against the latest earlier revision in its
/// lineage and, for edited submissions, against the original.
#[tracing::instrument(
    name = "compare_submission",
    skip_all,
    fields(submission_id = %input.submission_id)
)]
pub async fn compare_submission(
    ctx: &RequestContext,
    deps: &CompareSubmissionDeps,
    input: &CompareSubmissionInput,
) -> Result<SubmissionComparison> {
    let started_at = Instant::now();
    if let Some(logger) = deps.logger.as_ref() {
        logger.info(
            "app.compareSubmission.start",
            "Compare submission started",
            Some(log_fields_start(input)),
        );
    }

    match run_compare(ctx, deps, input).await {
        Ok(comparison) => {
            if let Some(logger) = deps.logger.as_ref() {
                logger.info(
                    "app.compareSubmission.completed",
                    "Compare submission completed",
                    Some(log_fields_completed_comparison(&comparison, started_at)),
                );
            }
            Ok(comparison)
        },
        Err(error) => {
            log_failure(
                deps.logger.as_deref(),
                "app.compareSubmission",
                "Compare submission",
                duration_ms(started_at),
                &error,
            );
            Err(error)
        },
    }
}

async fn run_compare(
    ctx: &RequestContext,
    deps: &CompareSubmissionDeps,
    input: &CompareSubmissionInput,
) -> Result<SubmissionComparison> {
    ctx.ensure_not_cancelled("compare_submission.start")?;
    let submission = deps
        .revision_store
        .revision(ctx, &input.submission_id)
        .await?;
    let files = deps.file_store.files_of(ctx, &submission.id).await?;

    ctx.ensure_not_cancelled("compare_submission.previous")?;
    let query = RevisionQuery::previous_of(&submission);
    let candidates = deps.revision_store.revisions_of(ctx, &query).await?;
    let previous = match select_previous_revision(&submission, &candidates) {
        Some(revision) => Some(diff_against(ctx, deps, &files, revision.clone()).await?),
        None => None,
    };

    let original = match submission.original_submission_id.as_ref() {
        Some(original_id) => {
            ctx.ensure_not_cancelled("compare_submission.original")?;
            let revision = deps.revision_store.revision(ctx, original_id).await?;
            Some(diff_against(ctx, deps, &files, revision).await?)
        },
        None => None,
    };

    Ok(SubmissionComparison {
        submission,
        previous,
        original,
    })
}

async fn diff_against(
    ctx: &RequestContext,
    deps: &CompareSubmissionDeps,
    files: &[NamedFile],
    revision: SubmissionRevision,
) -> Result<RevisionDiff> {
    let old_files = deps.file_store.files_of(ctx, &revision.id).await?;
    let changes = classify(files, &old_files);
    if let Some(logger) = deps.logger.as_ref() {
        let mut fields = change_counts(&changes);
        field(&mut fields, "againstSubmissionId", revision.id.as_str());
        logger.debug(
            "app.compareSubmission.classified",
            "Classified against earlier revision",
            Some(fields),
        );
    }
    Ok(RevisionDiff { revision, changes })
}

fn log_fields_start(input: &CompareSubmissionInput) -> LogFields {
    let mut fields = LogFields::new();
    field(&mut fields, "submissionId", input.submission_id.as_str());
    fields
}

fn log_fields_completed_comparison(
    comparison: &SubmissionComparison,
    started_at: Instant,
) -> LogFields {
    let mut fields = LogFields::new();
    field(&mut fields, "submissionId", comparison.submission.id.as_str());
    if let Some(previous) = comparison.previous.as_ref() {
        field(
            &mut fields,
            "previousSubmissionId",
            previous.revision.id.as_str(),
        );
    }
    if let Some(original) = comparison.original.as_ref() {
        field(
            &mut fields,
            "originalSubmissionId",
            original.revision.id.as_str(),
        );
    }
    field(&mut fields, "durationMs", duration_ms(started_at));
    fields
}
