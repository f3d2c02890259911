//! Integration tests for the compare-submission use case.

use std::sync::Arc;
use submission_diff_app::{CompareSubmissionDeps, CompareSubmissionInput, compare_submission};
use submission_diff_domain::{
    LanguageId, NamedFile, ProblemId, SubmissionId, SubmissionRevision, TeamId,
};
use submission_diff_shared::{ErrorEnvelope, RequestContext, Result};
use submission_diff_testkit::in_memory::{InMemorySubmissionStore, RecordingLogger};

fn id(raw: &str) -> Result<SubmissionId> {
    SubmissionId::parse(raw).map_err(ErrorEnvelope::from)
}

fn revision(
    submission: &str,
    team: &str,
    at: i64,
    original: Option<&str>,
) -> Result<SubmissionRevision> {
    Ok(SubmissionRevision {
        id: id(submission)?,
        team_id: TeamId::parse(team).map_err(ErrorEnvelope::from)?,
        problem_id: ProblemId::parse("boolfind").map_err(ErrorEnvelope::from)?,
        language_id: LanguageId::parse("java").map_err(ErrorEnvelope::from)?,
        submit_time_ms: at,
        original_submission_id: original.map(id).transpose()?,
        entry_point: None,
    })
}

fn files(entries: &[(&str, &str)]) -> Result<Vec<NamedFile>> {
    (0_u32..)
        .zip(entries)
        .map(|(rank, (name, content))| {
            NamedFile::new(*name, content.as_bytes(), rank).map_err(ErrorEnvelope::from)
        })
        .collect()
}

fn deps(store: Arc<InMemorySubmissionStore>, logger: &RecordingLogger) -> CompareSubmissionDeps {
    CompareSubmissionDeps {
        file_store: store.clone(),
        revision_store: store,
        logger: Some(Arc::new(logger.clone())),
    }
}

#[tokio::test]
async fn compares_against_latest_earlier_team_submission() -> Result<()> {
    let ctx = RequestContext::new_request();
    let logger = RecordingLogger::new();
    let store = Arc::new(
        InMemorySubmissionStore::new()
            .with_submission(
                revision("10", "t1", 100, None)?,
                files(&[("Main.java", "v1")])?,
            )
            .with_submission(
                revision("11", "t1", 200, None)?,
                files(&[("Main.java", "v2"), ("Util.java", "u")])?,
            )
            .with_submission(
                revision("12", "t2", 250, None)?,
                files(&[("Main.java", "other team")])?,
            )
            .with_submission(
                revision("13", "t1", 300, None)?,
                files(&[("Main.java", "v3"), ("Util.java", "u")])?,
            ),
    );
    let input = CompareSubmissionInput {
        submission_id: id("13")?,
    };

    let comparison = compare_submission(&ctx, &deps(store, &logger), &input).await?;
    let previous = comparison.previous.ok_or_else(|| {
        ErrorEnvelope::invalid_argument("previous revision should be present")
    })?;
    assert_eq!(previous.revision.id.as_str(), "11");
    assert_eq!(previous.changes.changed, [Box::<str>::from("Main.java")]);
    assert_eq!(previous.changes.unchanged, [Box::<str>::from("Util.java")]);
    assert!(comparison.original.is_none());

    let completed = logger
        .find("app.compareSubmission.completed")
        .and_then(|event| event.fields)
        .unwrap_or_default();
    assert_eq!(
        completed.get("previousSubmissionId"),
        Some(&serde_json::Value::from("11"))
    );
    Ok(())
}

#[tokio::test]
async fn edited_submission_compares_to_lineage_and_original() -> Result<()> {
    let ctx = RequestContext::new_request();
    let logger = RecordingLogger::new();
    let store = Arc::new(
        InMemorySubmissionStore::new()
            .with_submission(
                revision("20", "t1", 100, None)?,
                files(&[("Main.java", "team version")])?,
            )
            .with_submission(
                revision("21", "jury", 200, Some("20"))?,
                files(&[("Main.java", "first edit")])?,
            )
            .with_submission(
                revision("22", "t1", 250, None)?,
                files(&[("Main.java", "unrelated resubmission")])?,
            )
            .with_submission(
                revision("23", "jury", 300, Some("20"))?,
                files(&[("Solution.java", "second edit")])?,
            ),
    );
    let input = CompareSubmissionInput {
        submission_id: id("23")?,
    };

    let comparison = compare_submission(&ctx, &deps(store, &logger), &input).await?;
    let previous = comparison
        .previous
        .ok_or_else(|| ErrorEnvelope::invalid_argument("previous edit should be present"))?;
    assert_eq!(previous.revision.id.as_str(), "21");
    assert!(previous.changes.is_rename());

    let original = comparison
        .original
        .ok_or_else(|| ErrorEnvelope::invalid_argument("original should be present"))?;
    assert_eq!(original.revision.id.as_str(), "20");
    assert_eq!(original.changes.changed, [Box::<str>::from("Solution.java")]);
    Ok(())
}

#[tokio::test]
async fn cancellation_stops_before_reading_files() -> Result<()> {
    let ctx = RequestContext::new_request();
    ctx.cancel();
    let logger = RecordingLogger::new();
    let store = Arc::new(
        InMemorySubmissionStore::new()
            .with_submission(revision("1", "t1", 1, None)?, files(&[("a.c", "a")])?),
    );
    let input = CompareSubmissionInput {
        submission_id: id("1")?,
    };

    let result = compare_submission(&ctx, &deps(Arc::clone(&store), &logger), &input).await;
    assert!(matches!(result, Err(ref error) if error.is_cancelled()));
    assert_eq!(store.file_reads(), 0);
    assert!(logger.find("app.compareSubmission.aborted").is_some());
    assert!(logger.find("app.compareSubmission.failed").is_none());
    Ok(())
}
