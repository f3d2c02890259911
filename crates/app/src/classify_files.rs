//! Classify two inline revisions against each other.

use crate::logging::{change_counts, duration_ms, field, log_failure};
use std::sync::Arc;
use std::time::Instant;
use submission_diff_domain::{FileChangeSet, NamedFile, classify};
use submission_diff_ports::{LogFields, LoggerPort};
use submission_diff_shared::{RequestContext, Result};

/// Input payload for classifying two revisions.
#[derive(Debug, Clone, Default)]
pub struct ClassifyFilesInput {
    /// Files of the newer revision, in rank order.
    pub files: Vec<NamedFile>,
    /// Files of the older revision, in rank order.
    pub old_files: Vec<NamedFile>,
}

/// Dependencies required by classify-files.
#[derive(Clone, Default)]
pub struct ClassifyFilesDeps {
    /// Optional logger.
    pub logger: Option<Arc<dyn LoggerPort>>,
}

/// Classify `input.files` against `input.old_files`.
#[tracing::instrument(
    name = "classify_files",
    skip_all,
    fields(files = input.files.len(), old_files = input.old_files.len())
)]
pub fn classify_files(
    ctx: &RequestContext,
    deps: &ClassifyFilesDeps,
    input: &ClassifyFilesInput,
) -> Result<FileChangeSet> {
    let started_at = Instant::now();
    if let Some(logger) = deps.logger.as_ref() {
        logger.debug(
            "app.classifyFiles.start",
            "Classify files started",
            Some(log_fields_start(input)),
        );
    }

    if let Err(error) = ctx.ensure_not_cancelled("classify_files.start") {
        log_failure(
            deps.logger.as_deref(),
            "app.classifyFiles",
            "Classify files",
            duration_ms(started_at),
            &error,
        );
        return Err(error);
    }

    let changes = classify(&input.files, &input.old_files);

    if let Some(logger) = deps.logger.as_ref() {
        logger.info(
            "app.classifyFiles.completed",
            "Classify files completed",
            Some(log_fields_completed(&changes, started_at)),
        );
    }
    Ok(changes)
}

fn log_fields_start(input: &ClassifyFilesInput) -> LogFields {
    let mut fields = LogFields::new();
    field(&mut fields, "files", input.files.len());
    field(&mut fields, "oldFiles", input.old_files.len());
    fields
}

fn log_fields_completed(changes: &FileChangeSet, started_at: Instant) -> LogFields {
    let mut fields = change_counts(changes);
    field(&mut fields, "durationMs", duration_ms(started_at));
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use submission_diff_shared::ErrorEnvelope;
    use submission_diff_testkit::in_memory::RecordingLogger;

    fn file(name: &str, content: &str, rank: u32) -> Result<NamedFile> {
        NamedFile::new(name, content.as_bytes(), rank).map_err(ErrorEnvelope::from)
    }

    #[test]
    fn logs_start_and_completion_counts() -> Result<()> {
        let ctx = RequestContext::new_request();
        let logger = RecordingLogger::new();
        let deps = ClassifyFilesDeps {
            logger: Some(Arc::new(logger.clone())),
        };
        let input = ClassifyFilesInput {
            files: vec![file("a.c", "1", 0)?, file("b.c", "2", 1)?],
            old_files: vec![file("a.c", "0", 0)?],
        };

        let changes = classify_files(&ctx, &deps, &input)?;
        assert_eq!(changes.changed, [Box::<str>::from("a.c")]);

        assert_eq!(
            logger.event_names(),
            ["app.classifyFiles.start", "app.classifyFiles.completed"]
        );
        let fields = logger
            .find("app.classifyFiles.completed")
            .and_then(|event| event.fields)
            .unwrap_or_default();
        assert_eq!(fields.get("added"), Some(&serde_json::Value::from(1)));
        assert_eq!(fields.get("changed"), Some(&serde_json::Value::from(1)));
        assert!(fields.contains_key("durationMs"));
        Ok(())
    }

    #[test]
    fn cancelled_requests_are_aborted() {
        let ctx = RequestContext::new_request();
        ctx.cancel();
        let logger = RecordingLogger::new();
        let deps = ClassifyFilesDeps {
            logger: Some(Arc::new(logger.clone())),
        };

        let result = classify_files(&ctx, &deps, &ClassifyFilesInput::default());
        assert!(matches!(result, Err(ref error) if error.is_cancelled()));
        assert!(logger.find("app.classifyFiles.aborted").is_some());
    }
}
