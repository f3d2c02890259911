//! In-memory adapter implementations for port contracts.
//!
//! These implementations are intended for:
//! - Unit/integration tests of the app use cases
//! - Deterministic contract tests for the ports layer

use submission_diff_ports::{
    BoxFuture, LogEvent, LogFields, LogLevel, LoggerPort, NamedFile, RevisionQuery, SubmissionId,
    SubmissionFileStore, SubmissionRevision, SubmissionRevisionStore,
};
use submission_diff_shared::{ErrorCode, ErrorEnvelope, RequestContext, Result};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

/// A no-op logger implementation.
#[derive(Debug, Default)]
pub struct NoopLogger;

impl LoggerPort for NoopLogger {
    fn log(&self, _event: LogEvent) {}

    fn child(&self, _fields: LogFields) -> Box<dyn LoggerPort> {
        Box::new(Self)
    }
}

/// Logger that keeps every event for later assertions.
///
/// Children share the parent's buffer and merge their base fields into each
/// event they record.
#[derive(Debug, Clone, Default)]
pub struct RecordingLogger {
    events: Arc<Mutex<Vec<LogEvent>>>,
    base_fields: LogFields,
}

impl RecordingLogger {
    /// Create an empty recording logger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events.
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Names of the recorded events, in emission order.
    pub fn event_names(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .map(|event| event.event.into_string())
            .collect()
    }

    /// First recorded event with the given name.
    pub fn find(&self, name: &str) -> Option<LogEvent> {
        self.events()
            .into_iter()
            .find(|event| event.event.as_ref() == name)
    }
}

impl LoggerPort for RecordingLogger {
    fn log(&self, mut event: LogEvent) {
        if !self.base_fields.is_empty() {
            let mut fields = self.base_fields.clone();
            fields.extend(event.fields.take().unwrap_or_default());
            event.fields = Some(fields);
        }
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    fn child(&self, fields: LogFields) -> Box<dyn LoggerPort> {
        let mut base_fields = self.base_fields.clone();
        base_fields.extend(fields);
        Box::new(Self {
            events: Arc::clone(&self.events),
            base_fields,
        })
    }
}

#[derive(Debug, Clone)]
struct StoredSubmission {
    revision: SubmissionRevision,
    files: Vec<NamedFile>,
}

/// In-memory submission store implementing both store ports.
#[derive(Debug, Default)]
pub struct InMemorySubmissionStore {
    submissions: RwLock<BTreeMap<SubmissionId, StoredSubmission>>,
    file_reads: AtomicUsize,
}

impl InMemorySubmissionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert used while setting up a test.
    #[must_use]
    pub fn with_submission(mut self, revision: SubmissionRevision, files: Vec<NamedFile>) -> Self {
        let files = submission_diff_domain::order_by_rank(files);
        self.submissions
            .get_mut()
            .insert(revision.id.clone(), StoredSubmission { revision, files });
        self
    }

    /// Insert or replace a submission.
    pub async fn insert(&self, revision: SubmissionRevision, files: Vec<NamedFile>) {
        let files = submission_diff_domain::order_by_rank(files);
        self.submissions
            .write()
            .await
            .insert(revision.id.clone(), StoredSubmission { revision, files });
    }

    /// Number of `files_of` calls served so far.
    pub fn file_reads(&self) -> usize {
        self.file_reads.load(Ordering::SeqCst)
    }

    async fn stored(&self, submission_id: &SubmissionId) -> Result<StoredSubmission> {
        self.submissions
            .read()
            .await
            .get(submission_id)
            .cloned()
            .ok_or_else(|| not_found(submission_id))
    }
}

impl SubmissionFileStore for InMemorySubmissionStore {
    fn files_of<'a>(
        &'a self,
        ctx: &'a RequestContext,
        submission_id: &'a SubmissionId,
    ) -> BoxFuture<'a, Result<Vec<NamedFile>>> {
        Box::pin(async move {
            ctx.ensure_not_cancelled("in_memory_store.files_of")?;
            self.file_reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.stored(submission_id).await?.files)
        })
    }
}

impl SubmissionRevisionStore for InMemorySubmissionStore {
    fn revision<'a>(
        &'a self,
        ctx: &'a RequestContext,
        submission_id: &'a SubmissionId,
    ) -> BoxFuture<'a, Result<SubmissionRevision>> {
        Box::pin(async move {
            ctx.ensure_not_cancelled("in_memory_store.revision")?;
            Ok(self.stored(submission_id).await?.revision)
        })
    }

    fn revisions_of<'a>(
        &'a self,
        ctx: &'a RequestContext,
        query: &'a RevisionQuery,
    ) -> BoxFuture<'a, Result<Vec<SubmissionRevision>>> {
        Box::pin(async move {
            ctx.ensure_not_cancelled("in_memory_store.revisions_of")?;
            Ok(self
                .submissions
                .read()
                .await
                .values()
                .filter(|stored| query.matches(&stored.revision))
                .map(|stored| stored.revision.clone())
                .collect())
        })
    }
}

fn not_found(submission_id: &SubmissionId) -> ErrorEnvelope {
    ErrorEnvelope::expected(ErrorCode::not_found(), "submission not found")
        .with_metadata("submissionId", submission_id.as_str())
}

/// Build a `LogEvent` helper for tests.
#[must_use]
pub fn log_event(level: LogLevel, event: &str, message: &str) -> LogEvent {
    LogEvent::new(level, event, message, None)
}
