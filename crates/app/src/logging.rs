//! Log field helpers shared by the use cases.

use serde_json::Value;
use std::time::Instant;
use submission_diff_domain::FileChangeSet;
use submission_diff_ports::{LogEvent, LogFields, LogLevel, LoggerPort};
use submission_diff_shared::ErrorEnvelope;

pub fn duration_ms(started_at: Instant) -> u64 {
    u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX)
}

pub fn field(fields: &mut LogFields, key: &str, value: impl Into<Value>) {
    fields.insert(key.into(), value.into());
}

pub fn change_counts(changes: &FileChangeSet) -> LogFields {
    let mut fields = LogFields::new();
    field(&mut fields, "added", changes.added.len());
    field(&mut fields, "removed", changes.removed.len());
    field(&mut fields, "changed", changes.changed.len());
    field(&mut fields, "unchanged", changes.unchanged.len());
    field(&mut fields, "renamed", changes.is_rename());
    fields
}

/// Emit `<prefix>.aborted` for cancellations and `<prefix>.failed` otherwise.
pub fn log_failure(
    logger: Option<&dyn LoggerPort>,
    prefix: &str,
    label: &str,
    duration_ms: u64,
    error: &ErrorEnvelope,
) {
    let Some(logger) = logger else {
        return;
    };
    let mut fields = LogFields::new();
    field(&mut fields, "durationMs", duration_ms);

    if error.is_cancelled() {
        logger.info(
            &format!("{prefix}.aborted"),
            &format!("{label} aborted"),
            Some(fields),
        );
    } else {
        logger.log(
            LogEvent::new(
                LogLevel::Error,
                &format!("{prefix}.failed"),
                &format!("{label} failed"),
                Some(fields),
            )
            .with_error(error),
        );
    }
}
