//! API v1 DTO mapping helpers.

use crate::v1::{
    ApiV1ChangedPairDto, ApiV1CompareSubmissionResponseDto, ApiV1ErrorCode, ApiV1ErrorDto,
    ApiV1ErrorKind, ApiV1ErrorMeta, ApiV1FileChangeSetDto, ApiV1Result, ApiV1RevisionDiffDto,
    ApiV1RevisionDto,
};
use submission_diff_domain::{
    ChangedPair, FileChangeSet, RevisionDiff, SubmissionComparison, SubmissionRevision,
};
use submission_diff_shared::{ErrorCode, ErrorEnvelope, ErrorKind};

const API_V1_REDACTED: &str = "[REDACTED]";
const API_V1_REDACTED_PREFIX: &str = "[REDACTED,len=";

/// Convert a shared `ErrorCode` into an API v1 error code string.
#[must_use]
pub fn error_code_to_api_v1(code: &ErrorCode) -> ApiV1ErrorCode {
    let namespace = sanitize_code_segment(code.namespace());
    let detail = sanitize_code_segment(code.code());
    format!("ERR_{namespace}_{detail}")
}

/// Map an `ErrorEnvelope` into an API v1 error DTO.
#[must_use]
pub fn error_envelope_to_api_v1_error(
    envelope: &ErrorEnvelope,
    extra_meta: Option<ApiV1ErrorMeta>,
) -> ApiV1ErrorDto {
    let mut merged = ApiV1ErrorMeta::new();
    for (key, value) in &envelope.metadata {
        merged.insert(key.clone(), value.clone());
    }
    if let Some(extra) = extra_meta {
        merged.extend(extra);
    }
    let meta = if merged.is_empty() {
        None
    } else {
        Some(redact_api_v1_meta(&merged))
    };

    ApiV1ErrorDto {
        code: error_code_to_api_v1(&envelope.code),
        message: envelope.message.clone(),
        kind: map_error_kind(envelope.kind),
        meta,
    }
}

/// Map a shared result into an API v1 result wrapper.
#[must_use]
pub fn result_to_api_v1_result<T>(
    result: Result<T, ErrorEnvelope>,
    extra_meta: Option<ApiV1ErrorMeta>,
) -> ApiV1Result<T> {
    match result {
        Ok(data) => ApiV1Result::ok(data),
        Err(error) => ApiV1Result::err(error_envelope_to_api_v1_error(&error, extra_meta)),
    }
}

/// Map a classification into its API v1 payload.
#[must_use]
pub fn file_change_set_to_api_v1(changes: &FileChangeSet) -> ApiV1FileChangeSetDto {
    ApiV1FileChangeSetDto {
        added: names(changes.added.iter()),
        removed: names(changes.removed.iter()),
        changed: names(changes.changed.iter()),
        unchanged: names(changes.unchanged.iter()),
        changed_pairs: changes.changed_pairs.iter().map(changed_pair).collect(),
        renamed: changes.is_rename(),
    }
}

/// Map a submission comparison into its API v1 payload.
#[must_use]
pub fn submission_comparison_to_api_v1(
    comparison: &SubmissionComparison,
) -> ApiV1CompareSubmissionResponseDto {
    ApiV1CompareSubmissionResponseDto {
        submission: revision_to_api_v1(&comparison.submission),
        previous: comparison.previous.as_ref().map(revision_diff),
        original: comparison.original.as_ref().map(revision_diff),
    }
}

/// Map revision metadata into its API v1 payload.
#[must_use]
pub fn revision_to_api_v1(revision: &SubmissionRevision) -> ApiV1RevisionDto {
    ApiV1RevisionDto {
        submission_id: revision.id.as_str().to_owned(),
        team_id: revision.team_id.as_str().to_owned(),
        problem_id: revision.problem_id.as_str().to_owned(),
        language_id: revision.language_id.as_str().to_owned(),
        submit_time_ms: revision.submit_time_ms,
        original_submission_id: revision
            .original_submission_id
            .as_ref()
            .map(|id| id.as_str().to_owned()),
        entry_point: revision.entry_point.as_deref().map(str::to_owned),
    }
}

fn revision_diff(diff: &RevisionDiff) -> ApiV1RevisionDiffDto {
    ApiV1RevisionDiffDto {
        revision: revision_to_api_v1(&diff.revision),
        changes: file_change_set_to_api_v1(&diff.changes),
    }
}

fn changed_pair(pair: &ChangedPair) -> ApiV1ChangedPairDto {
    ApiV1ChangedPairDto {
        filename: pair.new.filename().to_owned(),
        rank: pair.new.rank(),
        content: pair.new.content_lossy().into_owned(),
        old_filename: pair.old.filename().to_owned(),
        old_rank: pair.old.rank(),
        old_content: pair.old.content_lossy().into_owned(),
    }
}

fn names<'a>(names: impl Iterator<Item = &'a Box<str>>) -> Vec<String> {
    names.map(|name| name.to_string()).collect()
}

const fn map_error_kind(kind: ErrorKind) -> ApiV1ErrorKind {
    match kind {
        ErrorKind::Expected | ErrorKind::Unexpected => ApiV1ErrorKind::Expected,
        ErrorKind::Invariant => ApiV1ErrorKind::Invariant,
    }
}

fn sanitize_code_segment(segment: &str) -> String {
    segment
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

fn redact_api_v1_meta(meta: &ApiV1ErrorMeta) -> ApiV1ErrorMeta {
    meta.iter()
        .map(|(key, value)| {
            let redacted = if is_secret_key(key) {
                API_V1_REDACTED.to_owned()
            } else if is_content_key(key) {
                format!("{API_V1_REDACTED_PREFIX}{}]", value.len())
            } else {
                value.clone()
            };
            (key.clone(), redacted)
        })
        .collect()
}

fn is_secret_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key.contains("token")
        || key.contains("password")
        || key.contains("secret")
        || key.contains("authorization")
}

fn is_content_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key == "content" || key.ends_with("content") || key == "source"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::error::Error;
    use submission_diff_domain::{NamedFile, classify};
    use submission_diff_shared::ErrorClass;

    #[test]
    fn mapping_redacts_sensitive_metadata() -> Result<(), Box<dyn Error>> {
        let envelope = ErrorEnvelope::invalid_argument("bad file")
            .with_metadata("sessionToken", "abc")
            .with_metadata("oldContent", "int main() {}")
            .with_metadata("field", "files");

        let dto = error_envelope_to_api_v1_error(&envelope, None);
        let meta = dto.meta.ok_or("meta should be present")?;
        assert_eq!(dto.code, "ERR_CORE_INVALID_ARGUMENT");
        assert_eq!(dto.kind, ApiV1ErrorKind::Expected);
        assert_eq!(
            meta.get("sessionToken").map(String::as_str),
            Some("[REDACTED]")
        );
        assert_eq!(
            meta.get("oldContent").map(String::as_str),
            Some("[REDACTED,len=13]")
        );
        assert_eq!(meta.get("field").map(String::as_str), Some("files"));
        Ok(())
    }

    #[test]
    fn unexpected_errors_map_to_expected_kind() {
        let envelope = ErrorEnvelope::unexpected(ErrorCode::io(), "io", ErrorClass::Retriable);
        let dto = error_envelope_to_api_v1_error(&envelope, None);
        assert_eq!(dto.kind, ApiV1ErrorKind::Expected);
        assert_eq!(dto.code, "ERR_CORE_IO");
    }

    #[test]
    fn result_mapping_preserves_ok_and_err() -> Result<(), Box<dyn Error>> {
        let ok_result: Result<u32, ErrorEnvelope> = Ok(10);
        let mapped = result_to_api_v1_result(ok_result, None);
        assert!(matches!(mapped, ApiV1Result::Ok { ok: true, data: 10 }));

        let mut extra = BTreeMap::new();
        extra.insert("requestId".to_owned(), "req_1".to_owned());
        let err_result: Result<u32, ErrorEnvelope> =
            Err(ErrorEnvelope::expected(ErrorCode::not_found(), "missing"));
        let mapped = result_to_api_v1_result(err_result, Some(extra));
        let ApiV1Result::Err { ok, error } = mapped else {
            return Err("expected error result".into());
        };
        assert!(!ok);
        assert_eq!(error.code, "ERR_CORE_NOT_FOUND");
        assert_eq!(
            error
                .meta
                .as_ref()
                .and_then(|meta| meta.get("requestId"))
                .map(String::as_str),
            Some("req_1")
        );
        Ok(())
    }

    #[test]
    fn rename_is_flagged_with_both_filenames() -> Result<(), Box<dyn Error>> {
        let files = [NamedFile::new("Main.java", b"class Main {}".as_slice(), 0)?];
        let old_files = [NamedFile::new("main.java", b"class main {}".as_slice(), 0)?];

        let dto = file_change_set_to_api_v1(&classify(&files, &old_files));
        assert!(dto.renamed);
        assert!(dto.added.is_empty());
        assert!(dto.removed.is_empty());
        assert_eq!(dto.changed, ["Main.java"]);
        let pair = dto.changed_pairs.first().ok_or("pair should be present")?;
        assert_eq!(pair.old_filename, "main.java");
        assert_eq!(pair.old_content, "class main {}");
        Ok(())
    }
}
