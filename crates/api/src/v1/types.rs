//! API v1 DTO types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Error kind exposed in API v1 responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiV1ErrorKind {
    /// Expected, user-facing errors (validation, missing submissions, cancellation).
    Expected,
    /// Invariant violations that indicate a bug.
    Invariant,
}

/// API v1 error code string (stable contract value).
pub type ApiV1ErrorCode = String;

/// Metadata map attached to API v1 errors.
pub type ApiV1ErrorMeta = BTreeMap<String, String>;

/// API v1 error payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiV1ErrorDto {
    /// Stable error code (e.g. `ERR_CORE_INVALID_ARGUMENT`).
    pub code: ApiV1ErrorCode,
    /// Human-readable message for the caller.
    pub message: String,
    /// Error category.
    pub kind: ApiV1ErrorKind,
    /// Optional metadata for debugging and correlation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ApiV1ErrorMeta>,
}

/// API v1 result wrapper for success or failure payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiV1Result<T> {
    /// Success response.
    Ok {
        /// Indicates success.
        ok: bool,
        /// Success payload.
        data: T,
    },
    /// Error response.
    Err {
        /// Indicates failure.
        ok: bool,
        /// Error payload.
        error: ApiV1ErrorDto,
    },
}

impl<T> ApiV1Result<T> {
    /// Build a success response wrapper.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self::Ok { ok: true, data }
    }

    /// Build an error response wrapper.
    #[must_use]
    pub const fn err(error: ApiV1ErrorDto) -> Self {
        Self::Err { ok: false, error }
    }
}

/// One source file inside a request payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ApiV1SourceFileDto {
    /// Filename as submitted.
    pub filename: String,
    /// Ordering key within the revision; defaults to the list position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    /// File content (UTF-8).
    pub content: String,
}

/// API v1 classify request payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ApiV1ClassifyRequestDto {
    /// Files of the newer revision.
    #[serde(default)]
    pub files: Vec<ApiV1SourceFileDto>,
    /// Files of the older revision.
    #[serde(default)]
    pub old_files: Vec<ApiV1SourceFileDto>,
}

/// API v1 compare-submission request payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ApiV1CompareSubmissionRequestDto {
    /// Submission to compare against its earlier revisions.
    pub submission_id: String,
}

/// A changed file shown next to its older counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiV1ChangedPairDto {
    /// Filename in the newer revision.
    pub filename: String,
    /// Rank in the newer revision.
    pub rank: u32,
    /// Content in the newer revision (lossy UTF-8).
    pub content: String,
    /// Filename in the older revision.
    pub old_filename: String,
    /// Rank in the older revision.
    pub old_rank: u32,
    /// Content in the older revision (lossy UTF-8).
    pub old_content: String,
}

/// API v1 classification payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiV1FileChangeSetDto {
    /// Filenames only in the newer revision, sorted.
    pub added: Vec<String>,
    /// Filenames only in the older revision, sorted.
    pub removed: Vec<String>,
    /// Changed filenames in rank order of the newer revision.
    pub changed: Vec<String>,
    /// Unchanged filenames in rank order of the newer revision.
    pub unchanged: Vec<String>,
    /// Pairs behind `changed`, index-aligned with it.
    pub changed_pairs: Vec<ApiV1ChangedPairDto>,
    /// Whether the single-file rename rule applied.
    pub renamed: bool,
}

/// Revision metadata as exposed on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiV1RevisionDto {
    /// Submission identifier.
    pub submission_id: String,
    /// Submitting team.
    pub team_id: String,
    /// Problem identifier.
    pub problem_id: String,
    /// Language identifier.
    pub language_id: String,
    /// Submit time in milliseconds since the Unix epoch.
    pub submit_time_ms: i64,
    /// Submission this one was edited from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_submission_id: Option<String>,
    /// Entry point, when the language needs one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_point: Option<String>,
}

/// Changes relative to one earlier revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiV1RevisionDiffDto {
    /// Revision compared against.
    pub revision: ApiV1RevisionDto,
    /// Classification of the current files against it.
    pub changes: ApiV1FileChangeSetDto,
}

/// API v1 compare-submission response payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiV1CompareSubmissionResponseDto {
    /// Submission that was compared.
    pub submission: ApiV1RevisionDto,
    /// Comparison against the latest earlier revision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<ApiV1RevisionDiffDto>,
    /// Comparison against the original of an edited submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<ApiV1RevisionDiffDto>,
}
