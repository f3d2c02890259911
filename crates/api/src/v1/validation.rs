//! API v1 request validation.
//!
//! Requests are boundary inputs and must be validated before being passed
//! into use cases. Validation here covers:
//! - shape (required fields, blank filenames)
//! - ranks (defaulting to list position, no duplicates per revision)
//! - limits (files per revision, bytes per file)
//!
//! Identifier rules are delegated to domain constructors and not duplicated
//! here.

use crate::v1::{ApiV1ClassifyRequestDto, ApiV1CompareSubmissionRequestDto, ApiV1SourceFileDto};
use serde::de::DeserializeOwned;
use std::fmt;
use submission_diff_domain::{NamedFile, SubmissionId, find_duplicate_rank, order_by_rank};
use submission_diff_shared::{ErrorCode, ErrorEnvelope, Validate, Validated, ValidationError};

/// Default cap on files per revision.
pub const DEFAULT_MAX_FILES: u32 = 100;
/// Default cap on bytes per file.
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 256 * 1024;

/// Size limits applied while validating requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiV1RequestLimits {
    /// Maximum files in one revision.
    pub max_files: u32,
    /// Maximum bytes of one file.
    pub max_file_size_bytes: u64,
}

impl Default for ApiV1RequestLimits {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
        }
    }
}

/// Validation failure details for API v1 DTOs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiV1ValidationIssue {
    /// Field name that failed validation.
    pub field: &'static str,
    /// Human-readable validation error message.
    pub message: Box<str>,
    /// Short machine-readable reason.
    pub reason: &'static str,
}

impl ApiV1ValidationIssue {
    fn new(field: &'static str, reason: &'static str, message: impl Into<Box<str>>) -> Self {
        Self {
            field,
            message: message.into(),
            reason,
        }
    }
}

impl fmt::Display for ApiV1ValidationIssue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ApiV1ValidationIssue {}

impl ValidationError for ApiV1ValidationIssue {
    fn empty(field: &'static str) -> Self {
        Self::new(field, "empty", "value must be non-empty")
    }

    fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::new(field, reason, reason)
    }

    fn out_of_range(field: &'static str, value: String, min: String, max: String) -> Self {
        Self::new(
            field,
            "out_of_range",
            format!("{value} is not between {min} and {max}"),
        )
    }
}

impl From<ApiV1ValidationIssue> for ErrorEnvelope {
    fn from(issue: ApiV1ValidationIssue) -> Self {
        Self::invalid_argument(issue.to_string())
            .with_metadata("field", issue.field)
            .with_metadata("reason", issue.reason)
    }
}

impl Validate for ApiV1ClassifyRequestDto {
    type Error = ApiV1ValidationIssue;

    fn validate(&self) -> Result<(), Self::Error> {
        validate_source_files("files", &self.files)?;
        validate_source_files("oldFiles", &self.old_files)
    }
}

impl Validate for ApiV1CompareSubmissionRequestDto {
    type Error = ApiV1ValidationIssue;

    fn validate(&self) -> Result<(), Self::Error> {
        if self.submission_id.trim().is_empty() {
            return Err(ApiV1ValidationIssue::empty("submissionId"));
        }
        Ok(())
    }
}

fn validate_source_files(
    field: &'static str,
    files: &[ApiV1SourceFileDto],
) -> Result<(), ApiV1ValidationIssue> {
    for (index, file) in files.iter().enumerate() {
        if file.filename.trim().is_empty() {
            return Err(ApiV1ValidationIssue::new(
                field,
                "empty_filename",
                format!("file at position {index} has an empty filename"),
            ));
        }
        if file.filename.contains('\0') {
            return Err(ApiV1ValidationIssue::new(
                field,
                "invalid_filename",
                format!("file at position {index} has a filename containing NUL"),
            ));
        }
    }
    Ok(())
}

/// Validated classify request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifyRequest {
    /// Files of the newer revision, in rank order.
    pub files: Vec<NamedFile>,
    /// Files of the older revision, in rank order.
    pub old_files: Vec<NamedFile>,
}

/// Validated classify request proof.
pub type ValidatedClassifyRequest = Validated<ClassifyRequest>;

/// Validated compare-submission request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareSubmissionRequest {
    /// Submission to compare.
    pub submission_id: SubmissionId,
}

/// Validated compare-submission request proof.
pub type ValidatedCompareSubmissionRequest = Validated<CompareSubmissionRequest>;

/// Validate a classify request and convert it into rank-ordered files.
pub fn validate_classify_request(
    dto: &ApiV1ClassifyRequestDto,
    limits: &ApiV1RequestLimits,
) -> Result<ValidatedClassifyRequest, ErrorEnvelope> {
    dto.validate().map_err(ErrorEnvelope::from)?;
    let files = to_named_files("files", &dto.files, limits)?;
    let old_files = to_named_files("oldFiles", &dto.old_files, limits)?;
    Ok(Validated::new(ClassifyRequest { files, old_files }))
}

/// Validate a compare-submission request.
pub fn validate_compare_submission_request(
    dto: &ApiV1CompareSubmissionRequestDto,
) -> Result<ValidatedCompareSubmissionRequest, ErrorEnvelope> {
    dto.validate().map_err(ErrorEnvelope::from)?;
    let submission_id = SubmissionId::parse(&dto.submission_id).map_err(ErrorEnvelope::from)?;
    Ok(Validated::new(CompareSubmissionRequest { submission_id }))
}

/// Parse and validate a classify request from JSON.
pub fn parse_classify_request_json(
    input: &str,
    limits: &ApiV1RequestLimits,
) -> Result<ValidatedClassifyRequest, ErrorEnvelope> {
    let dto: ApiV1ClassifyRequestDto = parse_request_json("classify", input)?;
    validate_classify_request(&dto, limits)
}

/// Parse and validate a compare-submission request from JSON.
pub fn parse_compare_submission_request_json(
    input: &str,
) -> Result<ValidatedCompareSubmissionRequest, ErrorEnvelope> {
    let dto: ApiV1CompareSubmissionRequestDto = parse_request_json("compareSubmission", input)?;
    validate_compare_submission_request(&dto)
}

fn parse_request_json<T: DeserializeOwned>(
    kind: &'static str,
    input: &str,
) -> Result<T, ErrorEnvelope> {
    serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("api", "invalid_json"),
            format!("invalid {kind} request JSON: {error}"),
        )
        .with_metadata("request_kind", kind)
    })
}

fn to_named_files(
    field: &'static str,
    files: &[ApiV1SourceFileDto],
    limits: &ApiV1RequestLimits,
) -> Result<Vec<NamedFile>, ErrorEnvelope> {
    let max_files = usize::try_from(limits.max_files).unwrap_or(usize::MAX);
    if files.len() > max_files {
        return Err(ApiV1ValidationIssue::out_of_range(
            field,
            files.len().to_string(),
            "0".to_owned(),
            limits.max_files.to_string(),
        )
        .into());
    }

    let mut named = Vec::with_capacity(files.len());
    for (index, file) in files.iter().enumerate() {
        let size = u64::try_from(file.content.len()).unwrap_or(u64::MAX);
        if size > limits.max_file_size_bytes {
            return Err(ErrorEnvelope::from(ApiV1ValidationIssue::new(
                field,
                "file_too_large",
                format!(
                    "file {} is {size} bytes, above the limit of {}",
                    file.filename, limits.max_file_size_bytes
                ),
            ))
            .with_metadata("filename", file.filename.as_str()));
        }
        let rank = match file.rank {
            Some(rank) => rank,
            None => u32::try_from(index).map_err(|_| {
                ErrorEnvelope::from(ApiV1ValidationIssue::out_of_range(
                    field,
                    index.to_string(),
                    "0".to_owned(),
                    u32::MAX.to_string(),
                ))
            })?,
        };
        let file = NamedFile::new(file.filename.as_str(), file.content.as_bytes(), rank)
            .map_err(ErrorEnvelope::from)?;
        named.push(file);
    }

    if let Some(rank) = find_duplicate_rank(&named) {
        return Err(ErrorEnvelope::from(ApiV1ValidationIssue::new(
            field,
            "duplicate_rank",
            format!("rank {rank} is used by more than one file"),
        ))
        .with_metadata("rank", rank.to_string()));
    }

    Ok(order_by_rank(named))
}
