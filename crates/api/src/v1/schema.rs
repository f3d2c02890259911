//! JSON Schema exports for API v1 DTOs.

use crate::v1::{
    ApiV1ClassifyRequestDto, ApiV1CompareSubmissionRequestDto, ApiV1CompareSubmissionResponseDto,
    ApiV1ErrorDto, ApiV1FileChangeSetDto,
};
use schemars::{Schema, schema_for};

/// JSON Schema for `ApiV1ClassifyRequestDto`.
#[must_use]
pub fn api_v1_classify_request_schema() -> Schema {
    schema_for!(ApiV1ClassifyRequestDto)
}

/// JSON Schema for `ApiV1CompareSubmissionRequestDto`.
#[must_use]
pub fn api_v1_compare_submission_request_schema() -> Schema {
    schema_for!(ApiV1CompareSubmissionRequestDto)
}

/// JSON Schema for `ApiV1FileChangeSetDto`.
#[must_use]
pub fn api_v1_file_change_set_schema() -> Schema {
    schema_for!(ApiV1FileChangeSetDto)
}

/// JSON Schema for `ApiV1CompareSubmissionResponseDto`.
#[must_use]
pub fn api_v1_compare_submission_response_schema() -> Schema {
    schema_for!(ApiV1CompareSubmissionResponseDto)
}

/// JSON Schema for `ApiV1ErrorDto`.
#[must_use]
pub fn api_v1_error_schema() -> Schema {
    schema_for!(ApiV1ErrorDto)
}
