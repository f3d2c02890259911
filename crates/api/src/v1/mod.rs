//! API v1 DTOs and helpers.

mod mappers;
mod schema;
mod types;
mod validation;

pub use mappers::{
    error_code_to_api_v1, error_envelope_to_api_v1_error, file_change_set_to_api_v1,
    result_to_api_v1_result, revision_to_api_v1, submission_comparison_to_api_v1,
};
pub use schema::{
    api_v1_classify_request_schema, api_v1_compare_submission_request_schema,
    api_v1_compare_submission_response_schema, api_v1_error_schema, api_v1_file_change_set_schema,
};
pub use types::*;
pub use validation::{
    ApiV1RequestLimits, ApiV1ValidationIssue, ClassifyRequest, CompareSubmissionRequest,
    DEFAULT_MAX_FILE_SIZE_BYTES, DEFAULT_MAX_FILES, ValidatedClassifyRequest,
    ValidatedCompareSubmissionRequest, parse_classify_request_json,
    parse_compare_submission_request_json, validate_classify_request,
    validate_compare_submission_request,
};
