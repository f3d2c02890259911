//! Test fixtures for shared error codes and envelopes.

use submission_diff_shared::{ErrorClass, ErrorCode, ErrorEnvelope};

/// Return a list of common error codes used in tests.
pub fn common_error_codes() -> Vec<ErrorCode> {
    vec![
        ErrorCode::cancelled(),
        ErrorCode::invalid_argument(),
        ErrorCode::not_found(),
        ErrorCode::permission_denied(),
        ErrorCode::timeout(),
        ErrorCode::io(),
        ErrorCode::internal(),
    ]
}

/// A cancellation error fixture.
pub fn cancelled_error() -> ErrorEnvelope {
    ErrorEnvelope::cancelled("cancelled")
}

/// An invalid argument error fixture.
pub fn invalid_argument_error() -> ErrorEnvelope {
    ErrorEnvelope::invalid_argument("invalid argument").with_metadata("field", "files")
}

/// A missing-submission error fixture.
pub fn submission_not_found_error(submission_id: &str) -> ErrorEnvelope {
    ErrorEnvelope::expected(ErrorCode::not_found(), "submission not found")
        .with_metadata("submissionId", submission_id)
}

/// A retriable timeout error fixture.
pub fn timeout_error() -> ErrorEnvelope {
    ErrorEnvelope::unexpected(ErrorCode::timeout(), "timeout", ErrorClass::Retriable)
}
