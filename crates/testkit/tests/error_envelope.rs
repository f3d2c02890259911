//! Integration tests for shared error propagation.

use submission_diff_shared::{
    ErrorCode, ErrorEnvelope, ErrorKind, UnexpectedError, normalize_unexpected_error,
};
use submission_diff_testkit::errors::{
    cancelled_error, common_error_codes, invalid_argument_error, submission_not_found_error,
    timeout_error,
};

#[test]
fn error_envelope_crosses_crates() {
    let timeout = timeout_error();
    assert_eq!(timeout.code, ErrorCode::timeout());

    let boxed: Box<dyn std::error::Error> = Box::new(timeout);
    assert!(boxed.to_string().contains("core:timeout"));

    assert!(cancelled_error().is_cancelled());
}

#[test]
fn normalize_unexpected_error_is_available() {
    let envelope = normalize_unexpected_error(UnexpectedError::message("boom"));
    assert_eq!(envelope.code, ErrorCode::internal());
    assert_eq!(envelope.kind, ErrorKind::Unexpected);

    let io_error = std::io::Error::new(std::io::ErrorKind::TimedOut, "timeout");
    let envelope = normalize_unexpected_error(UnexpectedError::error(io_error));
    assert_eq!(envelope.code, ErrorCode::timeout());
}

#[test]
fn fixtures_carry_boundary_metadata() {
    let invalid: ErrorEnvelope = invalid_argument_error();
    assert_eq!(invalid.kind, ErrorKind::Expected);
    assert_eq!(invalid.metadata.get("field").map(String::as_str), Some("files"));

    let missing = submission_not_found_error("17");
    assert_eq!(missing.code, ErrorCode::not_found());
    assert_eq!(
        missing.metadata.get("submissionId").map(String::as_str),
        Some("17")
    );
}

#[test]
fn common_codes_are_unique() {
    let codes = common_error_codes();
    for (index, code) in codes.iter().enumerate() {
        assert!(
            !codes.iter().skip(index + 1).any(|other| other == code),
            "duplicate code {code}"
        );
    }
}
