//! API v1 fixture parity tests.

use std::error::Error;
use submission_diff_api::v1::{
    ApiV1ClassifyRequestDto, ApiV1CompareSubmissionRequestDto, ApiV1ErrorDto,
    ApiV1FileChangeSetDto, ApiV1RequestLimits, ApiV1Result, api_v1_classify_request_schema,
    api_v1_compare_submission_response_schema, error_envelope_to_api_v1_error,
    file_change_set_to_api_v1, submission_comparison_to_api_v1, validate_classify_request,
    validate_compare_submission_request,
};
use submission_diff_domain::{
    LanguageId, NamedFile, ProblemId, RevisionDiff, SubmissionComparison, SubmissionId,
    SubmissionRevision, TeamId, classify,
};
use submission_diff_shared::ErrorEnvelope;
use submission_diff_testkit::fixtures::api_v1_json_fixtures;

fn revision(id: &str, at: i64, entry_point: &str) -> Result<SubmissionRevision, Box<dyn Error>> {
    Ok(SubmissionRevision {
        id: SubmissionId::parse(id)?,
        team_id: TeamId::parse("team7")?,
        problem_id: ProblemId::parse("hello")?,
        language_id: LanguageId::parse("java")?,
        submit_time_ms: at,
        original_submission_id: None,
        entry_point: Some(entry_point.into()),
    })
}

#[test]
fn error_wrappers_match_fixtures() -> Result<(), Box<dyn Error>> {
    let fixtures = api_v1_json_fixtures()?;

    let envelope = ErrorEnvelope::invalid_argument("files: rank 1 is used by more than one file")
        .with_metadata("field", "files")
        .with_metadata("reason", "duplicate_rank")
        .with_metadata("rank", "1")
        .with_metadata("content", "int main");
    let error_dto: ApiV1ErrorDto = error_envelope_to_api_v1_error(&envelope, None);
    assert_eq!(serde_json::to_value(&error_dto)?, fixtures.error_dto);

    let err_result: ApiV1Result<ApiV1FileChangeSetDto> = ApiV1Result::err(error_dto);
    assert_eq!(serde_json::to_value(&err_result)?, fixtures.error_result);

    let ok_result = ApiV1Result::ok(ApiV1FileChangeSetDto {
        added: vec!["extra.c".to_owned()],
        unchanged: vec!["main.c".to_owned()],
        ..ApiV1FileChangeSetDto::default()
    });
    assert_eq!(serde_json::to_value(&ok_result)?, fixtures.ok_result);
    Ok(())
}

#[test]
fn classify_request_round_trips_through_validation() -> Result<(), Box<dyn Error>> {
    let fixtures = api_v1_json_fixtures()?;

    let dto: ApiV1ClassifyRequestDto = serde_json::from_value(fixtures.classify_request.clone())?;
    assert_eq!(serde_json::to_value(&dto)?, fixtures.classify_request);

    let request = validate_classify_request(&dto, &ApiV1RequestLimits::default())?;
    let changes = classify(&request.files, &request.old_files);
    let payload = file_change_set_to_api_v1(&changes);
    assert_eq!(serde_json::to_value(&payload)?, fixtures.file_change_set);
    Ok(())
}

#[test]
fn compare_payloads_match_fixtures() -> Result<(), Box<dyn Error>> {
    let fixtures = api_v1_json_fixtures()?;

    let dto: ApiV1CompareSubmissionRequestDto =
        serde_json::from_value(fixtures.compare_submission_request.clone())?;
    let request = validate_compare_submission_request(&dto)?;
    assert_eq!(request.submission_id.as_str(), "1042");

    let files = [NamedFile::new("Main.java", b"class Main {}".as_slice(), 0)?];
    let old_files = [NamedFile::new("Solution.java", b"class Solution {}".as_slice(), 0)?];
    let comparison = SubmissionComparison {
        submission: revision("1042", 1_700_000_300_000, "Main")?,
        previous: Some(RevisionDiff {
            revision: revision("1041", 1_700_000_100_000, "Solution")?,
            changes: classify(&files, &old_files),
        }),
        original: None,
    };

    let payload = submission_comparison_to_api_v1(&comparison);
    assert_eq!(
        serde_json::to_value(&payload)?,
        fixtures.compare_submission_response
    );
    Ok(())
}

#[test]
fn unknown_request_fields_are_rejected() {
    let parsed: Result<ApiV1ClassifyRequestDto, _> =
        serde_json::from_str(r#"{"files":[],"oldFiles":[],"cid":3}"#);
    assert!(parsed.is_err());
}

#[test]
fn schemas_describe_camel_case_fields() -> Result<(), Box<dyn Error>> {
    let request = serde_json::to_value(api_v1_classify_request_schema())?;
    assert!(request["properties"].get("oldFiles").is_some());

    let response = serde_json::to_value(api_v1_compare_submission_response_schema())?;
    assert!(response["properties"].get("submission").is_some());
    Ok(())
}
