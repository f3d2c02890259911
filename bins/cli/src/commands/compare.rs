//! Compare command handler.

use crate::commands::classify::push_changes_text;
use crate::error::CliError;
use crate::format::OutputMode;
use crate::{
    CliOutput, app_logger, block_on, format_error_output, format_ndjson_summary, load_config,
    log_info, pretty_json, telemetry,
};
use std::path::Path;
use std::sync::Arc;
use submission_diff_adapters::LocalSubmissionStore;
use submission_diff_api::v1::{
    ApiV1CompareSubmissionRequestDto, ApiV1CompareSubmissionResponseDto, ApiV1RevisionDiffDto,
    submission_comparison_to_api_v1, validate_compare_submission_request,
};
use submission_diff_app::{CompareSubmissionDeps, CompareSubmissionInput, compare_submission};
use submission_diff_shared::RequestContext;

/// Run the compare command.
pub fn run_compare(
    mode: OutputMode,
    config_path: Option<&Path>,
    submission_id: &str,
) -> Result<CliOutput, CliError> {
    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };
    telemetry::init(&config.logging);

    let request = ApiV1CompareSubmissionRequestDto {
        submission_id: submission_id.to_owned(),
    };
    let request = match validate_compare_submission_request(&request) {
        Ok(request) => request.into_inner(),
        Err(error) => return Ok(format_error_output(mode, &error)),
    };
    let store = match LocalSubmissionStore::from_config(&config.store) {
        Ok(store) => Arc::new(store),
        Err(error) => return Ok(format_error_output(mode, &error)),
    };
    tracing::debug!(root = %store.root().display(), "submission store opened");

    let deps = CompareSubmissionDeps {
        file_store: store.clone(),
        revision_store: store,
        logger: app_logger(&config, mode),
    };
    let input = CompareSubmissionInput {
        submission_id: request.submission_id,
    };
    let ctx = RequestContext::new_request();
    let comparison = match block_on(compare_submission(&ctx, &deps, &input))? {
        Ok(comparison) => submission_comparison_to_api_v1(&comparison),
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let mut stderr = String::new();
    log_info(&mut stderr, "compare completed", mode.no_progress);

    let stdout = if mode.is_ndjson() {
        format_ndjson_summary(
            "ok",
            "compare",
            Some(serde_json::json!({ "comparison": comparison })),
        )
    } else if mode.is_json() {
        pretty_json(&serde_json::json!({ "status": "ok", "comparison": comparison }))?
    } else {
        format_comparison_text(&comparison)
    };

    Ok(CliOutput::ok(stdout, stderr))
}

fn format_comparison_text(comparison: &ApiV1CompareSubmissionResponseDto) -> String {
    let mut out = format!(
        "status: ok\nsubmission: {}\n",
        comparison.submission.submission_id
    );
    push_diff_text(&mut out, "previous", comparison.previous.as_ref());
    push_diff_text(&mut out, "original", comparison.original.as_ref());
    out
}

fn push_diff_text(out: &mut String, label: &str, diff: Option<&ApiV1RevisionDiffDto>) {
    let Some(diff) = diff else {
        out.push_str(&format!("{label}: -\n"));
        return;
    };
    out.push_str(&format!("{label}: {}\n", diff.revision.submission_id));
    push_changes_text(out, "  ", &diff.changes);
}
