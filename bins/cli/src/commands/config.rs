//! Config command handlers.

use crate::error::CliError;
use crate::format::OutputMode;
use crate::{
    CliOutput, ConfigRendering, SchemaKind, format_error_output, format_ndjson_summary,
    load_config, log_info, pretty_json,
};
use std::path::Path;
use submission_diff_api::v1::{
    api_v1_classify_request_schema, api_v1_compare_submission_request_schema,
    api_v1_compare_submission_response_schema, api_v1_error_schema, api_v1_file_change_set_schema,
};
use submission_diff_config::{diff_config_schema, to_pretty_json, to_pretty_toml};

/// Validate config loading and report the outcome.
pub fn run_config_check(mode: OutputMode, path: Option<&Path>) -> Result<CliOutput, CliError> {
    let config = match load_config(path) {
        Ok(config) => config,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let mut stderr = String::new();
    log_info(&mut stderr, "config check completed", mode.no_progress);

    let stdout = if mode.is_ndjson() {
        format_ndjson_summary("ok", "config", None)
    } else if mode.is_json() {
        let config_value = serde_json::to_value(&*config)?;
        pretty_json(&serde_json::json!({
            "status": "ok",
            "configPath": path.map(|value| value.to_string_lossy().into_owned()),
            "effectiveConfig": config_value,
        }))?
    } else {
        path.map_or_else(
            || "status: ok\nconfig: ok\n".to_owned(),
            |path| format!("status: ok\nconfig: ok\npath: {}\n", path.to_string_lossy()),
        )
    };

    Ok(CliOutput::ok(stdout, stderr))
}

/// Print the effective config.
pub fn run_config_show(
    mode: OutputMode,
    path: Option<&Path>,
    rendering: ConfigRendering,
) -> Result<CliOutput, CliError> {
    let config = match load_config(path) {
        Ok(config) => config,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let mut stderr = String::new();
    log_info(&mut stderr, "config show completed", mode.no_progress);

    let stdout = if mode.is_ndjson() || mode.is_json() {
        let payload = serde_json::json!({
            "status": "ok",
            "configPath": path.map(|value| value.to_string_lossy().into_owned()),
            "effectiveConfig": serde_json::to_value(&*config)?,
        });
        if mode.is_ndjson() {
            format_ndjson_summary("ok", "config", Some(payload))
        } else {
            pretty_json(&payload)?
        }
    } else {
        let rendered = match rendering {
            ConfigRendering::Json => to_pretty_json(&config),
            ConfigRendering::Toml => to_pretty_toml(&config),
        };
        match rendered {
            Ok(rendered) => format!("status: ok\nconfig:\n{rendered}"),
            Err(error) => return Ok(format_error_output(mode, &error)),
        }
    };

    Ok(CliOutput::ok(stdout, stderr))
}

/// Print a JSON Schema for the config or an API v1 document.
pub fn run_config_schema(mode: OutputMode, kind: SchemaKind) -> Result<CliOutput, CliError> {
    let schema = match kind {
        SchemaKind::Config => diff_config_schema(),
        SchemaKind::ClassifyRequest => api_v1_classify_request_schema(),
        SchemaKind::CompareRequest => api_v1_compare_submission_request_schema(),
        SchemaKind::FileChangeSet => api_v1_file_change_set_schema(),
        SchemaKind::CompareResponse => api_v1_compare_submission_response_schema(),
        SchemaKind::Error => api_v1_error_schema(),
    };
    let value = serde_json::to_value(&schema)?;

    let stdout = if mode.is_ndjson() {
        let mut line = serde_json::to_string(&value)?;
        line.push('\n');
        line
    } else {
        pretty_json(&value)?
    };
    Ok(CliOutput::ok(stdout, String::new()))
}
