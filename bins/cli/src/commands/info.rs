//! Info command handler.

use crate::error::CliError;
use crate::format::OutputMode;
use crate::{CliOutput, format_ndjson_summary, pretty_json};
use submission_diff_adapters::adapters_crate_version;
use submission_diff_api::api_crate_version;
use submission_diff_app::app_crate_version;
use submission_diff_config::config_crate_version;
use submission_diff_domain::domain_crate_version;

/// Run the info command.
pub fn run_info(mode: OutputMode) -> Result<CliOutput, CliError> {
    let build = build_payload();

    let stdout = if mode.is_ndjson() {
        format_ndjson_summary("ok", "info", Some(serde_json::json!({ "build": build })))
    } else if mode.is_json() {
        pretty_json(&serde_json::json!({ "status": "ok", "build": build }))?
    } else {
        format!(
            "status: ok\nname: {}\nversion: {}\napi: {}\napp: {}\nadapters: {}\nconfig: {}\ndomain: {}\n",
            env!("CARGO_BIN_NAME"),
            env!("CARGO_PKG_VERSION"),
            api_crate_version(),
            app_crate_version(),
            adapters_crate_version(),
            config_crate_version(),
            domain_crate_version(),
        )
    };

    Ok(CliOutput::ok(stdout, String::new()))
}

fn build_payload() -> serde_json::Value {
    serde_json::json!({
        "name": env!("CARGO_BIN_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "apiVersion": api_crate_version(),
        "appVersion": app_crate_version(),
        "adaptersVersion": adapters_crate_version(),
        "configVersion": config_crate_version(),
        "domainVersion": domain_crate_version(),
    })
}
