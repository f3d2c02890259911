//! Classify command handler.

use crate::error::CliError;
use crate::format::OutputMode;
use crate::{
    CliOutput, app_logger, block_on, format_error_output, format_ndjson_summary, load_config,
    log_info, pretty_json, telemetry,
};
use std::io::Read;
use std::path::Path;
use submission_diff_adapters::{StoreLimits, load_directory_manifest};
use submission_diff_api::v1::{
    ApiV1FileChangeSetDto, ApiV1RequestLimits, file_change_set_to_api_v1,
    parse_classify_request_json,
};
use submission_diff_app::{ClassifyFilesDeps, ClassifyFilesInput, classify_files};
use submission_diff_config::DiffConfig;
use submission_diff_shared::{RequestContext, Result};

/// Where the two revisions come from.
#[derive(Debug, Clone, Copy)]
pub enum ClassifySource<'a> {
    /// Two plain directories, newer first.
    Directories {
        /// Newer revision.
        new_dir: &'a Path,
        /// Older revision.
        old_dir: &'a Path,
    },
    /// A JSON classify request file, or stdin for `-`.
    Request(&'a Path),
}

impl<'a> ClassifySource<'a> {
    /// Resolve the source from parsed CLI arguments.
    pub fn from_args(
        new_dir: Option<&'a Path>,
        old_dir: Option<&'a Path>,
        request: Option<&'a Path>,
    ) -> std::result::Result<Self, CliError> {
        match (request, new_dir, old_dir) {
            (Some(request), None, None) => Ok(Self::Request(request)),
            (None, Some(new_dir), Some(old_dir)) => Ok(Self::Directories { new_dir, old_dir }),
            _ => Err(CliError::InvalidInput(
                "pass NEW_DIR and OLD_DIR, or --request".to_owned(),
            )),
        }
    }
}

/// Run the classify command.
pub fn run_classify(
    mode: OutputMode,
    config_path: Option<&Path>,
    source: &ClassifySource<'_>,
) -> std::result::Result<CliOutput, CliError> {
    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };
    telemetry::init(&config.logging);

    let ctx = RequestContext::new_request();
    let input = match source {
        ClassifySource::Directories { new_dir, old_dir } => {
            block_on(read_directories(&ctx, &config, new_dir, old_dir))?
        },
        ClassifySource::Request(path) => {
            let payload = read_request(path)?;
            parse_classify_request_json(&payload, &request_limits(&config)).map(|request| {
                let request = request.into_inner();
                ClassifyFilesInput {
                    files: request.files,
                    old_files: request.old_files,
                }
            })
        },
    };
    let input = match input {
        Ok(input) => input,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };
    tracing::debug!(
        files = input.files.len(),
        old_files = input.old_files.len(),
        "classify inputs loaded"
    );

    let deps = ClassifyFilesDeps {
        logger: app_logger(&config, mode),
    };
    let changes = match classify_files(&ctx, &deps, &input) {
        Ok(changes) => file_change_set_to_api_v1(&changes),
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let mut stderr = String::new();
    log_info(&mut stderr, "classify completed", mode.no_progress);

    let stdout = if mode.is_ndjson() {
        format_ndjson_summary(
            "ok",
            "classify",
            Some(serde_json::json!({ "changes": changes })),
        )
    } else if mode.is_json() {
        pretty_json(&serde_json::json!({ "status": "ok", "changes": changes }))?
    } else {
        let mut out = "status: ok\n".to_owned();
        push_changes_text(&mut out, "", &changes);
        out
    };

    Ok(CliOutput::ok(stdout, stderr))
}

#[tracing::instrument(name = "read_directories", skip(ctx, config))]
async fn read_directories(
    ctx: &RequestContext,
    config: &DiffConfig,
    new_dir: &Path,
    old_dir: &Path,
) -> Result<ClassifyFilesInput> {
    let limits = StoreLimits::from_config(&config.store);
    let files = load_directory_manifest(ctx, new_dir, limits).await?;
    let old_files = load_directory_manifest(ctx, old_dir, limits).await?;
    Ok(ClassifyFilesInput { files, old_files })
}

fn read_request(path: &Path) -> std::result::Result<String, CliError> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    Ok(std::fs::read_to_string(path)?)
}

const fn request_limits(config: &DiffConfig) -> ApiV1RequestLimits {
    ApiV1RequestLimits {
        max_files: config.store.max_files,
        max_file_size_bytes: config.store.max_file_size_bytes,
    }
}

/// Append one `key: names` line per change category.
pub(crate) fn push_changes_text(out: &mut String, indent: &str, changes: &ApiV1FileChangeSetDto) {
    let categories = [
        ("added", &changes.added),
        ("removed", &changes.removed),
        ("changed", &changes.changed),
        ("unchanged", &changes.unchanged),
    ];
    for (label, names) in categories {
        let listed = if names.is_empty() {
            "-".to_owned()
        } else {
            names.join(", ")
        };
        out.push_str(&format!("{indent}{label}: {listed}\n"));
    }
    if changes.renamed {
        if let Some(pair) = changes.changed_pairs.first() {
            out.push_str(&format!(
                "{indent}renamed: {} -> {}\n",
                pair.old_filename, pair.filename
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use submission_diff_api::v1::ApiV1ChangedPairDto;

    #[test]
    fn source_requires_a_complete_choice() {
        let new_dir = Path::new("new");
        let old_dir = Path::new("old");
        assert!(matches!(
            ClassifySource::from_args(Some(new_dir), Some(old_dir), None),
            Ok(ClassifySource::Directories { .. })
        ));
        assert!(matches!(
            ClassifySource::from_args(None, None, Some(Path::new("-"))),
            Ok(ClassifySource::Request(_))
        ));
        assert!(ClassifySource::from_args(Some(new_dir), None, None).is_err());
    }

    #[test]
    fn text_lists_categories_and_rename() {
        let changes = ApiV1FileChangeSetDto {
            changed: vec!["Main.java".to_owned()],
            changed_pairs: vec![ApiV1ChangedPairDto {
                filename: "Main.java".to_owned(),
                rank: 0,
                content: String::new(),
                old_filename: "main.java".to_owned(),
                old_rank: 0,
                old_content: String::new(),
            }],
            renamed: true,
            ..ApiV1FileChangeSetDto::default()
        };

        let mut out = String::new();
        push_changes_text(&mut out, "  ", &changes);
        assert_eq!(
            out,
            "  added: -\n  removed: -\n  changed: Main.java\n  unchanged: -\n  renamed: main.java -> Main.java\n"
        );
    }
}
