//! CLI binary entrypoint.

mod commands;
mod error;
mod format;
mod telemetry;

use clap::{Parser, Subcommand, ValueEnum};
use commands::{
    ClassifySource, run_classify, run_compare, run_config_check, run_config_schema,
    run_config_show, run_info,
};
use error::{CliError, ExitCode};
use format::{OutputArgs, OutputMode};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use submission_diff_adapters::{JsonLogger, StderrLogSink, TracingLogger};
use submission_diff_api::v1::{ApiV1ErrorDto, ApiV1ErrorKind, error_envelope_to_api_v1_error};
use submission_diff_config::{
    DiffConfig, LogFormat, ValidatedDiffConfig, load_diff_config_std_env,
};
use submission_diff_ports::LoggerPort;
use submission_diff_shared::ErrorEnvelope;

#[derive(Debug, Parser)]
#[command(
    name = "subdiff",
    version,
    about = "Classify source-file changes between submission revisions",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    output: OutputArgs,

    /// Optional config file path (JSON/TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show build and version details.
    Info,
    /// Config-related commands.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Classify the files of a newer revision against an older one.
    Classify {
        /// Directory holding the newer revision.
        #[arg(value_name = "NEW_DIR", required_unless_present = "request")]
        new_dir: Option<PathBuf>,
        /// Directory holding the older revision.
        #[arg(value_name = "OLD_DIR", required_unless_present = "request")]
        old_dir: Option<PathBuf>,
        /// JSON classify request (`-` reads stdin).
        #[arg(long, conflicts_with_all = ["new_dir", "old_dir"])]
        request: Option<PathBuf>,
    },
    /// Compare a stored submission with its previous and original revisions.
    Compare {
        /// Submission identifier in the configured store.
        #[arg(value_name = "SUBMISSION_ID")]
        submission_id: String,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Validate config loading, env overrides, and normalization.
    Check,
    /// Show the effective config.
    Show {
        /// Rendering of the effective config.
        #[arg(long, value_enum, default_value_t = ConfigRendering::Json)]
        format: ConfigRendering,
    },
    /// Print a JSON Schema.
    Schema {
        /// Which document the schema describes.
        #[arg(long, value_enum, default_value_t = SchemaKind::Config)]
        kind: SchemaKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ConfigRendering {
    Json,
    Toml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SchemaKind {
    Config,
    ClassifyRequest,
    CompareRequest,
    FileChangeSet,
    CompareResponse,
    Error,
}

pub(crate) struct CliOutput {
    stdout: String,
    stderr: String,
    exit_code: ExitCode,
}

impl CliOutput {
    pub(crate) const fn ok(stdout: String, stderr: String) -> Self {
        Self {
            stdout,
            stderr,
            exit_code: ExitCode::Ok,
        }
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let mode = OutputMode::from_args(&cli.output);

    match run(&cli, mode) {
        Ok(output) => match write_output(&output) {
            Ok(()) => std::process::ExitCode::from(output.exit_code.as_u8()),
            Err(error) => exit_with_error(&error),
        },
        Err(error) => exit_with_error(&error),
    }
}

fn exit_with_error(error: &CliError) -> std::process::ExitCode {
    let _ = writeln!(io::stderr(), "error: {error}");
    std::process::ExitCode::from(error.exit_code().as_u8())
}

fn run(cli: &Cli, mode: OutputMode) -> Result<CliOutput, CliError> {
    let config_path = cli.config.as_deref();
    match &cli.command {
        Commands::Info => run_info(mode),
        Commands::Config { command } => match command {
            ConfigCommands::Check => run_config_check(mode, config_path),
            ConfigCommands::Show { format } => run_config_show(mode, config_path, *format),
            ConfigCommands::Schema { kind } => run_config_schema(mode, *kind),
        },
        Commands::Classify {
            new_dir,
            old_dir,
            request,
        } => {
            let source = ClassifySource::from_args(
                new_dir.as_deref(),
                old_dir.as_deref(),
                request.as_deref(),
            )?;
            run_classify(mode, config_path, &source)
        },
        Commands::Compare { submission_id } => run_compare(mode, config_path, submission_id),
    }
}

pub(crate) fn load_config(path: Option<&Path>) -> Result<ValidatedDiffConfig, ErrorEnvelope> {
    load_diff_config_std_env(path)
}

/// Logger handed to the use cases; `None` when progress output is off.
pub(crate) fn app_logger(config: &DiffConfig, mode: OutputMode) -> Option<Arc<dyn LoggerPort>> {
    if mode.no_progress {
        return None;
    }
    let logger: Arc<dyn LoggerPort> = match config.logging.format {
        LogFormat::Json => Arc::new(JsonLogger::from_config(
            Arc::new(StderrLogSink),
            &config.logging,
        )),
        LogFormat::Text => Arc::new(TracingLogger::new()),
    };
    Some(logger)
}

pub(crate) fn block_on<F: std::future::Future>(future: F) -> Result<F::Output, CliError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}

pub(crate) fn format_error_output(mode: OutputMode, error: &ErrorEnvelope) -> CliOutput {
    let api_error = error_envelope_to_api_v1_error(error, None);

    let mut stderr = String::new();
    log_info(&mut stderr, "command failed", mode.no_progress);

    let stdout = if mode.is_ndjson() {
        format_ndjson_error(&api_error)
    } else if mode.is_json() {
        let payload = serde_json::json!({
            "status": "error",
            "error": api_error,
        });

        // This is a CLI boundary, so JSON serialization errors are internal.
        let mut output = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| {
            "{\"status\":\"error\",\"error\":{\"code\":\"ERR_CORE_INTERNAL\",\"message\":\"internal error\",\"kind\":\"INVARIANT\"}}".to_owned()
        });
        output.push('\n');
        output
    } else {
        format_api_error_text(&api_error)
    };

    CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::for_envelope(error),
    }
}

fn format_api_error_text(error: &ApiV1ErrorDto) -> String {
    let mut out = String::new();
    out.push_str("status: error\n");
    out.push_str("code: ");
    out.push_str(&error.code);
    out.push('\n');
    out.push_str("message: ");
    out.push_str(&error.message);
    out.push('\n');
    out.push_str("kind: ");
    out.push_str(match error.kind {
        ApiV1ErrorKind::Expected => "EXPECTED",
        ApiV1ErrorKind::Invariant => "INVARIANT",
    });
    out.push('\n');

    let meta = error.meta.as_ref().filter(|meta| !meta.is_empty());
    if let Some(meta) = meta {
        out.push_str("meta:\n");
        for (key, value) in meta {
            out.push_str("  ");
            out.push_str(key);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
    }

    out
}

pub(crate) fn log_info(stderr: &mut String, message: &str, no_progress: bool) {
    if no_progress {
        return;
    }
    stderr.push_str("info: ");
    stderr.push_str(message);
    stderr.push('\n');
}

pub(crate) fn format_ndjson_summary(
    status: &str,
    kind: &str,
    extra: Option<serde_json::Value>,
) -> String {
    let mut payload = serde_json::Map::new();
    payload.insert("type".to_owned(), serde_json::Value::from("summary"));
    payload.insert("status".to_owned(), serde_json::Value::from(status));
    payload.insert("kind".to_owned(), serde_json::Value::from(kind));
    if let Some(serde_json::Value::Object(map)) = extra {
        payload.extend(map);
    }
    let mut out = serde_json::to_string(&serde_json::Value::Object(payload)).unwrap_or_else(|_| {
        "{\"type\":\"summary\",\"status\":\"error\",\"kind\":\"internal\"}".to_owned()
    });
    out.push('\n');
    out
}

fn format_ndjson_error(error: &ApiV1ErrorDto) -> String {
    let payload = serde_json::json!({
        "type": "error",
        "status": "error",
        "error": error,
    });
    let mut out = serde_json::to_string(&payload).unwrap_or_else(|_| {
        "{\"type\":\"error\",\"status\":\"error\",\"error\":{\"code\":\"ERR_CORE_INTERNAL\",\"message\":\"internal error\",\"kind\":\"INVARIANT\"}}".to_owned()
    });
    out.push('\n');
    out
}

pub(crate) fn pretty_json(payload: &serde_json::Value) -> Result<String, CliError> {
    let mut output = serde_json::to_string_pretty(payload)?;
    output.push('\n');
    Ok(output)
}

fn write_output(output: &CliOutput) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    stdout.write_all(output.stdout.as_bytes())?;

    if !output.stderr.is_empty() {
        let mut stderr = io::stderr();
        stderr.write_all(output.stderr.as_bytes())?;
        stderr.flush()?;
    }

    Ok(())
}
