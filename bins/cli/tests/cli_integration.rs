//! CLI integration tests.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

fn cli() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_subdiff"));
    for (key, _) in std::env::vars() {
        if key.starts_with("SUBDIFF_") {
            command.env_remove(key);
        }
    }
    command.env_remove("RUST_LOG");
    command
}

fn run_cli(args: &[&str]) -> std::io::Result<Output> {
    cli().args(args).output()
}

fn run_cli_with_stdin(args: &[&str], stdin: &str) -> std::io::Result<Output> {
    let mut child = cli()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    if let Some(mut input) = child.stdin.take() {
        input.write_all(stdin.as_bytes())?;
    }
    child.wait_with_output()
}

fn stdout_json(output: &Output) -> std::io::Result<serde_json::Value> {
    serde_json::from_slice(&output.stdout).map_err(std::io::Error::other)
}

fn fixture_path(relative: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(Path::parent)
        .unwrap_or(manifest_dir)
        .join("crates")
        .join("testkit")
        .join("fixtures")
        .join(relative)
}

struct TempDir(PathBuf);

impl TempDir {
    fn new(prefix: &str) -> std::io::Result<Self> {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let seq = NEXT_DIR.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "subdiff-cli-{prefix}-{}-{nanos}-{seq}",
            std::process::id()
        ));
        std::fs::create_dir_all(&path)?;
        Ok(Self(path))
    }

    fn path(&self) -> &Path {
        &self.0
    }

    fn write(&self, relative: &str, content: &str) -> std::io::Result<()> {
        let path = self.0.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

fn write_submission(
    store: &TempDir,
    id: &str,
    at: i64,
    original: Option<&str>,
    files: &[(&str, &str)],
) -> std::io::Result<()> {
    let mut revision = serde_json::json!({
        "id": id,
        "teamId": "t1",
        "problemId": "hello",
        "languageId": "c",
        "submitTimeMs": at,
    });
    if let (Some(original), Some(object)) = (original, revision.as_object_mut()) {
        object.insert("originalSubmissionId".to_owned(), original.into());
    }
    let listed: Vec<serde_json::Value> = files
        .iter()
        .enumerate()
        .map(|(rank, (filename, _))| serde_json::json!({ "filename": filename, "rank": rank }))
        .collect();
    let manifest = serde_json::json!({ "revision": revision, "files": listed });
    store.write(&format!("{id}/submission.json"), &manifest.to_string())?;
    for (rank, (_, content)) in files.iter().enumerate() {
        store.write(&format!("{id}/files/{rank}"), content)?;
    }
    Ok(())
}

#[test]
fn cli_version_runs() -> std::io::Result<()> {
    let output = run_cli(&["--version"])?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.starts_with("subdiff "));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_info_json_has_build_details() -> std::io::Result<()> {
    let output = run_cli(&["--output", "json", "info"])?;
    assert!(output.status.success());

    let value = stdout_json(&output)?;
    assert_eq!(value["status"], "ok");
    assert_eq!(value["build"]["name"], "subdiff");
    Ok(())
}

#[test]
fn cli_classify_emits_debug_traces_at_debug_level() -> std::io::Result<()> {
    let new_dir = TempDir::new("trace-new")?;
    let old_dir = TempDir::new("trace-old")?;
    new_dir.write("main.c", "int main() { return 1; }")?;
    old_dir.write("main.c", "int main() { return 0; }")?;

    let output = cli()
        .env("SUBDIFF_LOG_LEVEL", "debug")
        .arg("classify")
        .arg(new_dir.path())
        .arg(old_dir.path())
        .output()?;
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success(), "classify failed: {stderr}");
    assert!(stderr.contains("classify inputs loaded"), "stderr: {stderr}");
    Ok(())
}

#[test]
fn cli_classify_directories_lists_categories() -> std::io::Result<()> {
    let new_dir = TempDir::new("classify-new")?;
    let old_dir = TempDir::new("classify-old")?;
    new_dir.write("main.c", "int main() { return 1; }")?;
    new_dir.write("util.h", "#pragma once")?;
    new_dir.write("extra.c", "void extra() {}")?;
    old_dir.write("main.c", "int main() { return 0; }")?;
    old_dir.write("util.h", "#pragma once")?;
    old_dir.write("legacy.c", "void legacy() {}")?;

    let output = cli()
        .arg("classify")
        .arg(new_dir.path())
        .arg(old_dir.path())
        .output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success(), "classify failed: {stderr}");
    assert!(stdout.contains("status: ok\n"));
    assert!(stdout.contains("added: extra.c\n"));
    assert!(stdout.contains("removed: legacy.c\n"));
    assert!(stdout.contains("changed: main.c\n"));
    assert!(stdout.contains("unchanged: util.h\n"));
    assert!(!stdout.contains("renamed:"));
    Ok(())
}

#[test]
fn cli_classify_request_from_stdin_flags_rename() -> std::io::Result<()> {
    let request = r#"{
        "files": [{ "filename": "Main.java", "content": "class Main {}" }],
        "oldFiles": [{ "filename": "main.java", "content": "class main {}" }]
    }"#;
    let output = run_cli_with_stdin(
        &["--output", "json", "--no-progress", "classify", "--request", "-"],
        request,
    )?;
    assert!(output.status.success());

    let value = stdout_json(&output)?;
    assert_eq!(value["changes"]["renamed"], true);
    assert_eq!(value["changes"]["changed"], serde_json::json!(["Main.java"]));
    assert_eq!(
        value["changes"]["changedPairs"][0]["oldFilename"],
        "main.java"
    );
    assert_eq!(value["changes"]["added"], serde_json::json!([]));
    Ok(())
}

#[test]
fn cli_classify_rejects_invalid_request() -> std::io::Result<()> {
    let request = r#"{ "files": [{ "filename": "", "content": "x" }] }"#;
    let output = run_cli_with_stdin(&["classify", "--request", "-"], request)?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout.contains("status: error"));
    assert!(stdout.contains("code: ERR_CORE_INVALID_ARGUMENT"));
    Ok(())
}

#[test]
fn cli_compare_uses_latest_earlier_submission() -> std::io::Result<()> {
    let store = TempDir::new("compare-store")?;
    write_submission(&store, "1", 10, None, &[("main.c", "v1")])?;
    write_submission(&store, "2", 20, None, &[("main.c", "v2")])?;
    write_submission(&store, "3", 30, None, &[("main.c", "v2"), ("util.c", "u")])?;

    let output = cli()
        .args(["--output", "json", "compare", "3"])
        .env("SUBDIFF_STORE_ROOT", store.path())
        .output()?;
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "compare failed: {stderr}");

    let value = stdout_json(&output)?;
    let comparison = &value["comparison"];
    assert_eq!(comparison["submission"]["submissionId"], "3");
    assert_eq!(comparison["previous"]["revision"]["submissionId"], "2");
    assert_eq!(
        comparison["previous"]["changes"]["added"],
        serde_json::json!(["util.c"])
    );
    assert_eq!(
        comparison["previous"]["changes"]["unchanged"],
        serde_json::json!(["main.c"])
    );
    assert!(comparison.get("original").is_none());
    Ok(())
}

#[test]
fn cli_compare_reports_original_for_edits() -> std::io::Result<()> {
    let store = TempDir::new("compare-edit")?;
    write_submission(&store, "10", 10, None, &[("a.py", "print(1)")])?;
    write_submission(&store, "11", 20, Some("10"), &[("a.py", "print(2)")])?;

    let output = cli()
        .args(["compare", "11"])
        .env("SUBDIFF_STORE_ROOT", store.path())
        .output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("submission: 11\n"));
    assert!(stdout.contains("previous: -\n"));
    assert!(stdout.contains("original: 10\n  added: -\n  removed: -\n  changed: a.py\n"));
    Ok(())
}

#[test]
fn cli_compare_missing_submission_is_invalid_input() -> std::io::Result<()> {
    let store = TempDir::new("compare-missing")?;
    let output = cli()
        .args(["--output", "json", "compare", "404"])
        .env("SUBDIFF_STORE_ROOT", store.path())
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    let value = stdout_json(&output)?;
    assert_eq!(value["error"]["code"], "ERR_CORE_NOT_FOUND");
    Ok(())
}

#[test]
fn cli_compare_requires_store_root() -> std::io::Result<()> {
    let output = run_cli(&["--output", "json", "compare", "1"])?;

    assert_eq!(output.status.code(), Some(2));
    let value = stdout_json(&output)?;
    assert_eq!(value["error"]["code"], "ERR_CONFIG_MISSING_STORE_ROOT");
    Ok(())
}

#[test]
fn cli_config_check_runs_on_fixtures() -> std::io::Result<()> {
    for fixture in ["config/subdiff.valid.json", "config/subdiff.valid.toml"] {
        let output = cli()
            .args(["config", "check", "--config"])
            .arg(fixture_path(fixture))
            .output()?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        assert!(output.status.success(), "{fixture}: {stderr}");
        assert!(stdout.contains("status: ok"));
    }
    Ok(())
}

#[test]
fn cli_config_check_fails_on_invalid_fixture() -> std::io::Result<()> {
    let output = cli()
        .args(["config", "check", "--config"])
        .arg(fixture_path("config/subdiff.invalid-limit.json"))
        .output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout.contains("status: error"));
    Ok(())
}

#[test]
fn cli_config_env_overrides_win() -> std::io::Result<()> {
    let output = cli()
        .args(["--json", "config", "check", "--config"])
        .arg(fixture_path("config/subdiff.valid.json"))
        .env("SUBDIFF_STORE_MAX_FILES", "7")
        .output()?;
    assert!(output.status.success());

    let value = stdout_json(&output)?;
    assert_eq!(value["effectiveConfig"]["store"]["maxFiles"], 7);
    assert_eq!(
        value["effectiveConfig"]["store"]["root"],
        "/srv/domjudge/submissions"
    );
    Ok(())
}

#[test]
fn cli_config_show_renders_toml() -> std::io::Result<()> {
    let output = cli()
        .args(["config", "show", "--format", "toml", "--config"])
        .arg(fixture_path("config/subdiff.valid.toml"))
        .output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.starts_with("status: ok\nconfig:\n"));
    assert!(stdout.contains("maxFiles = 20"));
    Ok(())
}

#[test]
fn cli_config_schema_describes_requests() -> std::io::Result<()> {
    let output = run_cli(&["config", "schema", "--kind", "classify-request"])?;
    assert!(output.status.success());

    let value = stdout_json(&output)?;
    let properties = value
        .get("properties")
        .and_then(serde_json::Value::as_object)
        .ok_or_else(|| std::io::Error::other("missing properties"))?;
    assert!(properties.contains_key("files"));
    assert!(properties.contains_key("oldFiles"));
    Ok(())
}
