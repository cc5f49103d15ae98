//! CLI integration tests
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::cargo_bin("postea").unwrap()
}

fn settings_arg(dir: &TempDir) -> String {
    dir.path().join("settings.json").to_str().unwrap().to_string()
}

#[test]
fn test_cli_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("AI shortcuts"));
}

#[test]
fn test_cli_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("postea"));
}

#[test]
fn test_pages_requires_server_url() {
    let tmp = TempDir::new().unwrap();
    cmd()
        .args(["--settings", &settings_arg(&tmp), "pages", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No server URL configured"));
}

#[test]
fn test_settings_round_trip() {
    let tmp = TempDir::new().unwrap();
    let settings = settings_arg(&tmp);

    cmd()
        .args(["--settings", &settings, "settings", "set", "parser", "density"])
        .assert()
        .success();
    cmd()
        .args(["--settings", &settings, "settings", "get", "parser"])
        .assert()
        .success()
        .stdout(predicate::str::contains("density"));

    cmd()
        .args(["--settings", &settings, "settings", "set", "language", "Japanese"])
        .assert()
        .success();
    cmd()
        .args(["--settings", &settings, "settings", "get", "language"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Japanese"));
}

#[test]
fn test_settings_unknown_key_fails() {
    let tmp = TempDir::new().unwrap();
    cmd()
        .args(["--settings", &settings_arg(&tmp), "settings", "get", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown setting"));
}

#[test]
fn test_settings_path_prints_override() {
    let tmp = TempDir::new().unwrap();
    let settings = settings_arg(&tmp);
    cmd()
        .args(["--settings", &settings, "settings", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("settings.json"));
}

#[test]
fn test_prompts_list_shows_builtins() {
    let tmp = TempDir::new().unwrap();
    cmd()
        .args(["--settings", &settings_arg(&tmp), "prompts", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("builtin_summarize"))
        .stdout(predicate::str::contains("builtin_explain"));
}

#[test]
fn test_prompts_disable_then_list() {
    let tmp = TempDir::new().unwrap();
    let settings = settings_arg(&tmp);

    cmd()
        .args(["--settings", &settings, "prompts", "disable", "builtin_translate"])
        .assert()
        .success();

    let output = cmd().args(["--settings", &settings, "prompts", "list"]).output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    let translate_line = stdout
        .lines()
        .find(|line| line.contains("builtin_translate"))
        .expect("builtin_translate listed");
    assert!(translate_line.contains("off"), "line: {translate_line}");
}

#[test]
fn test_prompts_enable_unknown_id_fails() {
    let tmp = TempDir::new().unwrap();
    cmd()
        .args(["--settings", &settings_arg(&tmp), "prompts", "enable", "builtin_nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no prompt"));
}

#[test]
fn test_run_without_model_fails() {
    let tmp = TempDir::new().unwrap();
    cmd()
        .args(["--settings", &settings_arg(&tmp), "run", "builtin_summarize", "-"])
        .write_stdin("<html><body><p>x</p></body></html>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No AI model available"));
}

#[test]
fn test_run_rejects_unknown_model() {
    let tmp = TempDir::new().unwrap();
    let settings = settings_arg(&tmp);
    cmd()
        .args(["--settings", &settings, "settings", "set", "server-url", "http://127.0.0.1:1"])
        .assert()
        .success();
    cmd()
        .args([
            "--settings",
            &settings,
            "run",
            "builtin_summarize",
            "-",
            "--model",
            "ghost:model",
        ])
        .write_stdin("<html><body><p>x</p></body></html>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not available"));
}
