//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with HOME pointed at a temporary directory
//! so the user's real configuration is never touched.

use std::path::Path;
use std::process::Command;

/// Run a CLI command under `home` and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_classboard"))
        .args(args)
        .env("HOME", home)
        .env_remove("CLASSBOARD_ENV")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn parse_json(text: &str) -> serde_json::Value {
    serde_json::from_str(text).expect("Failed to parse JSON output")
}

#[test]
fn test_status_with_sample_week() {
    let home = tempfile::tempdir().unwrap();
    // 2026-10-19 is a Monday; the sample week opens with Chinese at 08:00
    let (stdout, stderr, code) = run_cli(home.path(), &["status", "--at", "2026-10-19 08:10"]);
    assert_eq!(code, 0, "status failed: {stderr}");

    let json = parse_json(&stdout);
    assert_eq!(json["state"]["state"], "in_lesson");
    assert_eq!(json["state"]["slot"]["subject"], "Chinese");
    assert_eq!(json["state"]["elapsed_fraction"], 22);
    assert_eq!(json["next"]["target"]["kind"], "active_end");
    assert_eq!(json["countdown"]["minutes"], 35);
}

#[test]
fn test_status_with_schedule_file() {
    let home = tempfile::tempdir().unwrap();
    let file = home.path().join("week.json");
    std::fs::write(
        &file,
        r#"{ "Monday": [{ "time": "08:00-08:45", "subject": "Math", "room": "101" }],
             "Tuesday": [{ "time": "08:00-08:45", "subject": "History", "room": "201" }] }"#,
    )
    .unwrap();

    let (stdout, stderr, code) = run_cli(
        home.path(),
        &["status", "--schedule", file.to_str().unwrap(), "--at", "2026-10-19 23:59"],
    );
    assert_eq!(code, 0, "status failed: {stderr}");

    let json = parse_json(&stdout);
    assert_eq!(json["next"]["slot"]["subject"], "History");
    assert_eq!(json["next"]["minutes_until"], 481);
}

#[test]
fn test_day_on_weekend_is_empty() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["day", "--date", "2026-10-24"]);
    assert_eq!(code, 0);

    let json = parse_json(&stdout);
    assert_eq!(json["weekday"], "saturday");
    assert_eq!(json["lessons"].as_array().unwrap().len(), 0);
}

#[test]
fn test_validate_reports_overlap() {
    let home = tempfile::tempdir().unwrap();
    let file = home.path().join("bad.json");
    std::fs::write(
        &file,
        r#"{ "Monday": [
            { "time": "08:00-08:45", "subject": "Math", "room": "101" },
            { "time": "08:30-09:10", "subject": "Clash", "room": "102" }
        ] }"#,
    )
    .unwrap();

    let (stdout, stderr, code) = run_cli(home.path(), &["validate", file.to_str().unwrap()]);
    assert_eq!(code, 1);
    assert!(stdout.contains("Monday #1 (Clash): overlaps slot #0"), "got: {stdout}");
    assert!(stderr.contains("1 issue(s) found"));
}

#[test]
fn test_validate_accepts_good_file() {
    let home = tempfile::tempdir().unwrap();
    let file = home.path().join("good.json");
    std::fs::write(
        &file,
        r#"{ "星期一": [{ "time": "8:00-08:45", "subject": "Math", "classroom": "101" }] }"#,
    )
    .unwrap();

    let (stdout, _, code) = run_cli(home.path(), &["validate", file.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("ok: 1 lesson(s)"));
}

#[test]
fn test_config_set_then_get() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["config", "set", "notifications.lead_minutes", "10"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ok");

    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "notifications.lead_minutes"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "10");

    assert!(home.path().join(".config/classboard/config.toml").exists());
}

#[test]
fn test_config_rejects_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["config", "set", "ui.dark_mode", "true"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_config_list_is_json() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["config", "list"]);
    assert_eq!(code, 0);
    let json = parse_json(&stdout);
    assert_eq!(json["notifications"]["lead_minutes"], 5);
    assert_eq!(json["presence"]["autohide"], false);
}
