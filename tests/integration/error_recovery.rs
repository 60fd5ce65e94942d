//! Error handling of the binary
//!
//! Runs the built executable and checks exit status and messages.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn analyst(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_harbor-analyst"))
        .args(args)
        .current_dir(cwd)
        .env_remove("HARBOR_ANALYST_CONFIG")
        .env("XDG_CONFIG_HOME", cwd.join("xdg"))
        .output()
        .expect("Failed to execute harbor-analyst")
}

fn write_fixture(root: &Path, access_log_rows: &str, chart: &str) {
    let raw = root.join("raw");
    fs::create_dir_all(&raw).unwrap();
    fs::write(raw.join("project.csv"), "project_id,owner_id,name,deleted,public\n1,1,demo,f,t\n").unwrap();
    fs::write(raw.join("repository.csv"), "repository_id,name,project_id,owner_id\n10,app,1,1\n").unwrap();
    fs::write(raw.join("user.csv"), "user_id,username\n1,alice\n").unwrap();
    fs::write(
        raw.join("access_log.csv"),
        format!("log_id,user_id,project_id,repo_name,repo_tag,operation,op_time\n{}", access_log_rows),
    )
    .unwrap();
    fs::write(root.join("analyst.yaml"), format!("charts:\n{}", chart)).unwrap();
}

const HOUR_CHART: &str = "  - statsMethodName: PushesByHourOfDay\n    titleTemplate: Pushes\n    timePeriodInDays: 36500\n";

#[test]
fn test_successful_run_with_summary() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), "1,1,1,app,latest,push,2024-01-01 08:00:00\n", HOUR_CHART);

    let output = analyst(&["--summary", "--quiet"], dir.path());

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("8:00"));
    assert!(dir.path().join("out").join("report.pdf").exists());
    assert!(dir.path().join("out").join("chart_0.png").exists());
}

#[test]
fn test_list_stats_needs_no_configuration() {
    let dir = TempDir::new().unwrap();

    let output = analyst(&["--list-stats"], dir.path());

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("PushesByHourOfDay"));
    assert!(stdout.contains("TopPushedRepositories"));
    assert!(stdout.contains("TopPushingUsers"));
}

#[test]
fn test_missing_configuration_fails() {
    let dir = TempDir::new().unwrap();

    let output = analyst(&[], dir.path());

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no configuration file found"), "stderr: {}", stderr);
}

#[test]
fn test_conflicting_log_flags_fail() {
    let dir = TempDir::new().unwrap();

    let output = analyst(&["--verbose", "--quiet"], dir.path());

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Conflicting log level flags"));
}

#[test]
fn test_malformed_timestamp_aborts_without_report() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), "1,1,1,app,latest,push,01/01/2024\n", HOUR_CHART);

    let output = analyst(&[], dir.path());

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("access_log.csv line 2"), "stderr: {}", stderr);
    assert!(!dir.path().join("out").join("report.pdf").exists());
}

#[test]
fn test_unknown_statistic_aborts() {
    let dir = TempDir::new().unwrap();
    write_fixture(
        dir.path(),
        "",
        "  - statsMethodName: PushesByWeekday\n    titleTemplate: Weekdays\n    timePeriodInDays: 7\n",
    );

    let output = analyst(&[], dir.path());

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("PushesByWeekday"));
}

#[test]
fn test_unknown_references_are_recoverable() {
    let dir = TempDir::new().unwrap();
    write_fixture(
        dir.path(),
        "\
1,1,1,app,latest,push,2024-01-01 08:00:00
2,9,1,app,latest,push,2024-01-01 09:00:00
3,1,1,missing,latest,push,2024-01-01 10:00:00
4,1,5,app,N/A,create,2024-01-01 07:00:00
",
        HOUR_CHART,
    );

    let output = analyst(&["--log-file", "analyst.log", "--log-file-level", "warn", "--quiet"], dir.path());

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let log = fs::read_to_string(dir.path().join("analyst.log")).unwrap();
    assert!(log.contains("Failed to find user with ID 9"));
    assert!(log.contains("missing"));
    assert!(log.contains("project with ID 5"));
}
