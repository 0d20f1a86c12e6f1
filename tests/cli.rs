#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn cli() -> Command {
    Command::cargo_bin("shiftguard-cli").unwrap()
}

#[test]
fn sample_then_run_produces_outputs_and_exit_code_2() {
    let dir = tempdir().unwrap();
    let sample_dir = dir.path().join("inputs");

    cli()
        .args(["sample", "--dir"])
        .arg(&sample_dir)
        .args(["--month", "2026-02"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sample inputs written"));

    let schedule = dir.path().join("schedule.csv");
    let warnings = dir.path().join("warnings.csv");
    let outcome = dir.path().join("outcome.json");

    // the sample month is deliberately under-supplied (103 desired days vs a
    // 140-slot base demand), so the run completes but reports RED findings
    cli()
        .arg("run")
        .arg("--staff")
        .arg(sample_dir.join("staff.csv"))
        .arg("--config")
        .arg(sample_dir.join("config.json"))
        .arg("--out-schedule")
        .arg(&schedule)
        .arg("--out-warnings")
        .arg(&warnings)
        .arg("--out-json")
        .arg(&outcome)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("run summary"))
        .stdout(predicate::str::contains("critical issues (RED)"));

    assert!(schedule.exists());
    assert!(warnings.exists());
    assert!(outcome.exists());

    let warnings_csv = std::fs::read_to_string(&warnings).unwrap();
    assert!(warnings_csv.contains("INSUFFICIENT_CAPACITY_BASE"));
}

#[test]
fn missing_staff_file_fails_with_context() {
    let dir = tempdir().unwrap();
    cli()
        .arg("run")
        .arg("--staff")
        .arg(dir.path().join("nope.csv"))
        .arg("--config")
        .arg(dir.path().join("nope.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("loading staff"));
}

#[test]
fn invalid_month_in_sample_is_rejected() {
    let dir = tempdir().unwrap();
    cli()
        .args(["sample", "--dir"])
        .arg(dir.path().join("x"))
        .args(["--month", "2026-00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid month"));
}
