use std::fs;

use assert_cmd::Command;
use chrono::Local;
use predicates::str::contains;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::cargo_bin("flashprep").unwrap()
}

#[test]
fn reset_without_port_is_advisory() {
    cmd()
        .arg("reset")
        .assert()
        .success()
        .stdout(contains("No upload port configured"));
}

#[test]
fn stamp_writes_todays_header() {
    let project = TempDir::new().unwrap();
    let before = Local::now().format("%y.%m.%d").to_string();

    cmd()
        .arg("stamp")
        .arg(format!("--project-dir={}", project.path().display()))
        .assert()
        .success()
        .stdout(contains("Generated version.h"));

    let after = Local::now().format("%y.%m.%d").to_string();
    let header = fs::read_to_string(project.path().join("include/version.h")).unwrap();
    assert!(header.contains("#ifndef VERSION_H"));
    // The build may straddle midnight; accept either day.
    assert!(
        header.contains(&format!("#define ESP32MUD_VERSION \"{}\"", before))
            || header.contains(&format!("#define ESP32MUD_VERSION \"{}\"", after))
    );
}

#[test]
fn stamp_overwrites_previous_header() {
    let project = TempDir::new().unwrap();
    let include = project.path().join("include");
    fs::create_dir_all(&include).unwrap();
    fs::write(include.join("version.h"), "// stale\n").unwrap();

    cmd()
        .arg("stamp")
        .arg(format!("--project-dir={}", project.path().display()))
        .assert()
        .success();

    let header = fs::read_to_string(include.join("version.h")).unwrap();
    assert!(!header.contains("stale"));
    assert!(header.contains("#define COMPILE_TIME"));
}

#[test]
fn stamp_failure_aborts_with_nonzero_exit() {
    let project = TempDir::new().unwrap();
    // A file where the include directory should go makes the write fail.
    fs::write(project.path().join("include"), b"not a directory").unwrap();

    cmd()
        .arg("stamp")
        .arg(format!("--project-dir={}", project.path().display()))
        .assert()
        .failure()
        .stdout(contains("Failed to generate version.h"));
}

#[test]
fn run_reset_upload_chains_to_upload() {
    cmd()
        .args(&["run", "reset_upload"])
        .assert()
        .success()
        .stdout(contains("No upload port configured"))
        .stdout(contains("Handing off to the orchestrator's upload transport"));
}

#[test]
fn run_compile_generates_the_header() {
    let project = TempDir::new().unwrap();

    cmd()
        .arg("run")
        .arg("compile")
        .arg(format!("--project-dir={}", project.path().display()))
        .assert()
        .success()
        .stdout(contains("Generated version.h"));

    assert!(project.path().join("include/version.h").is_file());
}

#[test]
fn run_rejects_unknown_targets() {
    cmd().args(&["run", "flash"]).assert().failure();
}
