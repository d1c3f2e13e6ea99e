//! CLI end-to-end tests
//!
//! Tests for the loopsmith command-line interface. Everything here runs
//! without ffmpeg installed: batch commands are only driven into their
//! failure paths, and the hero/validate commands never shell out at all.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the loopsmith binary
#[allow(deprecated)]
fn loopsmith_cmd() -> Command {
    Command::cargo_bin("loopsmith").unwrap()
}

/// Write a config file pointing the videos inventory at `dir`.
fn write_config(dir: &Path, json: &str) -> std::path::PathBuf {
    let path = dir.join("loopsmith.json");
    fs::write(&path, json).unwrap();
    path
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = loopsmith_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = loopsmith_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("loopsmith"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_flag() {
    let mut cmd = loopsmith_cmd();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("loopsmith"));
}

#[test]
fn test_cli_loops_help() {
    let mut cmd = loopsmith_cmd();
    cmd.args(["loops", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("loop-optimized"));
}

#[test]
fn test_cli_thumbs_help() {
    let mut cmd = loopsmith_cmd();
    cmd.args(["thumbs", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("thumbnail"));
}

#[test]
fn test_cli_check_tools_command() {
    let mut cmd = loopsmith_cmd();
    cmd.arg("check-tools").assert().success().stdout(
        predicate::str::contains("ffmpeg")
            .and(predicate::str::contains("ffprobe")),
    );
}

#[test]
fn test_cli_probe_nonexistent_file() {
    let mut cmd = loopsmith_cmd();
    cmd.args(["probe", "/nonexistent/path/movie.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found").or(predicate::str::contains("exist")));
}

#[test]
fn test_cli_validate_without_config_uses_defaults() {
    let mut cmd = loopsmith_cmd();
    cmd.arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("defaults"))
        .stdout(predicate::str::contains("public/videos"));
}

#[test]
fn test_cli_validate_valid_config() {
    let temp = tempdir().unwrap();
    let config_file = write_config(
        temp.path(),
        r#"{
            "videos": {"dir": "/data/clips", "sources": ["a.mp4", "b.mp4"]},
            "tools": {"timeout_secs": 120}
        }"#,
    );

    let mut cmd = loopsmith_cmd();
    cmd.args(["validate", config_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("Sources: 2"));
}

#[test]
fn test_cli_validate_invalid_config_fails() {
    let temp = tempdir().unwrap();
    let config_file = write_config(temp.path(), "{this is not json");

    let mut cmd = loopsmith_cmd();
    cmd.args(["validate", config_file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("parse error"));
}

#[test]
fn test_cli_validate_reports_warnings() {
    let temp = tempdir().unwrap();
    let config_file = write_config(temp.path(), r#"{"videos": {"sources": []}}"#);

    let mut cmd = loopsmith_cmd();
    cmd.args(["validate", config_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Warning"));
}

#[test]
fn test_cli_loops_missing_videos_dir_exits_nonzero() {
    let temp = tempdir().unwrap();
    let missing = temp.path().join("no-such-dir");
    let config_file = write_config(
        temp.path(),
        &format!(r#"{{"videos": {{"dir": "{}"}}}}"#, missing.display()),
    );

    // Fails on the missing directory, or earlier on a host without ffmpeg;
    // either way the run aborts before any per-file output.
    let mut cmd = loopsmith_cmd();
    cmd.args(["loops", "--config", config_file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_cli_loops_missing_tool_exits_nonzero() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("a.mp4"), b"source-bytes").unwrap();
    let config_file = write_config(
        temp.path(),
        &format!(
            r#"{{"videos": {{"dir": "{}", "sources": ["a.mp4"]}}}}"#,
            temp.path().display()
        ),
    );

    // With an empty PATH neither ffmpeg nor ffprobe resolves, so the run
    // aborts at tool discovery, before any per-file work.
    let mut cmd = loopsmith_cmd();
    cmd.env("PATH", "")
        .args(["loops", "--config", config_file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    assert!(!temp.path().join("a_optimized.mp4").exists());
}

#[test]
fn test_cli_thumbs_empty_sources_exits_nonzero() {
    let temp = tempdir().unwrap();
    let config_file = write_config(
        temp.path(),
        &format!(
            r#"{{"videos": {{"dir": "{}", "sources": []}}}}"#,
            temp.path().display()
        ),
    );

    let mut cmd = loopsmith_cmd();
    cmd.args(["thumbs", "--config", config_file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("no files were successfully processed")
                .or(predicate::str::contains("not found")),
        );
}

#[test]
fn test_cli_hero_already_present() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("hero.mp4"), b"existing").unwrap();
    let config_file = write_config(
        temp.path(),
        &format!(r#"{{"videos": {{"dir": "{}"}}}}"#, temp.path().display()),
    );

    let mut cmd = loopsmith_cmd();
    cmd.args(["hero", "--config", config_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("already in place"));
}

#[test]
fn test_cli_hero_copies_optimized_variant() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("hero_optimized.mp4"), b"optimized").unwrap();
    let config_file = write_config(
        temp.path(),
        &format!(r#"{{"videos": {{"dir": "{}"}}}}"#, temp.path().display()),
    );

    let mut cmd = loopsmith_cmd();
    cmd.args(["hero", "--config", config_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("copied"));

    assert_eq!(fs::read(temp.path().join("hero.mp4")).unwrap(), b"optimized");
}

#[test]
fn test_cli_hero_without_candidates_fails() {
    let temp = tempdir().unwrap();
    let config_file = write_config(
        temp.path(),
        &format!(r#"{{"videos": {{"dir": "{}"}}}}"#, temp.path().display()),
    );

    let mut cmd = loopsmith_cmd();
    cmd.args(["hero", "--config", config_file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("neither"));
}

#[test]
fn test_cli_bad_config_falls_back_to_defaults() {
    // A malformed config is a warning, not a fatal error: the hero command
    // still runs (and fails only because the default dir has no candidates).
    let temp = tempdir().unwrap();
    let config_file = write_config(temp.path(), "{broken");

    let mut cmd = loopsmith_cmd();
    cmd.current_dir(temp.path())
        .args(["hero", "--config", config_file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("neither"));
}
