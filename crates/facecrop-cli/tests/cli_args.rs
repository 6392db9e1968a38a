//! CLI argument validation tests.
//!
//! Tests command-line argument parsing, validation, and error handling.

#![allow(clippy::unwrap_used)]
#![allow(deprecated)] // cargo_bin deprecation

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

/// Command isolated from user and project config files.
fn facecrop(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("facecrop").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.join("xdg"))
        .env("HOME", home)
        .current_dir(home);
    cmd
}

// === Missing/Invalid Path Tests ===

#[test]
fn test_missing_path_shows_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    facecrop(temp_dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No paths specified"));
}

#[test]
fn test_nonexistent_path_warns_but_continues() {
    let temp_dir = tempfile::tempdir().unwrap();
    facecrop(temp_dir.path())
        .arg("/nonexistent/path/to/image.jpg")
        .assert()
        .code(0) // No images = nothing failed
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_empty_directory() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = temp_dir.path().join("in");
    std::fs::create_dir(&input).unwrap();

    facecrop(temp_dir.path())
        .arg(&input)
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty());
}

// === Format Validation Tests ===

#[test]
fn test_invalid_format_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    facecrop(temp_dir.path())
        .args(["--format", "xml", "photo.jpg"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("json").or(predicate::str::contains("jsonl")));
}

#[test]
fn test_valid_formats_accepted() {
    let temp_dir = tempfile::tempdir().unwrap();
    for format in ["json", "jsonl"] {
        facecrop(temp_dir.path())
            .args(["--format", format])
            .arg(temp_dir.path())
            .assert()
            .code(0);
    }
}

// === Pipeline Setting Validation Tests ===

#[test]
fn test_fill_ratio_must_be_open_interval() {
    let temp_dir = tempfile::tempdir().unwrap();
    for ratio in ["0", "1.0", "1.5"] {
        facecrop(temp_dir.path())
            .args(["--fill-ratio", ratio, "photo.jpg"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("strictly between"));
    }
}

#[test]
fn test_confidence_out_of_range_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    facecrop(temp_dir.path())
        .args(["--fast-confidence", "2.0", "photo.jpg"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("2 is not in 0.0..=1.0"));
}

#[test]
fn test_non_numeric_value_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    facecrop(temp_dir.path())
        .args(["--accurate-confidence", "high", "photo.jpg"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not a valid number"));
}

#[test]
fn test_zero_output_size_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    facecrop(temp_dir.path())
        .args(["--output-size", "0", "photo.jpg"])
        .assert()
        .code(2);
}

#[test]
fn test_upscale_below_one_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    facecrop(temp_dir.path())
        .args(["--max-upscale", "0.5", "photo.jpg"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(">= 1.0"));
}

// === Help and Subcommands ===

#[test]
fn test_help_lists_options() {
    let temp_dir = tempfile::tempdir().unwrap();
    facecrop(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--output-dir")
                .and(predicate::str::contains("--fill-ratio"))
                .and(predicate::str::contains("--dry-run"))
                .and(predicate::str::contains("config")),
        );
}

#[test]
fn test_version_flag() {
    let temp_dir = tempfile::tempdir().unwrap();
    facecrop(temp_dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("facecrop"));
}

#[test]
fn test_crop_subcommand_matches_default() {
    let temp_dir = tempfile::tempdir().unwrap();
    facecrop(temp_dir.path())
        .arg("crop")
        .arg("/nonexistent/path/to/image.jpg")
        .assert()
        .code(0)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_unknown_flag_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    facecrop(temp_dir.path())
        .args(["--no-such-flag", "photo.jpg"])
        .assert()
        .code(2);
}
