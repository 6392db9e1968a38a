//! Output format validation tests.
//!
//! Tests JSON/JSONL report correctness and required field presence.

#![allow(clippy::unwrap_used)]
#![allow(deprecated)] // cargo_bin deprecation

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use facecrop_core::domain::PixelBox;
use facecrop_test_support::SyntheticImageBuilder;
use predicates::prelude::*;
use serde_json::Value;

/// Command isolated from user and project config files.
fn facecrop(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("facecrop").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.join("xdg"))
        .env("HOME", home)
        .current_dir(home);
    cmd
}

/// Directory with one croppable portrait and one image without a sidecar.
fn mixed_batch(dir: &Path) -> PathBuf {
    let input = dir.join("in");
    std::fs::create_dir(&input).unwrap();
    let face = PixelBox {
        x: 120.0,
        y: 90.0,
        width: 60.0,
        height: 60.0,
    };
    SyntheticImageBuilder::portrait(300, 300, face)
        .image
        .save(input.join("a_face.png"))
        .unwrap();
    std::fs::write(
        input.join("a_face.png.faces.json"),
        r#"{"fast": [{"box": {"xmin": 0.4, "ymin": 0.3, "width": 0.2, "height": 0.2}, "confidence": 0.9}]}"#,
    )
    .unwrap();
    SyntheticImageBuilder::horizontal_gradient(100, 80)
        .image
        .save(input.join("b_plain.png"))
        .unwrap();
    input
}

// === JSONL Format Tests ===

#[test]
fn test_jsonl_format_single_object_per_line() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = mixed_batch(temp_dir.path());

    let output = facecrop(temp_dir.path())
        .args(["--format", "jsonl", "--dry-run", "--output-size", "64"])
        .arg(&input)
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);

    let lines: Vec<&str> = stdout.lines().filter(|l| !l.trim().is_empty()).collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        let value: Value = serde_json::from_str(line).unwrap();
        assert!(value.is_object(), "JSONL line should be an object");
    }
}

#[test]
fn test_jsonl_is_default_format() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = mixed_batch(temp_dir.path());

    facecrop(temp_dir.path())
        .args(["--dry-run", "--output-size", "64"])
        .arg(&input)
        .assert()
        .stdout(predicate::str::starts_with("{"));
}

// === JSON Format Tests ===

#[test]
fn test_json_format_is_array() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = mixed_batch(temp_dir.path());

    let output = facecrop(temp_dir.path())
        .args(["--format", "json", "--dry-run", "--output-size", "64"])
        .arg(&input)
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);

    let parsed: Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(parsed.as_array().map(Vec::len), Some(2));
    assert_eq!(stdout.trim().lines().count(), 1, "compact by default");
}

#[test]
fn test_json_pretty_spans_lines() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = mixed_batch(temp_dir.path());

    let output = facecrop(temp_dir.path())
        .args(["--format", "json", "--pretty", "--dry-run", "--output-size", "64"])
        .arg(&input)
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.lines().count() > 2);
    let parsed: Value = serde_json::from_str(&stdout).unwrap();
    assert!(parsed.is_array());
}

// === Required Fields ===

#[test]
fn test_cropped_report_fields() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = mixed_batch(temp_dir.path());

    let output = facecrop(temp_dir.path())
        .args(["--format", "json", "--output-size", "64", "-o"])
        .arg(temp_dir.path().join("out"))
        .arg(&input)
        .output()
        .unwrap();
    let parsed: Value = serde_json::from_slice(&output.stdout).unwrap();
    let report = &parsed[0];

    assert_eq!(report["status"], "cropped");
    assert!(report["path"].as_str().unwrap().ends_with("a_face.png"));
    assert!(report["output"]
        .as_str()
        .unwrap()
        .ends_with("a_face_cropped_64x64.png"));
    for field in [
        "confidence",
        "center",
        "size",
        "angle_degrees",
        "scale",
        "binding",
        "padded",
    ] {
        assert!(
            report["face"].get(field).is_some(),
            "face report missing {field}"
        );
    }
    assert!(report.get("failure").is_none());
}

#[test]
fn test_failed_report_fields() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = mixed_batch(temp_dir.path());

    let output = facecrop(temp_dir.path())
        .args(["--format", "json", "--dry-run"])
        .arg(&input)
        .output()
        .unwrap();
    let parsed: Value = serde_json::from_slice(&output.stdout).unwrap();
    let report = &parsed[1];

    assert_eq!(report["status"], "failed");
    assert_eq!(report["failure"]["kind"], "no_face_detected");
    assert_eq!(report["failure"]["message"], "no face detected");
    assert_eq!(report["dimensions"]["width"], 100);
    assert_eq!(report["dimensions"]["height"], 80);
    assert!(report.get("face").is_none());
    assert!(report.get("output").is_none());
}

#[test]
fn test_timestamp_is_rfc3339_utc() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = mixed_batch(temp_dir.path());

    let output = facecrop(temp_dir.path())
        .args(["--format", "json", "--dry-run"])
        .arg(&input)
        .output()
        .unwrap();
    let parsed: Value = serde_json::from_slice(&output.stdout).unwrap();

    for report in parsed.as_array().unwrap() {
        let ts = report["timestamp"].as_str().unwrap();
        assert!(ts.contains('T') && ts.ends_with('Z'), "timestamp {ts}");
    }
}

// === Progress Output ===

#[test]
fn test_quiet_suppresses_failure_lines() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = mixed_batch(temp_dir.path());

    facecrop(temp_dir.path())
        .args(["--dry-run", "-q"])
        .arg(&input)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("FAILED").not());

    facecrop(temp_dir.path())
        .arg("--dry-run")
        .arg(&input)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("FAILED").and(predicate::str::contains("b_plain.png")));
}
