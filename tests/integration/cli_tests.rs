//! CLI integration tests
//!
//! These tests run the compiled binary against temporary project trees.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn deadfiles() -> Command {
    Command::cargo_bin("deadfiles").expect("binary should build")
}

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

#[test]
fn test_cli_help() {
    deadfiles()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("deadfiles"))
        .stdout(predicate::str::contains("--watch"))
        .stdout(predicate::str::contains("--batch-size"));
}

#[test]
fn test_cli_version() {
    deadfiles()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("deadfiles"));
}

#[test]
fn test_cli_json_output() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), ".deadfiles.json", r#"{ "fileTypes": ["ts"] }"#);
    write(temp.path(), "a.ts", "");
    write(temp.path(), "b.ts", r#"import "./a""#);
    write(temp.path(), "c.ts", "");

    let output = deadfiles()
        .arg(temp.path())
        .args(["--format", "json", "--quiet"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let report: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();

    assert_eq!(report["cancelled"], false);
    assert_eq!(report["total_unused"], 2);
    let files: Vec<String> = report["unused_files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert!(files.iter().any(|f| f.ends_with("b.ts")));
    assert!(files.iter().any(|f| f.ends_with("c.ts")));
    assert!(!files.iter().any(|f| f.ends_with("a.ts")));
}

#[test]
fn test_cli_terminal_output() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), ".deadfiles.json", r#"{ "fileTypes": ["ts"] }"#);
    write(temp.path(), "orphan.ts", "");

    deadfiles()
        .arg(temp.path())
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("unused files"))
        .stdout(predicate::str::contains("orphan.ts"));
}

#[test]
fn test_cli_no_unused_files() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), ".deadfiles.json", r#"{ "fileTypes": ["ts"] }"#);
    write(temp.path(), "a.ts", r#"import "./b""#);
    write(temp.path(), "b.ts", r#"import "./a""#);

    deadfiles()
        .arg(temp.path())
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("No unused files found"));
}

#[test]
fn test_cli_ignore_folder_flag() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), ".deadfiles.json", r#"{ "fileTypes": ["ts"] }"#);
    write(temp.path(), "vendor/x.ts", "");
    write(temp.path(), "src/y.ts", "");

    let output = deadfiles()
        .arg(temp.path())
        .args(["--ignore-folder", "vendor", "--format", "json", "--quiet"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let report: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    let files = report["unused_files"].as_array().unwrap();

    assert_eq!(files.len(), 1);
    assert!(files[0].as_str().unwrap().ends_with("y.ts"));
}

#[test]
fn test_cli_dry_run_deletes_nothing() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), ".deadfiles.json", r#"{ "fileTypes": ["ts"] }"#);
    write(temp.path(), "orphan.ts", "");

    deadfiles()
        .arg(temp.path())
        .args(["--delete", "--dry-run", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"));

    assert!(temp.path().join("orphan.ts").exists());
}

#[test]
fn test_cli_missing_root_fails() {
    deadfiles()
        .arg("/nonexistent/deadfiles-cli-test")
        .arg("--quiet")
        .assert()
        .failure();
}
