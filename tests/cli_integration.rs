//! CLI integration tests for tagconf
//!
//! These tests drive the binary against files in a temporary directory,
//! with the settings file pointed into the same directory.

use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Get a command instance for the tagconf binary, isolated from user settings
fn tagconf_cmd(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("tagconf"));
    cmd.env("TAGCONF_CONFIG", dir.path().join("settings.toml"))
        .env_remove("RUST_LOG")
        .current_dir(dir.path());
    cmd
}

/// Create a temporary directory holding an initialized config file
fn setup_config() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.cfg");
    tagconf_cmd(&dir)
        .args(["init", "app.cfg", "--header", "app settings"])
        .assert()
        .success();
    (dir, path)
}

// =============================================================================
// Init
// =============================================================================

#[test]
fn test_init_writes_header() {
    let (_dir, path) = setup_config();
    assert_eq!(fs::read_to_string(&path).unwrap(), "# app settings\n");
}

#[test]
fn test_init_is_idempotent() {
    let (dir, path) = setup_config();

    tagconf_cmd(&dir)
        .args(["init", "app.cfg", "--header", "changed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    assert_eq!(fs::read_to_string(&path).unwrap(), "# app settings\n");
}

// =============================================================================
// Entries
// =============================================================================

#[test]
fn test_add_and_get() {
    let (dir, path) = setup_config();

    tagconf_cmd(&dir)
        .args(["add", "app.cfg", "rect", "window", "0,0,800,600", "--comment", "Main window"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added window (rect)"));

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "# app settings\n# Main window\n6_window=0,0,800,600\n"
    );

    tagconf_cmd(&dir)
        .args(["get", "app.cfg", "window"])
        .assert()
        .success()
        .stdout("0,0,800,600\n");
}

#[test]
fn test_add_rejects_bad_value() {
    let (dir, _path) = setup_config();

    tagconf_cmd(&dir)
        .args(["add", "app.cfg", "point", "pos", "1,2,3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid point value"));
}

#[test]
fn test_add_duplicate_needs_replace() {
    let (dir, path) = setup_config();

    tagconf_cmd(&dir)
        .args(["add", "app.cfg", "string", "name", "v1"])
        .assert()
        .success();

    tagconf_cmd(&dir)
        .args(["add", "app.cfg", "string", "name", "v2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Value with id 'name' already exists"));

    tagconf_cmd(&dir)
        .args(["add", "app.cfg", "string", "name", "v2", "--replace"])
        .assert()
        .success();

    assert!(fs::read_to_string(&path).unwrap().contains("2_name=v2\n"));
}

#[test]
fn test_set_keeps_type() {
    let (dir, path) = setup_config();

    tagconf_cmd(&dir)
        .args(["add", "app.cfg", "int", "retries", "3"])
        .assert()
        .success();

    tagconf_cmd(&dir)
        .args(["set", "app.cfg", "retries", "five"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot read int value of 'retries'"));

    tagconf_cmd(&dir)
        .args(["set", "app.cfg", "retries", "5"])
        .assert()
        .success();

    assert!(fs::read_to_string(&path).unwrap().contains("1_retries=5\n"));
}

#[test]
fn test_remove_entry() {
    let (dir, path) = setup_config();

    tagconf_cmd(&dir)
        .args(["add", "app.cfg", "bool", "debug", "true"])
        .assert()
        .success();

    tagconf_cmd(&dir)
        .args(["remove", "app.cfg", "debug"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&path).unwrap(), "# app settings\n");

    tagconf_cmd(&dir)
        .args(["remove", "app.cfg", "debug"])
        .assert()
        .failure();
}

#[test]
fn test_get_missing_file_fails() {
    let dir = TempDir::new().unwrap();

    tagconf_cmd(&dir)
        .args(["get", "nope.cfg", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_show_json() {
    let (dir, _path) = setup_config();

    tagconf_cmd(&dir)
        .args(["add", "app.cfg", "float", "ratio", "1.5"])
        .assert()
        .success();

    let output = tagconf_cmd(&dir)
        .args(["show", "app.cfg", "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["header"], "app settings");
    assert_eq!(json["entries"][0]["id"], "ratio");
    assert_eq!(json["entries"][0]["type"], "float");
    assert_eq!(json["entries"][0]["value"], "1.500000");
    assert_eq!(json["errors"].as_array().unwrap().len(), 0);
}

#[test]
fn test_settings_default_format() {
    let (dir, _path) = setup_config();
    fs::write(dir.path().join("settings.toml"), "default_format = \"json\"\n").unwrap();

    tagconf_cmd(&dir)
        .args(["add", "app.cfg", "int", "n", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"success\":true"));
}

// =============================================================================
// Check
// =============================================================================

#[test]
fn test_check_clean_file() {
    let (dir, _path) = setup_config();

    tagconf_cmd(&dir)
        .args(["check", "app.cfg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No errors reported"));
}

#[test]
fn test_check_reports_bad_lines() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.cfg"), "# h\n1_a=1\nbroken\n").unwrap();

    tagconf_cmd(&dir)
        .args(["check", "bad.cfg"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[ERROR] Invalid type 'b' at line 3"))
        .stderr(predicate::str::contains("1 problem(s) found"));
}

// =============================================================================
// Demo
// =============================================================================

#[test]
fn test_demo_creates_then_updates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.ini");

    tagconf_cmd(&dir)
        .arg("demo")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created sample config"));

    let created = fs::read_to_string(&path).unwrap();
    assert!(created.starts_with("# test config\n# Test integer 1\n1_test_int=123\n"));
    assert!(created.contains("4_test_float=0.483000\n"));
    assert!(created.contains("3_test_bool=0\n"));

    tagconf_cmd(&dir)
        .arg("demo")
        .assert()
        .success()
        .stdout(predicate::str::contains("Test string: Hello World!"))
        .stdout(predicate::str::contains("Test float: 0.483"));

    assert!(fs::read_to_string(&path).unwrap().contains("3_test_bool=1\n"));
}
