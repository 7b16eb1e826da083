//! CLI integration tests for confstore
//!
//! These tests drive the binary against real files in temp directories and
//! check both the printed output and what ends up on disk.

use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get a command instance for the confstore binary
fn confstore_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("confstore"));
    cmd.env_remove("CONFSTORE_FILE").env_remove("RUST_LOG");
    cmd
}

/// Command bound to a file
fn file_cmd(path: &Path) -> assert_cmd::Command {
    let mut cmd = confstore_cmd();
    cmd.arg("--file").arg(path);
    cmd
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

// =============================================================================
// File Selection
// =============================================================================

#[test]
fn test_missing_file_argument_fails() {
    confstore_cmd()
        .arg("sections")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No configuration file given"));
}

#[test]
fn test_unknown_extension_needs_type() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.txt");

    file_cmd(&path)
        .arg("sections")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--type"));

    file_cmd(&path)
        .args(["--type", "ini", "set", "a", "k", "v"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&path).unwrap(), "[a]\nk = v\n\n");
}

#[test]
fn test_file_from_environment() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "app.ini", "[db]\nhost = localhost\n");

    confstore_cmd()
        .env("CONFSTORE_FILE", &path)
        .args(["get", "db", "host"])
        .assert()
        .success()
        .stdout("localhost\n");
}

#[test]
fn test_opening_missing_file_creates_it() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fresh.json");

    file_cmd(&path)
        .arg("sections")
        .assert()
        .success()
        .stdout("");

    assert!(path.exists());
}

// =============================================================================
// Reading
// =============================================================================

#[test]
fn test_sections_and_keys() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "app.ini", "[b]\nx = 1\ny = 2\n[a]\n");

    file_cmd(&path)
        .arg("sections")
        .assert()
        .success()
        .stdout("b\na\n");

    file_cmd(&path)
        .args(["keys", "b", "--format", "json"])
        .assert()
        .success()
        .stdout("[\"x\",\"y\"]\n");
}

#[test]
fn test_show_section() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "app.xml",
        "<configuration><ui><title>Main</title><width>800</width></ui></configuration>",
    );

    file_cmd(&path)
        .args(["show", "ui"])
        .assert()
        .success()
        .stdout("title = Main\nwidth = 800\n");

    let output = file_cmd(&path)
        .args(["show", "ui", "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["width"], "800");
}

#[test]
fn test_keys_of_missing_section_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "app.ini", "[a]\n");

    file_cmd(&path)
        .args(["keys", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Section not found: [nope]"));
}

#[test]
fn test_get_with_default() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "app.ini", "[a]\n");

    file_cmd(&path)
        .args(["get", "a", "missing", "--default", "fallback"])
        .assert()
        .success()
        .stdout("fallback\n");
}

#[test]
fn test_get_typed_json_output() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "app.json", r#"{"net": {"port": "8080"}}"#);

    let output = file_cmd(&path)
        .args(["get", "net", "port", "--as", "int", "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["value"], 8080);
}

#[test]
fn test_bad_int_fails_for_ini_but_defaults_for_json() {
    let dir = TempDir::new().unwrap();
    let ini = write_file(&dir, "app.ini", "[s]\nk = abc\n");
    let json = write_file(&dir, "app.json", r#"{"s": {"k": "abc"}}"#);

    file_cmd(&ini)
        .args(["get", "s", "k", "--as", "int"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid int"));

    file_cmd(&json)
        .args(["get", "s", "k", "--as", "int", "--default", "7"])
        .assert()
        .success()
        .stdout("7\n");
}

#[test]
fn test_get_int_is_limited_to_32_bits() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "app.ini", "[s]\nbig = 3000000000\n");

    file_cmd(&path)
        .args(["get", "s", "big", "--as", "int"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid int"));

    file_cmd(&path)
        .args(["get", "s", "missing", "--as", "int", "--default", "3000000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --default"));
}

#[test]
fn test_invalid_default_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "app.json", "{}");

    file_cmd(&path)
        .args(["get", "s", "k", "--as", "bool", "--default", "maybe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --default"));
}

#[test]
fn test_exists() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "app.ini", "[a]\nk = v\n");

    file_cmd(&path)
        .args(["exists", "a"])
        .assert()
        .success()
        .stdout("true\n");

    file_cmd(&path)
        .args(["exists", "a", "other"])
        .assert()
        .success()
        .stdout("false\n");

    file_cmd(&path)
        .args(["exists", "a", "k", "--format", "json"])
        .assert()
        .success()
        .stdout("{\"exists\":true}\n");
}

// =============================================================================
// Editing
// =============================================================================

#[test]
fn test_set_persists_across_runs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.json");

    file_cmd(&path)
        .args(["set", "server", "host", "example.org"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set host in [server]"));

    file_cmd(&path)
        .args(["get", "server", "host"])
        .assert()
        .success()
        .stdout("example.org\n");

    let on_disk: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk["server"]["host"], "example.org");
}

#[test]
fn test_set_rejects_comment_marker_in_ini_value() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "app.ini", "[a]\nk = v\n");

    file_cmd(&path)
        .args(["set", "a", "k", "x;y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("starts a comment"));

    assert_eq!(fs::read_to_string(&path).unwrap(), "[a]\nk = v\n");
}

#[test]
fn test_create_section_twice_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.xml");

    file_cmd(&path)
        .args(["create-section", "logging"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created section [logging]"));

    file_cmd(&path)
        .args(["create-section", "logging"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Section already exists"));
}

#[test]
fn test_delete_key_and_section() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "app.ini", "[a]\nx = 1\ny = 2\n[b]\nz = 3\n");

    file_cmd(&path)
        .args(["delete-key", "a", "x"])
        .assert()
        .success();

    file_cmd(&path)
        .args(["delete-key", "a", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Key not found"));

    file_cmd(&path)
        .args(["delete-section", "b"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&path).unwrap(), "[a]\ny = 2\n\n");
}

#[test]
fn test_success_message_as_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.ini");

    let output = file_cmd(&path)
        .args(["--format", "json", "set", "a", "k", "v"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["success"], true);
}
