//! CLI integration tests

use std::process::Command;

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "vscope-cli", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("summary"), "Should show summary command");
    assert!(stdout.contains("hosts"), "Should show hosts command");
    assert!(stdout.contains("cpu"), "Should show cpu command");
    assert!(stdout.contains("memory"), "Should show memory command");
    assert!(stdout.contains("storage"), "Should show storage command");
    assert!(stdout.contains("top"), "Should show top command");
    assert!(stdout.contains("sizing"), "Should show sizing command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = Command::new("cargo")
        .args(["run", "-p", "vscope-cli", "--", "--version"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("vscope"), "Should show binary name");
}

/// Test sizing subcommand help
#[test]
fn test_sizing_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "vscope-cli", "--", "sizing", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "sizing help should succeed");
    assert!(stdout.contains("--cpu-basis"), "Should show cpu basis flag");
    assert!(
        stdout.contains("--storage-growth"),
        "Should show storage growth flag"
    );
    assert!(stdout.contains("--cluster"), "Should show cluster flag");
}

/// Test that a missing workbook reports an error
#[test]
fn test_missing_workbook_fails() {
    let output = Command::new("cargo")
        .args([
            "run",
            "-p",
            "vscope-cli",
            "--",
            "summary",
            "does-not-exist.xlsx",
        ])
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "missing workbook should fail");
    assert!(
        stderr.contains("does-not-exist.xlsx"),
        "Should name the missing file"
    );
}
