//! Integration tests for the procdiff binary.
//!
//! These tests run the built executable against fake process tables.

use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Command, Stdio};
use tempfile::tempdir;

/// Helper to get the binary path
fn binary_path() -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_BIN_EXE_procdiff"))
}

fn add_process(root: &Path, pid: u32, ppid: u32, name: &str) {
    let dir = root.join(pid.to_string());
    fs::create_dir_all(&dir).expect("Failed to create process dir");
    fs::write(
        dir.join("status"),
        format!("Name:\t{name}\nState:\tS (sleeping)\nPid:\t{pid}\nPPid:\t{ppid}\n"),
    )
    .expect("Failed to write status file");
}

#[test]
fn test_help_exits_zero() {
    let output = Command::new(binary_path())
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--interval"), "got: {}", stdout);
    assert!(stdout.contains("--debug"), "got: {}", stdout);
}

#[test]
fn test_version_exits_zero() {
    for flag in ["--version", "-v"] {
        let output = Command::new(binary_path())
            .arg(flag)
            .output()
            .expect("Failed to execute command");

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(
            stdout.contains(concat!("version ", env!("CARGO_PKG_VERSION"))),
            "got: {}",
            stdout
        );
    }
}

#[test]
fn test_interval_below_one_fails() {
    let output = Command::new(binary_path())
        .args(["--no-config", "--interval", "0"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}

#[test]
fn test_check_config_rejects_zero_interval_in_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("procdiff.yaml");
    fs::write(&path, "interval_seconds: 0\n").unwrap();

    let output = Command::new(binary_path())
        .args(["--config", path.to_str().unwrap(), "--check-config"])
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(
        stderr.contains("Minimum interval is 1 second"),
        "got stderr: '{}'",
        stderr
    );
}

#[test]
fn test_snapshot_table_lists_fake_table() {
    let dir = tempdir().expect("Failed to create temp dir");
    add_process(dir.path(), 1, 0, "init");
    fs::create_dir(dir.path().join("self")).unwrap();

    let output = Command::new(binary_path())
        .args(["--no-config", "--proc-root"])
        .arg(dir.path())
        .arg("snapshot")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "PID\tPPID\tName\n1\t0\tinit\nTotal process number: 1\n");
}

#[test]
fn test_snapshot_json() {
    let dir = tempdir().expect("Failed to create temp dir");
    add_process(dir.path(), 42, 1, "sshd");

    let output = Command::new(binary_path())
        .args(["--no-config", "--proc-root"])
        .arg(dir.path())
        .args(["snapshot", "--format", "json"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("snapshot output should be JSON");
    assert_eq!(value["records"][0]["pid"], 42);
    assert_eq!(value["records"][0]["name"], "sshd");
}

#[test]
fn test_snapshot_missing_table_fails() {
    let dir = tempdir().expect("Failed to create temp dir");

    let output = Command::new(binary_path())
        .args(["--no-config", "--proc-root"])
        .arg(dir.path().join("missing"))
        .arg("snapshot")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}

#[test]
fn test_monitor_missing_table_exits_with_failure() {
    let dir = tempdir().expect("Failed to create temp dir");

    let output = Command::new(binary_path())
        .args(["--no-config", "--log-level", "off", "--proc-root"])
        .arg(dir.path().join("missing"))
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_monitor_sigterm_exit_code() {
    let dir = tempdir().expect("Failed to create temp dir");
    add_process(dir.path(), 1, 0, "init");

    let mut child = Command::new(binary_path())
        .args(["--no-config", "--log-level", "off", "--debug", "--proc-root"])
        .arg(dir.path())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to spawn procdiff");

    let mut stdout = BufReader::new(child.stdout.take().expect("stdout is piped"));
    let mut banner = String::new();
    stdout.read_line(&mut banner).unwrap();
    assert_eq!(banner, "Monitor processes with interval 60 seconds\n");

    // Handlers are installed before the banner is printed
    let rc = unsafe { libc::kill(child.id() as libc::pid_t, libc::SIGTERM) };
    assert_eq!(rc, 0);

    let status = child.wait().expect("Failed to wait for procdiff");
    let mut rest = String::new();
    stdout.read_to_string(&mut rest).unwrap();

    assert_eq!(status.code(), Some(128 + libc::SIGTERM));
    assert!(rest.contains("Total process number: 1"), "got: {}", rest);
    assert!(rest.contains("is stopped by signal 15"), "got: {}", rest);
}

#[test]
fn test_monitor_closed_stdout_exit_code() {
    let dir = tempdir().expect("Failed to create temp dir");
    add_process(dir.path(), 1, 0, "init");

    let mut child = Command::new(binary_path())
        .args(["--no-config", "--log-level", "off", "--debug", "-i", "1", "--proc-root"])
        .arg(dir.path())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to spawn procdiff");

    let mut stdout = BufReader::new(child.stdout.take().expect("stdout is piped"));
    let mut banner = String::new();
    stdout.read_line(&mut banner).unwrap();
    assert_eq!(banner, "Monitor processes with interval 1 seconds\n");

    // Reader goes away; the next cycle's listing hits a closed pipe
    drop(stdout);

    let status = child.wait().expect("Failed to wait for procdiff");
    assert_eq!(status.code(), Some(128 + libc::SIGPIPE));
}
