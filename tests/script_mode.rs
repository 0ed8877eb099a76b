//! Integration tests for the gridstore binary

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;

static CONFIG_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A config file under the temp dir so runs never pick up the user's config.
fn config_file(name: &str, body: &str) -> PathBuf {
    let n = CONFIG_COUNTER.fetch_add(1, Ordering::SeqCst);
    let path = std::env::temp_dir().join(format!(
        "gridstore-test-{}-{}-{}.toml",
        name,
        std::process::id(),
        n
    ));
    std::fs::write(&path, body).expect("Failed to write config");
    path
}

fn run_gridstore(args: &[&str], stdin: &str) -> (String, String, i32) {
    let config = config_file("default", "[sheet]\nrows = 20\ncolumns = 10\n");
    let mut child = Command::new(env!("CARGO_BIN_EXE_gridstore"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute gridstore");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(stdin.as_bytes())
        .expect("Failed to write stdin");
    let output = child.wait_with_output().expect("Failed to wait for gridstore");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);
    (stdout, stderr, exit_code)
}

#[test]
fn test_commands_print_table() {
    let (stdout, _, code) = run_gridstore(&["-c", "set A1 10", "-c", "set B1 total", "-c", "print A1:B1"], "");
    assert_eq!(stdout, "|   | A | B |\n|---|---|---|\n| 1 | 10 | total |\n");
    assert_eq!(code, 0);
}

#[test]
fn test_script_from_stdin() {
    let script = "\
# shift the data down, then take it back
set A1 a
set A2 b
insert-rows 1 2
print A1:A4
undo
print A1:A2
";
    let (stdout, _, code) = run_gridstore(&[], script);
    assert_eq!(
        stdout,
        "|   | A |\n|---|---|\n| 1 |  |\n| 2 |  |\n| 3 | a |\n| 4 | b |\n\
         |   | A |\n|---|---|\n| 1 | a |\n| 2 | b |\n"
    );
    assert_eq!(code, 0);
}

#[test]
fn test_redo_after_undo() {
    let script = "set A1 1\nset A1 2\nundo\nredo\nprint A1\n";
    let (stdout, _, code) = run_gridstore(&["-"], script);
    assert_eq!(stdout, "|   | A |\n|---|---|\n| 1 | 2 |\n");
    assert_eq!(code, 0);
}

#[test]
fn test_structural_limit_reports_line() {
    let (_, stderr, code) = run_gridstore(&["-c", "delete-rows 1:20 20"], "");
    assert_eq!(code, 1);
    assert!(stderr.contains("Line 1"), "stderr: {}", stderr);
}

#[test]
fn test_unknown_command_fails() {
    let (_, stderr, code) = run_gridstore(&["-c", "frobnicate A1"], "");
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown command"), "stderr: {}", stderr);
}

#[test]
fn test_missing_script_file() {
    let (_, stderr, code) = run_gridstore(&["/nonexistent/script.txt"], "");
    assert_eq!(code, 1);
    assert!(stderr.contains("reading"), "stderr: {}", stderr);
}

#[test]
fn test_bad_config_rejected() {
    let config = config_file("bad", "[sheet]\ncolumns = 0\n");
    let output = Command::new(env!("CARGO_BIN_EXE_gridstore"))
        .arg("--config")
        .arg(&config)
        .args(["-c", "set A1 1"])
        .output()
        .expect("Failed to execute gridstore");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Config error"));
}

#[test]
fn test_help() {
    let (_, stderr, code) = run_gridstore(&["--help"], "");
    assert_eq!(code, 0);
    assert!(stderr.contains("Usage: gridstore"));
}
