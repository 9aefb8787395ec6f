//! Shared test harness for pit-cli end-to-end tests.
//!
//! Spawns the compiled `pit` binary as a real subprocess so each test
//! exercises the full CLI parsing and exit-code path, not just the
//! underlying library calls.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Discover the path to the compiled `pit` binary next to the test binary.
pub fn pit_bin() -> PathBuf {
    let mut path = std::env::current_exe()
        .unwrap()
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf();
    path.push("pit");
    path
}

fn pin_env(cmd: &mut Command) {
    cmd.env("GIT_AUTHOR_NAME", "Test Author")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "Test Committer")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .env("TZ", "UTC");
}

/// Run `pit` in `dir` with the given arguments.
pub fn pit(dir: &Path, args: &[&str]) -> CommandResult {
    let mut cmd = Command::new(pit_bin());
    cmd.args(args).current_dir(dir);
    pin_env(&mut cmd);
    let output = cmd.output().expect("failed to run pit");
    CommandResult {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(128),
    }
}
