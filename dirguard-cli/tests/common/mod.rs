//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - An isolated home directory for each test
//! - Command builder helpers with a scrubbed environment
//! - Output parsing helpers

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Variables the binary reads that must not leak in from the test runner.
const SCRUBBED_VARS: [&str; 7] = [
    "XDG_CONFIG_HOME",
    "XDG_DATA_HOME",
    "XDG_CACHE_HOME",
    "DIRGUARD_ALLOW_CUSTOM_PATHS",
    "DIRGUARD_LOG_MODE",
    "DIRGUARD_APP_NAME",
    "DIRGUARD_OUTPUT_FORMAT",
];

/// Test environment with an isolated home directory.
pub struct TestEnv {
    /// Temporary home directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    home_dir: TempDir,
    /// Canonical path of the home directory
    pub home: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    pub fn new() -> Self {
        let home_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let home = home_dir
            .path()
            .canonicalize()
            .expect("Failed to canonicalize temp dir");

        Self { home_dir, home }
    }

    /// Get a command builder running in the home directory with `HOME` set
    /// and every dirguard-related variable removed.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("dirguard").expect("Failed to find dirguard binary");
        for var in SCRUBBED_VARS {
            cmd.env_remove(var);
        }
        cmd.env("HOME", &self.home).current_dir(&self.home);
        cmd
    }

    /// Create a subdirectory of the home directory.
    pub fn create_dir(&self, relative: &str) -> PathBuf {
        let path = self.home.join(relative);
        std::fs::create_dir_all(&path).expect("Failed to create test directory");
        path
    }

    /// Write a file below the home directory, creating parents.
    pub fn write_file(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.home.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, contents).expect("Failed to write test file");
        path
    }

    /// Get the home path.
    pub fn path(&self) -> &Path {
        &self.home
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse JSON resolutions from `resolve --format json` output.
#[allow(dead_code)]
pub fn parse_resolutions(stdout: &[u8]) -> Vec<serde_json::Value> {
    serde_json::from_slice(stdout).expect("Output is not a JSON array")
}
