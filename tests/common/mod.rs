//! Common test utilities for pinnote integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't touch the
//! user's `~/.local/share/pinnote/` or `~/.config/pinnote/` directories.

#![allow(dead_code)]

use assert_cmd::Command;
use serde_json::Value;
use std::path::Path;
pub use tempfile::TempDir;

/// A test environment with isolated storage and config.
///
/// - `work_dir`: current directory of every invocation (export target)
/// - `data_dir`: notes.json and the session config (via `PINNOTE_DATA_DIR`)
/// - `config_home`: stands in for `~/.config` (via `XDG_CONFIG_HOME`)
///
/// Environment variables are set per command, so tests stay parallel-safe.
pub struct TestEnv {
    pub work_dir: TempDir,
    pub data_dir: TempDir,
    pub config_home: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            work_dir: TempDir::new().unwrap(),
            data_dir: TempDir::new().unwrap(),
            config_home: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the pn binary with isolated directories.
    pub fn pn(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_pn"));
        cmd.current_dir(self.work_dir.path());
        cmd.env("PINNOTE_DATA_DIR", self.data_dir.path());
        cmd.env("XDG_CONFIG_HOME", self.config_home.path());
        cmd.env_remove("PINNOTE_LOG");
        cmd
    }

    /// Run pn with JSON output and parse stdout.
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self.pn().args(args).assert().success().get_output().stdout.clone();
        serde_json::from_slice(&output).unwrap()
    }

    /// Create a note and return its id.
    pub fn add(&self, content: &str) -> u64 {
        self.json(&["add", content])["id"].as_u64().unwrap()
    }

    /// Ids of `pn list` in display order.
    pub fn list_ids(&self) -> Vec<u64> {
        ids(&self.json(&["list"]))
    }

    pub fn work_path(&self) -> &Path {
        self.work_dir.path()
    }

    pub fn data_path(&self) -> &Path {
        self.data_dir.path()
    }

    /// Path of the system-level config file.
    pub fn system_config_path(&self) -> std::path::PathBuf {
        self.config_home.path().join("pinnote").join("config.kdl")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Ids from a listing result.
pub fn ids(listing: &Value) -> Vec<u64> {
    listing["notes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_u64().unwrap())
        .collect()
}
