#![allow(dead_code)]

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Biweekly rule as inline JSON.
pub const BIWEEKLY_JSON: &str = r#"{"type":"weekly","mode":"every_n_weeks","interval":2}"#;

/// Last Friday of every month as inline JSON (weekday 6 = Friday).
pub const LAST_FRIDAY_JSON: &str = r#"{
    "type": "monthly",
    "months": { "kind": "every_n_months", "interval": 1 },
    "days": { "kind": "ordinal", "patterns": [{ "ordinal": -1, "weekday": 6 }] }
}"#;

/// Test harness running the `rota` binary inside a scratch working directory,
/// so each test can supply its own `rota.toml`.
pub struct CliTestHarness {
    temp_dir: TempDir,
}

impl CliTestHarness {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        Self { temp_dir }
    }

    /// Writes `rota.toml` into the working directory.
    pub fn with_config(self, toml: &str) -> Self {
        std::fs::write(self.temp_dir.path().join("rota.toml"), toml).expect("Failed to write config");
        self
    }

    /// Writes a rule file and returns its path.
    pub fn rule_file(&self, name: &str, json: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, json).expect("Failed to write rule file");
        path
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("rota").expect("Failed to find rota binary");
        cmd.current_dir(self.temp_dir.path())
            .env("ROTA_TIMEZONE", "UTC")
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }
}
