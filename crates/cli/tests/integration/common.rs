//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::{Value, json};
use tempfile::TempDir;

/// Isolated project root.
///
/// Directory override variables are cleared on every command so the default
/// layout under the temp directory is used unless a test sets them.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// A project whose options file lists `tasks`.
  pub fn with_tasks(tasks: &[&str]) -> Self {
    let env = Self::empty();
    env.write_json("make-options.json", &json!({ "tasks": tasks }));
    env
  }

  /// Create an empty test environment.
  ///
  /// Use this when you need to manually set up the directory structure.
  pub fn empty() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  pub fn root(&self) -> &Path {
    self.temp.path()
  }

  /// Write a file relative to the project root.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  pub fn write_json(&self, relative_path: &str, value: &Value) {
    self.write_file(relative_path, &serde_json::to_string_pretty(value).unwrap());
  }

  /// A task directory with a valid `task.json` and a script.
  pub fn write_task(&self, dir: &str, name: &str) {
    self.write_json(
      &format!("{dir}/task.json"),
      &json!({
        "id": "5c1f2a8e-44b0-4f6d-8e1a-2b9c7d3e4f50",
        "name": name,
        "friendlyName": format!("{name} task"),
        "version": { "Major": 1, "Minor": 0, "Patch": 0 },
      }),
    );
    self.write_file(&format!("{dir}/index.js"), "module.exports = {};");
  }

  pub fn build_path(&self, rel: &str) -> PathBuf {
    self.temp.path().join("_build").join(rel)
  }

  /// An `extmake` invocation rooted at this project.
  pub fn cmd(&self, command: &str) -> Command {
    let mut cmd = cargo_bin_cmd!("extmake");
    cmd
      .env_remove("EXTMAKE_BUILD_DIR")
      .env_remove("EXTMAKE_DOWNLOAD_DIR")
      .env_remove("RUST_LOG")
      .arg("--root")
      .arg(self.temp.path())
      .arg(command);
    cmd
  }
}
