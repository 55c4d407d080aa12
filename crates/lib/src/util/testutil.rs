//! Test utilities for extmake-lib.
//!
//! Helpers for laying out small project trees inside a temp directory.

use std::fs;
use std::path::{Path, PathBuf};

/// Write `content` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) -> PathBuf {
  let path = root.join(rel);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }
  fs::write(&path, content).unwrap();
  path
}

/// Serialize `value` as pretty JSON into `root/rel`.
pub fn write_json(root: &Path, rel: &str, value: &serde_json::Value) -> PathBuf {
  write_file(root, rel, &serde_json::to_string_pretty(value).unwrap())
}

/// A `task.json` body that passes validation.
pub fn valid_task(name: &str) -> serde_json::Value {
  serde_json::json!({
    "id": "9f4b9b7e-2c0a-4a3e-8d7c-0b8f2b3a6c11",
    "name": name,
    "friendlyName": format!("{} task", name),
    "version": { "Major": 1, "Minor": 2, "Patch": 3 },
    "instanceNameFormat": name,
  })
}

/// Relative paths of every file under `root`, sorted, with forward slashes.
pub fn list_files(root: &Path) -> Vec<String> {
  let mut files: Vec<String> = walkdir::WalkDir::new(root)
    .into_iter()
    .filter_map(|e| e.ok())
    .filter(|e| e.file_type().is_file())
    .map(|e| {
      e.path()
        .strip_prefix(root)
        .unwrap()
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
    })
    .collect();
  files.sort();
  files
}
