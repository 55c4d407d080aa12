//! Manifest loading.
//!
//! Required manifests fail with [`ManifestError::MissingFile`] when absent;
//! optional ones read as their empty default.

mod types;

pub use types::*;

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ManifestError {
  #[error("required file not found: {0}")]
  MissingFile(PathBuf),

  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("malformed manifest {path}: {source}")]
  Malformed {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("invalid manifest {path}: {}", .problems.join("; "))]
  Validation { path: PathBuf, problems: Vec<String> },
}

/// Load `make-options.json`. The file is required.
pub fn load_options(path: &Path) -> Result<MakeOptions, ManifestError> {
  load_required(path)
}

/// Load a task's `task.json`, if it has one.
pub fn load_task_definition(path: &Path) -> Result<Option<TaskDefinition>, ManifestError> {
  if !path.is_file() {
    return Ok(None);
  }
  load_required(path).map(Some)
}

/// Load and validate a task's `task.json`, if it has one.
pub fn load_task_identity(path: &Path) -> Result<Option<TaskIdentity>, ManifestError> {
  match load_task_definition(path)? {
    None => Ok(None),
    Some(def) => def.validate().map(Some).map_err(|problems| ManifestError::Validation {
      path: path.to_path_buf(),
      problems,
    }),
  }
}

/// Load and validate a `make.json`, falling back to an empty manifest when absent.
pub fn load_build_manifest(path: &Path) -> Result<BuildManifest, ManifestError> {
  if !path.is_file() {
    debug!(path = %path.display(), "no build manifest, using defaults");
    return Ok(BuildManifest::default());
  }
  let manifest: BuildManifest = load_required(path)?;
  manifest.validate().map_err(|problems| ManifestError::Validation {
    path: path.to_path_buf(),
    problems,
  })?;
  Ok(manifest)
}

fn load_required<T: DeserializeOwned>(path: &Path) -> Result<T, ManifestError> {
  if !path.is_file() {
    return Err(ManifestError::MissingFile(path.to_path_buf()));
  }
  let content = fs::read_to_string(path).map_err(|source| ManifestError::Read {
    path: path.to_path_buf(),
    source,
  })?;
  // Manifests edited on Windows frequently carry a BOM.
  let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
  serde_json::from_str(content).map_err(|source| ManifestError::Malformed {
    path: path.to_path_buf(),
    source,
  })
}
