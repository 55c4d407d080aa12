//! Top-level build error.
//!
//! Every error is fatal to the run. Module-level errors are folded in with
//! `#[from]`; [`BuildError::kind`] maps each one onto the user-facing taxonomy.

use std::path::PathBuf;

use thiserror::Error;

use crate::fetch::FetchError;
use crate::manifest::ManifestError;
use crate::resources::CopyError;
use crate::toolchain::ToolError;

#[derive(Debug, Error)]
pub enum BuildError {
  #[error(transparent)]
  Manifest(#[from] ManifestError),

  #[error(transparent)]
  Fetch(#[from] FetchError),

  #[error(transparent)]
  Copy(#[from] CopyError),

  #[error(transparent)]
  Tool(#[from] ToolError),

  #[error("task '{task}' not found: {path} does not exist")]
  MissingTask { task: String, path: PathBuf },

  #[error("common module '{module}' not found: {path} does not exist")]
  MissingModule { module: String, path: PathBuf },

  #[error("output name '{name}' of task '{task}' collides with the common module directory")]
  ReservedOutputName { task: String, name: String },

  #[error("invalid command \"{name}\"; valid commands: {valid}")]
  InvalidCommand { name: String, valid: String },

  #[error("failed to {action} '{path}': {source}")]
  Io {
    action: &'static str,
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// User-facing error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  MissingFile,
  Validation,
  Fetch,
  ToolVersion,
  MissingTask,
  InvalidCommand,
  Io,
}

impl BuildError {
  pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io {
      action,
      path: path.into(),
      source,
    }
  }

  pub fn kind(&self) -> ErrorKind {
    match self {
      BuildError::Manifest(ManifestError::MissingFile(_)) | BuildError::MissingModule { .. } => ErrorKind::MissingFile,
      BuildError::Manifest(ManifestError::Read { .. }) => ErrorKind::Io,
      BuildError::Manifest(_) | BuildError::ReservedOutputName { .. } => ErrorKind::Validation,
      BuildError::Fetch(_) => ErrorKind::Fetch,
      BuildError::Tool(ToolError::NotInstalled { .. }) => ErrorKind::MissingFile,
      BuildError::Tool(_) => ErrorKind::ToolVersion,
      BuildError::MissingTask { .. } => ErrorKind::MissingTask,
      BuildError::InvalidCommand { .. } => ErrorKind::InvalidCommand,
      BuildError::Copy(_) | BuildError::Io { .. } => ErrorKind::Io,
    }
  }
}
