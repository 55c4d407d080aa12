//! Selective resource copying.
//!
//! Copying is split in two: [`plan`] turns rules and a source listing into a
//! [`CopyPlan`] without touching the filesystem, and [`execute`] carries the
//! plan out. [`copy_resources`] does both against a real directory.
//!
//! # Rules
//!
//! - `include` / `exclude`: match-base globs over the immediate children of the
//!   source; matching directories are copied whole
//! - copy groups (`cp`): globs over source-relative paths, copied into a
//!   destination subdirectory under their base name
//! - remove groups (`rm`): globs over destination-relative paths the plan
//!   produces, removed once copying is done

mod execute;
mod matcher;
mod plan;

pub use execute::{CopyStats, copy_dir_all, copy_file, create_dir_all, execute, remove_path};
pub use matcher::PatternSet;
pub use plan::{CopyOp, CopyPlan, EntryKind, ResourceRules, SourceEntry, SourceTree, plan};

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CopyError {
  #[error("invalid pattern '{pattern}': {source}")]
  InvalidPattern {
    pattern: String,
    #[source]
    source: glob::PatternError,
  },

  #[error("failed to scan '{path}': {source}")]
  Scan {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },

  #[error("failed to create directory '{path}': {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to copy '{from}' to '{to}': {source}")]
  Copy {
    from: PathBuf,
    to: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to remove '{path}': {source}")]
  Remove {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Plan and execute a copy from `src` into `dest`.
pub fn copy_resources(rules: &ResourceRules, src: &Path, dest: &Path) -> Result<CopyStats, CopyError> {
  let tree = SourceTree::scan(src)?;
  let plan = plan(rules, &tree, src, dest)?;
  create_dir_all(dest)?;
  execute(&plan)
}
