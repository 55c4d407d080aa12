//! Copy plan execution.

use std::fs;
use std::path::Path;

use tracing::{debug, trace};
use walkdir::WalkDir;

use super::CopyError;
use super::plan::{CopyPlan, EntryKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
  pub files_copied: usize,
  pub paths_removed: usize,
}

/// Run every copy in order, then every removal. Existing files are overwritten.
pub fn execute(plan: &CopyPlan) -> Result<CopyStats, CopyError> {
  let mut stats = CopyStats::default();

  for op in &plan.copies {
    stats.files_copied += match op.kind {
      EntryKind::File => copy_file(&op.from, &op.to).map(|_| 1)?,
      EntryKind::Dir => copy_dir_all(&op.from, &op.to)?,
    };
  }

  for path in &plan.removals {
    if remove_path(path)? {
      stats.paths_removed += 1;
    }
  }

  debug!(
    files = stats.files_copied,
    removed = stats.paths_removed,
    "copy plan executed"
  );
  Ok(stats)
}

/// Copy a single file, creating the destination's parent directories.
pub fn copy_file(from: &Path, to: &Path) -> Result<(), CopyError> {
  if let Some(parent) = to.parent() {
    create_dir_all(parent)?;
  }
  trace!(from = %from.display(), to = %to.display(), "copy");
  fs::copy(from, to).map_err(|source| CopyError::Copy {
    from: from.to_path_buf(),
    to: to.to_path_buf(),
    source,
  })?;
  Ok(())
}

/// Recursively copy a directory, merging into whatever already exists at `to`.
///
/// Returns the number of files copied.
pub fn copy_dir_all(from: &Path, to: &Path) -> Result<usize, CopyError> {
  create_dir_all(to)?;
  let mut copied = 0;
  for entry in WalkDir::new(from).min_depth(1).sort_by_file_name() {
    let entry = entry.map_err(|source| CopyError::Scan {
      path: from.to_path_buf(),
      source,
    })?;
    let rel = entry.path().strip_prefix(from).unwrap_or(entry.path());
    let target = to.join(rel);
    if entry.file_type().is_dir() {
      create_dir_all(&target)?;
    } else {
      copy_file(entry.path(), &target)?;
      copied += 1;
    }
  }
  Ok(copied)
}

/// Remove a file or directory tree. Returns whether anything was there.
pub fn remove_path(path: &Path) -> Result<bool, CopyError> {
  let result = match fs::symlink_metadata(path) {
    Err(_) => return Ok(false),
    Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
    Ok(_) => fs::remove_file(path),
  };
  result.map_err(|source| CopyError::Remove {
    path: path.to_path_buf(),
    source,
  })?;
  Ok(true)
}

pub fn create_dir_all(path: &Path) -> Result<(), CopyError> {
  fs::create_dir_all(path).map_err(|source| CopyError::CreateDir {
    path: path.to_path_buf(),
    source,
  })
}
