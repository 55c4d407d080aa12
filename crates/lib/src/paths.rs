//! Project directory layout.
//!
//! Everything extmake reads or writes hangs off the project root:
//!
//! ```text
//! <root>/
//!   make-options.json
//!   <task>/task.json, make.json, ...
//!   _build/                 # EXTMAKE_BUILD_DIR
//!     <task>/
//!     Common/<module>/
//!   _download/              # EXTMAKE_DOWNLOAD_DIR
//!     <url-hash>/<file>
//! ```

use std::path::{Path, PathBuf};

use crate::consts::{
  BUILD_DIR_ENV, BUILD_DIR_NAME, COMMON_DIR_NAME, DOWNLOAD_DIR_ENV, DOWNLOAD_DIR_NAME, OPTIONS_FILE,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
  pub root: PathBuf,
  pub build_dir: PathBuf,
  pub download_dir: PathBuf,
}

impl Layout {
  /// Layout for the project at `root`, honoring the directory override env vars.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    let root = root.into();
    let root = dunce::canonicalize(&root).unwrap_or(root);
    let build_dir = dir_override(BUILD_DIR_ENV, &root).unwrap_or_else(|| root.join(BUILD_DIR_NAME));
    let download_dir = dir_override(DOWNLOAD_DIR_ENV, &root).unwrap_or_else(|| root.join(DOWNLOAD_DIR_NAME));
    Self {
      root,
      build_dir,
      download_dir,
    }
  }

  pub fn options_path(&self) -> PathBuf {
    self.root.join(OPTIONS_FILE)
  }

  /// Shared output for common modules, one subdirectory per module.
  pub fn common_dir(&self) -> PathBuf {
    self.build_dir.join(COMMON_DIR_NAME)
  }

  pub fn task_source(&self, task: &str) -> PathBuf {
    self.root.join(task)
  }

  pub fn task_output(&self, out_name: &str) -> PathBuf {
    self.build_dir.join(out_name)
  }

  /// Base names of generated directories that live directly under the root.
  ///
  /// Root-level resource copies must never pick these up.
  pub fn generated_names(&self) -> Vec<String> {
    [&self.build_dir, &self.download_dir]
      .into_iter()
      .filter(|dir| dir.parent() == Some(self.root.as_path()))
      .filter_map(|dir| dir.file_name())
      .map(|name| name.to_string_lossy().into_owned())
      .collect()
  }
}

fn dir_override(var: &str, root: &Path) -> Option<PathBuf> {
  let value = std::env::var_os(var).filter(|v| !v.is_empty())?;
  let path = PathBuf::from(value);
  Some(if path.is_absolute() { path } else { root.join(path) })
}
