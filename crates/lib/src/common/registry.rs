use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Run-scoped record of common module output directories built so far.
///
/// A directory is registered the first time its module is built; the counter
/// behind each entry makes the at-most-once guarantee observable.
#[derive(Debug, Default, Clone)]
pub struct BuildRegistry {
  built: BTreeMap<PathBuf, usize>,
}

impl BuildRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn contains(&self, dir: &Path) -> bool {
    self.built.contains_key(dir)
  }

  /// Record a build of `dir` and return how many times it has now been built.
  pub fn register(&mut self, dir: PathBuf) -> usize {
    let count = self.built.entry(dir).or_insert(0);
    *count += 1;
    *count
  }

  pub fn build_count(&self, dir: &Path) -> usize {
    self.built.get(dir).copied().unwrap_or(0)
  }

  pub fn total_builds(&self) -> usize {
    self.built.values().sum()
  }

  pub fn len(&self) -> usize {
    self.built.len()
  }

  pub fn is_empty(&self) -> bool {
    self.built.is_empty()
  }
}
