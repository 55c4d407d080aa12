//! Copy planning.
//!
//! [`plan`] is a pure function from rules plus a [`SourceTree`] listing to a
//! [`CopyPlan`]; nothing here touches the filesystem except [`SourceTree::scan`].

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::CopyError;
use super::matcher::PatternSet;
use crate::manifest::{BuildManifest, CopyGroup, RemoveGroup};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntryKind {
  File,
  Dir,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceEntry {
  /// Path relative to the tree root.
  pub rel_path: PathBuf,
  pub kind: EntryKind,
}

impl SourceEntry {
  pub fn file(rel: impl Into<PathBuf>) -> Self {
    Self {
      rel_path: rel.into(),
      kind: EntryKind::File,
    }
  }

  pub fn dir(rel: impl Into<PathBuf>) -> Self {
    Self {
      rel_path: rel.into(),
      kind: EntryKind::Dir,
    }
  }

  fn base_name(&self) -> String {
    self
      .rel_path
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_default()
  }

  fn depth(&self) -> usize {
    self.rel_path.components().count()
  }
}

/// Sorted listing of everything below a source directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTree {
  entries: Vec<SourceEntry>,
}

impl SourceTree {
  pub fn from_entries(entries: impl IntoIterator<Item = SourceEntry>) -> Self {
    let mut entries: Vec<_> = entries.into_iter().collect();
    entries.sort();
    entries.dedup();
    Self { entries }
  }

  pub fn scan(root: &Path) -> Result<Self, CopyError> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
      let entry = entry.map_err(|source| CopyError::Scan {
        path: root.to_path_buf(),
        source,
      })?;
      let rel_path = entry.path().strip_prefix(root).unwrap_or(entry.path()).to_path_buf();
      let kind = if entry.file_type().is_dir() {
        EntryKind::Dir
      } else {
        EntryKind::File
      };
      entries.push(SourceEntry { rel_path, kind });
    }
    Ok(Self::from_entries(entries))
  }

  pub fn entries(&self) -> &[SourceEntry] {
    &self.entries
  }

  /// Immediate children of the root.
  pub fn children(&self) -> impl Iterator<Item = &SourceEntry> {
    self.entries.iter().filter(|e| e.depth() == 1)
  }

  /// Every entry strictly below `dir`.
  fn descendants<'a>(&'a self, dir: &'a Path) -> impl Iterator<Item = &'a SourceEntry> + 'a {
    self
      .entries
      .iter()
      .filter(move |e| e.rel_path != dir && e.rel_path.starts_with(dir))
  }
}

/// What to copy from a source directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceRules {
  /// Match-base patterns over the immediate children of the source.
  pub include: Vec<String>,
  /// Match-base patterns removed from whatever `include` selects.
  /// With no includes they remove from nothing.
  pub exclude: Vec<String>,
  pub copy_groups: Vec<CopyGroup>,
  pub remove_groups: Vec<RemoveGroup>,
}

impl ResourceRules {
  /// Default resources plus everything a build manifest declares.
  pub fn for_manifest(defaults: &[String], manifest: &BuildManifest) -> Self {
    Self {
      include: defaults.iter().chain(&manifest.include).cloned().collect(),
      exclude: manifest.exclude.clone(),
      copy_groups: manifest.cp.clone(),
      remove_groups: manifest.rm.clone(),
    }
  }

  /// Only match-base patterns, e.g. `["!Tests"]` to flatten a built module.
  pub fn match_base<S: AsRef<str>>(patterns: &[S]) -> Self {
    Self {
      include: patterns.iter().map(|p| p.as_ref().to_string()).collect(),
      ..Self::default()
    }
  }

  pub fn excluding<S: AsRef<str>>(mut self, names: &[S]) -> Self {
    self.exclude.extend(names.iter().map(|n| n.as_ref().to_string()));
    self
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyOp {
  pub from: PathBuf,
  pub to: PathBuf,
  pub kind: EntryKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyPlan {
  /// Executed in order; later copies overwrite earlier ones.
  pub copies: Vec<CopyOp>,
  /// Removed after every copy has run.
  pub removals: Vec<PathBuf>,
}

impl CopyPlan {
  pub fn is_empty(&self) -> bool {
    self.copies.is_empty() && self.removals.is_empty()
  }
}

/// Compute the operations that copy `tree` (rooted at `src`) into `dest`.
pub fn plan(rules: &ResourceRules, tree: &SourceTree, src: &Path, dest: &Path) -> Result<CopyPlan, CopyError> {
  let mut copies = Vec::new();
  // Destination-relative paths the plan will produce, for `rm` matching.
  let mut produced: BTreeSet<PathBuf> = BTreeSet::new();

  let selection = PatternSet::new(&rules.include)?.exclude(&rules.exclude)?;
  for child in tree.children() {
    if !selection.matches(&child.base_name()) {
      continue;
    }
    record_produced(&mut produced, tree, child, &child.rel_path);
    copies.push(CopyOp {
      from: src.join(&child.rel_path),
      to: dest.join(&child.rel_path),
      kind: child.kind,
    });
  }

  for group in &rules.copy_groups {
    let patterns = PatternSet::new(&group.source)?;
    let target = group.dest.as_deref().map(Path::new).unwrap_or(Path::new(""));
    let recursive = group.recursive();
    let mut taken: Vec<&Path> = Vec::new();

    for entry in tree.entries() {
      if taken.iter().any(|dir| entry.rel_path.starts_with(dir)) {
        continue;
      }
      if !patterns.matches(&slash_path(&entry.rel_path)) {
        continue;
      }
      if entry.kind == EntryKind::Dir {
        if !recursive {
          continue;
        }
        taken.push(&entry.rel_path);
      }
      let rel_dest = target.join(entry.base_name());
      record_produced(&mut produced, tree, entry, &rel_dest);
      copies.push(CopyOp {
        from: src.join(&entry.rel_path),
        to: dest.join(&rel_dest),
        kind: entry.kind,
      });
    }
  }

  let mut removals: Vec<PathBuf> = Vec::new();
  for group in &rules.remove_groups {
    let patterns = PatternSet::new(&group.items)?;
    for rel in &produced {
      if removals.iter().any(|removed| rel.starts_with(removed)) {
        continue;
      }
      if patterns.matches(&slash_path(rel)) {
        removals.push(rel.clone());
      }
    }
  }

  Ok(CopyPlan {
    copies,
    removals: removals.into_iter().map(|rel| dest.join(rel)).collect(),
  })
}

fn record_produced(produced: &mut BTreeSet<PathBuf>, tree: &SourceTree, entry: &SourceEntry, rel_dest: &Path) {
  produced.insert(rel_dest.to_path_buf());
  if entry.kind == EntryKind::Dir {
    for below in tree.descendants(&entry.rel_path) {
      if let Ok(suffix) = below.rel_path.strip_prefix(&entry.rel_path) {
        produced.insert(rel_dest.join(suffix));
      }
    }
  }
}

fn slash_path(path: &Path) -> String {
  path
    .components()
    .map(|c| c.as_os_str().to_string_lossy())
    .collect::<Vec<_>>()
    .join("/")
}
