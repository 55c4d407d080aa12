//! External artifact acquisition.
//!
//! A task's `make.json` may declare externals: archives to extract and single
//! files to drop into its output. Each becomes an [`ArtifactDescriptor`] whose
//! identity is its destination path. [`Fetcher::acquire`] skips any artifact
//! whose destination already exists and otherwise asks its [`Retriever`] for a
//! local copy before extracting or placing it.
//!
//! Nothing is cleaned up after a failure: a half-extracted directory stays on
//! disk until the next `clean`.

mod download;
mod unpack;

pub use download::{CachingRetriever, artifact_file_name};
pub use unpack::{ArchiveFormat, unpack_archive};

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::manifest::Externals;
use crate::resources::{CopyError, copy_dir_all, copy_file};

#[derive(Debug, Error)]
pub enum FetchError {
  #[error("failed to initialize HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  #[error("request for {url} failed: {source}")]
  Request {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("request for {url} failed with HTTP {status}")]
  Status { url: String, status: u16 },

  #[error("artifact source not found: {0}")]
  SourceNotFound(PathBuf),

  #[error("unsupported archive format: {0}")]
  UnsupportedArchive(PathBuf),

  #[error("failed to extract {archive}: {message}")]
  Extract { archive: PathBuf, message: String },

  #[error("failed to {action} '{path}': {source}")]
  Io {
    action: &'static str,
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error(transparent)]
  Copy(#[from] CopyError),
}

impl FetchError {
  pub fn io(action: &'static str, path: &Path, source: std::io::Error) -> Self {
    Self::Io {
      action,
      path: path.to_path_buf(),
      source,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
  /// Extracted into a destination directory.
  Archive,
  /// Copied to a destination path.
  File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactSource {
  Url(String),
  Path(PathBuf),
}

impl ArtifactSource {
  /// Interpret a manifest reference. Relative paths resolve against `base_dir`.
  pub fn parse(reference: &str, base_dir: &Path) -> Self {
    if reference.starts_with("http://") || reference.starts_with("https://") {
      return Self::Url(reference.to_string());
    }
    let path = Path::new(reference.strip_prefix("file://").unwrap_or(reference));
    if path.is_absolute() {
      Self::Path(path.to_path_buf())
    } else {
      Self::Path(base_dir.join(path))
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
  pub name: String,
  pub kind: ArtifactKind,
  pub source: ArtifactSource,
  /// Relative to the directory the artifact is acquired into.
  pub dest: PathBuf,
}

impl ArtifactDescriptor {
  /// Descriptors for every external a manifest declares, archives first.
  pub fn from_externals(externals: &Externals, base_dir: &Path) -> Vec<Self> {
    let archives = externals.archive_packages.iter().map(|pkg| {
      let name = pkg.archive_name.clone().unwrap_or_else(|| artifact_file_name(&pkg.url));
      let dest = pkg
        .dest
        .clone()
        .unwrap_or_else(|| ArchiveFormat::strip_extension(&name).to_string());
      Self {
        kind: ArtifactKind::Archive,
        source: ArtifactSource::parse(&pkg.url, base_dir),
        dest: PathBuf::from(dest),
        name,
      }
    });

    let files = externals.files.iter().map(|file| {
      let name = artifact_file_name(&file.url);
      Self {
        kind: ArtifactKind::File,
        source: ArtifactSource::parse(&file.url, base_dir),
        dest: PathBuf::from(file.dest.clone().unwrap_or_else(|| name.clone())),
        name,
      }
    });

    archives.chain(files).collect()
  }

  pub fn target(&self, dest_dir: &Path) -> PathBuf {
    dest_dir.join(&self.dest)
  }
}

/// Makes an artifact available on the local filesystem.
pub trait Retriever {
  /// Return a local path holding the artifact's bytes (an archive or a file).
  fn retrieve(&mut self, artifact: &ArtifactDescriptor) -> Result<PathBuf, FetchError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStats {
  pub acquired: usize,
  pub skipped: usize,
}

pub struct Fetcher<R> {
  retriever: R,
  stats: FetchStats,
}

impl<R: Retriever> Fetcher<R> {
  pub fn new(retriever: R) -> Self {
    Self {
      retriever,
      stats: FetchStats::default(),
    }
  }

  pub fn stats(&self) -> FetchStats {
    self.stats
  }

  pub fn reset_stats(&mut self) {
    self.stats = FetchStats::default();
  }

  pub fn retriever(&self) -> &R {
    &self.retriever
  }

  /// Acquire each artifact into `dest_dir`, in order.
  pub fn acquire(&mut self, artifacts: &[ArtifactDescriptor], dest_dir: &Path) -> Result<(), FetchError> {
    for artifact in artifacts {
      let target = artifact.target(dest_dir);
      if target.exists() {
        debug!(artifact = %artifact.name, target = %target.display(), "artifact already present, skipping");
        self.stats.skipped += 1;
        continue;
      }

      info!(artifact = %artifact.name, target = %target.display(), "acquiring artifact");
      let local = self.retriever.retrieve(artifact)?;
      match artifact.kind {
        ArtifactKind::Archive => unpack_archive(&local, &target)?,
        ArtifactKind::File if local.is_dir() => {
          copy_dir_all(&local, &target)?;
        }
        ArtifactKind::File => copy_file(&local, &target)?,
      }
      self.stats.acquired += 1;
    }
    Ok(())
  }
}
