//! Hashing utilities.
//!
//! This module provides:
//! - `ContentHash`: a full 64-character SHA-256 digest
//! - `hash_directory()`: deterministic digest of an output tree
//! - `hash_file()`: single file digest
//! - `url_key()`: short stable key used to name download cache entries

use std::fs;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::consts::URL_KEY_LEN;

/// A full 64-character SHA256 hash, lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl std::fmt::Display for ContentHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, thiserror::Error)]
pub enum DirHashError {
  #[error("failed to walk directory: {0}")]
  WalkDir(#[from] walkdir::Error),

  #[error("failed to read file {path}: {source}")]
  ReadFile {
    path: String,
    #[source]
    source: std::io::Error,
  },
}

/// Compute a deterministic hash of a directory's contents.
///
/// Only relative paths, directory structure and file contents contribute;
/// timestamps and permissions do not. Entries are visited in file-name order.
/// Names listed in `exclude` are skipped at any depth.
pub fn hash_directory(path: &Path, exclude: &[&str]) -> Result<ContentHash, DirHashError> {
  let walker = WalkDir::new(path).sort_by_file_name().into_iter().filter_entry(|e| {
    e.file_name()
      .to_str()
      .map(|name| !exclude.contains(&name))
      .unwrap_or(true)
  });

  let mut hasher = Sha256::new();
  for entry in walker {
    let entry = entry?;
    let rel_path = entry.path().strip_prefix(path).unwrap_or(entry.path());
    if rel_path.as_os_str().is_empty() {
      continue;
    }

    // Forward slashes keep digests comparable across platforms.
    let rel = rel_path
      .components()
      .map(|c| c.as_os_str().to_string_lossy())
      .collect::<Vec<_>>()
      .join("/");

    let line = if entry.file_type().is_dir() {
      format!("D:{}", rel)
    } else {
      format!("F:{}:{}", rel, hash_file(entry.path())?.0)
    };
    hasher.update(line.as_bytes());
    hasher.update(b"\n");
  }

  Ok(ContentHash(format!("{:x}", hasher.finalize())))
}

/// Hash a file's contents.
pub fn hash_file(path: &Path) -> Result<ContentHash, DirHashError> {
  let read_err = |source| DirHashError::ReadFile {
    path: path.display().to_string(),
    source,
  };
  let mut file = fs::File::open(path).map_err(read_err)?;

  let mut hasher = Sha256::new();
  let mut buffer = [0u8; 8192];
  loop {
    let bytes_read = file.read(&mut buffer).map_err(read_err)?;
    if bytes_read == 0 {
      break;
    }
    hasher.update(&buffer[..bytes_read]);
  }

  Ok(ContentHash(format!("{:x}", hasher.finalize())))
}

/// Short, filesystem-safe key for a URL.
pub fn url_key(url: &str) -> String {
  let digest = hex::encode(Sha256::digest(url.as_bytes()));
  digest[..URL_KEY_LEN].to_string()
}
