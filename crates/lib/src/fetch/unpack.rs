//! Archive extraction.
//!
//! Supports:
//! - `.zip`
//! - `.tar.gz` / `.tgz`
//! - `.tar`
//!
//! The format comes from the file name, falling back to the leading bytes for
//! downloads whose URL carried no extension. Entries are extracted as-is,
//! without stripping a leading directory.

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::info;

use super::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
  Zip,
  TarGz,
  Tar,
}

impl ArchiveFormat {
  pub fn from_name(name: &str) -> Option<Self> {
    let name = name.to_ascii_lowercase();
    if name.ends_with(".zip") {
      Some(Self::Zip)
    } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
      Some(Self::TarGz)
    } else if name.ends_with(".tar") {
      Some(Self::Tar)
    } else {
      None
    }
  }

  /// Strip a recognized archive extension from `name`.
  pub fn strip_extension(name: &str) -> &str {
    let lower = name.to_ascii_lowercase();
    for ext in [".tar.gz", ".tgz", ".zip", ".tar"] {
      if lower.ends_with(ext) && name.len() > ext.len() {
        return &name[..name.len() - ext.len()];
      }
    }
    name
  }

  fn sniff(path: &Path) -> std::io::Result<Option<Self>> {
    let mut header = Vec::with_capacity(512);
    File::open(path)?.take(512).read_to_end(&mut header)?;

    if header.starts_with(b"PK\x03\x04") || header.starts_with(b"PK\x05\x06") {
      Ok(Some(Self::Zip))
    } else if header.starts_with(&[0x1f, 0x8b]) {
      Ok(Some(Self::TarGz))
    } else if header.len() >= 262 && &header[257..262] == b"ustar" {
      Ok(Some(Self::Tar))
    } else {
      Ok(None)
    }
  }

  pub fn detect(path: &Path) -> Result<Self, FetchError> {
    let by_name = path.file_name().and_then(|n| n.to_str()).and_then(Self::from_name);
    if let Some(format) = by_name {
      return Ok(format);
    }
    Self::sniff(path)
      .map_err(|e| FetchError::io("read", path, e))?
      .ok_or_else(|| FetchError::UnsupportedArchive(path.to_path_buf()))
  }
}

/// Unpack an archive into `dest`, creating it if needed.
pub fn unpack_archive(archive: &Path, dest: &Path) -> Result<(), FetchError> {
  let format = ArchiveFormat::detect(archive)?;
  fs::create_dir_all(dest).map_err(|e| FetchError::io("create directory", dest, e))?;

  let file = File::open(archive).map_err(|e| FetchError::io("open", archive, e))?;
  let reader = BufReader::new(file);
  let extract_err = |message: String| FetchError::Extract {
    archive: archive.to_path_buf(),
    message,
  };

  match format {
    ArchiveFormat::Zip => {
      let mut zip = zip::ZipArchive::new(reader).map_err(|e| extract_err(e.to_string()))?;
      zip.extract(dest).map_err(|e| extract_err(e.to_string()))?;
    }
    ArchiveFormat::TarGz => {
      Archive::new(GzDecoder::new(reader))
        .unpack(dest)
        .map_err(|e| extract_err(e.to_string()))?;
    }
    ArchiveFormat::Tar => {
      Archive::new(reader).unpack(dest).map_err(|e| extract_err(e.to_string()))?;
    }
  }

  info!(archive = %archive.display(), dest = %dest.display(), ?format, "unpacked archive");
  Ok(())
}
