//! Default artifact retrieval: HTTP downloads through an on-disk cache, local
//! paths used in place.
//!
//! Downloads land in `<download_dir>/<url-key>/<file name>` and are marked
//! complete only once fully written, so an interrupted download is fetched
//! again on the next run. The cache is not touched by `clean`.

use std::fs;
use std::path::PathBuf;

use reqwest::blocking::Client;
use tracing::{debug, info};

use super::{ArtifactDescriptor, ArtifactSource, FetchError, Retriever};
use crate::consts::{APP_NAME, DOWNLOAD_COMPLETE_MARKER};
use crate::util::hash::url_key;

pub struct CachingRetriever {
  download_dir: PathBuf,
  client: Client,
}

impl CachingRetriever {
  pub fn new(download_dir: impl Into<PathBuf>) -> Result<Self, FetchError> {
    let client = Client::builder()
      .user_agent(format!("{}/{}", APP_NAME, env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(FetchError::Client)?;
    Ok(Self {
      download_dir: download_dir.into(),
      client,
    })
  }

  /// Cache location for `url`, whether or not it has been downloaded yet.
  pub fn cache_path(&self, url: &str) -> PathBuf {
    self.download_dir.join(url_key(url)).join(artifact_file_name(url))
  }

  fn download(&self, url: &str) -> Result<PathBuf, FetchError> {
    let dest = self.cache_path(url);
    let entry = dest.parent().map(PathBuf::from).unwrap_or_else(|| self.download_dir.clone());
    let marker = entry.join(DOWNLOAD_COMPLETE_MARKER);

    if marker.exists() && dest.exists() {
      debug!(url = %url, path = %dest.display(), "using cached download");
      return Ok(dest);
    }

    fs::create_dir_all(&entry).map_err(|e| FetchError::io("create directory", &entry, e))?;

    info!(url = %url, "downloading");
    let request_err = |source| FetchError::Request {
      url: url.to_string(),
      source,
    };
    let response = self.client.get(url).send().map_err(request_err)?;
    let status = response.status();
    if !status.is_success() {
      return Err(FetchError::Status {
        url: url.to_string(),
        status: status.as_u16(),
      });
    }
    let bytes = response.bytes().map_err(request_err)?;

    fs::write(&dest, &bytes).map_err(|e| FetchError::io("write", &dest, e))?;
    fs::write(&marker, url).map_err(|e| FetchError::io("write", &marker, e))?;

    info!(path = %dest.display(), size = bytes.len(), "download complete");
    Ok(dest)
  }
}

impl Retriever for CachingRetriever {
  fn retrieve(&mut self, artifact: &ArtifactDescriptor) -> Result<PathBuf, FetchError> {
    match &artifact.source {
      ArtifactSource::Url(url) => self.download(url),
      ArtifactSource::Path(path) if path.exists() => Ok(path.clone()),
      ArtifactSource::Path(path) => Err(FetchError::SourceNotFound(path.clone())),
    }
  }
}

/// Name an external is cached under and placed as when the manifest gives no `dest`.
///
/// This is the last segment of the reference with any query or fragment
/// dropped. Characters outside `[A-Za-z0-9._-]` become `_`. References
/// without a usable segment get `artifact-<url key>`.
pub fn artifact_file_name(reference: &str) -> String {
  let path = reference.split(['?', '#']).next().unwrap_or_default();
  let segment = path.rsplit(['/', '\\']).next().unwrap_or_default();
  let name: String = segment
    .chars()
    .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
    .collect();

  match name.as_str() {
    "" | "." | ".." => format!("artifact-{}", url_key(reference)),
    _ => name,
  }
}
