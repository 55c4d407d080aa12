//! Shared fixtures for library integration tests.

use std::path::{Path, PathBuf};

use extmake_lib::fetch::{ArtifactDescriptor, ArtifactSource, FetchError, Retriever};
use extmake_lib::manifest::load_options;
use extmake_lib::{Driver, Layout};
use serde_json::{Value, json};
use tempfile::TempDir;

/// A throwaway project root with a `make-options.json`.
pub struct Project {
  pub temp: TempDir,
}

impl Project {
  pub fn new(tasks: &[&str]) -> Self {
    let project = Self {
      temp: TempDir::new().unwrap(),
    };
    project.write_json("make-options.json", &json!({ "tasks": tasks }));
    project
  }

  pub fn root(&self) -> PathBuf {
    dunce::canonicalize(self.temp.path()).unwrap()
  }

  pub fn write(&self, rel: &str, content: &str) -> PathBuf {
    let path = self.temp.path().join(rel);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
  }

  pub fn write_json(&self, rel: &str, value: &Value) -> PathBuf {
    self.write(rel, &serde_json::to_string_pretty(value).unwrap())
  }

  /// A task directory with a valid `task.json` and one script.
  pub fn task(&self, dir: &str, name: &str) {
    self.write_json(&format!("{dir}/task.json"), &task_definition(name));
    self.write(&format!("{dir}/index.js"), &format!("// {name}"));
  }

  pub fn layout(&self) -> Layout {
    Layout::new(self.temp.path())
  }

  pub fn build_dir(&self) -> PathBuf {
    self.layout().build_dir
  }

  pub fn driver<R: Retriever>(&self, retriever: R) -> Driver<R> {
    let layout = self.layout();
    let options = load_options(&layout.options_path()).unwrap();
    Driver::with_retriever(layout, options, retriever)
  }
}

pub fn task_definition(name: &str) -> Value {
  json!({
    "id": "0d3b5e2a-7f41-4c55-9a1e-3b6f0c2d8e90",
    "name": name,
    "friendlyName": format!("{name} task"),
    "version": { "Major": 0, "Minor": 1, "Patch": 0 },
    "instanceNameFormat": name,
  })
}

/// Relative paths of every file under `root`, sorted, with forward slashes.
pub fn list_files(root: &Path) -> Vec<String> {
  let mut files: Vec<String> = walkdir::WalkDir::new(root)
    .into_iter()
    .filter_map(|e| e.ok())
    .filter(|e| e.file_type().is_file())
    .map(|e| {
      e.path()
        .strip_prefix(root)
        .unwrap()
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
    })
    .collect();
  files.sort();
  files
}

/// Fails every retrieval, counting the attempts.
#[derive(Default)]
pub struct FailingRetriever {
  pub calls: usize,
}

impl Retriever for FailingRetriever {
  fn retrieve(&mut self, artifact: &ArtifactDescriptor) -> Result<PathBuf, FetchError> {
    self.calls += 1;
    Err(FetchError::Status {
      url: format!("{:?}", artifact.source),
      status: 503,
    })
  }
}

/// Serves local sources in place, counting the attempts.
#[derive(Default)]
pub struct LocalRetriever {
  pub calls: usize,
}

impl Retriever for LocalRetriever {
  fn retrieve(&mut self, artifact: &ArtifactDescriptor) -> Result<PathBuf, FetchError> {
    self.calls += 1;
    match &artifact.source {
      ArtifactSource::Path(path) => Ok(path.clone()),
      ArtifactSource::Url(url) => Err(FetchError::Status {
        url: url.clone(),
        status: 404,
      }),
    }
  }
}
