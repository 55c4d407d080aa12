//! Manifest record types.
//!
//! Three declarative files drive a build:
//! - [`MakeOptions`] (`make-options.json`): the ordered task list and project-wide settings
//! - [`TaskDefinition`] (`task.json`): a task's identity, validated into a [`TaskIdentity`]
//! - [`BuildManifest`] (`make.json`): externals, common modules and resource rules,
//!   used both by tasks and by common modules
//!
//! Every optional field has an explicit default so an absent key and an absent
//! file read the same way.

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::common::ModuleKind;
use crate::consts::{DEFAULT_EXTENSION_RESOURCES, DEFAULT_TASK_RESOURCES};

/// Project-level options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakeOptions {
  /// Task directories, relative to the project root, in build order.
  pub tasks: Vec<String>,
  /// Resources copied from every task and common module.
  #[serde(default = "default_task_resources")]
  pub task_resources: Vec<String>,
  /// Package-level resources copied from the project root into the build root.
  #[serde(default = "default_extension_resources")]
  pub extension_resources: Vec<String>,
  /// Minimum extmake version this project requires.
  #[serde(default)]
  pub min_version: Option<String>,
  /// External tools that must be installed before any command runs.
  #[serde(default)]
  pub tools: Vec<ToolRequirement>,
}

fn default_task_resources() -> Vec<String> {
  DEFAULT_TASK_RESOURCES.iter().map(|s| s.to_string()).collect()
}

fn default_extension_resources() -> Vec<String> {
  DEFAULT_EXTENSION_RESOURCES.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolRequirement {
  pub name: String,
  #[serde(default = "default_version_arg")]
  pub version_arg: String,
  #[serde(default)]
  pub min_version: Option<String>,
}

fn default_version_arg() -> String {
  "--version".to_string()
}

/// Raw `task.json` contents.
///
/// Identity fields are optional here so that validation can report every
/// problem at once instead of stopping at the first missing key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinition {
  pub id: Option<String>,
  pub name: Option<String>,
  pub friendly_name: Option<String>,
  pub version: Option<TaskVersion>,
  pub instance_name_format: Option<String>,
  pub description: Option<String>,
  pub author: Option<String>,
  pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaskVersion {
  pub major: u64,
  pub minor: u64,
  pub patch: u64,
}

impl std::fmt::Display for TaskVersion {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
  }
}

/// A task definition that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskIdentity {
  pub id: uuid::Uuid,
  pub name: String,
  pub friendly_name: String,
  pub version: TaskVersion,
}

impl TaskDefinition {
  /// Check the identity fields, collecting every problem found.
  pub fn validate(&self) -> Result<TaskIdentity, Vec<String>> {
    let mut problems = Vec::new();

    let id = match self.id.as_deref() {
      None => {
        problems.push("missing required field 'id'".to_string());
        None
      }
      Some(raw) => match uuid::Uuid::parse_str(raw) {
        Ok(id) => Some(id),
        Err(_) => {
          problems.push(format!("'id' is not a valid UUID: {:?}", raw));
          None
        }
      },
    };

    let name = match self.name.as_deref() {
      None => {
        problems.push("missing required field 'name'".to_string());
        None
      }
      Some(name) if !is_valid_task_name(name) => {
        problems.push(format!(
          "'name' must be non-empty and contain only letters, digits, '-' or '_': {:?}",
          name
        ));
        None
      }
      Some(name) => Some(name.to_string()),
    };

    let friendly_name = match self.friendly_name.as_deref().map(str::trim) {
      None => {
        problems.push("missing required field 'friendlyName'".to_string());
        None
      }
      Some("") => {
        problems.push("'friendlyName' must not be empty".to_string());
        None
      }
      Some(friendly) => Some(friendly.to_string()),
    };

    if self.version.is_none() {
      problems.push("missing required field 'version'".to_string());
    }

    match (id, name, friendly_name, self.version) {
      (Some(id), Some(name), Some(friendly_name), Some(version)) if problems.is_empty() => Ok(TaskIdentity {
        id,
        name,
        friendly_name,
        version,
      }),
      _ => Err(problems),
    }
  }
}

fn is_valid_task_name(name: &str) -> bool {
  !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// `make.json` contents for a task or a common module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildManifest {
  pub externals: Externals,
  pub common: Vec<SharedModuleRef>,
  /// Extra match-base patterns on top of the default resources.
  pub include: Vec<String>,
  /// Match-base patterns removed from the selection after includes resolve.
  pub exclude: Vec<String>,
  pub cp: Vec<CopyGroup>,
  pub rm: Vec<RemoveGroup>,
}

impl BuildManifest {
  /// Check that every declared `dest` stays inside the output directory.
  pub fn validate(&self) -> Result<(), Vec<String>> {
    let archives = self.externals.archive_packages.iter().map(|p| ("archivePackages", &p.dest));
    let files = self.externals.files.iter().map(|f| ("files", &f.dest));
    let modules = self.common.iter().map(|m| ("common", &m.dest));
    let copies = self.cp.iter().map(|g| ("cp", &g.dest));

    let problems: Vec<String> = archives
      .chain(files)
      .chain(modules)
      .chain(copies)
      .filter_map(|(field, dest)| dest.as_deref().map(|dest| (field, dest)))
      .filter(|(_, dest)| !is_contained(dest))
      .map(|(field, dest)| format!("'{}' dest must be a relative path inside the output: {:?}", field, dest))
      .collect();

    if problems.is_empty() {
      Ok(())
    } else {
      Err(problems)
    }
  }
}

fn is_contained(dest: &str) -> bool {
  Path::new(dest)
    .components()
    .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Externals {
  pub archive_packages: Vec<ArchivePackage>,
  pub files: Vec<ExternalFile>,
}

impl Externals {
  pub fn is_empty(&self) -> bool {
    self.archive_packages.is_empty() && self.files.is_empty()
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivePackage {
  #[serde(default)]
  pub archive_name: Option<String>,
  /// URL or local path of the archive.
  pub url: String,
  /// Extraction directory, relative to the output directory.
  #[serde(default)]
  pub dest: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalFile {
  /// URL or local path of the file.
  pub url: String,
  /// Target file path, relative to the output directory.
  #[serde(default)]
  pub dest: Option<String>,
}

/// A reference from a task to a shared module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedModuleRef {
  /// Module source directory, relative to the referencing task.
  pub module: String,
  #[serde(default, rename = "type")]
  pub kind: ModuleKind,
  /// Overrides the kind's default subpath inside the task output.
  #[serde(default)]
  pub dest: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyGroup {
  /// Patterns matched against paths relative to the source directory.
  pub source: Vec<String>,
  #[serde(default)]
  pub dest: Option<String>,
  /// Shell-style flags; `-R` copies matched directories recursively.
  #[serde(default)]
  pub options: Option<String>,
}

impl CopyGroup {
  pub fn recursive(&self) -> bool {
    self
      .options
      .as_deref()
      .is_some_and(|opts| opts.contains('R') || opts.contains('r'))
  }
}

/// Removal is always recursive, so shell-style `options` are not read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveGroup {
  /// Patterns matched against paths relative to the destination directory.
  pub items: Vec<String>,
}
