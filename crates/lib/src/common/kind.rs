use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::PS_MODULES_DIR;

/// How a common module ends up inside a task's output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
  /// PowerShell module, copied into the task once built.
  Ps,
  /// Node module, resolved from the shared tree at packaging time.
  #[default]
  Node,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
  /// A physical copy lives inside the task output.
  Copy,
  /// The task refers to the shared output in place.
  Reference,
}

impl ModuleKind {
  pub fn as_str(self) -> &'static str {
    match self {
      ModuleKind::Ps => "ps",
      ModuleKind::Node => "node",
    }
  }

  pub fn placement(self) -> Placement {
    match self {
      ModuleKind::Ps => Placement::Copy,
      ModuleKind::Node => Placement::Reference,
    }
  }

  /// Where a module named `module_name` lands inside `task_out`.
  ///
  /// `None` for kinds that are referenced rather than copied. Copies go
  /// under `dest` when given, else under `ps_modules`.
  pub fn destination(self, task_out: &Path, dest: Option<&str>, module_name: &str) -> Option<PathBuf> {
    match self.placement() {
      Placement::Reference => None,
      Placement::Copy => Some(
        task_out
          .join(dest.unwrap_or(PS_MODULES_DIR))
          .join(module_name),
      ),
    }
  }
}

impl std::fmt::Display for ModuleKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}
