//! Common module building and linking.
//!
//! Tasks may share modules (helpers, SDK wrappers) that live outside their own
//! directory. Each module is built once per run into `<build>/Common/<name>`,
//! keyed by the module's directory name alone, and then placed into every task
//! that references it according to its [`ModuleKind`]:
//!
//! ```text
//! _build/
//!   Common/
//!     VstsHelpers/          # built once
//!   TaskA/
//!     ps_modules/
//!       VstsHelpers/        # copy, minus Tests/
//!   TaskB/
//!     ps_modules/
//!       VstsHelpers/
//! ```
//!
//! The shared build keeps the module's `Tests` directory; only the per-task
//! copy drops it.

mod kind;
mod registry;

pub use kind::{ModuleKind, Placement};
pub use registry::BuildRegistry;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::consts::{BUILD_MANIFEST_FILE, TESTS_DIR_NAME};
use crate::error::BuildError;
use crate::events::{BuildEvent, BuildObserver, Step};
use crate::manifest::{SharedModuleRef, load_build_manifest};
use crate::resources::{ResourceRules, copy_resources, create_dir_all};

/// How a module reference was satisfied for one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleLink {
  Copied {
    module: String,
    shared: PathBuf,
    dest: PathBuf,
  },
  Referenced {
    module: String,
    shared: PathBuf,
  },
}

impl ModuleLink {
  pub fn module(&self) -> &str {
    match self {
      ModuleLink::Copied { module, .. } | ModuleLink::Referenced { module, .. } => module,
    }
  }

  pub fn shared(&self) -> &Path {
    match self {
      ModuleLink::Copied { shared, .. } | ModuleLink::Referenced { shared, .. } => shared,
    }
  }
}

pub struct CommonModuleBuilder {
  common_dir: PathBuf,
  /// Default resource patterns applied to every module build.
  resources: Vec<String>,
  registry: BuildRegistry,
}

impl CommonModuleBuilder {
  pub fn new(common_dir: impl Into<PathBuf>, resources: Vec<String>) -> Self {
    Self {
      common_dir: common_dir.into(),
      resources,
      registry: BuildRegistry::new(),
    }
  }

  pub fn registry(&self) -> &BuildRegistry {
    &self.registry
  }

  /// Canonical shared output directory for a module, independent of the task.
  pub fn output_dir(&self, module_name: &str) -> PathBuf {
    self.common_dir.join(module_name)
  }

  /// Build (if needed) and place every module `task_source` declares.
  pub fn link_modules(
    &mut self,
    task_source: &Path,
    task_out: &Path,
    modules: &[SharedModuleRef],
    observer: &mut dyn BuildObserver,
  ) -> Result<Vec<ModuleLink>, BuildError> {
    modules
      .iter()
      .map(|module| self.link_module(task_source, task_out, module, observer))
      .collect()
  }

  fn link_module(
    &mut self,
    task_source: &Path,
    task_out: &Path,
    module: &SharedModuleRef,
    observer: &mut dyn BuildObserver,
  ) -> Result<ModuleLink, BuildError> {
    let source = task_source.join(&module.module);
    if !source.is_dir() {
      return Err(BuildError::MissingModule {
        module: module.module.clone(),
        path: source,
      });
    }
    let source = dunce::canonicalize(&source).map_err(|e| BuildError::io("resolve", &source, e))?;
    let name = source
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .ok_or_else(|| BuildError::MissingModule {
        module: module.module.clone(),
        path: source.clone(),
      })?;

    let shared = self.ensure_built(&name, &source, observer)?;

    match module.kind.destination(task_out, module.dest.as_deref(), &name) {
      None => {
        debug!(module = %name, kind = %module.kind, "referencing common module in place");
        Ok(ModuleLink::Referenced { module: name, shared })
      }
      Some(dest) => {
        observer.on_event(&BuildEvent::Step(Step::LinkModule { module: name.clone() }));
        let flatten = ResourceRules::match_base(&[format!("!{}", TESTS_DIR_NAME)]);
        copy_resources(&flatten, &shared, &dest)?;
        debug!(module = %name, dest = %dest.display(), "copied common module into task");
        Ok(ModuleLink::Copied {
          module: name,
          shared,
          dest,
        })
      }
    }
  }

  fn ensure_built(
    &mut self,
    name: &str,
    source: &Path,
    observer: &mut dyn BuildObserver,
  ) -> Result<PathBuf, BuildError> {
    let out = self.output_dir(name);
    if self.registry.contains(&out) || out.exists() {
      debug!(module = %name, "common module already built");
      return Ok(out);
    }

    observer.on_event(&BuildEvent::ModuleBuilding {
      module: source.to_path_buf(),
    });
    info!(module = %name, source = %source.display(), "building common module");
    create_dir_all(&out)?;

    observer.on_event(&BuildEvent::Step(Step::ModuleResources));
    let manifest = load_build_manifest(&source.join(BUILD_MANIFEST_FILE))?;
    let rules = ResourceRules::for_manifest(&self.resources, &manifest);
    copy_resources(&rules, source, &out)?;

    self.registry.register(out.clone());
    Ok(out)
  }
}
