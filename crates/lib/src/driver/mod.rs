//! The `clean` / `build` state machine.
//!
//! A build always starts from a clean build root, copies package-level
//! resources, then processes every declared task in order:
//!
//! 1. verify the task's source directory
//! 2. load and validate `task.json` (if present) to name the output directory
//! 3. load `make.json` (if present)
//! 4. acquire externals into the output directory
//! 5. build and link common modules
//! 6. copy the task's own resources
//!
//! The first error aborts the run. Nothing already written is rolled back.

mod command;

pub use command::Command;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::common::{BuildRegistry, CommonModuleBuilder, ModuleLink};
use crate::consts::{BUILD_MANIFEST_FILE, COMMON_DIR_NAME, TASK_DEF_FILE};
use crate::error::BuildError;
use crate::events::{BuildEvent, BuildObserver, Step};
use crate::fetch::{ArtifactDescriptor, CachingRetriever, FetchStats, Fetcher, Retriever};
use crate::manifest::{MakeOptions, load_build_manifest, load_options, load_task_identity};
use crate::paths::Layout;
use crate::resources::{ResourceRules, copy_resources, create_dir_all};
use crate::toolchain;

/// Outcome of one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
  /// Task directory as declared in the options file.
  pub task: String,
  /// Output directory name: the task's `name`, or its directory name.
  pub name: String,
  pub output_dir: PathBuf,
  pub links: Vec<ModuleLink>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
  pub tasks: Vec<TaskReport>,
  pub modules_built: usize,
  pub artifacts_acquired: usize,
  pub artifacts_skipped: usize,
  pub elapsed: Duration,
}

pub struct Driver<R: Retriever = CachingRetriever> {
  layout: Layout,
  options: MakeOptions,
  fetcher: Fetcher<R>,
  common: CommonModuleBuilder,
}

impl Driver<CachingRetriever> {
  /// Read the project's options file and download through the project cache.
  pub fn load(layout: Layout) -> Result<Self, BuildError> {
    let options = load_options(&layout.options_path())?;
    let retriever = CachingRetriever::new(&layout.download_dir)?;
    Ok(Self::with_retriever(layout, options, retriever))
  }
}

impl<R: Retriever> Driver<R> {
  pub fn with_retriever(layout: Layout, options: MakeOptions, retriever: R) -> Self {
    let common = CommonModuleBuilder::new(layout.common_dir(), options.task_resources.clone());
    Self {
      layout,
      options,
      fetcher: Fetcher::new(retriever),
      common,
    }
  }

  pub fn layout(&self) -> &Layout {
    &self.layout
  }

  pub fn options(&self) -> &MakeOptions {
    &self.options
  }

  /// Common modules built during the current run.
  pub fn registry(&self) -> &BuildRegistry {
    self.common.registry()
  }

  pub fn fetch_stats(&self) -> FetchStats {
    self.fetcher.stats()
  }

  pub fn retriever(&self) -> &R {
    self.fetcher.retriever()
  }

  /// Minimum-version and required-tool checks.
  pub fn preflight(&self) -> Result<(), BuildError> {
    toolchain::preflight(&self.options, env!("CARGO_PKG_VERSION"))?;
    Ok(())
  }

  /// Remove the build root and recreate it empty.
  pub fn clean(&mut self, observer: &mut dyn BuildObserver) -> Result<(), BuildError> {
    let build_dir = &self.layout.build_dir;
    if build_dir.exists() {
      debug!(path = %build_dir.display(), "removing build root");
      std::fs::remove_dir_all(build_dir).map_err(|e| BuildError::io("remove", build_dir, e))?;
    }
    create_dir_all(build_dir)?;
    info!(path = %build_dir.display(), "build root cleaned");
    observer.on_event(&BuildEvent::Cleaned {
      build_dir: build_dir.clone(),
    });
    Ok(())
  }

  /// Clean, then build every declared task in order.
  pub fn build(&mut self, observer: &mut dyn BuildObserver) -> Result<BuildReport, BuildError> {
    let started = Instant::now();
    self.clean(observer)?;

    // Registry and counters are scoped to one run.
    self.common = CommonModuleBuilder::new(self.layout.common_dir(), self.options.task_resources.clone());
    self.fetcher.reset_stats();

    self.copy_extension_resources(observer)?;

    let tasks = self.options.tasks.clone();
    let mut reports = Vec::with_capacity(tasks.len());
    for task in &tasks {
      reports.push(self.build_task(task, observer)?);
    }

    observer.on_event(&BuildEvent::BuildSucceeded { tasks: reports.len() });
    let stats = self.fetcher.stats();
    let report = BuildReport {
      tasks: reports,
      modules_built: self.common.registry().len(),
      artifacts_acquired: stats.acquired,
      artifacts_skipped: stats.skipped,
      elapsed: started.elapsed(),
    };
    info!(
      tasks = report.tasks.len(),
      modules = report.modules_built,
      elapsed_ms = report.elapsed.as_millis() as u64,
      "build succeeded"
    );
    Ok(report)
  }

  /// Build one task into the existing build root.
  ///
  /// Output already on disk is kept: externals that are present are not
  /// fetched again and resources are copied over the top.
  pub fn build_task(&mut self, task: &str, observer: &mut dyn BuildObserver) -> Result<TaskReport, BuildError> {
    observer.on_event(&BuildEvent::TaskStarted { task: task.to_string() });

    let source = self.layout.task_source(task);
    if !source.is_dir() {
      return Err(BuildError::MissingTask {
        task: task.to_string(),
        path: source,
      });
    }

    let identity = load_task_identity(&source.join(TASK_DEF_FILE))?;
    let name = match identity {
      Some(identity) => {
        debug!(task = %task, id = %identity.id, version = %identity.version, "task definition valid");
        identity.name
      }
      None => dir_name(&source, task),
    };
    if name == COMMON_DIR_NAME {
      return Err(BuildError::ReservedOutputName {
        task: task.to_string(),
        name,
      });
    }

    let output_dir = self.layout.task_output(&name);
    create_dir_all(&output_dir)?;
    info!(task = %task, output = %output_dir.display(), "building task");

    let manifest = load_build_manifest(&source.join(BUILD_MANIFEST_FILE))?;

    if !manifest.externals.is_empty() {
      observer.on_event(&BuildEvent::Step(Step::Externals));
      let artifacts = ArtifactDescriptor::from_externals(&manifest.externals, &source);
      self.fetcher.acquire(&artifacts, &output_dir)?;
    }

    let links = if manifest.common.is_empty() {
      Vec::new()
    } else {
      self.common.link_modules(&source, &output_dir, &manifest.common, observer)?
    };

    observer.on_event(&BuildEvent::Step(Step::TaskResources));
    let rules = ResourceRules::for_manifest(&self.options.task_resources, &manifest);
    copy_resources(&rules, &source, &output_dir)?;

    Ok(TaskReport {
      task: task.to_string(),
      name,
      output_dir,
      links,
    })
  }

  fn copy_extension_resources(&self, observer: &mut dyn BuildObserver) -> Result<(), BuildError> {
    if self.options.extension_resources.is_empty() {
      return Ok(());
    }
    observer.on_event(&BuildEvent::Step(Step::ExtensionResources));
    let rules = ResourceRules::match_base(&self.options.extension_resources).excluding(&self.layout.generated_names());
    let stats = copy_resources(&rules, &self.layout.root, &self.layout.build_dir)?;
    debug!(files = stats.files_copied, "extension resources copied");
    Ok(())
  }
}

fn dir_name(source: &Path, fallback: &str) -> String {
  source
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_else(|| fallback.to_string())
}
