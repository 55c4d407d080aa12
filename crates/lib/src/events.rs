//! Build progress events.
//!
//! The library never prints. Banners and step markers go to a [`BuildObserver`];
//! the CLI renders them to the terminal and tests simply collect them.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
  /// The build root was removed and recreated.
  Cleaned { build_dir: PathBuf },
  /// Processing of a task began.
  TaskStarted { task: String },
  /// A common module is being built into the shared tree for the first time.
  ModuleBuilding { module: PathBuf },
  Step(Step),
  /// Every task was processed.
  BuildSucceeded { tasks: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
  ExtensionResources,
  Externals,
  ModuleResources,
  LinkModule { module: String },
  TaskResources,
}

impl fmt::Display for Step {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Step::ExtensionResources => write!(f, "copying extension resources"),
      Step::Externals => write!(f, "getting task externals"),
      Step::ModuleResources => write!(f, "copying module resources"),
      Step::LinkModule { module } => write!(f, "copying module {} to task", module),
      Step::TaskResources => write!(f, "copying task resources"),
    }
  }
}

pub trait BuildObserver {
  fn on_event(&mut self, event: &BuildEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl BuildObserver for NoopObserver {
  fn on_event(&mut self, _event: &BuildEvent) {}
}

/// Records every event, in order.
impl BuildObserver for Vec<BuildEvent> {
  fn on_event(&mut self, event: &BuildEvent) {
    self.push(event.clone());
  }
}
