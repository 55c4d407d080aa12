//! Implementation of the `extmake build` command.
//!
//! Cleans the build root, then builds every task listed in `make-options.json`
//! in order, printing a banner per task and a summary at the end.

use anyhow::{Context, Result};
use tracing::{debug, info};

use extmake_lib::{Driver, Layout};

use crate::output::{TerminalObserver, format_duration, print_stat, print_success};

pub fn cmd_build(layout: Layout) -> Result<()> {
  let mut driver = Driver::load(layout).context("Failed to load project options")?;
  driver.preflight()?;

  let report = driver.build(&mut TerminalObserver)?;

  print_success("Build succeeded!");
  print_stat("Tasks", &report.tasks.len().to_string());
  print_stat("Common modules", &report.modules_built.to_string());
  print_stat("Externals acquired", &report.artifacts_acquired.to_string());
  print_stat("Externals skipped", &report.artifacts_skipped.to_string());
  print_stat("Duration", &format_duration(report.elapsed));

  for task in &report.tasks {
    info!(task = %task.task, output = %task.output_dir.display(), links = task.links.len(), "task output");
    for link in &task.links {
      debug!(task = %task.name, module = %link.module(), shared = %link.shared().display(), "common module linked");
    }
  }
  Ok(())
}
