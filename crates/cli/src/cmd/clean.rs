//! Implementation of the `extmake clean` command.

use anyhow::{Context, Result};

use extmake_lib::{Driver, Layout};

use crate::output::{TerminalObserver, print_success};

/// Remove the build root and recreate it empty. The download cache is kept.
pub fn cmd_clean(layout: Layout) -> Result<()> {
  let mut driver = Driver::load(layout).context("Failed to load project options")?;
  driver.preflight()?;
  driver.clean(&mut TerminalObserver)?;
  print_success("Clean complete");
  Ok(())
}
