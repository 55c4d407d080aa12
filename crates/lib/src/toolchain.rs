//! Preflight checks run before any command.
//!
//! A project may pin the minimum extmake version it was written for and list
//! external tools (e.g. `node`, `npm`) that must be installed. Tool versions are
//! read from the first line of `<tool> <versionArg>` and compared loosely: a
//! leading `v` is dropped and missing minor/patch components count as zero.

use std::process::Command;

use semver::Version;
use thiserror::Error;
use tracing::{debug, info};

use crate::consts::APP_NAME;
use crate::manifest::{MakeOptions, ToolRequirement};

#[derive(Debug, Error)]
pub enum ToolError {
  #[error("{tool} is not installed or not on PATH: {source}")]
  NotInstalled {
    tool: String,
    #[source]
    source: std::io::Error,
  },

  #[error("{tool} exited with {status} while reporting its version")]
  Failed { tool: String, status: String },

  #[error("could not read a version from {tool} output: {output:?}")]
  VersionOutput { tool: String, output: String },

  #[error("invalid version requirement '{requirement}' for {tool}: {source}")]
  InvalidRequirement {
    tool: String,
    requirement: String,
    #[source]
    source: semver::Error,
  },

  #[error("{tool} {found} is too old; at least {required} is required")]
  TooOld {
    tool: String,
    found: Version,
    required: Version,
  },
}

/// Parse versions like `v18.2.0`, `10.1` or `git version 2.43.0`.
pub fn parse_loose_version(text: &str) -> Option<Version> {
  let token = text
    .split_whitespace()
    .find(|t| t.trim_start_matches('v').starts_with(|c: char| c.is_ascii_digit()))?;
  let token = token.trim_start_matches('v');
  // Drop build metadata and anything non-numeric after the core version.
  let core: String = token
    .chars()
    .take_while(|c| c.is_ascii_digit() || *c == '.')
    .collect();
  let mut parts: Vec<&str> = core.split('.').filter(|p| !p.is_empty()).take(3).collect();
  while parts.len() < 3 {
    parts.push("0");
  }
  Version::parse(&parts.join(".")).ok()
}

/// Fail unless `found` is at least `required`.
pub fn check_min_version(tool: &str, found: &Version, required: &str) -> Result<(), ToolError> {
  let required = parse_loose_version(required).map_or_else(
    || {
      Version::parse(required).map_err(|source| ToolError::InvalidRequirement {
        tool: tool.to_string(),
        requirement: required.to_string(),
        source,
      })
    },
    Ok,
  )?;
  if *found < required {
    return Err(ToolError::TooOld {
      tool: tool.to_string(),
      found: found.clone(),
      required,
    });
  }
  Ok(())
}

/// Check that a tool runs and, if a minimum is set, that it is new enough.
pub fn ensure_tool(requirement: &ToolRequirement) -> Result<Option<Version>, ToolError> {
  let tool = &requirement.name;
  let output = Command::new(tool)
    .arg(&requirement.version_arg)
    .output()
    .map_err(|source| ToolError::NotInstalled {
      tool: tool.clone(),
      source,
    })?;
  if !output.status.success() {
    return Err(ToolError::Failed {
      tool: tool.clone(),
      status: output.status.to_string(),
    });
  }

  let Some(min) = requirement.min_version.as_deref() else {
    debug!(tool = %tool, "tool present");
    return Ok(None);
  };

  let stdout = String::from_utf8_lossy(&output.stdout);
  let first_line = stdout.lines().next().unwrap_or_default().trim().to_string();
  let version = parse_loose_version(&first_line).ok_or_else(|| ToolError::VersionOutput {
    tool: tool.clone(),
    output: first_line.clone(),
  })?;
  check_min_version(tool, &version, min)?;
  debug!(tool = %tool, version = %version, "tool version ok");
  Ok(Some(version))
}

/// Run every check the options declare. `current` is the running extmake version.
pub fn preflight(options: &MakeOptions, current: &str) -> Result<(), ToolError> {
  if let Some(min) = options.min_version.as_deref() {
    let current = parse_loose_version(current).ok_or_else(|| ToolError::VersionOutput {
      tool: APP_NAME.to_string(),
      output: current.to_string(),
    })?;
    check_min_version(APP_NAME, &current, min)?;
  }
  for requirement in &options.tools {
    ensure_tool(requirement)?;
  }
  info!(tools = options.tools.len(), "preflight checks passed");
  Ok(())
}
