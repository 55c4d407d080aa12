use std::fmt;
use std::str::FromStr;

use crate::error::BuildError;

/// Top-level commands, in the order they are listed to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
  Clean,
  Build,
}

impl Command {
  pub const ALL: [Command; 2] = [Command::Clean, Command::Build];

  pub fn name(self) -> &'static str {
    match self {
      Command::Clean => "clean",
      Command::Build => "build",
    }
  }

  /// Comma-separated list of every command name.
  pub fn valid_names() -> String {
    Self::ALL.iter().map(|c| c.name()).collect::<Vec<_>>().join(", ")
  }
}

impl fmt::Display for Command {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for Command {
  type Err = BuildError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|c| c.name() == s)
      .ok_or_else(|| BuildError::InvalidCommand {
        name: s.to_string(),
        valid: Self::valid_names(),
      })
  }
}
