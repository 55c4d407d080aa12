//! Include/exclude pattern sets.
//!
//! Patterns are globs; a leading `!` turns a pattern into a negation. A set
//! made only of negations selects everything those negations do not match,
//! so `["!Tests"]` means "every entry except `Tests`".
//!
//! Filters added with [`PatternSet::exclude`] only narrow a selection. They
//! never select anything on their own.

use glob::{MatchOptions, Pattern};

use super::CopyError;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
  case_sensitive: true,
  require_literal_separator: true,
  require_literal_leading_dot: false,
};

#[derive(Debug, Clone, Default)]
pub struct PatternSet {
  include: Vec<Pattern>,
  negated: Vec<Pattern>,
  filter: Vec<Pattern>,
}

impl PatternSet {
  pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, CopyError> {
    let mut set = Self::default();
    for raw in patterns {
      let raw = raw.as_ref().trim();
      if raw.is_empty() {
        continue;
      }
      match raw.strip_prefix('!') {
        Some(negated) => set.negated.push(compile(negated)?),
        None => set.include.push(compile(raw)?),
      }
    }
    Ok(set)
  }

  /// Remove matches of `patterns` from whatever the set selects.
  pub fn exclude<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self, CopyError> {
    for raw in patterns {
      let raw = raw.as_ref().trim();
      if !raw.is_empty() {
        self.filter.push(compile(raw.strip_prefix('!').unwrap_or(raw))?);
      }
    }
    Ok(self)
  }

  /// True when the set can select nothing.
  pub fn is_empty(&self) -> bool {
    self.include.is_empty() && self.negated.is_empty()
  }

  /// Whether `candidate` (a base name or a `/`-separated relative path) is selected.
  pub fn matches(&self, candidate: &str) -> bool {
    let included = if self.include.is_empty() {
      !self.negated.is_empty()
    } else {
      self.include.iter().any(|p| p.matches_with(candidate, MATCH_OPTIONS))
    };
    included && !self.is_excluded(candidate)
  }

  pub fn is_excluded(&self, candidate: &str) -> bool {
    self
      .negated
      .iter()
      .chain(&self.filter)
      .any(|p| p.matches_with(candidate, MATCH_OPTIONS))
  }
}

fn compile(raw: &str) -> Result<Pattern, CopyError> {
  Pattern::new(raw).map_err(|source| CopyError::InvalidPattern {
    pattern: raw.to_string(),
    source,
  })
}
