//! CLI output formatting utilities.
//!
//! Provides consistent formatting for terminal output: colored status messages,
//! build banners, human-readable durations and Unicode symbols.

use std::time::Duration;

use owo_colors::{OwoColorize, Stream};

use extmake_lib::{BuildEvent, BuildObserver};

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
}

const BANNER_WIDTH: usize = 60;

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 60 {
    let mins = secs / 60;
    let remaining_secs = secs % 60;
    format!("{}m {}s", mins, remaining_secs)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else {
    format!("{}ms", millis)
  }
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_banner(title: &str) {
  let rule = "-".repeat(BANNER_WIDTH);
  println!();
  println!("{}", rule.if_supports_color(Stream::Stdout, |s| s.dimmed()));
  println!("{}", title.if_supports_color(Stream::Stdout, |s| s.bold()));
  println!("{}", rule.if_supports_color(Stream::Stdout, |s| s.dimmed()));
}

/// Renders build progress to stdout as it happens.
#[derive(Debug, Default)]
pub struct TerminalObserver;

impl BuildObserver for TerminalObserver {
  fn on_event(&mut self, event: &BuildEvent) {
    match event {
      BuildEvent::Cleaned { build_dir } => print_info(&format!("Cleaned {}", build_dir.display())),
      BuildEvent::TaskStarted { task } => print_banner(&format!("Building: {}", task)),
      BuildEvent::ModuleBuilding { module } => print_banner(&format!("Building module: {}", module.display())),
      BuildEvent::Step(step) => println!(
        "{} {}",
        symbols::ARROW.if_supports_color(Stream::Stdout, |s| s.cyan()),
        step
      ),
      BuildEvent::BuildSucceeded { .. } => println!(),
    }
  }
}
