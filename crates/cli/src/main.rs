mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use extmake_lib::{Command, Layout};

use crate::output::print_error;

/// Assemble multi-task extension packages into a build directory.
#[derive(Parser)]
#[command(name = "extmake")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
  #[arg(short, long, action = ArgAction::Count, global = true)]
  verbose: u8,

  /// Project root containing make-options.json
  #[arg(long, default_value = ".")]
  root: PathBuf,

  /// Command to run: clean or build
  #[arg(value_name = "COMMAND")]
  command: String,
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  match run(&cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}

fn run(cli: &Cli) -> Result<()> {
  let command: Command = cli.command.parse()?;
  let layout = Layout::new(&cli.root);

  match command {
    Command::Clean => cmd::cmd_clean(layout),
    Command::Build => cmd::cmd_build(layout),
  }
}

fn init_tracing(verbose: u8) {
  let default = match verbose {
    0 => "warn",
    1 => "info",
    _ => "debug",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}
