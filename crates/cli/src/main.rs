mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{BuildArgs, Outcome, cmd_build, cmd_plan};
use output::{OutputFormat, print_error};

/// portsmith - Build ports into installable binary packages
#[derive(Parser)]
#[command(name = "portsmith")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Root directory holding ports/, packages/, installed/ and triplets/
  /// (overrides PORTSMITH_ROOT)
  #[arg(long, global = true)]
  root: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build one package; its dependencies must already be installed
  Build {
    /// Package spec, `name` or `name:triplet`
    spec: String,

    /// Only run the post-build checks against the existing package
    #[arg(long)]
    checks_only: bool,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,
  },

  /// Show the install plan for one or more packages
  Plan {
    /// Package specs, `name` or `name:triplet`
    #[arg(required = true)]
    specs: Vec<String>,

    /// Print the plan as JSON
    #[arg(long)]
    json: bool,
  },
}

fn output_format(json: bool) -> OutputFormat {
  if json { OutputFormat::Json } else { OutputFormat::Text }
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let root = cli.root.as_deref();
  let result = match &cli.command {
    Commands::Build {
      spec,
      checks_only,
      json,
    } => cmd_build(&BuildArgs {
      spec,
      checks_only: *checks_only,
      root,
      output: output_format(*json),
    }),
    Commands::Plan { specs, json } => cmd_plan(specs, root, output_format(*json)),
  };

  match result {
    Ok(Outcome::Success) => ExitCode::SUCCESS,
    Ok(Outcome::Failure) => ExitCode::FAILURE,
    Err(e) => {
      print_error(&format!("Error: {:#}", e));
      ExitCode::FAILURE
    }
  }
}
