use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;
mod output;

use cmd::{FlowContext, cmd_clean, cmd_plan, cmd_run};
use output::OutputFormat;

/// simrun - Verilator generate, build, run and clean driver
#[derive(Parser)]
#[command(name = "simrun")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Directory to run in (default: current directory)
  #[arg(short = 'C', long = "dir", global = true)]
  dir: Option<PathBuf>,

  /// Config file (default: simrun.toml in the run directory, if present)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  /// Runs the full flow when omitted
  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Generate the model, build it, run it and remove the build directory
  Run {
    /// Skip to clean after the first failing stage and exit non-zero
    #[arg(long)]
    fail_fast: bool,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Show the commands a run would execute, without executing them
  Plan {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Remove the build directory
  Clean,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let ctx = FlowContext::resolve(cli.dir.as_deref(), cli.config.as_deref())?;

  match cli.command.unwrap_or(Commands::Run {
    fail_fast: false,
    output: OutputFormat::Text,
  }) {
    Commands::Run { fail_fast, output } => cmd_run(&ctx, fail_fast, output),
    Commands::Plan { output } => cmd_plan(&ctx, output),
    Commands::Clean => cmd_clean(&ctx),
  }
}
