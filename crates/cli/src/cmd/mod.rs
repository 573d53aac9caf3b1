mod clean;
mod plan;
mod run;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use simrun_lib::config::FlowConfig;
use simrun_lib::exec::ShellExecutor;

pub use clean::cmd_clean;
pub use plan::cmd_plan;
pub use run::cmd_run;

/// Working directory and configuration shared by every command.
pub struct FlowContext {
  pub work_dir: PathBuf,
  pub config: FlowConfig,
}

impl FlowContext {
  /// Resolve `--dir` (default: current directory) and load the config for it.
  pub fn resolve(dir: Option<&Path>, config: Option<&Path>) -> Result<Self> {
    let work_dir = match dir {
      Some(dir) => {
        dunce::canonicalize(dir).with_context(|| format!("Failed to resolve run directory: {}", dir.display()))?
      }
      None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    let config = FlowConfig::resolve(config, &work_dir).context("Failed to load config")?;

    Ok(Self { work_dir, config })
  }

  /// Shell executor honouring the configured `shell`.
  pub fn executor(&self) -> ShellExecutor {
    match &self.config.shell {
      Some(shell) => ShellExecutor::new().shell(shell),
      None => ShellExecutor::new(),
    }
  }
}
