//! Command execution.
//!
//! The flow never spawns processes itself; it hands each [`StageCommand`] to a
//! [`CommandExecutor`]. [`ShellExecutor`] is the real implementation, tests
//! substitute a recorder.

mod shell;

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::stage::StageCommand;

pub use shell::ShellExecutor;

/// Errors that prevent a command from being started at all.
///
/// A command that starts and exits non-zero is not an error, see [`ExitOutcome`].
#[derive(Debug, Error)]
pub enum ExecError {
  #[error("failed to spawn `{cmd}`: {source}")]
  Spawn {
    cmd: String,
    #[source]
    source: io::Error,
  },

  #[error("working directory does not exist: {0}")]
  WorkDir(PathBuf),
}

/// How a finished command exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
  /// Exit code, `None` if the process was terminated by a signal.
  pub code: Option<i32>,
}

impl ExitOutcome {
  pub fn from_code(code: i32) -> Self {
    Self { code: Some(code) }
  }

  pub fn success(&self) -> bool {
    self.code == Some(0)
  }
}

impl From<std::process::ExitStatus> for ExitOutcome {
  fn from(status: std::process::ExitStatus) -> Self {
    Self { code: status.code() }
  }
}

/// Runs stage commands to completion.
pub trait CommandExecutor {
  /// Run `command` with `work_dir` as its current directory and wait for it to exit.
  fn execute(&mut self, command: &StageCommand, work_dir: &Path) -> impl Future<Output = Result<ExitOutcome, ExecError>>;
}
