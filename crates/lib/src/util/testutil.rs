//! Test utilities for simrun-lib.
//!
//! [`RecordingExecutor`] stands in for the shell so flow tests can check what
//! would have been executed, and script failures per stage.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::exec::{CommandExecutor, ExecError, ExitOutcome};
use crate::stage::{Stage, StageCommand};

/// A command the recorder was asked to execute.
#[derive(Debug, Clone)]
pub struct RecordedCall {
  pub stage: Stage,
  pub line: String,
  pub work_dir: PathBuf,
}

#[derive(Debug, Clone, Copy)]
enum Scripted {
  Exit(i32),
  SpawnError,
}

/// Executor that records calls instead of running them.
///
/// Every stage exits 0 unless scripted otherwise with [`fail`](Self::fail)
/// or [`spawn_error`](Self::spawn_error).
#[derive(Debug, Default)]
pub struct RecordingExecutor {
  pub calls: Vec<RecordedCall>,
  scripted: HashMap<Stage, Scripted>,
}

impl RecordingExecutor {
  pub fn new() -> Self {
    Self::default()
  }

  /// Make `stage` exit with `code`.
  pub fn fail(mut self, stage: Stage, code: i32) -> Self {
    self.scripted.insert(stage, Scripted::Exit(code));
    self
  }

  /// Make `stage` fail to spawn.
  pub fn spawn_error(mut self, stage: Stage) -> Self {
    self.scripted.insert(stage, Scripted::SpawnError);
    self
  }

  pub fn stages(&self) -> Vec<Stage> {
    self.calls.iter().map(|c| c.stage).collect()
  }

  pub fn lines(&self) -> Vec<String> {
    self.calls.iter().map(|c| c.line.clone()).collect()
  }
}

impl CommandExecutor for RecordingExecutor {
  async fn execute(&mut self, command: &StageCommand, work_dir: &Path) -> Result<ExitOutcome, ExecError> {
    let line = command.command_line();
    self.calls.push(RecordedCall {
      stage: command.stage,
      line: line.clone(),
      work_dir: work_dir.to_path_buf(),
    });

    match self.scripted.get(&command.stage) {
      Some(Scripted::Exit(code)) => Ok(ExitOutcome::from_code(*code)),
      Some(Scripted::SpawnError) => Err(ExecError::Spawn {
        cmd: line,
        source: io::Error::new(io::ErrorKind::NotFound, "shell not found"),
      }),
      None => Ok(ExitOutcome::from_code(0)),
    }
  }
}
