//! Shell-backed command execution.
//!
//! Each stage's command line is passed to the platform shell, so tool lookup,
//! quoting and "command not found" behave exactly as they would from a terminal.
//! Standard streams and the environment are inherited from simrun, except that
//! child stdout can be moved to stderr to keep simrun's own stdout machine-readable.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use super::{CommandExecutor, ExecError, ExitOutcome};
use crate::stage::StageCommand;

/// Executes commands through `/bin/sh -c` (Unix) or PowerShell (Windows).
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor {
  shell: Option<String>,
  stdout_to_stderr: bool,
}

impl ShellExecutor {
  pub fn new() -> Self {
    Self::default()
  }

  /// Use a specific shell instead of the platform default.
  pub fn shell(mut self, shell: impl Into<String>) -> Self {
    self.shell = Some(shell.into());
    self
  }

  /// Send the tools' stdout to simrun's stderr.
  pub fn stdout_to_stderr(mut self) -> Self {
    self.stdout_to_stderr = true;
    self
  }
}

impl CommandExecutor for ShellExecutor {
  async fn execute(&mut self, command: &StageCommand, work_dir: &Path) -> Result<ExitOutcome, ExecError> {
    let line = command.command_line();
    info!(stage = %command.stage, cmd = %line, "executing command");

    let (shell_cmd, shell_args) = get_shell(self.shell.as_deref());
    debug!(shell = %shell_cmd, working_dir = ?work_dir, "spawning process");

    let mut process = Command::new(&shell_cmd);
    process.args(&shell_args).arg(&line).current_dir(work_dir);
    if self.stdout_to_stderr {
      process.stdout(Stdio::from(std::io::stderr()));
    }

    let status = process
      .status()
      .await
      .map_err(|source| ExecError::Spawn { cmd: line.clone(), source })?;

    Ok(ExitOutcome::from(status))
  }
}

/// Get the shell command and arguments for the current platform.
///
/// Returns `(shell_command, shell_arguments)`; the command line is appended
/// as the final argument.
fn get_shell(override_shell: Option<&str>) -> (String, Vec<String>) {
  if let Some(shell) = override_shell {
    let args = if shell.contains("powershell") || shell.contains("pwsh") {
      vec!["-NoProfile".to_string(), "-Command".to_string()]
    } else if shell.contains("cmd") {
      vec!["/C".to_string()]
    } else {
      vec!["-c".to_string()]
    };
    return (shell.to_string(), args);
  }

  #[cfg(unix)]
  {
    ("/bin/sh".to_string(), vec!["-c".to_string()])
  }

  #[cfg(windows)]
  {
    (
      "powershell.exe".to_string(),
      vec![
        "-NoProfile".to_string(),
        "-ExecutionPolicy".to_string(),
        "Bypass".to_string(),
        "-Command".to_string(),
      ],
    )
  }
}
