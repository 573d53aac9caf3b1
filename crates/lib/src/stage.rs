//! The four stages of a simulation flow and the commands they run.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

use crate::config::FlowConfig;

/// One step of the flow. Stages always execute in the order of [`Stage::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
  /// Verilate the RTL source and harness into a C++ model.
  Generate,
  /// Compile the generated model.
  Build,
  /// Execute the model binary.
  Run,
  /// Remove the build directory.
  Clean,
}

impl Stage {
  pub const ALL: [Stage; 4] = [Stage::Generate, Stage::Build, Stage::Run, Stage::Clean];

  pub fn as_str(self) -> &'static str {
    match self {
      Stage::Generate => "generate",
      Stage::Build => "build",
      Stage::Run => "run",
      Stage::Clean => "clean",
    }
  }
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.pad(self.as_str())
  }
}

/// A fully rendered command for one stage.
///
/// Arguments are kept separate for inspection, but execution goes through the
/// shell with [`StageCommand::command_line`], the way `system(3)` would run it.
/// Every word is shell-quoted there, so config values are never split or expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageCommand {
  pub stage: Stage,
  pub program: String,
  pub args: Vec<String>,
}

impl StageCommand {
  pub fn new(stage: Stage, program: impl Into<String>) -> Self {
    Self {
      stage,
      program: program.into(),
      args: Vec::new(),
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  /// Program and arguments, each shell-quoted where needed, joined by single spaces.
  ///
  /// Plain words such as `-I./rtl/` are left as they are.
  pub fn command_line(&self) -> String {
    let mut line = quote_word(&self.program).into_owned();
    for arg in &self.args {
      line.push(' ');
      line.push_str(&quote_word(arg));
    }
    line
  }
}

/// Quote one word for a POSIX shell.
///
/// `try_quote` only refuses words containing a nul byte. Those are passed through
/// unchanged: the process API rejects nul bytes, so the stage fails to spawn
/// instead of reaching the shell.
fn quote_word(word: &str) -> Cow<'_, str> {
  shlex::try_quote(word).unwrap_or(Cow::Borrowed(word))
}

impl fmt::Display for StageCommand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.command_line())
  }
}

impl FlowConfig {
  /// Render the command for a single stage.
  pub fn command(&self, stage: Stage) -> StageCommand {
    match stage {
      Stage::Generate => {
        let mut cmd = StageCommand::new(stage, &self.tools.verilator);
        if self.verilator.assert {
          cmd = cmd.arg("--assert");
        }
        cmd = cmd.arg(format!("-I{}", self.rtl_dir));
        if self.verilator.warnings {
          cmd = cmd.arg("--Wall");
        }
        if self.verilator.trace {
          cmd = cmd.arg("--trace");
        }
        cmd
          .arg("--cc")
          .arg(self.source_path())
          .arg("--exe")
          .arg(self.harness_path())
      }
      Stage::Build => StageCommand::new(stage, &self.tools.make)
        .arg("-C")
        .arg(&self.build_dir)
        .arg("-f")
        .arg(self.makefile()),
      Stage::Run => StageCommand::new(stage, self.executable()),
      Stage::Clean => StageCommand::new(stage, "rm")
        .arg("-r")
        .arg(self.build_dir_path()),
    }
  }

  /// Commands for every stage, in execution order.
  pub fn commands(&self) -> Vec<StageCommand> {
    Stage::ALL.iter().map(|&stage| self.command(stage)).collect()
  }
}
