//! Flow orchestration.
//!
//! Runs the four stages strictly in order, waiting for each to exit before
//! starting the next:
//! - exit statuses are recorded, not acted on (unless `StopOnFailure` is chosen)
//! - a stage whose shell cannot be spawned is recorded and the flow moves on
//! - `Clean` runs exactly once per flow, whatever happened before it

pub mod types;

use std::path::Path;
use std::time::Instant;

use tracing::{error, info, warn};

use crate::config::FlowConfig;
use crate::exec::{CommandExecutor, ExecError};
use crate::stage::{Stage, StageCommand};

pub use types::{FailurePolicy, FlowReport, StageOutcome, StageReport};

/// Run the full flow: generate, build, run, clean.
///
/// Only fails before the first stage, when `work_dir` is not a directory.
/// Everything that goes wrong afterwards ends up in the returned report.
pub async fn run_flow<E: CommandExecutor>(
  config: &FlowConfig,
  work_dir: &Path,
  executor: &mut E,
  policy: FailurePolicy,
) -> Result<FlowReport, ExecError> {
  check_work_dir(work_dir)?;
  info!(top = %config.top, work_dir = %work_dir.display(), "starting flow");

  let mut report = FlowReport::new(policy);
  let mut halted = false;

  for command in config.commands() {
    if halted && command.stage != Stage::Clean {
      warn!(stage = %command.stage, "skipping stage after earlier failure");
      report.stages.push(StageReport::skipped(&command));
      continue;
    }

    let stage_report = run_stage(executor, &command, work_dir).await;

    if stage_report.outcome.is_failure() && policy == FailurePolicy::StopOnFailure {
      halted = true;
    }
    report.stages.push(stage_report);
  }

  info!(
    executed = report.executed(),
    failed = report.failures().count(),
    "flow complete"
  );

  Ok(report)
}

/// Run only the clean stage, removing a build directory left behind earlier.
pub async fn clean<E: CommandExecutor>(
  config: &FlowConfig,
  work_dir: &Path,
  executor: &mut E,
) -> Result<FlowReport, ExecError> {
  check_work_dir(work_dir)?;

  let command = config.command(Stage::Clean);
  let mut report = FlowReport::default();
  report.stages.push(run_stage(executor, &command, work_dir).await);
  Ok(report)
}

async fn run_stage<E: CommandExecutor>(executor: &mut E, command: &StageCommand, work_dir: &Path) -> StageReport {
  let start = Instant::now();

  let outcome = match executor.execute(command, work_dir).await {
    Ok(exit) => {
      if !exit.success() {
        warn!(stage = %command.stage, code = ?exit.code, "stage exited with failure");
      }
      StageOutcome::from(exit)
    }
    Err(e) => {
      error!(stage = %command.stage, error = %e, "stage could not be started");
      StageOutcome::SpawnFailed { message: e.to_string() }
    }
  };

  StageReport::new(command, outcome, start.elapsed())
}

fn check_work_dir(work_dir: &Path) -> Result<(), ExecError> {
  if work_dir.is_dir() {
    Ok(())
  } else {
    Err(ExecError::WorkDir(work_dir.to_path_buf()))
  }
}
