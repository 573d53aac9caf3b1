//! Implementation of the `simrun clean` command.

use anyhow::{Context, Result};

use simrun_lib::flow::{StageOutcome, clean};

use super::FlowContext;
use crate::output::{format_exit, print_error, print_success, print_warning};

/// Remove the build directory. Like the clean stage of a run, a failing
/// `rm` is reported but does not fail the command.
pub fn cmd_clean(ctx: &FlowContext) -> Result<()> {
  let mut executor = ctx.executor();

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let report = rt
    .block_on(clean(&ctx.config, &ctx.work_dir, &mut executor))
    .context("Clean failed")?;

  for stage in &report.stages {
    match &stage.outcome {
      StageOutcome::Exited { code: Some(0) } => {
        print_success(&format!("Clean complete! Removed {}", ctx.config.build_dir))
      }
      StageOutcome::Exited { code } => print_warning(&format!("{} ({})", stage.command, format_exit(*code))),
      StageOutcome::SpawnFailed { message } => print_error(&format!("{} ({})", stage.command, message)),
      StageOutcome::Skipped => {}
    }
  }

  Ok(())
}
