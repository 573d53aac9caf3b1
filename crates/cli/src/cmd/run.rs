//! Implementation of the `simrun run` command (also the default command).
//!
//! Runs generate, build, run and clean in the working directory. Tool output
//! goes straight to the terminal; a summary of the stages is printed afterwards.

use anyhow::{Context, Result, bail};
use tracing::debug;

use simrun_lib::flow::{FailurePolicy, FlowReport, StageOutcome, run_flow};

use super::FlowContext;
use crate::output::{
  OutputFormat, format_duration, format_exit, print_error, print_info, print_json, print_skipped, print_stat,
  print_success, print_warning,
};

/// Execute the run command.
///
/// Without `fail_fast` every stage is attempted and the exit status is 0 no
/// matter how the tools exited. With `fail_fast` the remaining stages are
/// skipped after a failure (clean still runs) and the command fails.
///
/// With JSON output the tools' stdout is sent to stderr so stdout carries only the report.
pub fn cmd_run(ctx: &FlowContext, fail_fast: bool, output: OutputFormat) -> Result<()> {
  let policy = if fail_fast {
    FailurePolicy::StopOnFailure
  } else {
    FailurePolicy::Continue
  };
  debug!(policy = ?policy, "running flow");

  let mut executor = ctx.executor();
  if output.is_json() {
    executor = executor.stdout_to_stderr();
  } else {
    print_info(&format!("Running {} in {}", ctx.config.top, ctx.work_dir.display()));
  }

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let report = rt
    .block_on(run_flow(&ctx.config, &ctx.work_dir, &mut executor, policy))
    .context("Run failed")?;

  if output.is_json() {
    print_json(&report)?;
  } else {
    print_summary(&report);
    print_stat("Duration", &format_duration(report.elapsed()));
  }

  if fail_fast {
    if let Some(failed) = report.failures().next() {
      bail!("Stage '{}' failed: {}", failed.stage, failed.command);
    }
  }

  Ok(())
}

fn print_summary(report: &FlowReport) {
  println!();
  for stage in &report.stages {
    let label = format!("{:<8} {}", stage.stage, stage.command);
    match &stage.outcome {
      StageOutcome::Exited { code: Some(0) } => print_success(&label),
      StageOutcome::Exited { code } => print_warning(&format!("{} ({})", label, format_exit(*code))),
      StageOutcome::SpawnFailed { message } => print_error(&format!("{} ({})", label, message)),
      StageOutcome::Skipped => print_skipped(&format!("{} (skipped)", label)),
    }
  }

  println!();
  println!("Run complete!");
  print_stat("Stages executed", &report.executed().to_string());
  print_stat("Stages failed", &report.failures().count().to_string());
}
