//! Types describing how a flow ran.
//!
//! This module defines the failure policy that controls whether later stages
//! still run after a failure, and the per-stage report returned by a run.

use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::exec::ExitOutcome;
use crate::stage::{Stage, StageCommand};

/// What to do after a stage fails.
///
/// [`Stage::Clean`] always runs regardless of the policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
  /// Ignore exit statuses and attempt every stage.
  #[default]
  Continue,
  /// Skip the remaining stages (except clean) after the first failure.
  StopOnFailure,
}

/// How a single stage ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageOutcome {
  /// The command ran and exited (possibly non-zero).
  Exited { code: Option<i32> },
  /// The shell could not be started for this stage.
  SpawnFailed { message: String },
  /// Not attempted because an earlier stage failed under [`FailurePolicy::StopOnFailure`].
  Skipped,
}

impl StageOutcome {
  /// True for a non-zero exit or a spawn failure. Skipped stages are not failures.
  pub fn is_failure(&self) -> bool {
    match self {
      StageOutcome::Exited { code } => *code != Some(0),
      StageOutcome::SpawnFailed { .. } => true,
      StageOutcome::Skipped => false,
    }
  }
}

impl From<ExitOutcome> for StageOutcome {
  fn from(outcome: ExitOutcome) -> Self {
    StageOutcome::Exited { code: outcome.code }
  }
}

/// Record of one stage.
#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
  pub stage: Stage,
  /// The rendered command line.
  pub command: String,
  #[serde(flatten)]
  pub outcome: StageOutcome,
  #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
  pub elapsed: Duration,
}

impl StageReport {
  pub fn new(command: &StageCommand, outcome: StageOutcome, elapsed: Duration) -> Self {
    Self {
      stage: command.stage,
      command: command.command_line(),
      outcome,
      elapsed,
    }
  }

  pub fn skipped(command: &StageCommand) -> Self {
    Self::new(command, StageOutcome::Skipped, Duration::ZERO)
  }
}

/// Result of running a flow.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FlowReport {
  pub policy: FailurePolicy,
  pub stages: Vec<StageReport>,
}

impl FlowReport {
  pub fn new(policy: FailurePolicy) -> Self {
    Self {
      policy,
      stages: Vec::new(),
    }
  }

  /// Returns true if no stage failed.
  pub fn is_success(&self) -> bool {
    self.failures().next().is_none()
  }

  /// Stages that exited non-zero or could not be spawned.
  pub fn failures(&self) -> impl Iterator<Item = &StageReport> {
    self.stages.iter().filter(|s| s.outcome.is_failure())
  }

  /// Number of stages that were actually executed.
  pub fn executed(&self) -> usize {
    self
      .stages
      .iter()
      .filter(|s| !matches!(s.outcome, StageOutcome::Skipped))
      .count()
  }

  pub fn get(&self, stage: Stage) -> Option<&StageReport> {
    self.stages.iter().find(|s| s.stage == stage)
  }

  /// Total time spent in executed stages.
  pub fn elapsed(&self) -> Duration {
    self.stages.iter().map(|s| s.elapsed).sum()
  }
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
  serializer.serialize_u64(duration.as_millis() as u64)
}
