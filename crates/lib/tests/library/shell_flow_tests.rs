//! End-to-end flows through the real shell executor.

use simrun_lib::exec::ShellExecutor;
use simrun_lib::flow::{FailurePolicy, StageOutcome, clean, run_flow};
use simrun_lib::stage::Stage;

use super::common::Project;

#[tokio::test]
async fn full_flow_leaves_only_harness_output() {
  let project = Project::new();
  let mut executor = ShellExecutor::new();

  let report = run_flow(&project.config(), project.path(), &mut executor, FailurePolicy::Continue)
    .await
    .unwrap();

  assert!(report.is_success(), "unexpected failures: {:?}", report.stages);
  assert!(project.join("waveform.vcd").exists());
  assert!(!project.join("obj_dir").exists());
}

#[tokio::test]
async fn generator_receives_fixed_arguments() {
  let project = Project::new();
  let mut executor = ShellExecutor::new();

  run_flow(&project.config(), project.path(), &mut executor, FailurePolicy::Continue)
    .await
    .unwrap();

  let args = std::fs::read_to_string(project.join("generate.args")).unwrap();
  assert_eq!(
    args.trim(),
    "--assert -I./rtl/ --Wall --trace --cc ./rtl/axis_fifo.sv --exe test/test_axis_fifo.cpp"
  );
}

#[tokio::test]
async fn two_runs_end_in_the_same_state() {
  let project = Project::new();
  let mut executor = ShellExecutor::new();
  let config = project.config();

  for _ in 0..2 {
    let report = run_flow(&config, project.path(), &mut executor, FailurePolicy::Continue)
      .await
      .unwrap();
    assert!(report.is_success());
    assert!(!project.join("obj_dir").exists());
  }
}

#[tokio::test]
async fn failing_generator_still_builds_runs_and_cleans() {
  let project = Project::new();
  let mut config = project.config();
  config.tools.verilator = "false".to_string();
  let mut executor = ShellExecutor::new();

  let report = run_flow(&config, project.path(), &mut executor, FailurePolicy::Continue)
    .await
    .unwrap();

  // Nothing was generated, so every later stage fails too, but each is attempted.
  assert_eq!(report.executed(), 4);
  assert_eq!(
    report.get(Stage::Generate).unwrap().outcome,
    StageOutcome::Exited { code: Some(1) }
  );
  assert!(report.get(Stage::Build).unwrap().outcome.is_failure());
  assert!(report.get(Stage::Run).unwrap().outcome.is_failure());
  assert!(report.get(Stage::Clean).unwrap().outcome.is_failure());
  assert!(!project.join("obj_dir").exists());
}

#[tokio::test]
async fn stop_on_failure_still_removes_build_dir() {
  let project = Project::new();
  let mut config = project.config();
  config.tools.make = "false".to_string();
  let mut executor = ShellExecutor::new();

  let report = run_flow(&config, project.path(), &mut executor, FailurePolicy::StopOnFailure)
    .await
    .unwrap();

  assert_eq!(report.get(Stage::Run).unwrap().outcome, StageOutcome::Skipped);
  assert_eq!(
    report.get(Stage::Clean).unwrap().outcome,
    StageOutcome::Exited { code: Some(0) }
  );
  assert!(!project.join("obj_dir").exists());
  assert!(!project.join("waveform.vcd").exists());
}

#[tokio::test]
async fn clean_removes_leftover_build_dir() {
  let project = Project::new();
  std::fs::create_dir_all(project.join("obj_dir/nested")).unwrap();
  std::fs::write(project.join("obj_dir/nested/Vaxis_fifo.o"), "").unwrap();
  let mut executor = ShellExecutor::new();

  let report = clean(&project.config(), project.path(), &mut executor).await.unwrap();

  assert!(report.is_success());
  assert!(!project.join("obj_dir").exists());
}

#[tokio::test]
async fn clean_with_space_in_build_dir_removes_only_that_dir() {
  let project = Project::new();
  let mut config = project.config();
  config.build_dir = "sim build".to_string();
  std::fs::create_dir_all(project.join("sim build")).unwrap();
  std::fs::write(project.join("sim build/Vaxis_fifo"), "").unwrap();
  std::fs::write(project.join("build"), "unrelated").unwrap();
  let mut executor = ShellExecutor::new();

  let report = clean(&config, project.path(), &mut executor).await.unwrap();

  assert!(report.is_success(), "unexpected failures: {:?}", report.stages);
  assert!(!project.join("sim build").exists());
  assert!(project.join("build").exists());
}

#[tokio::test]
async fn metacharacters_in_config_are_not_interpreted() {
  let project = Project::new();
  let mut config = project.config();
  config.top = "fifo; touch injected".to_string();
  let mut executor = ShellExecutor::new();

  run_flow(&config, project.path(), &mut executor, FailurePolicy::Continue)
    .await
    .unwrap();

  assert!(!project.join("injected").exists());
  assert!(!project.join("obj_dir").exists());
}
