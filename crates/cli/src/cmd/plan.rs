//! Implementation of the `simrun plan` command.
//!
//! Prints the command line of every stage without executing anything.

use anyhow::Result;

use super::FlowContext;
use crate::output::{OutputFormat, print_json, print_stat};

pub fn cmd_plan(ctx: &FlowContext, output: OutputFormat) -> Result<()> {
  let commands = ctx.config.commands();

  if output.is_json() {
    let stages: Vec<_> = commands
      .iter()
      .map(|c| serde_json::json!({ "stage": c.stage, "command": c.command_line() }))
      .collect();
    let json_output = serde_json::json!({ "top": ctx.config.top, "work_dir": ctx.work_dir, "stages": stages });
    print_json(&json_output)?;
  } else {
    println!("Plan: {}", ctx.config.top);
    print_stat("Directory", &ctx.work_dir.display().to_string());
    println!();
    for command in &commands {
      println!("  {:<8} {}", command.stage, command.command_line());
    }
  }

  Ok(())
}
