//! simrun-lib: Core types and logic for simrun
//!
//! This crate drives a Verilator simulation flow as four shell stages:
//! - `Generate`: verilate the RTL source together with the C++ harness
//! - `Build`: compile the generated model with make
//! - `Run`: execute the model binary
//! - `Clean`: remove the generated build directory
//!
//! Exit statuses never change the order of the stages, and `Clean` always runs.

pub mod config;
pub mod consts;
pub mod exec;
pub mod flow;
pub mod stage;
pub mod util;
