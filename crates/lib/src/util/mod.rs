//! Shared utilities.
//!
//! Test helpers for driving the flow without a real toolchain.

#[cfg(test)]
pub mod testutil;
