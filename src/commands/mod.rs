// src/commands/mod.rs
//! Command handlers for the webpsweep binaries

mod optimize;
mod revert;

pub use optimize::{OptimizeReport, cmd_optimize};
pub use revert::cmd_revert;
