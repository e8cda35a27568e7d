// src/cli/revert.rs
//! Revert arguments

use super::LogLevel;
use crate::rewrite::DEFAULT_TEXT_EXTENSIONS;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "webpsweep-revert")]
#[command(version)]
#[command(about = "Revert changes made by webpsweep using .bak files", long_about = None)]
pub struct RevertArgs {
    /// Path to root directory to revert
    pub path: PathBuf,

    /// Remove .webp files after reverting
    #[arg(long, visible_alias = "remove-webp")]
    pub remove_converted: bool,

    /// Comma-separated text file extensions to revert
    #[arg(long, default_value = DEFAULT_TEXT_EXTENSIONS)]
    pub extensions: String,

    /// Preview changes without making them
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (RUST_LOG overrides)
    #[arg(long, value_enum, ignore_case = true, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}
