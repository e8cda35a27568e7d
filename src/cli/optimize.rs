// src/cli/optimize.rs
//! Optimizer arguments

use super::LogLevel;
use crate::convert::DEFAULT_IMAGE_EXTENSIONS;
use crate::rewrite::DEFAULT_TEXT_EXTENSIONS;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "webpsweep")]
#[command(version)]
#[command(
    about = "Recursively convert site images to WebP and replace references in HTML/CSS/JS",
    long_about = None
)]
pub struct OptimizeArgs {
    /// Path to root directory to process
    pub path: PathBuf,

    /// Preview changes without making them
    #[arg(long)]
    pub dry_run: bool,

    /// WebP quality 0-100
    #[arg(long, default_value_t = 80, allow_negative_numbers = true)]
    pub quality: i64,

    /// Delete original images after conversion
    #[arg(long)]
    pub delete_original: bool,

    /// Create .bak files before modifying text files
    #[arg(long)]
    pub backup: bool,

    /// Comma-separated image extensions
    #[arg(long, default_value = DEFAULT_IMAGE_EXTENSIONS)]
    pub extensions: String,

    /// Comma-separated text file extensions to update
    #[arg(long, default_value = DEFAULT_TEXT_EXTENSIONS)]
    pub include: String,

    /// Number of parallel image encoders
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,

    /// Logging level (RUST_LOG overrides)
    #[arg(long, value_enum, ignore_case = true, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}
