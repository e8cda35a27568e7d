// src/cli/mod.rs
//! CLI definitions for webpsweep
//!
//! This module contains the command-line interface definitions using clap.
//! There are two independent entry points, each with its own binary:
//! - `webpsweep` - convert images and rewrite references
//! - `webpsweep-revert` - restore backups and optionally sweep converted files
//!
//! The implementations live in the `commands` module.

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

mod optimize;
mod revert;

pub use optimize::OptimizeArgs;
pub use revert::RevertArgs;

/// Log verbosity accepted by `--log-level`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    #[value(alias = "warn")]
    Warning,
    Error,
}

impl LogLevel {
    /// Directive for `EnvFilter`
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over `--log-level` when it is set.
pub fn init_tracing(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_optimize_defaults() {
        let args = OptimizeArgs::try_parse_from(["webpsweep", "site"]).unwrap();
        assert_eq!(args.path, PathBuf::from("site"));
        assert_eq!(args.quality, 80);
        assert_eq!(args.extensions, ".jpg,.jpeg,.png,.gif,.bmp,.tiff");
        assert_eq!(args.include, ".html,.css,.js");
        assert_eq!(args.jobs, 1);
        assert_eq!(args.log_level, LogLevel::Info);
        assert!(!args.dry_run && !args.backup && !args.delete_original);
    }

    #[test]
    fn test_optimize_flags() {
        let args = OptimizeArgs::try_parse_from([
            "webpsweep",
            "site",
            "--dry-run",
            "--quality",
            "85",
            "--delete-original",
            "--backup",
            "--extensions",
            "png",
            "--include",
            ".html",
            "-j",
            "4",
            "--log-level",
            "DEBUG",
        ])
        .unwrap();
        assert!(args.dry_run && args.backup && args.delete_original);
        assert_eq!(args.quality, 85);
        assert_eq!(args.jobs, 4);
        assert_eq!(args.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_negative_quality_parses_for_validation() {
        let args = OptimizeArgs::try_parse_from(["webpsweep", "site", "--quality", "-5"]).unwrap();
        assert_eq!(args.quality, -5);
    }

    #[test]
    fn test_optimize_requires_path() {
        assert!(OptimizeArgs::try_parse_from(["webpsweep"]).is_err());
    }

    #[test]
    fn test_revert_defaults_and_alias() {
        let args = RevertArgs::try_parse_from(["webpsweep-revert", "site"]).unwrap();
        assert!(!args.remove_converted && !args.dry_run);
        assert_eq!(args.extensions, ".html,.css,.js");

        let args =
            RevertArgs::try_parse_from(["webpsweep-revert", "site", "--remove-webp"]).unwrap();
        assert!(args.remove_converted);
    }

    #[test]
    fn test_log_level_warning_alias() {
        let argv = ["webpsweep-revert", "site", "--log-level", "warn"];
        let args = RevertArgs::try_parse_from(argv).unwrap();
        assert_eq!(args.log_level, LogLevel::Warning);
        assert_eq!(args.log_level.as_filter(), "warn");
    }
}
