// src/commands/revert.rs

//! Revert command - restore `.bak` files and optionally sweep converted images

use crate::cancel::CancelFlag;
use crate::cli::RevertArgs;
use crate::config::RevertConfig;
use crate::observer::Observer;
use crate::revert::{RevertSummary, Reverter};
use anyhow::{Context, Result, bail};
use std::sync::Arc;
use tracing::info;

/// Run the revert tool over `args.path`
///
/// Individual restore or removal failures are logged by the observer and
/// do not make the command fail.
pub fn cmd_revert(
    args: &RevertArgs,
    observer: Arc<dyn Observer>,
    cancel: &CancelFlag,
) -> Result<RevertSummary> {
    let config = RevertConfig::from_args(args).context("Invalid configuration")?;

    info!("Reverting directory: {}", config.root.display());
    if config.options.dry_run {
        info!("DRY RUN MODE - No files will be modified");
    }

    let summary = Reverter::new()
        .with_observer(observer)
        .with_cancel_flag(cancel.clone())
        .revert(&config.root, &config.options)
        .context("Revert failed")?;

    if cancel.is_cancelled() {
        bail!("Interrupted after restoring {} files", summary.restored);
    }

    if config.options.dry_run {
        info!(
            "Would restore {} files and remove {} converted images",
            summary.backups_found, summary.converted_found
        );
    } else {
        info!(
            "Revert complete: {} restored ({} failed), {} converted images removed ({} failed)",
            summary.restored, summary.restore_failures, summary.removed, summary.remove_failures
        );
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::SilentObserver;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_revert_restores_and_sweeps() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("index.html"), "new").unwrap();
        fs::write(root.join("index.html.bak"), "old").unwrap();
        fs::write(root.join("photo.webp"), "webp").unwrap();

        let args = RevertArgs::try_parse_from([
            "webpsweep-revert".to_string(),
            root.display().to_string(),
            "--remove-webp".to_string(),
        ])
        .unwrap();
        let summary = cmd_revert(&args, Arc::new(SilentObserver), &CancelFlag::new()).unwrap();

        assert_eq!(summary.restored, 1);
        assert_eq!(summary.removed, 1);
        assert_eq!(fs::read_to_string(root.join("index.html")).unwrap(), "old");
        assert!(!root.join("photo.webp").exists());
    }

    #[test]
    fn test_revert_missing_root_fails() {
        let temp_dir = TempDir::new().unwrap();
        let args = RevertArgs::try_parse_from([
            "webpsweep-revert".to_string(),
            temp_dir.path().join("missing").display().to_string(),
        ])
        .unwrap();
        assert!(cmd_revert(&args, Arc::new(SilentObserver), &CancelFlag::new()).is_err());
    }
}
