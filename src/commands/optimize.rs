// src/commands/optimize.rs

//! Optimize command - convert images, then rewrite references to them
//!
//! The rewrite only runs when at least one image made it into the
//! conversion map. An interrupted conversion stops here without touching
//! any text file, since a partial map would leave references half-updated.
//! An interrupted rewrite keeps the files already written and fails.

use crate::cancel::CancelFlag;
use crate::cli::OptimizeArgs;
use crate::codec::WebpCodec;
use crate::config::OptimizeConfig;
use crate::convert::{ConversionMap, ImageConverter};
use crate::observer::Observer;
use crate::rewrite::{ReferenceRewriter, RewriteSummary};
use anyhow::{Context, Result, bail};
use std::sync::Arc;
use tracing::info;

/// What an optimizer run did
#[derive(Debug, Clone, Default)]
pub struct OptimizeReport {
    pub conversions: ConversionMap,
    pub rewrite: RewriteSummary,
}

/// Run the optimizer over `args.path`
pub fn cmd_optimize(
    args: &OptimizeArgs,
    observer: Arc<dyn Observer>,
    cancel: &CancelFlag,
) -> Result<OptimizeReport> {
    let config = OptimizeConfig::from_args(args).context("Invalid configuration")?;

    info!("Processing directory: {}", config.root.display());
    if config.convert.dry_run {
        info!("DRY RUN MODE - No files will be modified");
    }

    let converter = ImageConverter::new(Arc::new(WebpCodec::new()))
        .with_observer(observer.clone())
        .with_cancel_flag(cancel.clone());
    let conversions = converter
        .convert(&config.root, &config.convert)
        .context("Image conversion failed")?;

    if cancel.is_cancelled() {
        bail!(
            "Interrupted after {} images; references were not updated",
            conversions.len()
        );
    }

    if conversions.is_empty() {
        info!("No images were converted");
        return Ok(OptimizeReport::default());
    }

    let rewriter = ReferenceRewriter::new()
        .with_observer(observer)
        .with_cancel_flag(cancel.clone());
    let rewrite = rewriter
        .rewrite(&config.root, &conversions, &config.rewrite)
        .context("Reference rewrite failed")?;

    if cancel.is_cancelled() {
        bail!(
            "Interrupted after updating {} of {} text files",
            rewrite.files_updated,
            rewrite.files_scanned
        );
    }

    info!(
        "Processing complete: {} images, {} of {} text files updated",
        conversions.len(),
        rewrite.files_updated,
        rewrite.files_scanned
    );

    Ok(OptimizeReport {
        conversions,
        rewrite,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::{CallbackObserver, Event, Phase, SilentObserver};
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_invalid_quality_fails_before_work() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("index.html"), "<img src=\"a.png\">").unwrap();
        let args = OptimizeArgs::try_parse_from([
            "webpsweep".to_string(),
            temp_dir.path().display().to_string(),
            "--quality".to_string(),
            "101".to_string(),
        ])
        .unwrap();

        let err = cmd_optimize(&args, Arc::new(SilentObserver), &CancelFlag::new()).unwrap_err();
        assert!(format!("{:#}", err).contains("Quality must be between 0 and 100"));
    }

    #[test]
    fn test_no_images_is_success() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("index.html"), "<p>text only</p>").unwrap();
        let args = OptimizeArgs::try_parse_from([
            "webpsweep".to_string(),
            temp_dir.path().display().to_string(),
        ])
        .unwrap();

        let report = cmd_optimize(&args, Arc::new(SilentObserver), &CancelFlag::new()).unwrap();
        assert!(report.conversions.is_empty());
        assert_eq!(report.rewrite.files_scanned, 0);
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("index.html")).unwrap(),
            "<p>text only</p>"
        );
    }

    #[test]
    fn test_interrupt_during_rewrite_fails() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        image::RgbImage::from_pixel(4, 4, image::Rgb([1, 2, 3]))
            .save(root.join("a.png"))
            .unwrap();
        fs::write(root.join("index.html"), "<img src=\"a.png\">").unwrap();
        let args = OptimizeArgs::try_parse_from([
            "webpsweep".to_string(),
            root.display().to_string(),
        ])
        .unwrap();

        // Simulate Ctrl-C as soon as the rewrite phase starts
        let cancel = CancelFlag::new();
        let trigger = cancel.clone();
        let observer = Arc::new(CallbackObserver::new(move |event| {
            if let Event::Discovered {
                phase: Phase::Rewrite,
                ..
            } = event
            {
                trigger.cancel();
            }
        }));

        let err = cmd_optimize(&args, observer, &cancel).unwrap_err();

        assert!(err.to_string().contains("Interrupted"));
        assert!(root.join("a.webp").exists());
        assert_eq!(
            fs::read_to_string(root.join("index.html")).unwrap(),
            "<img src=\"a.png\">"
        );
    }
}
