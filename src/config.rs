// src/config.rs

//! Validated run configuration
//!
//! Raw CLI arguments are turned into typed options here, once, before any
//! file is touched. Every precondition failure surfaces as an [`Error`].

use crate::cli::{OptimizeArgs, RevertArgs};
use crate::convert::ConvertOptions;
use crate::error::{Error, Result};
use crate::extensions::ExtensionSet;
use crate::filesystem::guard_root;
use crate::revert::{DEFAULT_CONVERTED_EXTENSION, RevertOptions};
use crate::rewrite::RewriteOptions;
use std::path::PathBuf;

/// Everything an optimizer run needs
#[derive(Debug, Clone)]
pub struct OptimizeConfig {
    /// Absolute, guarded root directory
    pub root: PathBuf,
    pub convert: ConvertOptions,
    pub rewrite: RewriteOptions,
}

impl OptimizeConfig {
    /// Validate arguments in order: root, quality, image list, text list, jobs
    pub fn from_args(args: &OptimizeArgs) -> Result<Self> {
        let root = guard_root(&args.path)?;

        let quality = u8::try_from(args.quality)
            .ok()
            .filter(|q| *q <= 100)
            .ok_or(Error::InvalidQuality(args.quality))?;

        let image_extensions =
            ExtensionSet::parse_list(&args.extensions).require_non_empty("image")?;
        let text_extensions = ExtensionSet::parse_list(&args.include).require_non_empty("text")?;

        if args.jobs == 0 {
            return Err(Error::InvalidJobs);
        }

        Ok(Self {
            root,
            convert: ConvertOptions {
                extensions: image_extensions,
                quality,
                dry_run: args.dry_run,
                delete_original: args.delete_original,
                jobs: args.jobs,
            },
            rewrite: RewriteOptions {
                text_extensions,
                dry_run: args.dry_run,
                backup: args.backup,
            },
        })
    }
}

/// Everything a revert run needs
#[derive(Debug, Clone)]
pub struct RevertConfig {
    pub root: PathBuf,
    pub options: RevertOptions,
}

impl RevertConfig {
    /// An empty extension list is allowed and simply restores nothing
    pub fn from_args(args: &RevertArgs) -> Result<Self> {
        let root = guard_root(&args.path)?;

        Ok(Self {
            root,
            options: RevertOptions {
                text_extensions: ExtensionSet::parse_list(&args.extensions),
                remove_converted: args.remove_converted,
                dry_run: args.dry_run,
                converted_extensions: ExtensionSet::parse_list(DEFAULT_CONVERTED_EXTENSION),
            },
        })
    }
}
