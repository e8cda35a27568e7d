// src/lib.rs

//! webpsweep - static site image optimizer
//!
//! Converts raster images under a directory tree to WebP and rewrites the
//! references to them in HTML, CSS and JavaScript files. Every text change
//! can be backed up and undone later with the revert tool.
//!
//! # Architecture
//!
//! - Idempotent: an image whose converted sibling is at least as new is skipped
//! - Per-file isolation: one bad image or unreadable file never aborts a run
//! - Atomic writes: converted images, rewritten text and restores go through
//!   write-then-rename
//! - Observable: components report through an injected [`Observer`] instead
//!   of logging directly

pub mod cancel;
pub mod cli;
pub mod codec;
pub mod commands;
pub mod config;
pub mod convert;
mod error;
pub mod extensions;
pub mod filesystem;
pub mod observer;
pub mod revert;
pub mod rewrite;

pub use cancel::CancelFlag;
pub use codec::{ImageCodec, WebpCodec};
pub use config::{OptimizeConfig, RevertConfig};
pub use convert::{ConversionEntry, ConversionMap, ConvertOptions, ImageConverter};
pub use error::{Error, Result};
pub use extensions::ExtensionSet;
pub use observer::{CallbackObserver, Event, LogObserver, Observer, Phase, SilentObserver};
pub use revert::{BackupRecord, RevertOptions, RevertSummary, Reverter, find_backups};
pub use rewrite::{BasenameIndex, ReferenceRewriter, RewriteOptions, RewriteSummary, rewrite_text};
