// src/observer.rs

//! Event reporting for conversion, rewrite and revert passes
//!
//! Components never log per-file outcomes themselves. They emit [`Event`]s
//! to an injected [`Observer`], and the observer decides what to do with
//! them. Implementations:
//! - `LogObserver`: maps events to `tracing` at a level matching severity
//! - `SilentObserver`: no-op, the default for library use
//! - `CallbackObserver`: forwards events to a closure (tests, embedders)
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use webpsweep::observer::{CallbackObserver, Event};
//!
//! let observer = Arc::new(CallbackObserver::new(|event| {
//!     if let Event::Converted { original, .. } = event {
//!         println!("done: {}", original.display());
//!     }
//! }));
//! ```

use std::fmt;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// Which pass an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Image discovery and encoding
    Convert,
    /// Reference rewriting in text files
    Rewrite,
    /// Restoring text files from backups
    Restore,
    /// Sweeping converted images
    RemoveConverted,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Convert => "conversion",
            Phase::Rewrite => "reference rewrite",
            Phase::Restore => "restore",
            Phase::RemoveConverted => "converted-file removal",
        };
        f.write_str(name)
    }
}

/// Something that happened during a pass
///
/// `Would*` variants are emitted in dry-run mode instead of the action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Candidates found for a phase
    Discovered { phase: Phase, count: usize },
    /// Phase had nothing to do
    NothingToDo { phase: Phase },
    /// Phase finished; `count` is the number of successful items
    Completed { phase: Phase, count: usize },
    /// Phase stopped early on request
    Cancelled { phase: Phase },

    /// Converted file exists and is not older than its source
    UpToDate { original: PathBuf, converted: PathBuf },
    WouldConvert { original: PathBuf, converted: PathBuf },
    Converting { original: PathBuf, converted: PathBuf },
    Converted { original: PathBuf, converted: PathBuf },
    ConvertFailed { original: PathBuf, reason: String },
    OriginalDeleted { path: PathBuf },
    DeleteFailed { path: PathBuf, reason: String },

    /// Text file could not be read or is not UTF-8
    Unreadable { path: PathBuf, reason: String },
    WouldUpdate { path: PathBuf },
    Updated { path: PathBuf },
    BackupFailed { path: PathBuf, reason: String },
    WriteFailed { path: PathBuf, reason: String },

    WouldRestore { backup: PathBuf, original: PathBuf },
    Restored { original: PathBuf },
    RestoreFailed { original: PathBuf, reason: String },
    WouldRemove { path: PathBuf },
    Removed { path: PathBuf },
    RemoveFailed { path: PathBuf, reason: String },
}

/// Receiver for [`Event`]s
///
/// Implementations must be thread-safe: image encoding may run on a worker
/// pool and report from several threads.
pub trait Observer: Send + Sync {
    fn on_event(&self, event: Event);
}

/// Silent observer (no-op)
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl Observer for SilentObserver {
    fn on_event(&self, _event: Event) {}
}

/// Logging observer
///
/// Planned and performed actions go to info, skips to debug, per-item
/// failures to warn or error.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn on_event(&self, event: Event) {
        match event {
            Event::Discovered { phase, count } => info!("Found {} files for {}", count, phase),
            Event::NothingToDo { phase } => info!("Nothing to do for {}", phase),
            Event::Completed { phase, count } => {
                info!("{} complete, {} files processed", capitalize(&phase), count)
            }
            Event::Cancelled { phase } => warn!("{} cancelled", capitalize(&phase)),

            Event::UpToDate { converted, .. } => {
                debug!("Existing output up to date: {}", converted.display())
            }
            Event::WouldConvert { original, converted } => info!(
                "[DRY RUN] Would convert: {} -> {}",
                original.display(),
                converted.display()
            ),
            Event::Converting { original, converted } => {
                info!("Converting: {} -> {}", original.display(), converted.display())
            }
            Event::Converted { converted, .. } => debug!("Wrote {}", converted.display()),
            Event::ConvertFailed { original, reason } => {
                warn!("Conversion failed for {}: {}", original.display(), reason)
            }
            Event::OriginalDeleted { path } => debug!("Deleted original {}", path.display()),
            Event::DeleteFailed { path, reason } => {
                warn!("Failed to delete original {}: {}", path.display(), reason)
            }

            Event::Unreadable { path, reason } => {
                debug!("Could not read file {}: {}", path.display(), reason)
            }
            Event::WouldUpdate { path } => {
                info!("[DRY RUN] Would update references in {}", path.display())
            }
            Event::Updated { path } => info!("Updated references in {}", path.display()),
            Event::BackupFailed { path, reason } => {
                warn!("Could not create backup for {}: {}", path.display(), reason)
            }
            Event::WriteFailed { path, reason } => {
                error!("Could not write to {}: {}", path.display(), reason)
            }

            Event::WouldRestore { backup, original } => info!(
                "[DRY RUN] Would restore: {} -> {}",
                backup.display(),
                original.display()
            ),
            Event::Restored { original } => info!("Restored: {}", original.display()),
            Event::RestoreFailed { original, reason } => {
                error!("Failed to restore {}: {}", original.display(), reason)
            }
            Event::WouldRemove { path } => info!("[DRY RUN] Would remove: {}", path.display()),
            Event::Removed { path } => info!("Removed: {}", path.display()),
            Event::RemoveFailed { path, reason } => {
                error!("Failed to remove {}: {}", path.display(), reason)
            }
        }
    }
}

fn capitalize(phase: &Phase) -> String {
    let name = phase.to_string();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => name,
    }
}

/// Callback-based observer
///
/// Calls a user-provided function for every event.
pub struct CallbackObserver<F>
where
    F: Fn(Event) + Send + Sync,
{
    callback: F,
}

impl<F> CallbackObserver<F>
where
    F: Fn(Event) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> Observer for CallbackObserver<F>
where
    F: Fn(Event) + Send + Sync,
{
    fn on_event(&self, event: Event) {
        (self.callback)(event);
    }
}
