// src/revert.rs

//! Revert a previous run
//!
//! There is no manifest. Backups describe themselves: `index.html.bak` is
//! the pre-rewrite content of `index.html`. The revert pass rediscovers them
//! from the tree, restores each one over its original and deletes the
//! backup. Optionally it then sweeps every converted image under the root,
//! whether or not anything was restored next to it.

use crate::cancel::CancelFlag;
use crate::error::{Error, Result};
use crate::extensions::ExtensionSet;
use crate::filesystem::{atomic_write, files_matching, files_under, strip_backup_suffix};
use crate::observer::{Event, Observer, Phase, SilentObserver};
use crate::rewrite::DEFAULT_TEXT_EXTENSIONS;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Extension of files produced by the default codec
pub const DEFAULT_CONVERTED_EXTENSION: &str = ".webp";

/// Options for a revert pass
#[derive(Debug, Clone)]
pub struct RevertOptions {
    /// Only backups of these text files are restored
    pub text_extensions: ExtensionSet,
    /// Also delete every converted image under the root
    pub remove_converted: bool,
    /// Report without touching the filesystem
    pub dry_run: bool,
    /// What counts as a converted image for the sweep
    pub converted_extensions: ExtensionSet,
}

impl Default for RevertOptions {
    fn default() -> Self {
        Self {
            text_extensions: ExtensionSet::parse_list(DEFAULT_TEXT_EXTENSIONS),
            remove_converted: false,
            dry_run: false,
            converted_extensions: ExtensionSet::parse_list(DEFAULT_CONVERTED_EXTENSION),
        }
    }
}

/// Counts from a revert pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RevertSummary {
    pub backups_found: usize,
    pub restored: usize,
    pub restore_failures: usize,
    pub converted_found: usize,
    pub removed: usize,
    pub remove_failures: usize,
}

/// A discovered backup and the file it restores
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRecord {
    pub backup_path: PathBuf,
    pub restored_path: PathBuf,
}

/// Every backup under `root` whose original has an allowed extension
pub fn find_backups(root: &Path, text_extensions: &ExtensionSet) -> Vec<BackupRecord> {
    files_under(root)
        .filter_map(|backup_path| {
            let restored_path = strip_backup_suffix(&backup_path)?;
            text_extensions.matches(&restored_path).then_some(BackupRecord {
                backup_path,
                restored_path,
            })
        })
        .collect()
}

/// Revert pass over a directory tree
pub struct Reverter {
    observer: Arc<dyn Observer>,
    cancel: CancelFlag,
}

impl Default for Reverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reverter {
    pub fn new() -> Self {
        Self {
            observer: Arc::new(SilentObserver),
            cancel: CancelFlag::new(),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Restore backups under `root`, then optionally sweep converted images
    ///
    /// A failed restore or removal is reported and does not stop the pass.
    pub fn revert(&self, root: &Path, options: &RevertOptions) -> Result<RevertSummary> {
        if !root.is_dir() {
            return Err(Error::InvalidRoot(root.to_path_buf()));
        }

        let mut summary = RevertSummary::default();
        self.restore_backups(root, options, &mut summary);

        if options.remove_converted && !self.cancel.is_cancelled() {
            self.remove_converted(root, options, &mut summary);
        }

        Ok(summary)
    }

    fn restore_backups(&self, root: &Path, options: &RevertOptions, summary: &mut RevertSummary) {
        let backups = find_backups(root, &options.text_extensions);
        summary.backups_found = backups.len();

        if backups.is_empty() {
            self.observer.on_event(Event::NothingToDo {
                phase: Phase::Restore,
            });
            return;
        }
        self.observer.on_event(Event::Discovered {
            phase: Phase::Restore,
            count: backups.len(),
        });

        for record in backups {
            if self.cancel.is_cancelled() {
                self.observer.on_event(Event::Cancelled {
                    phase: Phase::Restore,
                });
                break;
            }

            if options.dry_run {
                self.observer.on_event(Event::WouldRestore {
                    backup: record.backup_path,
                    original: record.restored_path,
                });
                continue;
            }

            match restore_one(&record) {
                Ok(()) => {
                    summary.restored += 1;
                    self.observer.on_event(Event::Restored {
                        original: record.restored_path,
                    });
                }
                Err(e) => {
                    summary.restore_failures += 1;
                    self.observer.on_event(Event::RestoreFailed {
                        original: record.restored_path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if !options.dry_run {
            self.observer.on_event(Event::Completed {
                phase: Phase::Restore,
                count: summary.restored,
            });
        }
    }

    fn remove_converted(&self, root: &Path, options: &RevertOptions, summary: &mut RevertSummary) {
        let converted = files_matching(root, &options.converted_extensions);
        summary.converted_found = converted.len();

        if converted.is_empty() {
            self.observer.on_event(Event::NothingToDo {
                phase: Phase::RemoveConverted,
            });
            return;
        }
        self.observer.on_event(Event::Discovered {
            phase: Phase::RemoveConverted,
            count: converted.len(),
        });

        for path in converted {
            if self.cancel.is_cancelled() {
                self.observer.on_event(Event::Cancelled {
                    phase: Phase::RemoveConverted,
                });
                break;
            }

            if options.dry_run {
                self.observer.on_event(Event::WouldRemove { path });
                continue;
            }

            match fs::remove_file(&path) {
                Ok(()) => {
                    summary.removed += 1;
                    self.observer.on_event(Event::Removed { path });
                }
                Err(e) => {
                    summary.remove_failures += 1;
                    self.observer.on_event(Event::RemoveFailed {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if !options.dry_run {
            self.observer.on_event(Event::Completed {
                phase: Phase::RemoveConverted,
                count: summary.removed,
            });
        }
    }
}

/// Copy backup bytes over the original, then drop the backup
fn restore_one(record: &BackupRecord) -> Result<()> {
    let content = fs::read(&record.backup_path)?;
    atomic_write(&record.restored_path, &content)?;
    fs::remove_file(&record.backup_path)?;
    Ok(())
}
