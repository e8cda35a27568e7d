// src/rewrite.rs

//! Reference rewriting in text assets
//!
//! After conversion, HTML, CSS and JS files still point at the original
//! images. For each text file this pass looks for every converted image's
//! file name and, where it occurs, rewrites:
//! 1. the path relative to the text file's directory (`../img/photo.jpg`)
//! 2. any remaining bare file name (`photo.jpg`), which also covers
//!    root-absolute and URL references
//!
//! Substitution is purely textual. Nothing is parsed, so a file name inside
//! a longer token is rewritten too (`myphoto.jpg` becomes `myphoto.webp`
//! when `photo.jpg` was converted). That is a known precision limit.
//!
//! Basenames are processed in lexicographic order, and each literal string
//! is substituted at most once per file, so the output is deterministic.

use crate::cancel::CancelFlag;
use crate::convert::{ConversionEntry, ConversionMap};
use crate::error::{Error, Result};
use crate::extensions::ExtensionSet;
use crate::filesystem::path::file_name_string;
use crate::filesystem::{atomic_write, backup_path_for, files_matching, relative_posix};
use crate::observer::{Event, Observer, Phase, SilentObserver};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Default text-file allow-list
pub const DEFAULT_TEXT_EXTENSIONS: &str = ".html,.css,.js";

/// Options for a rewrite pass
#[derive(Debug, Clone)]
pub struct RewriteOptions {
    /// Text files to scan
    pub text_extensions: ExtensionSet,
    /// Report updates without writing
    pub dry_run: bool,
    /// Save the original content to `<file>.bak` before the first rewrite
    pub backup: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            text_extensions: ExtensionSet::parse_list(DEFAULT_TEXT_EXTENSIONS),
            dry_run: false,
            backup: false,
        }
    }
}

/// Counts from a rewrite pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteSummary {
    /// Text files read
    pub files_scanned: usize,
    /// Files whose references changed (would change, in dry-run)
    pub files_updated: usize,
}

/// File name -> every conversion entry with that original file name
///
/// Two originals in different directories can share a name. All of them are
/// kept so each gets its own relative-path substitution. They necessarily
/// share the converted file name too (same stem, same target extension), so
/// the bare-name substitution is unambiguous.
#[derive(Debug, Clone, Default)]
pub struct BasenameIndex {
    by_name: BTreeMap<String, Vec<ConversionEntry>>,
}

impl BasenameIndex {
    pub fn build(map: &ConversionMap) -> Self {
        let mut by_name: BTreeMap<String, Vec<ConversionEntry>> = BTreeMap::new();
        for (original, converted) in map.iter() {
            let name = file_name_string(original);
            if name.is_empty() {
                continue;
            }
            by_name
                .entry(name)
                .or_default()
                .push(ConversionEntry::new(original.to_path_buf(), converted.to_path_buf()));
        }
        Self { by_name }
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Entries for an original file name
    pub fn get(&self, name: &str) -> Option<&[ConversionEntry]> {
        self.by_name.get(name).map(Vec::as_slice)
    }

    /// `(name, entries)` in lexicographic name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ConversionEntry])> {
        self.by_name
            .iter()
            .map(|(name, entries)| (name.as_str(), entries.as_slice()))
    }
}

/// Rewrite references in `text`, which lives in directory `file_dir`
///
/// Returns the new text; equal to the input when nothing matched.
pub fn rewrite_text(text: &str, file_dir: &Path, index: &BasenameIndex) -> String {
    let mut new_text = text.to_string();
    let mut consumed: HashSet<String> = HashSet::new();

    for (name, entries) in index.iter() {
        if !new_text.contains(name) {
            continue;
        }
        let Some(first) = entries.first() else {
            continue;
        };
        let converted_name = file_name_string(&first.converted_path);

        for entry in entries {
            let rel_orig = relative_posix(file_dir, &entry.original_path)
                .unwrap_or_else(|| name.to_string());
            let rel_conv = relative_posix(file_dir, &entry.converted_path)
                .unwrap_or_else(|| converted_name.clone());

            if !consumed.contains(&rel_orig) && new_text.contains(&rel_orig) {
                new_text = new_text.replace(&rel_orig, &rel_conv);
                consumed.insert(rel_orig);
            }
        }

        if name != converted_name && !consumed.contains(name) && new_text.contains(name) {
            new_text = new_text.replace(name, &converted_name);
            consumed.insert(name.to_string());
        }
    }

    new_text
}

/// Reference rewrite pass over a directory tree
pub struct ReferenceRewriter {
    observer: Arc<dyn Observer>,
    cancel: CancelFlag,
}

impl Default for ReferenceRewriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceRewriter {
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

    /// Rewrite references to every entry of `map` in text files under `root`
    ///
    /// An empty map is a no-op. Unreadable or non-UTF-8 files are skipped. A
    /// failed backup does not block the rewrite; a failed write is reported
    /// and the file is not counted.
    pub fn rewrite(
        &self,
        root: &Path,
        map: &ConversionMap,
        options: &RewriteOptions,
    ) -> Result<RewriteSummary> {
        if !root.is_dir() {
            return Err(Error::InvalidRoot(root.to_path_buf()));
        }

        let mut summary = RewriteSummary::default();

        if map.is_empty() {
            self.observer.on_event(Event::NothingToDo {
                phase: Phase::Rewrite,
            });
            return Ok(summary);
        }

        let files = files_matching(root, &options.text_extensions);
        self.observer.on_event(Event::Discovered {
            phase: Phase::Rewrite,
            count: files.len(),
        });

        let index = BasenameIndex::build(map);

        for file in &files {
            if self.cancel.is_cancelled() {
                self.observer.on_event(Event::Cancelled {
                    phase: Phase::Rewrite,
                });
                break;
            }
            summary.files_scanned += 1;
            if self.rewrite_file(file, &index, options) {
                summary.files_updated += 1;
            }
        }

        self.observer.on_event(Event::Completed {
            phase: Phase::Rewrite,
            count: summary.files_updated,
        });
        Ok(summary)
    }

    /// Returns true if the file was (or in dry-run would be) updated
    fn rewrite_file(&self, file: &Path, index: &BasenameIndex, options: &RewriteOptions) -> bool {
        let text = match fs::read(file) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(e) => {
                    self.observer.on_event(Event::Unreadable {
                        path: file.to_path_buf(),
                        reason: format!("not valid UTF-8: {}", e.utf8_error()),
                    });
                    return false;
                }
            },
            Err(e) => {
                self.observer.on_event(Event::Unreadable {
                    path: file.to_path_buf(),
                    reason: e.to_string(),
                });
                return false;
            }
        };

        let file_dir = file.parent().unwrap_or_else(|| Path::new("."));
        let new_text = rewrite_text(&text, file_dir, index);
        if new_text == text {
            return false;
        }

        if options.dry_run {
            self.observer.on_event(Event::WouldUpdate {
                path: file.to_path_buf(),
            });
            return true;
        }

        if options.backup {
            self.write_backup(file, &text);
        }

        match atomic_write(file, new_text.as_bytes()) {
            Ok(()) => {
                self.observer.on_event(Event::Updated {
                    path: file.to_path_buf(),
                });
                true
            }
            Err(e) => {
                self.observer.on_event(Event::WriteFailed {
                    path: file.to_path_buf(),
                    reason: e.to_string(),
                });
                false
            }
        }
    }

    /// Any earlier `.bak` is replaced with the content read in this run
    fn write_backup(&self, file: &Path, original: &str) {
        let backup = backup_path_for(file);
        if let Err(e) = atomic_write(&backup, original.as_bytes()) {
            self.observer.on_event(Event::BackupFailed {
                path: file.to_path_buf(),
                reason: e.to_string(),
            });
        }
    }
}
