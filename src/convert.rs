// src/convert.rs

//! Image conversion pass
//!
//! Walks a tree for candidate images, encodes each one next to itself with
//! the codec's extension, and returns the original -> converted mapping that
//! drives the reference rewrite.
//!
//! # Re-run semantics
//!
//! A converted file that exists and is at least as new as its source is
//! taken as-is: the entry is recorded and nothing is encoded. This is the only
//! staleness check, so touching a source image forces its reconversion.
//!
//! # Failure isolation
//!
//! A file that fails to decode, encode or write is reported and left out of
//! the map; the batch always runs to the end. Only bad arguments (missing
//! root, quality over 100, zero jobs) fail the whole call.
//!
//! # Parallelism
//!
//! With `jobs > 1` encoding runs on a dedicated rayon pool. Candidates that
//! map to the same converted file form one group, and each group is handled
//! sequentially by exactly one task, so a converted file is never written
//! twice at once. The map is fully collected before `convert` returns.

use crate::cancel::CancelFlag;
use crate::codec::ImageCodec;
use crate::error::{Error, Result};
use crate::extensions::ExtensionSet;
use crate::filesystem::{atomic_write, files_matching, with_target_extension};
use crate::observer::{Event, Observer, Phase, SilentObserver};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default image allow-list
pub const DEFAULT_IMAGE_EXTENSIONS: &str = ".jpg,.jpeg,.png,.gif,.bmp,.tiff";

/// Default encoder quality
pub const DEFAULT_QUALITY: u8 = 80;

/// One processed image
///
/// `converted_path` is always `original_path` with only the extension
/// swapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionEntry {
    pub original_path: PathBuf,
    pub converted_path: PathBuf,
}

impl ConversionEntry {
    pub fn new(original_path: PathBuf, converted_path: PathBuf) -> Self {
        Self {
            original_path,
            converted_path,
        }
    }
}

/// Original absolute path -> converted absolute path
///
/// Ordered by original path, so iteration is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionMap {
    entries: BTreeMap<PathBuf, PathBuf>,
}

impl ConversionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: ConversionEntry) {
        self.entries.insert(entry.original_path, entry.converted_path);
    }

    /// Converted path for an original
    pub fn get(&self, original: &Path) -> Option<&Path> {
        self.entries.get(original).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(original, converted)` pairs in original-path order
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.entries
            .iter()
            .map(|(orig, conv)| (orig.as_path(), conv.as_path()))
    }
}

impl FromIterator<ConversionEntry> for ConversionMap {
    fn from_iter<I: IntoIterator<Item = ConversionEntry>>(iter: I) -> Self {
        let mut map = Self::new();
        for entry in iter {
            map.insert(entry);
        }
        map
    }
}

/// Options for a conversion pass
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Candidate image extensions
    pub extensions: ExtensionSet,
    /// Encoder quality, 0-100
    pub quality: u8,
    /// Record and report, but encode and delete nothing
    pub dry_run: bool,
    /// Remove each original after a successful encode
    pub delete_original: bool,
    /// Parallel encoders; 1 means sequential on the calling thread
    pub jobs: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            extensions: ExtensionSet::parse_list(DEFAULT_IMAGE_EXTENSIONS),
            quality: DEFAULT_QUALITY,
            dry_run: false,
            delete_original: false,
            jobs: 1,
        }
    }
}

/// Image conversion pass over a directory tree
pub struct ImageConverter {
    codec: Arc<dyn ImageCodec>,
    observer: Arc<dyn Observer>,
    cancel: CancelFlag,
}

impl ImageConverter {
    /// Create a converter reporting to a silent observer
    pub fn new(codec: Arc<dyn ImageCodec>) -> Self {
        Self {
            codec,
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

    /// Convert every candidate image under `root`
    ///
    /// The returned map holds one entry per image that was already up to
    /// date, was converted, or (in dry-run) would have been converted.
    pub fn convert(&self, root: &Path, options: &ConvertOptions) -> Result<ConversionMap> {
        if !root.is_dir() {
            return Err(Error::InvalidRoot(root.to_path_buf()));
        }
        if options.quality > 100 {
            return Err(Error::InvalidQuality(i64::from(options.quality)));
        }
        if options.jobs == 0 {
            return Err(Error::InvalidJobs);
        }

        let candidates = files_matching(root, &options.extensions);
        if candidates.is_empty() {
            self.observer.on_event(Event::NothingToDo {
                phase: Phase::Convert,
            });
            return Ok(ConversionMap::new());
        }

        self.observer.on_event(Event::Discovered {
            phase: Phase::Convert,
            count: candidates.len(),
        });

        let groups = group_by_target(&candidates, self.codec.target_extension());
        let results: Vec<Vec<ConversionEntry>> = if options.jobs == 1 {
            groups
                .iter()
                .map(|group| self.process_group(group, options))
                .collect()
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(options.jobs)
                .build()?;
            pool.install(|| {
                groups
                    .par_iter()
                    .map(|group| self.process_group(group, options))
                    .collect()
            })
        };

        let map: ConversionMap = results.into_iter().flatten().collect();

        if self.cancel.is_cancelled() {
            self.observer.on_event(Event::Cancelled {
                phase: Phase::Convert,
            });
        }
        self.observer.on_event(Event::Completed {
            phase: Phase::Convert,
            count: map.len(),
        });

        Ok(map)
    }

    /// Candidates sharing one converted path, in discovery order
    fn process_group(&self, group: &[PathBuf], options: &ConvertOptions) -> Vec<ConversionEntry> {
        group
            .iter()
            .filter_map(|original| self.process(original, options))
            .collect()
    }

    /// Handle one candidate; `None` means it stays out of the map
    fn process(&self, original: &Path, options: &ConvertOptions) -> Option<ConversionEntry> {
        if self.cancel.is_cancelled() {
            return None;
        }

        let converted = with_target_extension(original, self.codec.target_extension());
        let entry = ConversionEntry::new(original.to_path_buf(), converted.clone());

        if is_up_to_date(original, &converted) {
            self.observer.on_event(Event::UpToDate {
                original: original.to_path_buf(),
                converted,
            });
            return Some(entry);
        }

        if options.dry_run {
            self.observer.on_event(Event::WouldConvert {
                original: original.to_path_buf(),
                converted,
            });
            return Some(entry);
        }

        self.observer.on_event(Event::Converting {
            original: original.to_path_buf(),
            converted: converted.clone(),
        });

        let written = self
            .codec
            .encode_file(original, options.quality)
            .and_then(|bytes| atomic_write(&converted, &bytes));

        if let Err(e) = written {
            self.observer.on_event(Event::ConvertFailed {
                original: original.to_path_buf(),
                reason: e.to_string(),
            });
            return None;
        }

        self.observer.on_event(Event::Converted {
            original: original.to_path_buf(),
            converted,
        });

        if options.delete_original {
            match fs::remove_file(original) {
                Ok(()) => self.observer.on_event(Event::OriginalDeleted {
                    path: original.to_path_buf(),
                }),
                // The entry stays valid: the converted file is on disk
                Err(e) => self.observer.on_event(Event::DeleteFailed {
                    path: original.to_path_buf(),
                    reason: e.to_string(),
                }),
            }
        }

        Some(entry)
    }
}

/// Bucket candidates by the file they would produce
///
/// `photo.jpg` and `photo.png` both become `photo.webp`, so they must be
/// handled one after the other by the same task.
fn group_by_target(candidates: &[PathBuf], target_extension: &str) -> Vec<Vec<PathBuf>> {
    let mut groups: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
    for original in candidates {
        groups
            .entry(with_target_extension(original, target_extension))
            .or_default()
            .push(original.clone());
    }
    groups.into_values().collect()
}

/// Converted file exists and its mtime is not older than the source's
fn is_up_to_date(original: &Path, converted: &Path) -> bool {
    let modified = |path: &Path| fs::metadata(path).and_then(|m| m.modified());
    match (modified(original), modified(converted)) {
        (Ok(src), Ok(dst)) => dst >= src,
        _ => false,
    }
}
