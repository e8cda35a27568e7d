// src/filesystem/walk.rs

//! Recursive file discovery
//!
//! Symlinks are not followed, so a link cycle cannot trap the walk and
//! linked files outside the tree are never touched. Entries are yielded in
//! file-name order within each directory.

use crate::extensions::ExtensionSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Every regular file beneath `root`, recursively
///
/// Unreadable entries (permission denied, vanished mid-walk) are skipped with
/// a debug log.
pub fn files_under(root: &Path) -> impl Iterator<Item = PathBuf> + '_ {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping unreadable entry under {}: {}", root.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
}

/// Regular files beneath `root` whose extension is in `extensions`
pub fn files_matching(root: &Path, extensions: &ExtensionSet) -> Vec<PathBuf> {
    files_under(root)
        .filter(|path| extensions.matches(path))
        .collect()
}
