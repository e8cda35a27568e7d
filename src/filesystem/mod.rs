// src/filesystem/mod.rs

//! Filesystem operations for webpsweep
//!
//! This module provides:
//! - Recursive discovery of candidate files (no symlink following)
//! - Lexical path arithmetic for POSIX-style relative references
//! - Atomic write-then-rename for every file the tools produce
//! - Backup naming and the protected-root guard

mod atomic;
pub mod path;
mod walk;

pub use atomic::atomic_write;
pub use path::{
    BACKUP_SUFFIX, PROTECTED_PATHS, backup_path_for, guard_root, relative_posix,
    strip_backup_suffix, with_target_extension,
};
pub use walk::{files_matching, files_under};
