// src/filesystem/atomic.rs

//! Atomic file replacement
//!
//! Content is written to a temp file in the destination directory, synced,
//! and renamed over the target. Readers see either the old bytes or the new
//! bytes, never a partial write, even if the process dies mid-write.

use crate::error::Result;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Replace `path` with `content` atomically
///
/// An existing file keeps its permissions. New files get `0644` on Unix
/// instead of the temp file's private `0600`.
pub fn atomic_write(path: impl AsRef<Path>, content: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;

    match fs::metadata(path) {
        Ok(existing) => fs::set_permissions(temp.path(), existing.permissions())?,
        Err(_) => set_default_permissions(temp.path())?,
    }

    temp.persist(path).map_err(|e| e.error)?;

    debug!("Wrote {} ({} bytes)", path.display(), content.len());
    Ok(())
}

#[cfg(unix)]
fn set_default_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_default_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
