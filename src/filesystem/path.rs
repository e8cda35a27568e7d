// src/filesystem/path.rs

//! Path utilities
//!
//! All path arithmetic here is lexical: nothing touches the filesystem except
//! [`guard_root`], which needs to know whether the root exists. Relative
//! references written into text files always use `/` separators, whatever the
//! host convention is, because they end up in HTML, CSS and JS.

use crate::error::{Error, Result};
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Suffix appended to a full file name to produce its backup
pub const BACKUP_SUFFIX: &str = ".bak";

/// Locations the tools refuse to operate on (exact match only)
pub const PROTECTED_PATHS: &[&str] = &[
    "/", "/home", "/Users", "/System", "/usr", "/bin", "/sbin", "/etc", "/var", "/tmp",
];

/// Normalize a path without touching the filesystem
///
/// Removes `.` components and folds `..` into the preceding component.
/// `..` directly under the root stays at the root, matching how the kernel
/// resolves `/..`. Symlinks are not resolved.
///
/// # Examples
///
/// ```
/// use webpsweep::filesystem::path::normalize_lexical;
/// use std::path::PathBuf;
///
/// assert_eq!(normalize_lexical("/site/./css/../img"), PathBuf::from("/site/img"));
/// assert_eq!(normalize_lexical("/.."), PathBuf::from("/"));
/// ```
pub fn normalize_lexical(path: impl AsRef<Path>) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();

    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Make `path` absolute against the current directory and normalize it
pub fn absolutize(path: impl AsRef<Path>) -> Result<PathBuf> {
    let absolute = std::path::absolute(path.as_ref())?;
    Ok(normalize_lexical(absolute))
}

/// Relative path from directory `from_dir` to `target`, with `/` separators
///
/// Inputs may be absolute or relative to the same base. Returns `None` when
/// one is absolute and the other is not, or when their drive prefixes differ
/// on Windows.
///
/// # Examples
///
/// ```
/// use webpsweep::filesystem::path::relative_posix;
///
/// assert_eq!(
///     relative_posix("/site/blog/2024", "/site/img/photo.jpg").as_deref(),
///     Some("../../img/photo.jpg")
/// );
/// assert_eq!(
///     relative_posix("/site", "/site/img/photo.jpg").as_deref(),
///     Some("img/photo.jpg")
/// );
/// ```
pub fn relative_posix(from_dir: impl AsRef<Path>, target: impl AsRef<Path>) -> Option<String> {
    let from = normalize_lexical(from_dir);
    let to = normalize_lexical(target);

    let from_parts: Vec<Component<'_>> = from.components().collect();
    let to_parts: Vec<Component<'_>> = to.components().collect();

    // Roots must agree, otherwise there is no relative path
    if anchor(&from_parts) != anchor(&to_parts) {
        return None;
    }

    // A bare "." normalizes to itself and has nothing to walk through
    let from_parts = without_cur_dir(from_parts);
    let to_parts = without_cur_dir(to_parts);

    let common = from_parts
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<String> = Vec::new();
    for _ in common..from_parts.len() {
        segments.push("..".to_string());
    }
    for part in &to_parts[common..] {
        segments.push(part.as_os_str().to_string_lossy().into_owned());
    }

    if segments.is_empty() {
        return Some(".".to_string());
    }
    Some(segments.join("/"))
}

fn without_cur_dir(parts: Vec<Component<'_>>) -> Vec<Component<'_>> {
    parts
        .into_iter()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Leading prefix and root components; empty for a relative path
fn anchor<'a>(parts: &[Component<'a>]) -> Vec<Component<'a>> {
    parts
        .iter()
        .take_while(|c| matches!(c, Component::Prefix(_) | Component::RootDir))
        .copied()
        .collect()
}

/// True if `path` is exactly one of [`PROTECTED_PATHS`] after normalization
pub fn is_protected(path: impl AsRef<Path>) -> bool {
    let normalized = normalize_lexical(path);
    PROTECTED_PATHS
        .iter()
        .any(|protected| normalized == Path::new(protected))
}

/// Validate a user-supplied root directory
///
/// Returns the absolute, normalized root. Fails if the root is not an
/// existing directory, or if either its normalized or its canonical form is a
/// protected location (so `/tmp/..` and symlinks to `/etc` are caught too).
pub fn guard_root(path: impl AsRef<Path>) -> Result<PathBuf> {
    let root = absolutize(path)?;

    if !root.is_dir() {
        return Err(Error::InvalidRoot(root));
    }

    if is_protected(&root) {
        return Err(Error::ProtectedPath(root));
    }
    if let Ok(canonical) = root.canonicalize()
        && is_protected(&canonical)
    {
        return Err(Error::ProtectedPath(canonical));
    }

    Ok(root)
}

/// Sibling path with the extension replaced, same directory and stem
pub fn with_target_extension(path: impl AsRef<Path>, extension: &str) -> PathBuf {
    path.as_ref().with_extension(extension.trim_start_matches('.'))
}

/// `index.html` -> `index.html.bak`
pub fn backup_path_for(path: impl AsRef<Path>) -> PathBuf {
    let mut name: OsString = path.as_ref().as_os_str().to_owned();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// `index.html.bak` -> `index.html`
///
/// Returns `None` unless the file name ends with [`BACKUP_SUFFIX`] and has
/// something in front of it.
pub fn strip_backup_suffix(path: impl AsRef<Path>) -> Option<PathBuf> {
    let path = path.as_ref();
    let name = path.file_name()?.to_str()?;
    let original = name.strip_suffix(BACKUP_SUFFIX)?;
    if original.is_empty() {
        return None;
    }
    Some(path.with_file_name(original))
}

/// Final component as a `String` (lossy)
pub fn file_name_string(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
