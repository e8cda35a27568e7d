// src/extensions.rs

//! Extension allow-lists
//!
//! User input arrives as comma-separated lists with or without the leading
//! dot and in any case (`jpg,.PNG, .gif`). Everything is normalized once into
//! an [`ExtensionSet`] of lowercase, dot-prefixed strings; file names are then
//! tested by exact membership of their last extension. There is no prefix or
//! partial matching: `.jpe` does not match `photo.jpeg`.

use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Canonical set of lowercase, dot-prefixed extensions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionSet {
    exts: BTreeSet<String>,
}

impl ExtensionSet {
    /// Normalize an iterable of extension strings
    ///
    /// Blank entries are dropped, so the result may be empty.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let exts = extensions
            .into_iter()
            .filter_map(|e| normalize(e.as_ref()))
            .collect();
        Self { exts }
    }

    /// Parse a comma-separated list such as `.jpg,.jpeg,png`
    pub fn parse_list(list: &str) -> Self {
        Self::new(list.split(','))
    }

    /// Fail with [`Error::EmptyExtensions`] when nothing survived normalization
    ///
    /// `what` names the list in the error message ("image", "text").
    pub fn require_non_empty(self, what: &'static str) -> Result<Self> {
        if self.exts.is_empty() {
            return Err(Error::EmptyExtensions(what));
        }
        Ok(self)
    }

    /// Test whether `path`'s last extension is in the set
    pub fn matches(&self, path: impl AsRef<Path>) -> bool {
        extension_of(path).is_some_and(|ext| self.exts.contains(&ext))
    }

    /// Check membership of an already-normalized extension
    pub fn contains(&self, ext: &str) -> bool {
        normalize(ext).is_some_and(|ext| self.exts.contains(&ext))
    }

    pub fn is_empty(&self) -> bool {
        self.exts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.exts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.exts.iter().map(String::as_str)
    }
}

impl FromStr for ExtensionSet {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse_list(s))
    }
}

impl fmt::Display for ExtensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "{}", joined.join(","))
    }
}

/// Lowercase, dot-prefixed extension of a file name
///
/// Returns `None` for names without an extension. Dotfiles such as
/// `.htaccess` have no extension.
pub fn extension_of(path: impl AsRef<Path>) -> Option<String> {
    path.as_ref()
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
}

fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_lowercase();
    if lower.starts_with('.') {
        Some(lower)
    } else {
        Some(format!(".{}", lower))
    }
}
