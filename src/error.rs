// src/error.rs

//! Error types for webpsweep
//!
//! Only fatal conditions become an `Error`: invalid arguments at the top of an
//! operation, or a failure the caller asked about directly (a single atomic
//! write, a single encode). Per-file failures inside a batch are reported
//! through the [`Observer`](crate::observer::Observer) and never propagate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the webpsweep library
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (read, write, rename, remove)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Source image could not be decoded
    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),

    /// Bitmap could not be encoded to the target format
    #[error("Encode error for '{path}': {reason}")]
    Encode { path: PathBuf, reason: String },

    /// Root does not exist or is not a directory
    #[error("Path does not exist or is not a directory: {}", .0.display())]
    InvalidRoot(PathBuf),

    /// Root is a protected system location
    #[error("Refusing to run at filesystem root or system directory: {}", .0.display())]
    ProtectedPath(PathBuf),

    /// Quality outside [0, 100]
    #[error("Quality must be between 0 and 100, got {0}")]
    InvalidQuality(i64),

    /// An extension list normalized to nothing
    #[error("No {0} extensions specified")]
    EmptyExtensions(&'static str),

    /// Worker count of zero
    #[error("Job count must be at least 1")]
    InvalidJobs,

    /// Failed to build the encoder thread pool
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type alias for webpsweep operations
pub type Result<T> = std::result::Result<T, Error>;
