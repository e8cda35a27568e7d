// src/codec.rs

//! Image codec capability
//!
//! The converter only needs "decode this file, re-encode it at quality Q and
//! give me the bytes". [`ImageCodec`] is that seam; [`WebpCodec`] is the
//! production implementation (decode via `image`, encode via libwebp).
//! Every failure mode (I/O, unsupported format, corrupt data, encoder error)
//! comes back as an `Err` so the caller can skip the file.

use crate::error::{Error, Result};
use image::{DynamicImage, ImageReader};
use std::path::Path;

/// Largest width or height a WebP bitmap can have
pub const WEBP_MAX_DIMENSION: u32 = 16383;

/// Decode-and-re-encode capability
pub trait ImageCodec: Send + Sync {
    /// Extension of produced files, without the dot (e.g. `webp`)
    fn target_extension(&self) -> &str;

    /// Decode `source` and encode it at `quality` (0-100)
    fn encode_file(&self, source: &Path, quality: u8) -> Result<Vec<u8>>;
}

/// Lossy WebP encoder
///
/// Animated inputs (GIF) contribute their first frame only.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebpCodec;

impl WebpCodec {
    pub fn new() -> Self {
        Self
    }

    fn decode(source: &Path) -> Result<DynamicImage> {
        // Sniff the content rather than trusting the extension
        let reader = ImageReader::open(source)?.with_guessed_format()?;
        Ok(reader.decode()?)
    }

    fn encode(source: &Path, image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 || width > WEBP_MAX_DIMENSION || height > WEBP_MAX_DIMENSION {
            return Err(Error::Encode {
                path: source.to_path_buf(),
                reason: format!(
                    "dimensions {}x{} outside WebP limits (1..={})",
                    width, height, WEBP_MAX_DIMENSION
                ),
            });
        }

        let quality = f32::from(quality.min(100));
        let encoded = if image.color().has_alpha() {
            let rgba = image.to_rgba8();
            webp::Encoder::from_rgba(rgba.as_raw(), width, height).encode_simple(false, quality)
        } else {
            let rgb = image.to_rgb8();
            webp::Encoder::from_rgb(rgb.as_raw(), width, height).encode_simple(false, quality)
        };

        encoded.map(|memory| memory.to_vec()).map_err(|e| Error::Encode {
            path: source.to_path_buf(),
            reason: format!("{:?}", e),
        })
    }
}

impl ImageCodec for WebpCodec {
    fn target_extension(&self) -> &str {
        "webp"
    }

    fn encode_file(&self, source: &Path, quality: u8) -> Result<Vec<u8>> {
        let image = Self::decode(source)?;
        Self::encode(source, &image, quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use tempfile::TempDir;

    fn is_webp(bytes: &[u8]) -> bool {
        bytes.len() > 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP"
    }

    #[test]
    fn test_encodes_png() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("logo.png");
        RgbaImage::from_pixel(16, 8, Rgba([10, 20, 30, 128])).save(&src).unwrap();

        let bytes = WebpCodec::new().encode_file(&src, 80).unwrap();
        assert!(is_webp(&bytes));
    }

    #[test]
    fn test_encodes_jpeg_with_wrong_extension() {
        let temp_dir = TempDir::new().unwrap();
        let real = temp_dir.path().join("photo.jpg");
        RgbImage::from_pixel(20, 10, Rgb([73, 109, 137])).save(&real).unwrap();
        let misnamed = temp_dir.path().join("photo.png");
        std::fs::rename(&real, &misnamed).unwrap();

        let bytes = WebpCodec::new().encode_file(&misnamed, 50).unwrap();
        assert!(is_webp(&bytes));
    }

    #[test]
    fn test_corrupt_input_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("broken.jpg");
        std::fs::write(&src, b"definitely not a jpeg").unwrap();

        assert!(WebpCodec::new().encode_file(&src, 80).is_err());
    }

    #[test]
    fn test_missing_input_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = WebpCodec::new().encode_file(&temp_dir.path().join("gone.png"), 80);
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_target_extension() {
        assert_eq!(WebpCodec::new().target_extension(), "webp");
    }
}
