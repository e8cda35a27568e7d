// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use walkdir::WalkDir;
use webpsweep::{CallbackObserver, Event, Observer};

/// Write a small real JPEG
pub fn write_jpeg(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbImage::from_pixel(12, 8, Rgb([200, 120, 40]))
        .save_with_format(path, image::ImageFormat::Jpeg)
        .unwrap();
}

/// Write a small real PNG with alpha
pub fn write_png(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbaImage::from_pixel(8, 8, Rgba([0, 128, 255, 200]))
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
}

pub fn write_text(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Build a small site:
///
/// ```text
/// index.html          -> img/photo.jpg, img/logo.png
/// css/site.css        -> ../img/logo.png
/// a/b/c/deep.html     -> ../../../img/photo.jpg
/// js/app.js           -> "logo.png"
/// img/photo.jpg
/// img/logo.png
/// img/broken.png      (not an image)
/// ```
pub fn create_site() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    write_jpeg(&root.join("img/photo.jpg"));
    write_png(&root.join("img/logo.png"));
    write_text(&root.join("img/broken.png"), "this is not a png");

    write_text(
        &root.join("index.html"),
        r#"<img src="img/photo.jpg"><img src="img/logo.png">"#,
    );
    write_text(
        &root.join("css/site.css"),
        ".logo { background: url(../img/logo.png); }",
    );
    write_text(
        &root.join("a/b/c/deep.html"),
        r#"<img src="../../../img/photo.jpg">"#,
    );
    write_text(&root.join("js/app.js"), r#"const logo = "logo.png";"#);

    temp_dir
}

/// Relative path -> bytes for every file under `root`
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap().to_path_buf();
            (rel, fs::read(e.path()).unwrap())
        })
        .collect()
}

/// Observer that records every event
pub fn recording_observer() -> (Arc<Mutex<Vec<Event>>>, Arc<dyn Observer>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let observer = Arc::new(CallbackObserver::new(move |event| {
        sink.lock().unwrap().push(event);
    }));
    (events, observer)
}

pub fn count_converted(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, Event::Converted { .. }))
        .count()
}

pub fn is_webp(path: &Path) -> bool {
    let bytes = fs::read(path).unwrap();
    bytes.len() > 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP"
}

pub fn args(argv: &[&str]) -> Vec<String> {
    argv.iter().map(|s| s.to_string()).collect()
}
