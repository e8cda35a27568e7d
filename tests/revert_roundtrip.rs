// tests/revert_roundtrip.rs

//! Optimize followed by revert restores the original tree.

mod common;

use clap::Parser;
use common::*;
use std::path::PathBuf;
use std::sync::Arc;
use webpsweep::cli::{OptimizeArgs, RevertArgs};
use webpsweep::commands::{cmd_optimize, cmd_revert};
use webpsweep::{CancelFlag, SilentObserver};

#[test]
fn test_optimize_then_revert_is_byte_identical() {
    let temp_dir = create_site();
    let root = temp_dir.path();
    let before = snapshot(root);

    let optimize = OptimizeArgs::try_parse_from([
        "webpsweep".to_string(),
        root.display().to_string(),
        "--backup".to_string(),
    ])
    .unwrap();
    let report = cmd_optimize(&optimize, Arc::new(SilentObserver), &CancelFlag::new()).unwrap();
    assert_eq!(report.rewrite.files_updated, 4);
    assert!(root.join("css/site.css.bak").exists());

    let revert = RevertArgs::try_parse_from([
        "webpsweep-revert".to_string(),
        root.display().to_string(),
        "--remove-webp".to_string(),
    ])
    .unwrap();
    let summary = cmd_revert(&revert, Arc::new(SilentObserver), &CancelFlag::new()).unwrap();

    assert_eq!(summary.restored, 4);
    assert_eq!(summary.removed, 2);
    assert_eq!(snapshot(root), before);
}

#[test]
fn test_backup_holds_content_from_latest_run() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let root = temp_dir.path();
    write_png(&root.join("a.png"));
    write_text(&root.join("page.html"), r#"<img src="a.png">"#);
    let optimize = OptimizeArgs::try_parse_from([
        "webpsweep".to_string(),
        root.display().to_string(),
        "--backup".to_string(),
    ])
    .unwrap();
    cmd_optimize(&optimize, Arc::new(SilentObserver), &CancelFlag::new()).unwrap();

    // Edited after the first run; the next backup must preserve this edit
    write_png(&root.join("b.png"));
    let edited = r#"<h1>New</h1><img src="a.webp"><img src="b.png">"#;
    write_text(&root.join("page.html"), edited);
    cmd_optimize(&optimize, Arc::new(SilentObserver), &CancelFlag::new()).unwrap();

    assert_eq!(std::fs::read_to_string(root.join("page.html.bak")).unwrap(), edited);
    assert_eq!(
        std::fs::read_to_string(root.join("page.html")).unwrap(),
        r#"<h1>New</h1><img src="a.webp"><img src="b.webp">"#
    );

    let revert = RevertArgs::try_parse_from([
        "webpsweep-revert".to_string(),
        root.display().to_string(),
    ])
    .unwrap();
    cmd_revert(&revert, Arc::new(SilentObserver), &CancelFlag::new()).unwrap();
    assert_eq!(std::fs::read_to_string(root.join("page.html")).unwrap(), edited);
}

#[test]
fn test_revert_dry_run_reports_without_changes() {
    let temp_dir = create_site();
    let root = temp_dir.path();
    let optimize = OptimizeArgs::try_parse_from([
        "webpsweep".to_string(),
        root.display().to_string(),
        "--backup".to_string(),
    ])
    .unwrap();
    cmd_optimize(&optimize, Arc::new(SilentObserver), &CancelFlag::new()).unwrap();
    let after_optimize = snapshot(root);

    let revert = RevertArgs::try_parse_from([
        "webpsweep-revert".to_string(),
        root.display().to_string(),
        "--remove-converted".to_string(),
        "--dry-run".to_string(),
    ])
    .unwrap();
    let summary = cmd_revert(&revert, Arc::new(SilentObserver), &CancelFlag::new()).unwrap();

    assert_eq!(summary.backups_found, 4);
    assert_eq!(summary.converted_found, 2);
    assert_eq!(snapshot(root), after_optimize);
    assert!(after_optimize.contains_key(&PathBuf::from("index.html.bak")));
}
