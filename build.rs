// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Common argument: root directory to process
fn path_arg() -> Arg {
    Arg::new("path")
        .required(true)
        .value_name("PATH")
        .help("Path to root directory to process")
}

/// Common argument: dry run
fn dry_run_arg() -> Arg {
    Arg::new("dry_run")
        .long("dry-run")
        .action(ArgAction::SetTrue)
        .help("Preview changes without making them")
}

/// Common argument: log level
fn log_level_arg() -> Arg {
    Arg::new("log_level")
        .long("log-level")
        .value_name("LEVEL")
        .default_value("info")
        .value_parser(["debug", "info", "warning", "error"])
        .help("Logging level (RUST_LOG overrides)")
}

fn build_optimizer() -> Command {
    Command::new("webpsweep")
        .version(env!("CARGO_PKG_VERSION"))
        .author("webpsweep Contributors")
        .about("Recursively convert site images to WebP and replace references in HTML/CSS/JS")
        .arg(path_arg())
        .arg(dry_run_arg())
        .arg(
            Arg::new("quality")
                .long("quality")
                .value_name("Q")
                .default_value("80")
                .help("WebP quality 0-100"),
        )
        .arg(
            Arg::new("delete_original")
                .long("delete-original")
                .action(ArgAction::SetTrue)
                .help("Delete original images after conversion"),
        )
        .arg(
            Arg::new("backup")
                .long("backup")
                .action(ArgAction::SetTrue)
                .help("Create .bak files before modifying text files"),
        )
        .arg(
            Arg::new("extensions")
                .long("extensions")
                .value_name("LIST")
                .default_value(".jpg,.jpeg,.png,.gif,.bmp,.tiff")
                .help("Comma-separated image extensions"),
        )
        .arg(
            Arg::new("include")
                .long("include")
                .value_name("LIST")
                .default_value(".html,.css,.js")
                .help("Comma-separated text file extensions to update"),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .value_name("N")
                .default_value("1")
                .help("Number of parallel image encoders"),
        )
        .arg(log_level_arg())
}

fn build_revert() -> Command {
    Command::new("webpsweep-revert")
        .version(env!("CARGO_PKG_VERSION"))
        .author("webpsweep Contributors")
        .about("Revert changes made by webpsweep using .bak files")
        .arg(path_arg())
        .arg(
            Arg::new("remove_converted")
                .long("remove-converted")
                .visible_alias("remove-webp")
                .action(ArgAction::SetTrue)
                .help("Remove .webp files after reverting"),
        )
        .arg(
            Arg::new("extensions")
                .long("extensions")
                .value_name("LIST")
                .default_value(".html,.css,.js")
                .help("Comma-separated text file extensions to revert"),
        )
        .arg(dry_run_arg())
        .arg(log_level_arg())
}

fn render(cmd: Command, man_dir: &Path, file_name: &str) {
    let man = Man::new(cmd);
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page {}: {}", file_name, e);
        return;
    }

    let man_path = man_dir.join(file_name);
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Man pages go to OUT_DIR so the source tree stays clean
    let out_dir = match env::var("OUT_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=OUT_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = out_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    render(build_optimizer(), &man_dir, "webpsweep.1");
    render(build_revert(), &man_dir, "webpsweep-revert.1");
}
