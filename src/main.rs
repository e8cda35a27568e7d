// src/main.rs

//! webpsweep - convert site images to WebP and update references

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, warn};
use webpsweep::cli::{OptimizeArgs, init_tracing};
use webpsweep::commands::cmd_optimize;
use webpsweep::{CancelFlag, LogObserver};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = OptimizeArgs::parse();
    init_tracing(args.log_level);

    let cancel = CancelFlag::new();
    if let Err(e) = cancel.install_ctrlc_handler() {
        warn!("Could not install interrupt handler: {}", e);
    }

    cmd_optimize(&args, Arc::new(LogObserver), &cancel)?;
    Ok(())
}
