// src/bin/webpsweep-revert.rs

//! webpsweep-revert - undo a webpsweep run from its `.bak` files

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, warn};
use webpsweep::cli::{RevertArgs, init_tracing};
use webpsweep::commands::cmd_revert;
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
    let args = RevertArgs::parse();
    init_tracing(args.log_level);

    let cancel = CancelFlag::new();
    if let Err(e) = cancel.install_ctrlc_handler() {
        warn!("Could not install interrupt handler: {}", e);
    }

    cmd_revert(&args, Arc::new(LogObserver), &cancel)?;
    Ok(())
}
