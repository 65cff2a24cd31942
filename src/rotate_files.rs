use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use rotate_files::{cli::Cli, rotate_files_core, util};
use tracing::error;

fn main() -> Result<()> {
    let started = Instant::now();
    let cli = Cli::parse();

    let work_dir = util::exe_dir()?;
    let log_settings = cli.log_settings(&work_dir)?;
    let guard = util::init_logging(&log_settings)?;

    let result = rotate_files_core::run(&cli, &log_settings, started);
    if let Err(err) = &result {
        error!(error = %format!("{err:#}"), "Exiting");
    }

    // Flush the log file before the process goes away
    drop(guard);
    if result.is_err() {
        std::process::exit(1);
    }
    Ok(())
}
