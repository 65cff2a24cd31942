use std::{env, fs};

use anyhow::{anyhow, Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::cli::LogSettings;

pub const APP_NAME: &str = "rotate-files";

// Public logging initialization
//
// Log lines go to a daily file `<prefix>.<date>.log` inside the log directory
// and to stderr. The returned guard must stay alive until the program ends,
// dropping it flushes the file writer.
pub fn init_logging(settings: &LogSettings) -> Result<WorkerGuard> {
    fs::create_dir_all(&settings.dir)
        .with_context(|| format!("failed to create log dir {}", settings.dir))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(&settings.file_prefix)
        .filename_suffix("log")
        .build(&settings.dir)
        .with_context(|| format!("failed to open log file in {}", settings.dir))?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(false);
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("failed to install the global subscriber")?;

    Ok(guard)
}

// Directory that holds the running executable
pub fn exe_dir() -> Result<Utf8PathBuf> {
    let exe = env::current_exe().context("failed to resolve the executable path")?;
    let exe = Utf8PathBuf::from_path_buf(exe)
        .map_err(|path| anyhow!("executable path is not valid UTF-8: {}", path.display()))?;
    exe.parent()
        .map(Utf8Path::to_path_buf)
        .ok_or_else(|| anyhow!("executable path {exe} has no parent directory"))
}

// Default log directory, `logs_<app>` next to the executable
pub fn default_log_dir(work_dir: &Utf8Path) -> Utf8PathBuf {
    work_dir.join(format!("logs_{APP_NAME}"))
}

// Split "a, b,,c " into ["a", "b", "c"]
pub fn parse_dir_list(list: &str) -> Vec<Utf8PathBuf> {
    list.split(',')
        .map(str::trim)
        .filter(|dir| !dir.is_empty())
        .map(Utf8PathBuf::from)
        .collect()
}
