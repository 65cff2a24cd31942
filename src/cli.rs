//! Command line flags and their validation.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use thiserror::Error;

use crate::util::{default_log_dir, parse_dir_list, APP_NAME};

/// Delete old files, keeping only the most recently modified ones in each directory.
#[derive(Parser, Debug)]
#[command(name = APP_NAME, version, about)]
pub struct Cli {
    /// Log directory [default: logs_rotate-files next to the executable]
    #[arg(long = "log-dir", value_name = "DIR")]
    pub log_dir: Option<Utf8PathBuf>,

    /// Number of log files to keep after log rotation
    #[arg(long = "keep-logs", value_name = "N", default_value_t = 7, allow_negative_numbers = true)]
    pub keep_logs: i64,

    /// Log file name prefix, files are named <prefix>.<date>.log
    #[arg(long = "log-prefix", value_name = "NAME", default_value = APP_NAME)]
    pub log_prefix: String,

    /// REQUIRED, absolute path of the directory or directories to rotate, separated by commas
    #[arg(short = 'd', long = "dirs", value_name = "LIST")]
    pub dirs: Option<String>,

    /// REQUIRED, number of files to keep in each directory
    #[arg(short = 'k', long = "keep", value_name = "N", allow_negative_numbers = true)]
    pub keep: Option<i64>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("flag '-d' is not set")]
    MissingDirs,

    #[error("flag '-d' does not name any directory")]
    EmptyDirList,

    #[error("flag '-k' is not set")]
    MissingKeep,

    #[error("flag '{flag}' must not be negative, got {value}")]
    NegativeRetention { flag: &'static str, value: i64 },
}

/// Where the program writes its own logs and how many it keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub dir: Utf8PathBuf,
    pub keep: usize,
    pub file_prefix: String,
}

/// Directories to rotate and the retention count applied to each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSettings {
    pub dirs: Vec<Utf8PathBuf>,
    pub keep: usize,
}

impl Cli {
    pub fn log_settings(&self, work_dir: &Utf8Path) -> Result<LogSettings, ConfigError> {
        Ok(LogSettings {
            dir: self
                .log_dir
                .clone()
                .unwrap_or_else(|| default_log_dir(work_dir)),
            keep: retention("--keep-logs", self.keep_logs)?,
            file_prefix: self.log_prefix.clone(),
        })
    }

    pub fn target_settings(&self) -> Result<TargetSettings, ConfigError> {
        let list = self.dirs.as_deref().ok_or(ConfigError::MissingDirs)?;
        let dirs = parse_dir_list(list);
        if dirs.is_empty() {
            return Err(ConfigError::EmptyDirList);
        }
        let keep = retention("-k", self.keep.ok_or(ConfigError::MissingKeep)?)?;
        Ok(TargetSettings { dirs, keep })
    }
}

fn retention(flag: &'static str, value: i64) -> Result<usize, ConfigError> {
    usize::try_from(value).map_err(|_| ConfigError::NegativeRetention { flag, value })
}
