use std::time::Instant;

use anyhow::Result;
use camino::Utf8Path;
use tracing::{debug, info, warn};

use crate::cli::{Cli, LogSettings, TargetSettings};
use crate::rotator::{rotate, RotateError};
use crate::util::APP_NAME;

/// Outcome of rotating a batch of directories.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RotationSummary {
    pub rotated: usize,
    pub failed: usize,
    pub deleted: usize,
}

pub fn run(cli: &Cli, log_settings: &LogSettings, started: Instant) -> Result<()> {
    info!(app = APP_NAME, version = env!("CARGO_PKG_VERSION"), "Program started");

    // Own logs first, whatever else happens afterwards
    rotate_logs(log_settings);

    let targets = cli.target_settings()?;
    info!(dirs = targets.dirs.len(), keep = targets.keep, "Rotating target directories");
    let summary = rotate_targets(&targets);
    info!(
        rotated = summary.rotated,
        failed = summary.failed,
        deleted = summary.deleted,
        "Rotation finished"
    );

    info!(elapsed_secs = started.elapsed().as_secs_f64(), "Program done");
    Ok(())
}

pub fn rotate_logs(settings: &LogSettings) {
    info!(log_dir = %settings.dir, keep = settings.keep, "Log rotation first");
    if let Err(err) = rotate_dir(&settings.dir, settings.keep) {
        warn!(log_dir = %settings.dir, error = %err, "Failed to rotate logs");
    }
}

/// Rotate every target directory in order. A failing directory is logged and
/// counted, the remaining ones are still processed.
pub fn rotate_targets(settings: &TargetSettings) -> RotationSummary {
    let mut summary = RotationSummary::default();
    for dir in &settings.dirs {
        match rotate_dir(dir, settings.keep) {
            Ok(deleted) => {
                summary.rotated += 1;
                summary.deleted += deleted;
            }
            Err(err) => {
                warn!(dir = %dir, error = %err, "Failed to rotate directory");
                summary.failed += 1;
                summary.deleted += err.deleted().len();
            }
        }
    }
    summary
}

// Rotate one directory and log what was removed; returns the deletion count
fn rotate_dir(dir: &Utf8Path, keep: usize) -> Result<usize, RotateError> {
    let result = rotate(dir.as_std_path(), keep);
    let deleted = match &result {
        Ok(deleted) => deleted.as_slice(),
        Err(err) => err.deleted(),
    };
    for path in deleted {
        debug!(file = %path.display(), "Deleted");
    }
    if let Err(RotateError::PartialDeletion { failures, .. }) = &result {
        for failure in failures {
            warn!(file = %failure.path.display(), error = %failure.source, "Failed to delete file");
        }
    }

    let count = deleted.len();
    result?;
    info!(dir = %dir, keep, deleted = count, "Rotated directory");
    Ok(count)
}
