//! Writes fatal errors to timestamped files under `<app_data>/logs`.

use chrono::Local;
use std::{
    fmt::Display,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use super::paths::{app_data_dir, ensure_dir, logs_dir_in};

/// Records `error` in `<app_data>/logs/error_<timestamp>.log` and returns the file path.
pub fn log_error(error: &dyn Display) -> io::Result<PathBuf> {
    log_error_in(&app_data_dir(), error)
}

pub fn log_error_in(base: &Path, error: &dyn Display) -> io::Result<PathBuf> {
    let dir = logs_dir_in(base);
    ensure_dir(&dir)?;

    let now = Local::now();
    let path = dir.join(format!("error_{}.log", now.format("%Y-%m-%d_%H-%M-%S")));
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    writeln!(file, "Finance Tracker Error Log")?;
    writeln!(file, "Timestamp: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;
    writeln!(file, "{error}")?;
    tracing::error!(path = %path.display(), error = %error, "Error written to log file");
    Ok(path)
}
