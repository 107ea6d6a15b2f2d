//! Diagnostic Logger Module
//! Appends `timestamp - LEVEL - message` lines to a single log file.

use crate::config::LogSettings;
use log::Level;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

const TARGET: &str = "EDA_Logger";

/// Path of the installed log file, set once per process.
static INSTALLED: Mutex<Option<PathBuf>> = Mutex::new(None);

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to open log file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Another logger is already installed")]
    AlreadyInstalled,
}

/// Create the log directory, open the log file in append mode and install it
/// as the `log` backend. Later calls return the already installed path.
pub fn init_logging(settings: &LogSettings) -> Result<PathBuf, ReportError> {
    let mut installed = INSTALLED.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(path) = installed.as_ref() {
        return Ok(path.clone());
    }

    fs::create_dir_all(&settings.log_dir)?;
    let path = settings.file_path();
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    env_logger::Builder::new()
        .filter_level(settings.level_filter())
        .write_style(env_logger::WriteStyle::Never)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format(|buf, record| {
            let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f");
            writeln!(
                buf,
                "{}",
                format_line(&timestamp.to_string(), record.level(), &record.args().to_string())
            )
        })
        .try_init()
        .map_err(|_| ReportError::AlreadyInstalled)?;

    *installed = Some(path.clone());
    Ok(path)
}

/// Level names as written to the log file.
fn level_name(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARNING",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

fn format_line(timestamp: &str, level: Level, message: &str) -> String {
    format!("{} - {} - {}", timestamp, level_name(level), message)
}

pub fn debug(message: &str) {
    log::debug!(target: TARGET, "{message}");
}

pub fn info(message: &str) {
    log::info!(target: TARGET, "{message}");
}

pub fn warning(message: &str) {
    log::warn!(target: TARGET, "{message}");
}

pub fn error(message: &str) {
    log::error!(target: TARGET, "{message}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_format() {
        let line = format_line("2024-03-01 10:00:00,123", Level::Warn, "low stock");
        assert_eq!(line, "2024-03-01 10:00:00,123 - WARNING - low stock");
        assert_eq!(level_name(Level::Error), "ERROR");
        assert_eq!(level_name(Level::Debug), "DEBUG");
    }

    // The only test in this binary that installs the global logger.
    #[test]
    fn test_init_creates_directory_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let settings = LogSettings {
            log_dir: dir.path().join("logs"),
            ..LogSettings::default()
        };

        let path = init_logging(&settings).unwrap();
        assert!(settings.log_dir.is_dir());
        assert_eq!(path, settings.file_path());

        info("store 42 loaded");
        warning("store 42 has gaps");
        debug("dropped below threshold");
        log::logger().flush();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert!(lines.iter().any(|l| l.ends_with(" - INFO - store 42 loaded")));
        assert!(lines.iter().any(|l| l.ends_with(" - WARNING - store 42 has gaps")));
        assert!(!contents.contains("dropped below threshold"));

        let again = init_logging(&LogSettings::default()).unwrap();
        assert_eq!(again, path);
    }
}
