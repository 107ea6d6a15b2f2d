//! Configuration Module
//! Run settings with defaults, optionally overridden by a JSON file.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Log file settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub log_dir: PathBuf,
    pub file_name: String,
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            file_name: "eda.log".to_string(),
            level: "info".to_string(),
        }
    }
}

impl LogSettings {
    /// Full path of the log file.
    pub fn file_path(&self) -> PathBuf {
        self.log_dir.join(&self.file_name)
    }

    /// Threshold as a `log` filter; unknown names fall back to `Info`.
    pub fn level_filter(&self) -> log::LevelFilter {
        let name = match self.level.to_ascii_lowercase().as_str() {
            "warning" => "warn".to_string(),
            other => other.to_string(),
        };
        log::LevelFilter::from_str(&name).unwrap_or(log::LevelFilter::Info)
    }
}

/// Settings for one EDA run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EdaConfig {
    pub training_path: PathBuf,
    pub testing_path: PathBuf,
    pub date_column: String,
    pub sales_column: String,
    pub promo_column: String,
    pub histogram_bins: usize,
    /// Rows scanned to infer column types; `None` scans the whole file.
    pub infer_schema_length: Option<usize>,
    pub show_charts: bool,
    pub logging: LogSettings,
}

impl Default for EdaConfig {
    fn default() -> Self {
        Self {
            training_path: PathBuf::from("data/train.csv"),
            testing_path: PathBuf::from("data/test.csv"),
            date_column: "Date".to_string(),
            sales_column: "Sales".to_string(),
            promo_column: "Promo".to_string(),
            histogram_bins: 30,
            infer_schema_length: None,
            show_charts: true,
            logging: LogSettings::default(),
        }
    }
}

impl EdaConfig {
    /// Read settings from a JSON file, or use defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Override the input paths from positional arguments.
    pub fn with_inputs(mut self, mut args: impl Iterator<Item = String>) -> Self {
        if let Some(train) = args.next() {
            self.training_path = PathBuf::from(train);
        }
        if let Some(test) = args.next() {
            self.testing_path = PathBuf::from(test);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EdaConfig::load(&dir.path().join("eda.json")).unwrap();
        assert_eq!(config.sales_column, "Sales");
        assert_eq!(config.histogram_bins, 30);
        assert_eq!(config.infer_schema_length, None);
        assert_eq!(config.logging.file_path(), PathBuf::from("logs").join("eda.log"));
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"sales_column": "Revenue", "infer_schema_length": 500, "logging": {{"level": "debug"}}}}"#
        )
        .unwrap();

        let config = EdaConfig::load(file.path()).unwrap();
        assert_eq!(config.sales_column, "Revenue");
        assert_eq!(config.infer_schema_length, Some(500));
        assert_eq!(config.date_column, "Date");
        assert_eq!(config.logging.file_name, "eda.log");
        assert_eq!(config.logging.level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(EdaConfig::load(file.path()), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_level_names() {
        let mut settings = LogSettings::default();
        assert_eq!(settings.level_filter(), log::LevelFilter::Info);
        settings.level = "WARNING".to_string();
        assert_eq!(settings.level_filter(), log::LevelFilter::Warn);
        settings.level = "verbose".to_string();
        assert_eq!(settings.level_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn test_positional_inputs() {
        let config = EdaConfig::default()
            .with_inputs(vec!["a.csv".to_string()].into_iter());
        assert_eq!(config.training_path, PathBuf::from("a.csv"));
        assert_eq!(config.testing_path, PathBuf::from("data/test.csv"));
    }
}
