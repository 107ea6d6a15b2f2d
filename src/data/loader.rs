//! CSV Data Loader Module
//! Loads the training and testing CSV files using Polars.

use crate::report;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File '{}' does not exist", .0.display())]
    FileNotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
}

/// Tokens read as missing, in addition to empty fields.
const NA_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Handles CSV file loading with Polars.
pub struct DataLoader {
    /// Rows scanned to infer column types; `None` scans the whole file.
    infer_schema_length: Option<usize>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new(None)
    }
}

impl DataLoader {
    pub fn new(infer_schema_length: Option<usize>) -> Self {
        Self {
            infer_schema_length,
        }
    }

    /// Load the training and testing CSV files.
    ///
    /// The training path is checked before the testing path is touched.
    pub fn load(
        &self,
        training_path: &Path,
        testing_path: &Path,
    ) -> Result<(DataFrame, DataFrame), LoaderError> {
        Self::ensure_file(training_path)?;
        Self::ensure_file(testing_path)?;

        let training = self.load_csv(training_path)?;
        let testing = self.load_csv(testing_path)?;

        for (label, df) in [("training", &training), ("testing", &testing)] {
            report::info(&format!(
                "Loaded {} data with {} rows and {} columns",
                label,
                df.height(),
                df.width()
            ));
        }
        println!("Data loaded successfully.");

        Ok((training, testing))
    }

    /// Load a single CSV file with a header row.
    pub fn load_csv(&self, path: &Path) -> Result<DataFrame, LoaderError> {
        Self::ensure_file(path)?;

        let path_str = path.to_string_lossy().to_string();
        let df = LazyCsvReader::new(path_str.as_str())
            .with_has_header(true)
            .with_infer_schema_length(self.infer_schema_length)
            .with_null_values(Some(NullValues::AllColumns(
                NA_TOKENS.iter().map(|token| (*token).into()).collect(),
            )))
            .finish()?
            .collect()?;

        report::debug(&format!("Parsed '{}': {:?}", path_str, df.get_column_names()));
        Ok(df)
    }

    fn ensure_file(path: &Path) -> Result<(), LoaderError> {
        if path.is_file() {
            Ok(())
        } else {
            report::error(&format!("File '{}' does not exist", path.display()));
            Err(LoaderError::FileNotFound(path.to_path_buf()))
        }
    }
}
