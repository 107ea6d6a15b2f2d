//! Data Cleaner Module
//! Handles missing value checks, duplicate removal and date parsing.

use crate::report;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("Column '{0}' not found in DataFrame")]
    ColumnNotFound(String),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Date-only layouts tried in order.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Date-time layouts tried in order; the time part is dropped.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

/// Null counts per column, in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingValueReport {
    pub columns: Vec<(String, usize)>,
}

impl MissingValueReport {
    /// Null count for a column, if the column exists.
    pub fn get(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, count)| *count)
    }

    /// Only the columns with at least one missing value.
    pub fn only_missing(&self) -> MissingValueReport {
        MissingValueReport {
            columns: self
                .columns
                .iter()
                .filter(|(_, count)| *count > 0)
                .cloned()
                .collect(),
        }
    }

    pub fn total(&self) -> usize {
        self.columns.iter().map(|(_, count)| count).sum()
    }
}

impl std::fmt::Display for MissingValueReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .columns
            .iter()
            .map(|(name, count)| format!("{}: {}", name, count))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// Handles data cleaning operations.
pub struct DataCleaner;

impl DataCleaner {
    /// Count null entries in every column.
    pub fn check_missing_values(df: &DataFrame) -> MissingValueReport {
        let report = MissingValueReport {
            columns: df
                .get_columns()
                .iter()
                .map(|col| (col.name().to_string(), col.null_count()))
                .collect(),
        };
        report::info(&format!("Missing values found: {}", report));
        report
    }

    /// Drop rows identical to an earlier row, keeping first occurrences in order.
    pub fn remove_duplicates(df: &DataFrame) -> Result<DataFrame, CleanerError> {
        let initial_rows = df.height();
        let cleaned = df
            .clone()
            .lazy()
            .unique_stable(None, UniqueKeepStrategy::First)
            .collect()?;

        let removed = initial_rows - cleaned.height();
        println!("Removed {} duplicate rows.", removed);
        report::info(&format!("Removed {} duplicate rows", removed));
        Ok(cleaned)
    }

    /// Replace `column` with a `Date` column. Values that cannot be parsed
    /// become null.
    pub fn convert_date_column<'a>(
        df: &'a mut DataFrame,
        column: &str,
    ) -> Result<&'a mut DataFrame, CleanerError> {
        let source = df
            .column(column)
            .map_err(|_| CleanerError::ColumnNotFound(column.to_string()))?;

        let converted = match source.dtype() {
            DataType::Date => None,
            DataType::Datetime(_, _) => Some(source.cast(&DataType::Date)?),
            _ => {
                let text = source.cast(&DataType::String)?;
                let parsed: Vec<Option<NaiveDate>> =
                    text.str()?.into_iter().map(|value| value.and_then(parse_date)).collect();

                let coerced = parsed.iter().filter(|d| d.is_none()).count() - text.null_count();
                if coerced > 0 {
                    report::warning(&format!(
                        "{} value(s) in '{}' could not be parsed as dates and were set to null",
                        coerced, column
                    ));
                }

                let dates = DateChunked::from_naive_date_options(source.name().clone(), parsed);
                Some(Column::from(dates.into_series()))
            }
        };

        if let Some(col) = converted {
            df.with_column(col)?;
        }

        println!("Column '{}' converted to datetime.", column);
        report::info(&format!("Column '{}' converted to datetime", column));
        Ok(df)
    }
}

/// Parse a single cell; `None` for anything unrecognised.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
}
