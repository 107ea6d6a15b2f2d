//! Statistics Calculator Module
//! Handles descriptive statistics and the sales aggregates behind the charts.

use chrono::{DateTime, Datelike};
use polars::prelude::*;
use serde::Serialize;
use statrs::statistics::Statistics;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Column '{0}' not found in DataFrame")]
    ColumnNotFound(String),
    #[error("Column '{0}' is not a date column; convert it first")]
    NotTemporal(String),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Descriptive statistics for one column.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryStatistics {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
}

impl Default for SummaryStatistics {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
            median: f64::NAN,
        }
    }
}

impl SummaryStatistics {
    /// The `mean`/`std`/`min`/`max` view, keyed by statistic name.
    pub fn as_map(&self) -> BTreeMap<&'static str, f64> {
        BTreeMap::from([
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("max", self.max),
        ])
    }
}

/// Handles statistical calculations over sales frames.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    ///
    /// `std` is the sample standard deviation (n - 1 denominator), NaN for
    /// fewer than two values.
    pub fn compute_descriptive_stats(values: &[f64]) -> SummaryStatistics {
        let n = values.len();
        if n == 0 {
            return SummaryStatistics::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };

        SummaryStatistics {
            count: n,
            mean: values.iter().mean(),
            std: values.iter().std_dev(),
            min: Statistics::min(values.iter()),
            max: Statistics::max(values.iter()),
            median,
        }
    }

    /// Summary statistics over the non-null values of `column`.
    pub fn summary_statistics(
        df: &DataFrame,
        column: &str,
    ) -> Result<SummaryStatistics, StatsError> {
        let values = Self::column_values(df, column)?;
        Ok(Self::compute_descriptive_stats(&values))
    }

    /// Non-null values of a numeric column.
    pub fn column_values(df: &DataFrame, column: &str) -> Result<Vec<f64>, StatsError> {
        Ok(Self::numeric_values(df, column)?.into_iter().flatten().collect())
    }

    /// Total sales per calendar month (1-12). Rows with a null date or null
    /// sales are skipped.
    pub fn monthly_sales(
        df: &DataFrame,
        date_column: &str,
        sales_column: &str,
    ) -> Result<BTreeMap<u32, f64>, StatsError> {
        let months = Self::months(df, date_column)?;
        let sales = Self::numeric_values(df, sales_column)?;

        let mut totals: BTreeMap<u32, f64> = BTreeMap::new();
        for (month, value) in months.into_iter().zip(sales) {
            if let (Some(m), Some(v)) = (month, value) {
                *totals.entry(m).or_insert(0.0) += v;
            }
        }
        Ok(totals)
    }

    /// Mean sales per distinct promo value. Rows with a null promo flag or
    /// null sales are skipped.
    pub fn promo_sales(
        df: &DataFrame,
        promo_column: &str,
        sales_column: &str,
    ) -> Result<BTreeMap<String, f64>, StatsError> {
        let promo = Self::column(df, promo_column)?.cast(&DataType::String)?;
        let sales = Self::numeric_values(df, sales_column)?;

        let mut groups: HashMap<String, (f64, usize)> = HashMap::new();
        for (flag, value) in promo.str()?.into_iter().zip(sales) {
            if let (Some(f), Some(v)) = (flag, value) {
                let entry = groups.entry(f.to_string()).or_insert((0.0, 0));
                entry.0 += v;
                entry.1 += 1;
            }
        }

        Ok(groups
            .into_iter()
            .map(|(flag, (sum, count))| (flag, sum / count as f64))
            .collect())
    }

    fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, StatsError> {
        df.column(name)
            .map_err(|_| StatsError::ColumnNotFound(name.to_string()))
    }

    /// Column values as f64, one entry per row; NaN is treated as missing.
    fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, StatsError> {
        let series = Self::column(df, name)?
            .as_materialized_series()
            .strict_cast(&DataType::Float64)?;
        Ok(series
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect())
    }

    /// Calendar month of every row of a `Date` or `Datetime` column. Days
    /// outside chrono's range count as missing.
    fn months(df: &DataFrame, name: &str) -> Result<Vec<Option<u32>>, StatsError> {
        let col = Self::column(df, name)?;
        let dates = match col.dtype() {
            DataType::Date => col.clone(),
            DataType::Datetime(_, _) => col.cast(&DataType::Date)?,
            _ => return Err(StatsError::NotTemporal(name.to_string())),
        };

        let days = dates.cast(&DataType::Int32)?;
        Ok(days
            .i32()?
            .into_iter()
            .map(|d| {
                d.and_then(|d| DateTime::from_timestamp(i64::from(d) * SECONDS_PER_DAY, 0))
                    .map(|date| date.month())
            })
            .collect())
    }
}
