//! Retail EDA - Exploratory analysis of retail sales CSV data
//!
//! Loads training and testing data, cleans it, prints summary statistics and
//! shows distribution, monthly trend and promotion charts.

mod charts;
mod config;
mod data;
mod report;
mod stats;

use anyhow::{Context, Result};
use config::EdaConfig;
use data::{DataCleaner, DataLoader};
use stats::StatsCalculator;
use std::path::Path;

fn main() -> Result<()> {
    let config = EdaConfig::load(Path::new("eda.json"))
        .context("reading eda.json")?
        .with_inputs(std::env::args().skip(1));

    let log_path = report::init_logging(&config.logging).context("opening log file")?;
    report::info(&format!("EDA run started, logging to {}", log_path.display()));

    if let Err(e) = run(&config) {
        report::error(&format!("{:#}", e));
        return Err(e);
    }
    report::info("EDA run finished");
    Ok(())
}

fn run(config: &EdaConfig) -> Result<()> {
    let loader = DataLoader::new(config.infer_schema_length);
    let (training, testing) = loader.load(&config.training_path, &config.testing_path)?;

    for (label, df) in [("training", &training), ("testing", &testing)] {
        let missing = DataCleaner::check_missing_values(df).only_missing();
        if missing.total() == 0 {
            println!("No missing values in {} data.", label);
        } else {
            println!("Missing values in {} data: {}", label, missing);
        }
        if let Some(count) = missing.get(&config.sales_column) {
            report::warning(&format!(
                "{} {} value(s) missing in {} data",
                count, config.sales_column, label
            ));
        }
    }

    let mut training = DataCleaner::remove_duplicates(&training)?;
    DataCleaner::convert_date_column(&mut training, &config.date_column)
        .context("preparing training dates")?;

    let mut testing = DataCleaner::remove_duplicates(&testing)?;
    if testing.column(&config.date_column).is_ok() {
        DataCleaner::convert_date_column(&mut testing, &config.date_column)
            .context("preparing testing dates")?;
    }

    let summary = StatsCalculator::summary_statistics(&training, &config.sales_column)
        .with_context(|| format!("summarizing '{}'", config.sales_column))?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    report::info(&format!(
        "Summary statistics for '{}': {:?}",
        config.sales_column,
        summary.as_map()
    ));

    if config.show_charts {
        charts::plot_sales_distribution(&training, config)?;
        charts::plot_monthly_sales(&training, config)?;
        charts::plot_promo_sales(&training, config)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs;

    #[test]
    fn test_pipeline_from_csv_files() {
        let dir = tempfile::tempdir().unwrap();
        let train = dir.path().join("train.csv");
        let test = dir.path().join("test.csv");
        fs::write(
            &train,
            "Date,Sales,Promo\n2023-01-05,100,0\n2023-02-10,200,1\ninvalid,100,0\n2023-02-10,200,1\n",
        )
        .unwrap();
        fs::write(&test, "Date,Promo\n2023-03-01,1\n").unwrap();

        let config = EdaConfig::default();
        let (training, testing) = DataLoader::new(config.infer_schema_length)
            .load(&train, &test)
            .unwrap();
        assert_eq!(training.height(), 4);
        assert_eq!(testing.height(), 1);

        let mut training = DataCleaner::remove_duplicates(&training).unwrap();
        assert_eq!(training.height(), 3);

        DataCleaner::convert_date_column(&mut training, "Date").unwrap();
        assert_eq!(training.height(), 3);
        assert_eq!(DataCleaner::check_missing_values(&training).get("Date"), Some(1));

        let monthly = StatsCalculator::monthly_sales(&training, "Date", "Sales").unwrap();
        assert_eq!(monthly, BTreeMap::from([(1, 100.0), (2, 200.0)]));

        let summary = StatsCalculator::summary_statistics(&training, "Sales").unwrap();
        assert_eq!(summary.count, 3);
        assert!((summary.mean - 400.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.min, 100.0);
        assert_eq!(summary.max, 200.0);

        let promo = StatsCalculator::promo_sales(&training, "Promo", "Sales").unwrap();
        assert_eq!(promo.get("0"), Some(&100.0));
        assert_eq!(promo.get("1"), Some(&200.0));
    }
}
