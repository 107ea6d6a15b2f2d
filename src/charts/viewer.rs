//! Chart Viewer Window
//! Shows one chart per native window; each call blocks until it is closed.

use crate::charts::{Chart, ChartPlotter};
use crate::config::EdaConfig;
use crate::report;
use crate::stats::StatsError;
use eframe::egui;
use polars::prelude::DataFrame;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Failed to prepare chart data: {0}")]
    Stats(#[from] StatsError),
    #[error("Failed to display chart: {0}")]
    Display(String),
}

/// Single-chart window.
struct ChartWindow {
    chart: Chart,
}

impl eframe::App for ChartWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(self.chart.title());
            });
            ChartPlotter::draw(ui, &self.chart);
        });
    }
}

/// Open a window for `chart` and wait until the user closes it.
pub fn show_blocking(chart: Chart) -> Result<(), ChartError> {
    let title = chart.title();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(chart.window_size())
            .with_title(title),
        ..Default::default()
    };

    report::debug(&format!("Displaying '{}'", title));
    eframe::run_native(
        title,
        options,
        Box::new(move |_cc| Ok(Box::new(ChartWindow { chart }))),
    )
    .map_err(|e| ChartError::Display(e.to_string()))
}

/// Histogram of sales with a density overlay.
pub fn plot_sales_distribution(df: &DataFrame, config: &EdaConfig) -> Result<(), ChartError> {
    let chart =
        ChartPlotter::sales_distribution(df, &config.sales_column, config.histogram_bins)?;
    show_blocking(chart)
}

/// Total sales per calendar month.
pub fn plot_monthly_sales(df: &DataFrame, config: &EdaConfig) -> Result<(), ChartError> {
    let chart = ChartPlotter::monthly_trend(df, &config.date_column, &config.sales_column)?;
    show_blocking(chart)
}

/// Average sales with and without promotions.
pub fn plot_promo_sales(df: &DataFrame, config: &EdaConfig) -> Result<(), ChartError> {
    let chart = ChartPlotter::promo_effect(df, &config.promo_column, &config.sales_column)?;
    show_blocking(chart)
}
