//! Chart Plotter Module
//! Derives chart data from sales frames and draws it using egui_plot.

use crate::stats::{StatsCalculator, StatsError};
use egui::Color32;
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points};
use polars::prelude::DataFrame;
use rayon::prelude::*;
use statrs::distribution::{Continuous, Normal};
use std::collections::BTreeMap;

pub const BAR_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue
pub const LINE_COLOR: Color32 = Color32::from_rgb(231, 76, 60); // Red

/// Grid points for the density curve.
const DENSITY_POINTS: usize = 200;
/// Bandwidths the density curve extends past the data on each side.
const DENSITY_CUT: f64 = 3.0;

/// One histogram bin, `[start, end)`; the last bin also holds `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// A chart ready to draw, with the aggregate it was derived from.
#[derive(Debug, Clone)]
pub enum Chart {
    Distribution {
        bins: Vec<HistogramBin>,
        density: Vec<[f64; 2]>,
    },
    MonthlyTrend(BTreeMap<u32, f64>),
    PromoEffect(BTreeMap<String, f64>),
}

impl Chart {
    pub fn title(&self) -> &'static str {
        match self {
            Chart::Distribution { .. } => "Sales Distribution",
            Chart::MonthlyTrend(_) => "Monthly Sales Trend",
            Chart::PromoEffect(_) => "Average Sales with/without Promotions",
        }
    }

    /// (x, y) axis labels.
    pub fn axis_labels(&self) -> (&'static str, &'static str) {
        match self {
            Chart::Distribution { .. } => ("Sales", "Frequency"),
            Chart::MonthlyTrend(_) => ("Month", "Total Sales"),
            Chart::PromoEffect(_) => ("Promo", "Average Sales"),
        }
    }

    /// Window size in points.
    pub fn window_size(&self) -> [f32; 2] {
        match self {
            Chart::Distribution { .. } => [1200.0, 600.0],
            Chart::MonthlyTrend(_) => [1200.0, 500.0],
            Chart::PromoEffect(_) => [1000.0, 500.0],
        }
    }
}

/// Builds and draws the sales charts.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Histogram of `column` with a density curve scaled to bin counts.
    pub fn sales_distribution(
        df: &DataFrame,
        column: &str,
        bins: usize,
    ) -> Result<Chart, StatsError> {
        let values = StatsCalculator::column_values(df, column)?;
        let bins = Self::histogram(&values, bins);
        let scale = bins
            .first()
            .map(|b| b.width() * values.len() as f64)
            .unwrap_or(0.0);
        let density = Self::density_curve(&values, DENSITY_POINTS, scale);
        Ok(Chart::Distribution { bins, density })
    }

    pub fn monthly_trend(
        df: &DataFrame,
        date_column: &str,
        sales_column: &str,
    ) -> Result<Chart, StatsError> {
        StatsCalculator::monthly_sales(df, date_column, sales_column).map(Chart::MonthlyTrend)
    }

    pub fn promo_effect(
        df: &DataFrame,
        promo_column: &str,
        sales_column: &str,
    ) -> Result<Chart, StatsError> {
        StatsCalculator::promo_sales(df, promo_column, sales_column).map(Chart::PromoEffect)
    }

    /// Equal-width bins over `[min, max]` (NumPy compatible).
    ///
    /// A zero-width range is widened to `min - 0.5 .. max + 0.5`.
    pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
        if values.is_empty() || bins == 0 {
            return Vec::new();
        }

        let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }
        let width = (hi - lo) / bins as f64;

        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                start: lo + i as f64 * width,
                end: if i + 1 == bins {
                    hi
                } else {
                    lo + (i + 1) as f64 * width
                },
                count,
            })
            .collect()
    }

    /// Gaussian kernel density estimate with Scott's rule bandwidth,
    /// multiplied by `scale`.
    ///
    /// Empty when there are fewer than two values or no spread.
    pub fn density_curve(values: &[f64], points: usize, scale: f64) -> Vec<[f64; 2]> {
        let n = values.len();
        if n < 2 || points < 2 {
            return Vec::new();
        }

        let mean = values.iter().sum::<f64>() / n as f64;
        let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        let bandwidth = variance.sqrt() * (n as f64).powf(-0.2);
        if bandwidth <= 0.0 || !bandwidth.is_finite() {
            return Vec::new();
        }

        let Ok(kernel) = Normal::new(0.0, 1.0) else {
            return Vec::new();
        };

        let lo = values.iter().copied().fold(f64::INFINITY, f64::min) - DENSITY_CUT * bandwidth;
        let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max) + DENSITY_CUT * bandwidth;
        let step = (hi - lo) / (points - 1) as f64;

        (0..points)
            .into_par_iter()
            .map(|i| {
                let x = lo + i as f64 * step;
                let sum: f64 = values.iter().map(|&v| kernel.pdf((x - v) / bandwidth)).sum();
                [x, scale * sum / (n as f64 * bandwidth)]
            })
            .collect()
    }

    /// Draw a chart filling the available space.
    pub fn draw(ui: &mut egui::Ui, chart: &Chart) {
        let (x_label, y_label) = chart.axis_labels();
        match chart {
            Chart::Distribution { bins, density } => {
                Self::draw_distribution(ui, bins, density, x_label, y_label)
            }
            Chart::MonthlyTrend(totals) => Self::draw_monthly_trend(ui, totals, x_label, y_label),
            Chart::PromoEffect(means) => Self::draw_promo_effect(ui, means, x_label, y_label),
        }
    }

    fn draw_distribution(
        ui: &mut egui::Ui,
        bins: &[HistogramBin],
        density: &[[f64; 2]],
        x_label: &str,
        y_label: &str,
    ) {
        Plot::new("sales_distribution")
            .legend(Legend::default())
            .x_axis_label(x_label)
            .y_axis_label(y_label)
            .show(ui, |plot_ui| {
                let bars: Vec<Bar> = bins
                    .iter()
                    .map(|b| Bar::new(b.center(), b.count as f64).width(b.width()))
                    .collect();
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .color(BAR_COLOR.gamma_multiply(0.6))
                        .name("Count"),
                );

                if !density.is_empty() {
                    plot_ui.line(
                        Line::new(PlotPoints::from_iter(density.iter().copied()))
                            .color(LINE_COLOR)
                            .width(2.0)
                            .name("Density"),
                    );
                }
            });
    }

    fn draw_monthly_trend(
        ui: &mut egui::Ui,
        totals: &BTreeMap<u32, f64>,
        x_label: &str,
        y_label: &str,
    ) {
        let points: Vec<[f64; 2]> = totals.iter().map(|(&m, &v)| [m as f64, v]).collect();

        Plot::new("monthly_sales")
            .x_axis_label(x_label)
            .y_axis_label(y_label)
            .include_x(1.0)
            .include_x(12.0)
            .x_grid_spacer(|_input| {
                (1..=12)
                    .map(|m| GridMark {
                        value: m as f64,
                        step_size: 1.0,
                    })
                    .collect()
            })
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points.iter().copied()))
                        .color(BAR_COLOR)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .radius(4.0)
                        .color(BAR_COLOR),
                );
            });
    }

    fn draw_promo_effect(
        ui: &mut egui::Ui,
        means: &BTreeMap<String, f64>,
        x_label: &str,
        y_label: &str,
    ) {
        let labels: Vec<String> = means.keys().cloned().collect();

        Plot::new("promo_sales")
            .x_axis_label(x_label)
            .y_axis_label(y_label)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if idx >= 0.0 && (mark.value - idx).abs() < 1e-6 {
                    labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                let bars: Vec<Bar> = means
                    .values()
                    .enumerate()
                    .map(|(i, &mean)| Bar::new(i as f64, mean).width(0.6))
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR));
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn test_histogram_numpy_edges() {
        let bins = ChartPlotter::histogram(&[0.0, 1.0, 2.0, 3.0, 4.0], 4);
        let counts: Vec<usize> = bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 1, 2]);
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[3].end, 4.0);
        assert!((bins[1].center() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_histogram_constant_values() {
        let bins = ChartPlotter::histogram(&[5.0, 5.0, 5.0], 2);
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].start, 4.5);
        assert_eq!(bins[1].end, 5.5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
    }

    #[test]
    fn test_histogram_empty_input() {
        assert!(ChartPlotter::histogram(&[], 30).is_empty());
        assert!(ChartPlotter::histogram(&[1.0], 0).is_empty());
    }

    #[test]
    fn test_density_integrates_to_scale() {
        let values: Vec<f64> = (0..50).map(|i| (i % 10) as f64).collect();
        let curve = ChartPlotter::density_curve(&values, 400, 1.0);
        assert_eq!(curve.len(), 400);

        let step = curve[1][0] - curve[0][0];
        let area: f64 = curve.iter().map(|p| p[1] * step).sum();
        assert!((area - 1.0).abs() < 0.02, "area was {area}");
        assert!(curve.windows(2).all(|w| w[0][0] < w[1][0]));
    }

    #[test]
    fn test_density_needs_spread() {
        assert!(ChartPlotter::density_curve(&[3.0], 200, 1.0).is_empty());
        assert!(ChartPlotter::density_curve(&[3.0, 3.0, 3.0], 200, 1.0).is_empty());
    }

    #[test]
    fn test_sales_distribution_chart() {
        let df = df! {
            "Sales" => [Some(100.0), Some(200.0), None, Some(300.0), Some(250.0)],
        }
        .unwrap();

        let chart = ChartPlotter::sales_distribution(&df, "Sales", 30).unwrap();
        assert_eq!(chart.title(), "Sales Distribution");
        assert_eq!(chart.axis_labels(), ("Sales", "Frequency"));
        match chart {
            Chart::Distribution { bins, density } => {
                assert_eq!(bins.len(), 30);
                assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 4);
                assert_eq!(density.len(), DENSITY_POINTS);
            }
            other => panic!("unexpected chart {other:?}"),
        }
    }

    #[test]
    fn test_promo_effect_chart() {
        let df = df! {
            "Promo" => [0i64, 1, 1],
            "Sales" => [10.0, 20.0, 40.0],
        }
        .unwrap();

        match ChartPlotter::promo_effect(&df, "Promo", "Sales").unwrap() {
            Chart::PromoEffect(means) => {
                assert_eq!(means.get("0"), Some(&10.0));
                assert_eq!(means.get("1"), Some(&30.0));
            }
            other => panic!("unexpected chart {other:?}"),
        }
    }

    #[test]
    fn test_monthly_trend_missing_column() {
        let df = df! { "Sales" => [1.0] }.unwrap();
        assert!(matches!(
            ChartPlotter::monthly_trend(&df, "Date", "Sales"),
            Err(StatsError::ColumnNotFound(_))
        ));
    }
}
