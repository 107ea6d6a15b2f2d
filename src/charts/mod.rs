//! Charts module - Chart data and display

mod plotter;
mod viewer;

pub use plotter::{Chart, ChartPlotter};
pub use viewer::{plot_monthly_sales, plot_promo_sales, plot_sales_distribution};
