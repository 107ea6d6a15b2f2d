//! Stats module - descriptive statistics and sales aggregates

mod calculator;

pub use calculator::{StatsCalculator, StatsError};
