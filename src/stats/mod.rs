//! Stats module - Scalar metrics over table columns

mod calculator;

pub use calculator::{ratio_to_baseline, ColumnSummary, StatsCalculator};
