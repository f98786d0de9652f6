//! Statistics Calculator Module
//! Scalar reductions behind the metric widgets (mean, median, spread, extremes).

use crate::data::transform::numeric_values;
use crate::data::DataError;
use polars::prelude::DataFrame;
use statrs::statistics::Statistics;

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for ColumnSummary {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
        }
    }
}

impl ColumnSummary {
    /// Summarize the finite values of a slice; NaN cells are ignored.
    pub fn from_values(values: &[f64]) -> Self {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let n = sorted.len();
        if n == 0 {
            return Self::default();
        }
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };

        // Sample standard deviation, like pandas' `std()`
        let std = if n > 1 {
            Statistics::std_dev(sorted.iter())
        } else {
            0.0
        };

        Self {
            count: n,
            mean: Statistics::mean(sorted.iter()),
            median,
            std,
            min: sorted[0],
            max: sorted[n - 1],
        }
    }
}

/// Column-level statistics over loaded tables.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Summarize a numeric column of a table.
    pub fn summarize(df: &DataFrame, column: &str) -> Result<ColumnSummary, DataError> {
        let values = numeric_values(df, column)?;
        Ok(ColumnSummary::from_values(&values))
    }

    /// Mean of a numeric column.
    pub fn mean(df: &DataFrame, column: &str) -> Result<f64, DataError> {
        Ok(Self::summarize(df, column)?.mean)
    }

    /// Maximum of a numeric column.
    pub fn max(df: &DataFrame, column: &str) -> Result<f64, DataError> {
        Ok(Self::summarize(df, column)?.max)
    }
}

/// `value / baseline`, undefined for a zero or non-finite baseline.
pub fn ratio_to_baseline(value: f64, baseline: f64) -> Option<f64> {
    if baseline == 0.0 || !baseline.is_finite() || !value.is_finite() {
        None
    } else {
        Some(value / baseline)
    }
}
