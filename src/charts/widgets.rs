//! Metric and Table Widgets
//! Scalar metric cards and display-ready tables derived from transformed data.

use crate::data::transform::{numeric_values, text_values};
use crate::data::DataError;
use crate::stats::{ratio_to_baseline, StatsCalculator};
use polars::prelude::{DataFrame, DataType};

/// A single number shown as a card.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub label: String,
    pub value: f64,
    pub unit: String,
    /// Secondary figure shown under the value, e.g. a ratio vs a baseline.
    pub delta: Option<f64>,
    pub delta_caption: String,
}

impl Metric {
    pub fn new(label: &str, value: f64, unit: &str) -> Self {
        Self {
            label: label.to_string(),
            value,
            unit: unit.to_string(),
            delta: None,
            delta_caption: String::new(),
        }
    }

    pub fn with_delta(mut self, delta: Option<f64>, caption: &str) -> Self {
        self.delta = delta;
        self.delta_caption = caption.to_string();
        self
    }

    /// Value with two decimals and unit, `"61.30 Mbps"`.
    pub fn display_value(&self) -> String {
        if !self.value.is_finite() {
            return "-".to_string();
        }
        if self.unit.is_empty() {
            format!("{:.2}", self.value)
        } else {
            format!("{:.2} {}", self.value, self.unit)
        }
    }

    pub fn display_delta(&self) -> Option<String> {
        self.delta
            .map(|d| format!("×{:.2} {}", d, self.delta_caption).trim_end().to_string())
    }
}

/// Mean of a column as a metric.
pub fn mean_metric(
    df: &DataFrame,
    column: &str,
    label: &str,
    unit: &str,
) -> Result<Metric, DataError> {
    Ok(Metric::new(label, StatsCalculator::mean(df, column)?, unit))
}

/// Maximum of a column as a metric.
pub fn max_metric(
    df: &DataFrame,
    column: &str,
    label: &str,
    unit: &str,
) -> Result<Metric, DataError> {
    Ok(Metric::new(label, StatsCalculator::max(df, column)?, unit))
}

/// Minimum of a column as a metric.
pub fn min_metric(
    df: &DataFrame,
    column: &str,
    label: &str,
    unit: &str,
) -> Result<Metric, DataError> {
    Ok(Metric::new(label, StatsCalculator::summarize(df, column)?.min, unit))
}

/// A value with its ratio to a baseline.
pub fn ratio_metric(label: &str, value: f64, baseline: f64, unit: &str, caption: &str) -> Metric {
    Metric::new(label, value, unit).with_delta(ratio_to_baseline(value, baseline), caption)
}

/// A table already formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub id: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    /// Format the selected columns of a table. Float columns get two
    /// decimals; integer and text columns are shown as-is.
    pub fn from_frame(id: &str, df: &DataFrame, columns: &[&str]) -> Result<Self, DataError> {
        let mut formatted: Vec<Vec<String>> = Vec::with_capacity(columns.len());

        for name in columns {
            let column = df
                .column(name)
                .map_err(|_| DataError::missing_column(name))?;
            let cells = if df.height() == 0 {
                Vec::new()
            } else if matches!(column.dtype(), DataType::Float32 | DataType::Float64) {
                numeric_values(df, name)?
                    .into_iter()
                    .map(|v| if v.is_finite() { format!("{:.2}", v) } else { "-".to_string() })
                    .collect()
            } else {
                text_values(df, name)?
            };
            formatted.push(cells);
        }

        let rows = (0..df.height())
            .map(|i| formatted.iter().map(|c| c[i].clone()).collect())
            .collect();

        Ok(Self {
            id: id.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn speeds() -> DataFrame {
        df!(
            "Provincia" => ["CABA", "Chubut", "Salta"],
            "Mbps" => [170.0, 10.0, 40.0]
        )
        .unwrap()
    }

    #[test]
    fn metric_reductions() {
        let df = speeds();
        let mean = mean_metric(&df, "Mbps", "Promedio", "Mbps").unwrap();
        assert!((mean.value - 220.0 / 3.0).abs() < 1e-9);
        assert_eq!(max_metric(&df, "Mbps", "Máximo", "Mbps").unwrap().value, 170.0);
        assert_eq!(min_metric(&df, "Mbps", "Mínimo", "Mbps").unwrap().value, 10.0);
    }

    #[test]
    fn ratio_metric_formats_delta() {
        let metric = ratio_metric("Máximo", 170.0, 85.0, "Mbps", "vs promedio");
        assert_eq!(metric.display_value(), "170.00 Mbps");
        assert_eq!(metric.display_delta().as_deref(), Some("×2.00 vs promedio"));

        let undefined = ratio_metric("Máximo", 170.0, 0.0, "Mbps", "vs promedio");
        assert_eq!(undefined.display_delta(), None);
    }

    #[test]
    fn table_view_formats_floats() {
        let table = TableView::from_frame("t", &speeds(), &["Provincia", "Mbps"]).unwrap();
        assert_eq!(table.columns, vec!["Provincia", "Mbps"]);
        assert_eq!(table.rows[0], vec!["CABA", "170.00"]);
        assert_eq!(table.rows.len(), 3);
    }

    #[test]
    fn table_view_missing_column() {
        assert!(TableView::from_frame("t", &speeds(), &["Año"])
            .unwrap_err()
            .is_schema());
    }
}
