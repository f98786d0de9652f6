//! Chart Specification Module
//! Shapes transformed tables into renderer-independent chart descriptions:
//! chart kind, axis bindings, color grouping, titles and the plotted values.

use crate::data::transform::{numeric_values, text_values};
use crate::data::DataError;
use polars::prelude::DataFrame;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    GroupedBar,
    Line,
    Pie,
    Heatmap,
}

/// One named series, aligned index-by-index with the chart categories.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub value: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartBody {
    /// Bars and lines: x categories with one or more series.
    Categorical {
        categories: Vec<String>,
        series: Vec<Series>,
    },
    /// Pie slices.
    Slices(Vec<Slice>),
    /// Heatmap: `cells[row][column]`, missing combinations are `None`.
    Grid {
        rows: Vec<String>,
        columns: Vec<String>,
        cells: Vec<Vec<Option<f64>>>,
    },
}

/// Everything the plotter needs to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub id: String,
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Column whose values pick the colors (one color per distinct value).
    pub color_by: Option<String>,
    pub legend_title: Option<String>,
    pub body: ChartBody,
}

impl ChartSpec {
    fn new(id: &str, kind: ChartKind, x_label: &str, y_label: &str, body: ChartBody) -> Self {
        Self {
            id: id.to_string(),
            kind,
            title: String::new(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            color_by: None,
            legend_title: None,
            body,
        }
    }

    /// One bar per row: `x` gives the category, `y` the height.
    pub fn bar(id: &str, df: &DataFrame, x: &str, y: &str) -> Result<Self, DataError> {
        let values = numeric_values(df, y)?;
        let categories = text_values(df, x)?;
        let series = vec![Series {
            name: y.to_string(),
            values: values.into_iter().map(finite).collect(),
        }];

        Ok(Self::new(
            id,
            ChartKind::Bar,
            x,
            y,
            ChartBody::Categorical { categories, series },
        ))
    }

    /// Side-by-side bars, one series per `(column, display name)`.
    pub fn grouped_bar(
        id: &str,
        df: &DataFrame,
        x: &str,
        columns: &[(&str, &str)],
    ) -> Result<Self, DataError> {
        let mut spec = Self::wide_series(id, ChartKind::GroupedBar, df, x, columns)?;
        spec.color_by = Some(x.to_string());
        Ok(spec)
    }

    /// Lines from wide columns, one series per `(column, display name)`.
    pub fn line(
        id: &str,
        df: &DataFrame,
        x: &str,
        columns: &[(&str, &str)],
    ) -> Result<Self, DataError> {
        Self::wide_series(id, ChartKind::Line, df, x, columns)
    }

    fn wide_series(
        id: &str,
        kind: ChartKind,
        df: &DataFrame,
        x: &str,
        columns: &[(&str, &str)],
    ) -> Result<Self, DataError> {
        let categories = text_values(df, x)?;
        let series = columns
            .iter()
            .map(|(column, name)| {
                Ok(Series {
                    name: (*name).to_string(),
                    values: numeric_values(df, column)?.into_iter().map(finite).collect(),
                })
            })
            .collect::<Result<Vec<_>, DataError>>()?;

        let y_label = columns.first().map(|(c, _)| *c).unwrap_or_default();
        Ok(Self::new(
            id,
            kind,
            x,
            y_label,
            ChartBody::Categorical { categories, series },
        ))
    }

    /// Lines from a long table: one series per distinct `color` value.
    pub fn long_line(
        id: &str,
        df: &DataFrame,
        x: &str,
        color: &str,
        y: &str,
    ) -> Result<Self, DataError> {
        let values = numeric_values(df, y)?;
        let xs = text_values(df, x)?;
        let groups = text_values(df, color)?;

        let mut categories: Vec<String> = Vec::new();
        let mut category_index: HashMap<String, usize> = HashMap::new();
        for x in &xs {
            if !category_index.contains_key(x) {
                category_index.insert(x.clone(), categories.len());
                categories.push(x.clone());
            }
        }

        let mut series: Vec<Series> = Vec::new();
        let mut series_index: HashMap<String, usize> = HashMap::new();
        for ((x, group), value) in xs.iter().zip(groups.iter()).zip(values) {
            let s = *series_index.entry(group.clone()).or_insert_with(|| {
                series.push(Series {
                    name: group.clone(),
                    values: vec![None; categories.len()],
                });
                series.len() - 1
            });
            series[s].values[category_index[x]] = finite(value);
        }

        let mut spec = Self::new(
            id,
            ChartKind::Line,
            x,
            y,
            ChartBody::Categorical { categories, series },
        );
        spec.color_by = Some(color.to_string());
        spec.legend_title = Some(color.to_string());
        Ok(spec)
    }

    /// Pie slices from a label column and a value column.
    pub fn pie(id: &str, df: &DataFrame, label: &str, value: &str) -> Result<Self, DataError> {
        let values = numeric_values(df, value)?;
        let labels = text_values(df, label)?;
        let percents = crate::data::transform::percent_of_total(&values);

        let slices = labels
            .into_iter()
            .zip(values)
            .zip(percents)
            .map(|((label, value), percent)| Slice {
                label,
                value,
                percent,
            })
            .collect();

        let mut spec = Self::new(id, ChartKind::Pie, label, value, ChartBody::Slices(slices));
        spec.color_by = Some(label.to_string());
        Ok(spec)
    }

    /// Grid of `value` by (`row`, `column`), both in first-seen order.
    /// When a combination repeats, the last row wins. Rows with an empty
    /// row or column key are skipped.
    pub fn heatmap(
        id: &str,
        df: &DataFrame,
        row: &str,
        column: &str,
        value: &str,
    ) -> Result<Self, DataError> {
        let values = numeric_values(df, value)?;
        let row_keys = text_values(df, row)?;
        let column_keys = text_values(df, column)?;

        let rows = first_seen(&row_keys);
        let columns = first_seen(&column_keys);
        let row_index: HashMap<&str, usize> =
            rows.iter().enumerate().map(|(i, r)| (r.as_str(), i)).collect();
        let column_index: HashMap<&str, usize> =
            columns.iter().enumerate().map(|(i, c)| (c.as_str(), i)).collect();

        let mut cells = vec![vec![None; columns.len()]; rows.len()];
        for ((r, c), v) in row_keys.iter().zip(column_keys.iter()).zip(values) {
            if r.is_empty() || c.is_empty() {
                continue;
            }
            cells[row_index[r.as_str()]][column_index[c.as_str()]] = finite(v);
        }

        Ok(Self::new(
            id,
            ChartKind::Heatmap,
            column,
            row,
            ChartBody::Grid {
                rows,
                columns,
                cells,
            },
        ))
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_labels(mut self, x_label: &str, y_label: &str) -> Self {
        self.x_label = x_label.to_string();
        self.y_label = y_label.to_string();
        self
    }

    pub fn colored_by(mut self, column: &str) -> Self {
        self.color_by = Some(column.to_string());
        self
    }

    pub fn with_legend_title(mut self, title: &str) -> Self {
        self.legend_title = Some(title.to_string());
        self
    }

    /// Number of plotted values (bars, points, slices or filled cells).
    pub fn point_count(&self) -> usize {
        match &self.body {
            ChartBody::Categorical { series, .. } => series
                .iter()
                .map(|s| s.values.iter().filter(|v| v.is_some()).count())
                .sum(),
            ChartBody::Slices(slices) => slices.len(),
            ChartBody::Grid { cells, .. } => cells.iter().flatten().filter(|c| c.is_some()).count(),
        }
    }
}

fn finite(v: f64) -> Option<f64> {
    if v.is_finite() {
        Some(v)
    } else {
        None
    }
}

fn first_seen(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values {
        if !v.is_empty() && !out.contains(v) {
            out.push(v.clone());
        }
    }
    out
}
