//! Charts module - Chart specifications, widgets and rendering

mod plotter;
mod spec;
mod widgets;

pub use plotter::{ChartPlotter, PALETTE};
pub use spec::{ChartBody, ChartKind, ChartSpec, Series, Slice};
pub use widgets::{max_metric, mean_metric, min_metric, ratio_metric, Metric, TableView};
