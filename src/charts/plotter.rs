//! Chart Plotter Module
//! Draws chart specifications and tables with egui_plot / egui.

use crate::charts::spec::{ChartBody, ChartKind, ChartSpec, Series, Slice};
use crate::charts::widgets::TableView;
use egui::{Color32, RichText, Stroke};
use egui_plot::{
    Bar, BarChart, Corner, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon,
    Text,
};
use std::f64::consts::{FRAC_PI_2, TAU};
use std::ops::RangeInclusive;

/// Color palette for categories and series
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(121, 85, 72),   // Brown
    Color32::from_rgb(96, 125, 139),  // Blue Grey
];

/// Heatmap color ramp endpoints (low → high)
const HEAT_LOW: Color32 = Color32::from_rgb(222, 235, 247);
const HEAT_HIGH: Color32 = Color32::from_rgb(8, 48, 107);

const CHART_HEIGHT: f32 = 340.0;

/// Draws `ChartSpec`s with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Color for the n-th category or series.
    pub fn color_for(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Linear interpolation on the heatmap ramp, `t` in [0, 1].
    pub fn heat_color(t: f64) -> Color32 {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color32::from_rgb(
            lerp(HEAT_LOW.r(), HEAT_HIGH.r()),
            lerp(HEAT_LOW.g(), HEAT_HIGH.g()),
            lerp(HEAT_LOW.b(), HEAT_HIGH.b()),
        )
    }

    /// Draw title plus the chart matching `spec.kind`.
    pub fn draw_chart(ui: &mut egui::Ui, spec: &ChartSpec) {
        if !spec.title.is_empty() {
            ui.label(RichText::new(&spec.title).size(16.0).strong());
            ui.add_space(4.0);
        }

        match (&spec.kind, &spec.body) {
            (ChartKind::Bar, ChartBody::Categorical { categories, series }) => {
                Self::draw_bar_chart(ui, spec, categories, series)
            }
            (ChartKind::GroupedBar, ChartBody::Categorical { categories, series }) => {
                Self::draw_grouped_bar_chart(ui, spec, categories, series)
            }
            (ChartKind::Line, ChartBody::Categorical { categories, series }) => {
                Self::draw_line_chart(ui, spec, categories, series)
            }
            (ChartKind::Pie, ChartBody::Slices(slices)) => Self::draw_pie_chart(ui, spec, slices),
            (
                ChartKind::Heatmap,
                ChartBody::Grid {
                    rows,
                    columns,
                    cells,
                },
            ) => Self::draw_heatmap(ui, spec, rows, columns, cells),
            _ => {
                ui.label(RichText::new("Tipo de gráfico no soportado").color(Color32::GRAY));
            }
        }
    }

    /// Axis formatter that prints category labels at integer positions.
    fn category_formatter(
        labels: Vec<String>,
    ) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
        move |mark, _range| {
            let rounded = mark.value.round();
            if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
                return String::new();
            }
            labels.get(rounded as usize).cloned().unwrap_or_default()
        }
    }

    /// One bar per category; each bar gets its own color when the chart is
    /// colored by the category column.
    fn draw_bar_chart(
        ui: &mut egui::Ui,
        spec: &ChartSpec,
        categories: &[String],
        series: &[Series],
    ) {
        let per_category_color = spec.color_by.is_some();

        Plot::new(format!("plot_{}", spec.id))
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(spec.x_label.clone())
            .y_axis_label(spec.y_label.clone())
            .include_y(0.0)
            .x_axis_formatter(Self::category_formatter(categories.to_vec()))
            .show(ui, |plot_ui| {
                for (s_idx, s) in series.iter().enumerate() {
                    let bars: Vec<Bar> = s
                        .values
                        .iter()
                        .enumerate()
                        .filter_map(|(i, v)| v.map(|v| (i, v)))
                        .map(|(i, v)| {
                            let color = if per_category_color {
                                Self::color_for(i)
                            } else {
                                Self::color_for(s_idx)
                            };
                            Bar::new(i as f64, v)
                                .name(&categories[i])
                                .fill(color)
                                .width(0.7)
                        })
                        .collect();

                    plot_ui.bar_chart(BarChart::new(bars).name(&s.name));
                }
            });
    }

    /// Side-by-side bars, one color per series.
    fn draw_grouped_bar_chart(
        ui: &mut egui::Ui,
        spec: &ChartSpec,
        categories: &[String],
        series: &[Series],
    ) {
        let n = series.len().max(1) as f64;
        let bar_width = 0.8 / n;

        Plot::new(format!("plot_{}", spec.id))
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(spec.x_label.clone())
            .y_axis_label(spec.y_label.clone())
            .include_y(0.0)
            .legend(Legend::default().position(Corner::RightTop))
            .x_axis_formatter(Self::category_formatter(categories.to_vec()))
            .show(ui, |plot_ui| {
                for (s_idx, s) in series.iter().enumerate() {
                    let offset = (s_idx as f64 - (n - 1.0) / 2.0) * bar_width;
                    let color = Self::color_for(s_idx);
                    let bars: Vec<Bar> = s
                        .values
                        .iter()
                        .enumerate()
                        .filter_map(|(i, v)| v.map(|v| (i, v)))
                        .map(|(i, v)| {
                            Bar::new(i as f64 + offset, v)
                                .name(&categories[i])
                                .fill(color)
                                .width(bar_width * 0.95)
                        })
                        .collect();

                    plot_ui.bar_chart(BarChart::new(bars).color(color).name(&s.name));
                }
            });
    }

    /// Lines with markers. Missing values are skipped.
    fn draw_line_chart(
        ui: &mut egui::Ui,
        spec: &ChartSpec,
        categories: &[String],
        series: &[Series],
    ) {
        Plot::new(format!("plot_{}", spec.id))
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(spec.x_label.clone())
            .y_axis_label(spec.y_label.clone())
            .legend(Legend::default().position(Corner::LeftTop))
            .x_axis_formatter(Self::category_formatter(categories.to_vec()))
            .show(ui, |plot_ui| {
                for (s_idx, s) in series.iter().enumerate() {
                    let color = Self::color_for(s_idx);
                    let points: Vec<[f64; 2]> = s
                        .values
                        .iter()
                        .enumerate()
                        .filter_map(|(i, v)| v.map(|v| [i as f64, v]))
                        .collect();

                    plot_ui.line(
                        Line::new(PlotPoints::from(points.clone()))
                            .color(color)
                            .width(1.5)
                            .name(&s.name),
                    );
                    plot_ui.points(
                        Points::new(PlotPoints::from(points))
                            .radius(2.5)
                            .color(color)
                            .name(&s.name),
                    );
                }
            });
    }

    /// Pie as polygons on a unit circle, starting at 12 o'clock, clockwise.
    fn draw_pie_chart(ui: &mut egui::Ui, spec: &ChartSpec, slices: &[Slice]) {
        Plot::new(format!("plot_{}", spec.id))
            .height(CHART_HEIGHT)
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_x(-1.6)
            .include_x(1.6)
            .include_y(-1.1)
            .include_y(1.1)
            .legend(Legend::default().position(Corner::RightTop))
            .show(ui, |plot_ui| {
                let mut start = FRAC_PI_2;
                for (i, slice) in slices.iter().enumerate() {
                    let sweep = slice.percent / 100.0 * TAU;
                    if sweep <= 0.0 {
                        continue;
                    }
                    let steps = ((sweep / TAU) * 90.0).ceil().max(2.0) as usize;
                    let mut outline = vec![[0.0, 0.0]];
                    for k in 0..=steps {
                        let angle = start - sweep * k as f64 / steps as f64;
                        outline.push([angle.cos(), angle.sin()]);
                    }

                    let color = Self::color_for(i);
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(outline))
                            .fill_color(color)
                            .stroke(Stroke::new(1.0, Color32::WHITE))
                            .name(format!("{} ({:.1}%)", slice.label, slice.percent)),
                    );

                    if slice.percent >= 3.0 {
                        let mid = start - sweep / 2.0;
                        plot_ui.text(
                            Text::new(
                                PlotPoint::new(0.65 * mid.cos(), 0.65 * mid.sin()),
                                RichText::new(format!("{:.1}%", slice.percent))
                                    .color(Color32::WHITE)
                                    .strong(),
                            ),
                        );
                    }
                    start -= sweep;
                }
            });
    }

    /// Filled unit squares; first row on top.
    fn draw_heatmap(
        ui: &mut egui::Ui,
        spec: &ChartSpec,
        rows: &[String],
        columns: &[String],
        cells: &[Vec<Option<f64>>],
    ) {
        let values = cells.iter().flatten().flatten().copied();
        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        let span = if max > min { max - min } else { 1.0 };

        let n_rows = rows.len();
        let mut row_labels: Vec<String> = rows.to_vec();
        row_labels.reverse();

        let height = (n_rows as f32 * 18.0).clamp(CHART_HEIGHT, 700.0);

        Plot::new(format!("plot_{}", spec.id))
            .height(height)
            .allow_scroll(false)
            .x_axis_label(spec.x_label.clone())
            .y_axis_label(spec.y_label.clone())
            .show_grid(false)
            .x_axis_formatter(Self::category_formatter(columns.to_vec()))
            .y_axis_formatter(Self::category_formatter(row_labels))
            .show(ui, |plot_ui| {
                for (r, row) in cells.iter().enumerate() {
                    let y = (n_rows - 1 - r) as f64;
                    for (c, cell) in row.iter().enumerate() {
                        let Some(v) = cell else {
                            continue;
                        };
                        let x = c as f64;
                        let square = vec![
                            [x - 0.5, y - 0.5],
                            [x + 0.5, y - 0.5],
                            [x + 0.5, y + 0.5],
                            [x - 0.5, y + 0.5],
                        ];
                        let color = Self::heat_color((v - min) / span);
                        plot_ui.polygon(
                            Polygon::new(PlotPoints::from(square))
                                .fill_color(color)
                                .stroke(Stroke::new(0.5, color))
                                .name(format!("{} · {}: {:.2}", rows[r], columns[c], v)),
                        );
                    }
                }
            });

        if min.is_finite() {
            ui.horizontal(|ui| {
                ui.label(RichText::new(format!("{:.2}", min)).size(11.0));
                let (rect, _) =
                    ui.allocate_exact_size(egui::vec2(120.0, 10.0), egui::Sense::hover());
                let steps = 24;
                for i in 0..steps {
                    let t = i as f32 / steps as f32;
                    let x0 = rect.left() + rect.width() * t;
                    let x1 = rect.left() + rect.width() * (i + 1) as f32 / steps as f32;
                    ui.painter().rect_filled(
                        egui::Rect::from_min_max(
                            egui::pos2(x0, rect.top()),
                            egui::pos2(x1, rect.bottom()),
                        ),
                        0.0,
                        Self::heat_color(t as f64),
                    );
                }
                ui.label(RichText::new(format!("{:.2}", max)).size(11.0));
            });
        }
    }

    /// Draw a formatted table
    pub fn draw_table(ui: &mut egui::Ui, table: &TableView) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(format!("table_{}", table.id)))
                    .striped(true)
                    .min_col_width(60.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        for header in &table.columns {
                            ui.label(RichText::new(header).strong().size(12.0));
                        }
                        ui.end_row();

                        for row in &table.rows {
                            for cell in row {
                                ui.label(RichText::new(cell).size(12.0));
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_wraps() {
        assert_eq!(ChartPlotter::color_for(0), ChartPlotter::color_for(PALETTE.len()));
    }

    #[test]
    fn heat_ramp_endpoints() {
        assert_eq!(ChartPlotter::heat_color(0.0), HEAT_LOW);
        assert_eq!(ChartPlotter::heat_color(1.0), HEAT_HIGH);
        assert_eq!(ChartPlotter::heat_color(f64::NAN), HEAT_LOW);
        assert_eq!(ChartPlotter::heat_color(7.0), HEAT_HIGH);
    }
}
