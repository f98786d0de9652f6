//! Chart Viewer Widget
//! Central scrollable panel drawing the active section block by block.

use crate::charts::{ChartPlotter, ChartSpec, Metric};
use crate::sections::{Block, Insight, SectionView};
use egui::{Color32, RichText, ScrollArea};

const BLOCK_SPACING: f32 = 12.0;
const METRIC_CARD_WIDTH: f32 = 190.0;
const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);

/// Scrollable display of one `SectionView`.
#[derive(Default)]
pub struct ChartViewer {
    view: Option<SectionView>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_view(&mut self, view: SectionView) {
        self.view = Some(view);
    }

    pub fn view(&self) -> Option<&SectionView> {
        self.view.as_ref()
    }

    /// Drop the current view so it gets rebuilt.
    pub fn clear(&mut self) {
        self.view = None;
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        let Some(view) = &self.view else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("Sin datos").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for block in &view.blocks {
                    Self::draw_block(ui, block);
                    ui.add_space(BLOCK_SPACING);
                }
            });
    }

    fn draw_block(ui: &mut egui::Ui, block: &Block) {
        match block {
            Block::Heading(text) => {
                ui.label(RichText::new(text).size(24.0).strong());
            }
            Block::Subheading(text) => {
                ui.add_space(6.0);
                ui.label(RichText::new(text).size(18.0).strong());
            }
            Block::Paragraph(text) => {
                ui.label(text.as_str());
            }
            Block::Insights(insights) => Self::draw_insights(ui, insights),
            Block::Metrics(metrics) => Self::draw_metrics(ui, metrics),
            Block::Chart(spec) => Self::draw_chart_card(ui, spec),
            Block::Table(table) => ChartPlotter::draw_table(ui, table),
            Block::Error(message) => Self::draw_error(ui, message),
        }
    }

    fn draw_insights(ui: &mut egui::Ui, insights: &[Insight]) {
        for insight in insights {
            ui.label(RichText::new(&insight.title).strong());
            for point in &insight.points {
                ui.horizontal_wrapped(|ui| {
                    ui.label("•");
                    ui.label(point.as_str());
                });
            }
            ui.add_space(4.0);
        }
    }

    fn draw_metrics(ui: &mut egui::Ui, metrics: &[Metric]) {
        ui.horizontal_wrapped(|ui| {
            for metric in metrics {
                egui::Frame::none()
                    .rounding(8.0)
                    .stroke(egui::Stroke::new(1.0, Color32::from_rgb(100, 149, 237)))
                    .fill(ui.visuals().widgets.noninteractive.bg_fill)
                    .inner_margin(10.0)
                    .show(ui, |ui| {
                        ui.set_width(METRIC_CARD_WIDTH);
                        ui.vertical(|ui| {
                            ui.label(RichText::new(&metric.label).size(12.0).color(Color32::GRAY));
                            ui.label(RichText::new(metric.display_value()).size(20.0).strong());
                            if let Some(delta) = metric.display_delta() {
                                ui.label(
                                    RichText::new(delta)
                                        .size(11.0)
                                        .color(Color32::from_rgb(40, 167, 69)),
                                );
                            }
                        });
                    });
            }
        });
    }

    fn draw_chart_card(ui: &mut egui::Ui, spec: &ChartSpec) {
        egui::Frame::none()
            .rounding(8.0)
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| ChartPlotter::draw_chart(ui, spec));
    }

    fn draw_error(ui: &mut egui::Ui, message: &str) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(2.0, ERROR_COLOR))
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.label(
                    RichText::new(format!("⚠ {}", message))
                        .size(13.0)
                        .color(ERROR_COLOR),
                );
            });
    }
}
