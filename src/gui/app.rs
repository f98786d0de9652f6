//! Dashboard Main Application
//! Main window with control panel and section viewer.

use crate::config::DashboardConfig;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::sections::Session;
use egui::SidePanel;
use tracing::debug;

/// Main application window.
pub struct DashboardApp {
    session: Session,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let mut app = Self {
            control_panel: ControlPanel::new(&config.data_dir),
            session: Session::new(config),
            chart_viewer: ChartViewer::new(),
        };
        app.refresh_options();
        app
    }

    /// Reload the province and period choices from the current folder.
    fn refresh_options(&mut self) {
        let provinces = self.session.available_provinces();
        let periods = self.session.available_periods();
        self.control_panel.update_options(provinces, periods);
        self.chart_viewer.clear();
    }

    fn handle_change_data_dir(&mut self) {
        let Some(dir) = rfd::FileDialog::new()
            .set_directory(self.session.config().data_dir.clone())
            .pick_folder()
        else {
            return; // cancelled
        };

        self.control_panel.data_dir = dir.clone();
        self.session.set_data_dir(dir);
        self.refresh_options();
    }

    /// Run the selected section's pipeline unless its view is current.
    fn ensure_view(&mut self) {
        if self.chart_viewer.view().is_some() {
            return;
        }
        let section = self.control_panel.section;
        let view = section.build(&mut self.session, &self.control_panel.filters);
        self.chart_viewer.set_view(view);
        self.control_panel.cached_tables = self.session.loader().cached_count();
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_view();

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::SectionChanged | ControlPanelAction::FiltersChanged => {
                            debug!(
                                section = ?self.control_panel.section,
                                filters = ?self.control_panel.filters,
                                "selection changed"
                            );
                            self.chart_viewer.clear();
                        }
                        ControlPanelAction::ChangeDataDir => self.handle_change_data_dir(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Section Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });

        if self.chart_viewer.view().is_none() {
            ctx.request_repaint();
        }
    }
}
