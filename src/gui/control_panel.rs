//! Control Panel Widget
//! Left side panel: section selector, data folder and sub-filters.

use crate::data::Period;
use crate::sections::{Section, SectionFilters};
use egui::{Color32, ComboBox, RichText, ScrollArea};
use std::path::{Path, PathBuf};

const LATEST_PERIOD_LABEL: &str = "Último disponible";

/// Left side control panel with navigation and filter controls.
pub struct ControlPanel {
    pub section: Section,
    pub filters: SectionFilters,
    pub data_dir: PathBuf,
    /// Provinces offered by the multi-select, in file order.
    pub provinces: Vec<String>,
    /// Quarters offered by the period selector, ascending.
    pub periods: Vec<Period>,
    pub cached_tables: usize,
}

impl ControlPanel {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            section: Section::Inicio,
            filters: SectionFilters::default(),
            data_dir: data_dir.to_path_buf(),
            provinces: Vec::new(),
            periods: Vec::new(),
            cached_tables: 0,
        }
    }

    /// Replace the filter options after a data folder change. Selections no
    /// longer offered are dropped.
    pub fn update_options(&mut self, provinces: Vec<String>, periods: Vec<Period>) {
        self.filters.provinces.retain(|p| provinces.contains(p));
        if let Some(period) = self.filters.period {
            if !periods.contains(&period) {
                self.filters.period = None;
            }
        }
        self.provinces = provinces;
        self.periods = periods;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📡 Conectividad AR")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Telecomunicaciones en Argentina")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Navigation =====
        ui.label(RichText::new("🧭 Secciones").size(14.0).strong());
        ui.add_space(5.0);
        for section in Section::ALL {
            if ui
                .radio_value(&mut self.section, section, section.title())
                .changed()
            {
                action = ControlPanelAction::SectionChanged;
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Data Source =====
        ui.label(RichText::new("📁 Carpeta de datos").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(RichText::new(self.data_dir.display().to_string()).size(12.0));
                ui.add_space(4.0);
                if ui.button("📂 Cambiar carpeta").clicked() {
                    action = ControlPanelAction::ChangeDataDir;
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filters =====
        ui.label(RichText::new("🔧 Filtros").size(14.0).strong());
        ui.add_space(8.0);

        ui.add_enabled_ui(self.section.uses_period_filter(), |ui| {
            ui.horizontal(|ui| {
                ui.add_sized([80.0, 20.0], egui::Label::new("Trimestre:"));
                let selected = self
                    .filters
                    .period
                    .map(|p| p.label())
                    .unwrap_or_else(|| LATEST_PERIOD_LABEL.to_string());
                ComboBox::from_id_salt("period")
                    .width(170.0)
                    .selected_text(selected)
                    .show_ui(ui, |ui| {
                        if ui
                            .selectable_value(&mut self.filters.period, None, LATEST_PERIOD_LABEL)
                            .changed()
                        {
                            action = ControlPanelAction::FiltersChanged;
                        }
                        for period in self.periods.iter().rev() {
                            if ui
                                .selectable_value(
                                    &mut self.filters.period,
                                    Some(*period),
                                    period.label(),
                                )
                                .changed()
                            {
                                action = ControlPanelAction::FiltersChanged;
                            }
                        }
                    });
            });
        });

        ui.add_space(8.0);

        ui.add_enabled_ui(self.section.uses_province_filter(), |ui| {
            let summary = if self.filters.provinces.is_empty() {
                "Provincias: todas".to_string()
            } else {
                format!("Provincias: {} seleccionadas", self.filters.provinces.len())
            };
            ui.label(summary);

            egui::Frame::none()
                .fill(ui.visuals().widgets.noninteractive.bg_fill)
                .rounding(5.0)
                .inner_margin(5.0)
                .show(ui, |ui| {
                    ScrollArea::vertical().max_height(220.0).show(ui, |ui| {
                        for province in &self.provinces {
                            let mut checked = self.filters.provinces.contains(province);
                            if ui.checkbox(&mut checked, province).changed() {
                                if checked {
                                    self.filters.provinces.insert(province.clone());
                                } else {
                                    self.filters.provinces.remove(province);
                                }
                                action = ControlPanelAction::FiltersChanged;
                            }
                        }
                    });
                });

            ui.add_space(5.0);
            ui.horizontal(|ui| {
                if ui.small_button("Seleccionar todas").clicked() {
                    self.filters.provinces = self.provinces.iter().cloned().collect();
                    action = ControlPanelAction::FiltersChanged;
                }
                if ui.small_button("Limpiar").clicked() {
                    self.filters.provinces.clear();
                    action = ControlPanelAction::FiltersChanged;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Cache status =====
        let status = format!("Tablas en caché: {}", self.cached_tables);
        ui.label(RichText::new(status).size(11.0).color(Color32::GRAY));

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    SectionChanged,
    FiltersChanged,
    ChangeDataDir,
}
