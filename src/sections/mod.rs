//! Sections module - Navigation shell
//!
//! A fixed set of sections; selecting one (plus its filters) decides which
//! datasets are loaded and which pipeline runs. Each pipeline returns a
//! `SectionView`, a flat list of display blocks the GUI draws as-is.

mod content;
mod home;
mod kpi;
mod penetration;
mod session;
mod speed;
mod technology;

pub use session::Session;

use crate::charts::{ChartSpec, Metric, TableView};
use crate::data::transform::{
    filter_period, filter_provinces, has_column, has_period_columns, latest_period,
};
use crate::data::schema::PROVINCIA;
use crate::data::{DataError, Period};
use polars::prelude::DataFrame;
use std::collections::BTreeSet;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Inicio,
    Penetracion,
    Velocidad,
    Tecnologias,
    Kpis,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Inicio,
        Section::Penetracion,
        Section::Velocidad,
        Section::Tecnologias,
        Section::Kpis,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Section::Inicio => "Inicio",
            Section::Penetracion => "Penetración del Servicio",
            Section::Velocidad => "Calidad y Velocidad del Servicio",
            Section::Tecnologias => "Tecnologías de Conexión",
            Section::Kpis => "KPI's",
        }
    }

    /// Whether the province multi-select affects this section.
    pub fn uses_province_filter(&self) -> bool {
        matches!(self, Section::Penetracion | Section::Velocidad | Section::Kpis)
    }

    /// Whether the quarter selector affects this section.
    pub fn uses_period_filter(&self) -> bool {
        !matches!(self, Section::Inicio)
    }

    /// Run this section's pipeline.
    pub fn build(&self, session: &mut Session, filters: &SectionFilters) -> SectionView {
        let view = match self {
            Section::Inicio => home::build(),
            Section::Penetracion => penetration::build(session, filters),
            Section::Velocidad => speed::build(session, filters),
            Section::Tecnologias => technology::build(session, filters),
            Section::Kpis => kpi::build(session, filters),
        };

        let errors = view.errors().len();
        if errors > 0 {
            warn!(section = ?self, errors, "section built with failures");
        }
        info!(section = ?self, blocks = view.blocks.len(), "section built");
        view
    }
}

/// Sub-filters shared by the sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionFilters {
    /// Selected provinces; empty means all.
    pub provinces: BTreeSet<String>,
    /// Selected quarter; `None` means the latest one in each table.
    pub period: Option<Period>,
}

impl SectionFilters {
    /// Apply the province and quarter filters a table supports.
    ///
    /// Tables without a `Provincia` column ignore the province filter and
    /// tables without `Año`/`Trimestre` ignore the quarter filter.
    pub fn apply(&self, df: &DataFrame) -> Result<DataFrame, DataError> {
        let mut out = if has_column(df, PROVINCIA) {
            filter_provinces(df, &self.provinces)?
        } else {
            df.clone()
        };

        if has_period_columns(&out) && out.height() > 0 {
            let period = match self.period {
                Some(p) => p,
                None => latest_period(&out)?,
            };
            out = filter_period(&out, period)?;
        }

        if out.height() == 0 {
            return Err(DataError::schema("sin datos para los filtros seleccionados"));
        }
        Ok(out)
    }

    /// Apply only the province filter (all quarters kept).
    pub fn apply_provinces(&self, df: &DataFrame) -> Result<DataFrame, DataError> {
        let out = filter_provinces(df, &self.provinces)?;
        if out.height() == 0 {
            return Err(DataError::schema("sin datos para las provincias seleccionadas"));
        }
        Ok(out)
    }
}

/// A titled group of narrative bullet points.
#[derive(Debug, Clone, PartialEq)]
pub struct Insight {
    pub title: String,
    pub points: Vec<String>,
}

impl Insight {
    pub fn new(title: &str, points: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            points: points.iter().map(|p| p.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading(String),
    Subheading(String),
    Paragraph(String),
    Insights(Vec<Insight>),
    Metrics(Vec<Metric>),
    Chart(ChartSpec),
    Table(TableView),
    /// A failure confined to the block that needed the data.
    Error(String),
}

/// What a section shows, top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionView {
    pub section: Section,
    pub blocks: Vec<Block>,
}

impl SectionView {
    pub fn new(section: Section) -> Self {
        Self {
            section,
            blocks: Vec::new(),
        }
    }

    pub fn heading(&mut self, text: &str) {
        self.blocks.push(Block::Heading(text.to_string()));
    }

    pub fn subheading(&mut self, text: &str) {
        self.blocks.push(Block::Subheading(text.to_string()));
    }

    pub fn paragraph(&mut self, text: &str) {
        self.blocks.push(Block::Paragraph(text.trim().to_string()));
    }

    pub fn insights(&mut self, insights: Vec<Insight>) {
        self.blocks.push(Block::Insights(insights));
    }

    /// Push the block built from `result`, or an inline error.
    pub fn push_result<T>(
        &mut self,
        result: Result<T, DataError>,
        to_block: impl FnOnce(T) -> Block,
    ) {
        match result {
            Ok(value) => self.blocks.push(to_block(value)),
            Err(e) => self.blocks.push(Block::Error(e.to_string())),
        }
    }

    pub fn chart(&mut self, result: Result<ChartSpec, DataError>) {
        self.push_result(result, Block::Chart);
    }

    pub fn metrics(&mut self, result: Result<Vec<Metric>, DataError>) {
        self.push_result(result, Block::Metrics);
    }

    pub fn table(&mut self, result: Result<TableView, DataError>) {
        self.push_result(result, Block::Table);
    }

    pub fn errors(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Error(e) => Some(e.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn charts(&self) -> Vec<&ChartSpec> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Chart(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    pub fn find_chart(&self, id: &str) -> Option<&ChartSpec> {
        self.charts().into_iter().find(|c| c.id == id)
    }

    pub fn metric_list(&self) -> Vec<&Metric> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Metrics(m) => Some(m.iter()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn tables(&self) -> Vec<&TableView> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Table(t) => Some(t),
                _ => None,
            })
            .collect()
    }
}
