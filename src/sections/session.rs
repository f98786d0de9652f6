//! Session Context
//! Owns the table cache and configuration for one data directory.

use crate::config::DashboardConfig;
use crate::data::schema::PROVINCIA;
use crate::data::transform::{periods, unique_text};
use crate::data::{DataError, DataLoader, Dataset, Period};
use polars::prelude::DataFrame;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// State that lives as long as the user keeps the same data directory.
pub struct Session {
    config: DashboardConfig,
    loader: DataLoader,
}

impl Session {
    pub fn new(config: DashboardConfig) -> Self {
        let loader = DataLoader::new(config.data_dir.clone());
        Self { config, loader }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn loader(&self) -> &DataLoader {
        &self.loader
    }

    /// Typed, cached access to a dataset. Failures are logged and returned.
    pub fn table(&mut self, dataset: Dataset) -> Result<Arc<DataFrame>, DataError> {
        self.loader
            .load_dataset(dataset)
            .inspect_err(|e| warn!(dataset = ?dataset, error = %e, "dataset unavailable"))
    }

    /// Switch to another data directory. This ends the current session:
    /// every cached table is dropped.
    pub fn set_data_dir(&mut self, dir: PathBuf) {
        info!(data_dir = %dir.display(), "switching data directory");
        self.config.data_dir = dir.clone();
        self.loader = DataLoader::new(dir);
    }

    /// Provinces offered by the province filter, in file order.
    pub fn available_provinces(&mut self) -> Vec<String> {
        self.table(Dataset::HouseholdPenetration)
            .and_then(|df| unique_text(&df, PROVINCIA))
            .unwrap_or_default()
    }

    /// Quarters offered by the period filter, ascending.
    pub fn available_periods(&mut self) -> Vec<Period> {
        self.table(Dataset::HouseholdPenetration)
            .and_then(|df| periods(&df))
            .unwrap_or_default()
    }
}
