//! Dashboard Configuration
//! Optional JSON settings file plus environment / command-line overrides.

use crate::data::transform::DEFAULT_KPI_RATE;
use crate::data::Period;
use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming a configuration file.
pub const CONFIG_ENV_VAR: &str = "CONECTIVIDAD_CONFIG";
/// Configuration file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory holding the cleaned CSV files.
    pub data_dir: PathBuf,
    /// Growth factor planned by the access KPI.
    pub kpi_rate: f64,
    /// Quarter the KPI is computed on; latest available when absent.
    pub kpi_period: Option<Period>,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            kpi_rate: DEFAULT_KPI_RATE,
            kpi_period: None,
            window_width: 1400.0,
            window_height: 900.0,
        }
    }
}

impl DashboardConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).context("invalid dashboard configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.kpi_rate.is_finite() && self.kpi_rate > 0.0,
            "kpi_rate must be a positive number, got {}",
            self.kpi_rate
        );
        if let Some(period) = self.kpi_period {
            ensure!(
                (1..=4).contains(&period.quarter),
                "kpi_period.quarter must be between 1 and 4, got {}",
                period.quarter
            );
        }
        ensure!(
            self.window_width > 0.0 && self.window_height > 0.0,
            "window size must be positive"
        );
        Ok(())
    }

    /// Resolve the configuration.
    ///
    /// `explicit` (the env var) wins over `fallback` (the working-directory
    /// file), which is only read if it exists. `data_dir` overrides the
    /// directory from either source.
    pub fn resolve(
        explicit: Option<PathBuf>,
        fallback: &Path,
        data_dir: Option<PathBuf>,
    ) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None if fallback.is_file() => Self::from_file(fallback)?,
            None => Self::default(),
        };

        if let Some(dir) = data_dir {
            config.data_dir = dir;
        }
        Ok(config)
    }

    /// Resolve from `CONECTIVIDAD_CONFIG`, `./dashboard.json` and the first
    /// command-line argument.
    pub fn from_env() -> Result<Self> {
        let explicit = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        let data_dir = std::env::args_os().nth(1).map(PathBuf::from);
        let config = Self::resolve(explicit, Path::new(DEFAULT_CONFIG_FILE), data_dir)?;
        info!(
            data_dir = %config.data_dir.display(),
            kpi_rate = config.kpi_rate,
            "configuration loaded"
        );
        Ok(config)
    }
}
