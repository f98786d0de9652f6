//! Conectividad AR - Internet connectivity dashboard for Argentina
//!
//! Usage: `conectividad_dashboard [DATA_DIR]`

use anyhow::Result;
use conectividad_dashboard::config::DashboardConfig;
use conectividad_dashboard::gui::DashboardApp;
use eframe::egui;
use tracing_subscriber::EnvFilter;

const APP_TITLE: &str = "Conectividad AR";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = DashboardConfig::from_env()?;

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([1000.0, 650.0])
            .with_title(APP_TITLE),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start the dashboard: {e}"))
}
