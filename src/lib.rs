//! Conectividad AR - Argentina internet connectivity dashboard
//!
//! Loads the cleaned ENACOM CSV tables, derives penetration, speed and
//! access-technology views and renders them as interactive charts.

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod sections;
pub mod stats;
