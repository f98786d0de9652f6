#![allow(dead_code)]

use conectividad_dashboard::config::DashboardConfig;
use conectividad_dashboard::data::Dataset;
use conectividad_dashboard::sections::Session;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Copy of the fixture folder, so tests can remove or break files.
pub fn fixture_copy() -> TempDir {
    let tmp = tempfile::tempdir().unwrap();
    for dataset in Dataset::ALL {
        let name = dataset.file_name();
        fs::copy(fixtures_dir().join(name), tmp.path().join(name)).unwrap();
    }
    tmp
}

pub fn session_for(dir: &Path) -> Session {
    Session::new(DashboardConfig {
        data_dir: dir.to_path_buf(),
        ..Default::default()
    })
}
