//! CSV Data Loader Module
//! Reads the dashboard CSV files with Polars through a per-session read-through cache.

use crate::data::error::DataError;
use crate::data::schema::Dataset;
use polars::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Read-through table cache keyed by resolved file path.
///
/// Tables are immutable once loaded and handed out as `Arc<DataFrame>`, so a
/// repeated request returns the very same table without touching the disk.
pub struct DataLoader {
    data_dir: PathBuf,
    cache: HashMap<PathBuf, Arc<DataFrame>>,
}

impl DataLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            cache: HashMap::new(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Full path of a file inside the data directory.
    pub fn resolve(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }

    /// Load a CSV file, serving it from the cache when already read.
    pub fn load_csv(&mut self, file_name: &str) -> Result<Arc<DataFrame>, DataError> {
        let path = self.resolve(file_name);

        if let Some(df) = self.cache.get(&path) {
            debug!(path = %path.display(), "cache hit");
            return Ok(Arc::clone(df));
        }

        let df = Arc::new(Self::read_csv(&path)?);
        info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "loaded table"
        );
        self.cache.insert(path, Arc::clone(&df));
        Ok(df)
    }

    /// Load one of the known datasets and check it against its schema.
    pub fn load_dataset(&mut self, dataset: Dataset) -> Result<Arc<DataFrame>, DataError> {
        let df = self.load_csv(dataset.file_name())?;
        dataset.schema().validate(&df)?;
        Ok(df)
    }

    pub fn is_cached(&self, file_name: &str) -> bool {
        self.cache.contains_key(&self.resolve(file_name))
    }

    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    /// Drop every cached table (end of session).
    pub fn clear(&mut self) {
        debug!(tables = self.cache.len(), "clearing table cache");
        self.cache.clear();
    }

    fn read_csv(path: &Path) -> Result<DataFrame, DataError> {
        if !path.is_file() {
            return Err(DataError::read(path, "el archivo no existe"));
        }

        LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .finish()
            .and_then(|lazy| lazy.collect())
            .map_err(|e| DataError::read(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const SPEED_CSV: &str = "Provincia,Mbps (Media de bajada)\nBuenos Aires,120.5\nSalta,40.0\n";

    #[test]
    fn missing_file_is_read_error() {
        let tmp = tempdir().unwrap();
        let mut loader = DataLoader::new(tmp.path());

        let err = loader.load_csv("no_existe.csv").unwrap_err();
        assert!(err.is_read());
        assert_eq!(loader.cached_count(), 0);
    }

    #[test]
    fn repeated_load_returns_cached_table() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("speed.csv"), SPEED_CSV).unwrap();
        let mut loader = DataLoader::new(tmp.path());

        let first = loader.load_csv("speed.csv").unwrap();
        // Removing the file proves the second call never reads the disk.
        fs::remove_file(tmp.path().join("speed.csv")).unwrap();
        let second = loader.load_csv("speed.csv").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.height(), 2);
        assert!(loader.is_cached("speed.csv"));
    }

    #[test]
    fn clear_forces_reload() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("speed.csv"), SPEED_CSV).unwrap();
        let mut loader = DataLoader::new(tmp.path());

        loader.load_csv("speed.csv").unwrap();
        loader.clear();
        assert!(!loader.is_cached("speed.csv"));

        fs::remove_file(tmp.path().join("speed.csv")).unwrap();
        assert!(loader.load_csv("speed.csv").unwrap_err().is_read());
    }

    #[test]
    fn raw_load_defers_column_errors_until_access() {
        let tmp = tempdir().unwrap();
        fs::write(
            tmp.path().join(Dataset::SpeedByProvince.file_name()),
            "Provincia,Velocidad\nSalta,40.0\n",
        )
        .unwrap();
        let mut loader = DataLoader::new(tmp.path());

        let df = loader
            .load_csv(Dataset::SpeedByProvince.file_name())
            .unwrap();
        let err = crate::data::transform::numeric_values(&df, "Mbps (Media de bajada)")
            .unwrap_err();
        assert!(err.is_schema());

        let err = loader.load_dataset(Dataset::SpeedByProvince).unwrap_err();
        assert!(err.is_schema());
    }

    #[test]
    fn typed_load_accepts_valid_dataset() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join(Dataset::SpeedByProvince.file_name()), SPEED_CSV).unwrap();
        let mut loader = DataLoader::new(tmp.path());

        let df = loader.load_dataset(Dataset::SpeedByProvince).unwrap();
        assert_eq!(df.height(), 2);
    }
}
