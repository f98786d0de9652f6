//! Data Error Module
//! The two failure kinds a dashboard pipeline can surface.

use polars::prelude::PolarsError;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    /// File missing, unreadable or not parseable as CSV.
    #[error("No se pudo leer {}: {reason}", path.display())]
    Read { path: PathBuf, reason: String },
    /// Expected column absent, wrong kind, or empty table.
    #[error("Error de esquema: {0}")]
    Schema(String),
}

impl DataError {
    pub fn read(path: &Path, reason: impl ToString) -> Self {
        DataError::Read {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn schema(message: impl Into<String>) -> Self {
        DataError::Schema(message.into())
    }

    pub fn missing_column(column: &str) -> Self {
        DataError::Schema(format!("falta la columna '{}'", column))
    }

    pub fn is_read(&self) -> bool {
        matches!(self, DataError::Read { .. })
    }

    pub fn is_schema(&self) -> bool {
        matches!(self, DataError::Schema(_))
    }
}

/// Polars errors raised while reshaping an already-loaded table are schema
/// problems (missing column, dtype mismatch). Read failures are mapped
/// explicitly by the loader, which knows the path.
impl From<PolarsError> for DataError {
    fn from(err: PolarsError) -> Self {
        match err {
            PolarsError::ColumnNotFound(name) => {
                DataError::Schema(format!("falta la columna {}", name))
            }
            other => DataError::Schema(other.to_string()),
        }
    }
}
