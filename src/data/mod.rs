//! Data module - CSV loading, schemas and transforms

mod error;
mod loader;
mod period;
pub mod schema;
pub mod transform;

pub use error::DataError;
pub use loader::DataLoader;
pub use period::{period_label, Period};
pub use schema::{ColumnKind, ColumnSpec, Dataset, TableSchema};
