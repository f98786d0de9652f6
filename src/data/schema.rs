//! Dataset Schema Module
//! Typed description of every CSV the dashboard reads, checked at load time.

use crate::data::error::DataError;
use polars::prelude::*;

pub const PROVINCIA: &str = "Provincia";
pub const ANIO: &str = "Año";
pub const TRIMESTRE: &str = "Trimestre";
pub const PERIODO: &str = "Periodo";
pub const ACCESOS_HAB: &str = "Accesos por cada 100 hab";
pub const ACCESOS_HOGARES: &str = "Accesos por cada 100 hogares";
pub const MBPS_BAJADA: &str = "Mbps (Media de bajada)";

/// Access technology columns, in display order.
pub const TECHNOLOGIES: [&str; 5] = ["ADSL", "Cablemodem", "Fibra óptica", "Wireless", "Otros"];

/// Declared kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Any integer or float dtype.
    Numeric,
    /// Read as text; any dtype is accepted and rendered with `to_string`.
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn numeric(name: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        kind: ColumnKind::Numeric,
    }
}

const fn text(name: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        kind: ColumnKind::Text,
    }
}

/// Required columns of a table. Extra columns are allowed.
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [ColumnSpec],
}

const POPULATION_COLUMNS: [ColumnSpec; 2] = [text(PROVINCIA), numeric(ACCESOS_HAB)];

const HOUSEHOLD_COLUMNS: [ColumnSpec; 4] = [
    numeric(ANIO),
    numeric(TRIMESTRE),
    text(PROVINCIA),
    numeric(ACCESOS_HOGARES),
];

const TOTALS_COLUMNS: [ColumnSpec; 3] = [
    text(PERIODO),
    numeric(ACCESOS_HOGARES),
    numeric(ACCESOS_HAB),
];

const SPEED_COLUMNS: [ColumnSpec; 2] = [text(PROVINCIA), numeric(MBPS_BAJADA)];

const TECHNOLOGY_COLUMNS: [ColumnSpec; 7] = [
    numeric(ANIO),
    numeric(TRIMESTRE),
    numeric("ADSL"),
    numeric("Cablemodem"),
    numeric("Fibra óptica"),
    numeric("Wireless"),
    numeric("Otros"),
];

/// The fixed set of datasets the dashboard knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    PopulationPenetration,
    HouseholdPenetration,
    PenetrationTotals,
    SpeedByProvince,
    TechnologyTotals,
    AccessByTechnology,
}

impl Dataset {
    pub const ALL: [Dataset; 6] = [
        Dataset::PopulationPenetration,
        Dataset::HouseholdPenetration,
        Dataset::PenetrationTotals,
        Dataset::SpeedByProvince,
        Dataset::TechnologyTotals,
        Dataset::AccessByTechnology,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Dataset::PopulationPenetration => "Penetracion_poblacion_limpio.csv",
            Dataset::HouseholdPenetration => "Penetracion_hogares_limpio.csv",
            Dataset::PenetrationTotals => "Penetracion_totales_limpio.csv",
            Dataset::SpeedByProvince => "Velocidad_por_provincia_limpio.csv",
            Dataset::TechnologyTotals => "Totales_Accesos_Por_Tecnologia_limpio.csv",
            Dataset::AccessByTechnology => "Accesos_Por_Tecnologia_limpio.csv",
        }
    }

    pub fn schema(&self) -> TableSchema {
        match self {
            Dataset::PopulationPenetration => TableSchema {
                name: "Penetración-población",
                columns: &POPULATION_COLUMNS,
            },
            Dataset::HouseholdPenetration => TableSchema {
                name: "Penetración-hogares",
                columns: &HOUSEHOLD_COLUMNS,
            },
            Dataset::PenetrationTotals => TableSchema {
                name: "Penetración-totales",
                columns: &TOTALS_COLUMNS,
            },
            Dataset::SpeedByProvince => TableSchema {
                name: "Velocidad % por prov",
                columns: &SPEED_COLUMNS,
            },
            Dataset::TechnologyTotals => TableSchema {
                name: "Totales Accesos Por Tecnología",
                columns: &TECHNOLOGY_COLUMNS,
            },
            Dataset::AccessByTechnology => TableSchema {
                name: "Accesos Por Tecnología",
                columns: &TECHNOLOGY_COLUMNS,
            },
        }
    }
}

/// Integer and float dtypes count as numeric.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

impl TableSchema {
    /// Check that every declared column exists with the declared kind and
    /// that the table has at least one row.
    pub fn validate(&self, df: &DataFrame) -> Result<(), DataError> {
        for spec in self.columns {
            let column = df.column(spec.name).map_err(|_| {
                DataError::schema(format!("{}: falta la columna '{}'", self.name, spec.name))
            })?;

            if spec.kind == ColumnKind::Numeric && !is_numeric_dtype(column.dtype()) {
                return Err(DataError::schema(format!(
                    "{}: la columna '{}' no es numérica ({})",
                    self.name,
                    spec.name,
                    column.dtype()
                )));
            }
        }

        if df.height() == 0 {
            return Err(DataError::schema(format!("{}: la tabla está vacía", self.name)));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_table_with_extra_columns() {
        let df = df!(
            "Provincia" => ["Buenos Aires", "Córdoba"],
            "Mbps (Media de bajada)" => [120.5, 80.0],
            "Extra" => [1, 2]
        )
        .unwrap();

        assert!(Dataset::SpeedByProvince.schema().validate(&df).is_ok());
    }

    #[test]
    fn missing_column_is_schema_error() {
        let df = df!("Provincia" => ["Salta"]).unwrap();

        let err = Dataset::SpeedByProvince.schema().validate(&df).unwrap_err();
        assert!(err.is_schema());
        assert!(err.to_string().contains("Mbps (Media de bajada)"));
    }

    #[test]
    fn text_in_numeric_column_is_schema_error() {
        let df = df!(
            "Provincia" => ["Salta"],
            "Mbps (Media de bajada)" => ["rápido"]
        )
        .unwrap();

        let err = Dataset::SpeedByProvince.schema().validate(&df).unwrap_err();
        assert!(err.to_string().contains("no es numérica"));
    }

    #[test]
    fn empty_table_is_schema_error() {
        let df = df!(
            "Provincia" => Vec::<String>::new(),
            "Mbps (Media de bajada)" => Vec::<f64>::new()
        )
        .unwrap();

        assert!(Dataset::SpeedByProvince.schema().validate(&df).unwrap_err().is_schema());
    }

    #[test]
    fn every_dataset_has_distinct_file() {
        let mut names: Vec<&str> = Dataset::ALL.iter().map(|d| d.file_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Dataset::ALL.len());
    }
}
