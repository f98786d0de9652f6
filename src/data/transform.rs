//! Data Transform Module
//! Pure table transformations feeding the charts: sorting, grouping, reshaping,
//! period labels, percent change and shares.
//!
//! Every function takes the source table by reference and returns a new one;
//! loaded tables are never modified.

use crate::data::error::DataError;
use crate::data::period::Period;
use crate::data::schema::{is_numeric_dtype, ANIO, PERIODO, PROVINCIA, TRIMESTRE};
use polars::prelude::*;
use std::collections::{BTreeSet, HashSet};

/// Planned growth factor used by the access KPI.
pub const DEFAULT_KPI_RATE: f64 = 1.02;

fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, DataError> {
    df.column(name).map_err(|_| DataError::missing_column(name))
}

fn require_numeric<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, DataError> {
    let column = require_column(df, name)?;
    if !is_numeric_dtype(column.dtype()) {
        return Err(DataError::schema(format!(
            "la columna '{}' no es numérica ({})",
            name,
            column.dtype()
        )));
    }
    Ok(column)
}

fn require_rows(df: &DataFrame) -> Result<(), DataError> {
    if df.height() == 0 {
        return Err(DataError::schema("la tabla está vacía"));
    }
    Ok(())
}

/// Numeric column as optional f64 cells, no emptiness check.
fn column_f64(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, DataError> {
    let column = require_numeric(df, name)?;
    let as_f64 = column.cast(&DataType::Float64)?;
    Ok(as_f64.f64()?.into_iter().collect())
}

fn filter_by_mask(df: &DataFrame, mask: &[bool]) -> Result<DataFrame, DataError> {
    let mask = BooleanChunked::from_slice("mask".into(), mask);
    Ok(df.filter(&mask)?)
}

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

/// Whether the table carries `Año` and `Trimestre` columns.
pub fn has_period_columns(df: &DataFrame) -> bool {
    has_column(df, ANIO) && has_column(df, TRIMESTRE)
}

/// Extract a numeric column as f64 (nulls become NaN).
pub fn numeric_values(df: &DataFrame, column: &str) -> Result<Vec<f64>, DataError> {
    require_rows(df)?;
    Ok(column_f64(df, column)?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

/// Extract any column as display strings (nulls become empty strings).
pub fn text_values(df: &DataFrame, column: &str) -> Result<Vec<String>, DataError> {
    let column = require_column(df, column)?;
    let as_str = column.cast(&DataType::String)?;
    Ok(as_str
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect())
}

/// Distinct values of a column in first-seen order.
pub fn unique_text(df: &DataFrame, column: &str) -> Result<Vec<String>, DataError> {
    let mut seen = HashSet::new();
    Ok(text_values(df, column)?
        .into_iter()
        .filter(|v| !v.is_empty() && seen.insert(v.clone()))
        .collect())
}

/// Stable sort by a numeric column, descending. Ties keep their original
/// relative order; nulls and NaN go last.
pub fn sort_descending(df: &DataFrame, column: &str) -> Result<DataFrame, DataError> {
    require_rows(df)?;
    let dtype = require_numeric(df, column)?.dtype().clone();

    // Polars ranks NaN above every number; sort it with the nulls instead.
    let key = if dtype.is_float() {
        col(column).fill_nan(lit(NULL))
    } else {
        col(column)
    };

    let sorted = df
        .clone()
        .lazy()
        .sort_by_exprs(
            [key],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_nulls_last(true)
                .with_maintain_order(true),
        )
        .collect()?;
    Ok(sorted)
}

/// Sum value columns per unique combination of group keys.
///
/// One output row per group, groups in first-seen order.
pub fn group_sum(
    df: &DataFrame,
    group_keys: &[&str],
    value_columns: &[&str],
) -> Result<DataFrame, DataError> {
    require_rows(df)?;
    if group_keys.is_empty() {
        return Err(DataError::schema("group_sum requiere al menos una clave"));
    }
    for key in group_keys {
        require_column(df, key)?;
    }
    for value in value_columns {
        require_numeric(df, value)?;
    }

    let by: Vec<Expr> = group_keys.iter().map(|k| col(*k)).collect();
    let aggs: Vec<Expr> = value_columns.iter().map(|c| col(*c).sum()).collect();

    let grouped = df
        .clone()
        .lazy()
        .group_by_stable(by)
        .agg(aggs)
        .collect()?;
    Ok(grouped)
}

/// Append a `Periodo` column (`"{year}-T{quarter}"`) built from `Año` and
/// `Trimestre`. An existing `Periodo` column is replaced. Rows that are not a
/// valid quarter get a null label.
pub fn with_period_column(df: &DataFrame) -> Result<DataFrame, DataError> {
    let labels: Vec<Option<String>> = row_periods(df)?
        .into_iter()
        .map(|p| p.map(|p| p.label()))
        .collect();

    let mut out = df.clone();
    out.with_column(Column::new(PERIODO.into(), labels))?;
    Ok(out)
}

/// Period-over-period growth in percent over a plain series.
///
/// Output has one element less than the input; growth from a zero or
/// missing previous value is undefined (`None`).
pub fn percent_change_values(values: &[f64]) -> Vec<Option<f64>> {
    values
        .windows(2)
        .map(|pair| {
            let (prev, curr) = (pair[0], pair[1]);
            if prev == 0.0 || !prev.is_finite() || !curr.is_finite() {
                None
            } else {
                Some((curr - prev) / prev * 100.0)
            }
        })
        .collect()
}

/// Name of the growth column produced by [`percent_change`].
pub fn percent_change_column(value_column: &str) -> String {
    format!("{} (%)", value_column)
}

/// Growth of `value_column` between consecutive rows of a table already
/// sorted by period ascending.
///
/// The first row has no predecessor and is dropped, so a single-row table
/// yields an empty result.
pub fn percent_change(df: &DataFrame, value_column: &str) -> Result<DataFrame, DataError> {
    let values = numeric_values(df, value_column)?;
    let growth = percent_change_values(&values);

    let mut out = df.slice(1, df.height() - 1);
    out.with_column(Column::new(
        percent_change_column(value_column).into(),
        growth,
    ))?;
    Ok(out)
}

/// Each value as a percentage of the group total. A zero total yields zeros.
pub fn percent_of_total(values: &[f64]) -> Vec<f64> {
    let total: f64 = values.iter().filter(|v| v.is_finite()).sum();
    if total == 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| v / total * 100.0).collect()
}

/// Replace each value column by its share of the row total across
/// `value_columns`.
pub fn share_by_row(df: &DataFrame, value_columns: &[&str]) -> Result<DataFrame, DataError> {
    require_rows(df)?;
    let columns: Vec<Vec<f64>> = value_columns
        .iter()
        .map(|c| numeric_values(df, c))
        .collect::<Result<_, _>>()?;

    let mut shares: Vec<Vec<f64>> = vec![Vec::with_capacity(df.height()); value_columns.len()];
    for row in 0..df.height() {
        let row_values: Vec<f64> = columns.iter().map(|c| c[row]).collect();
        for (i, share) in percent_of_total(&row_values).into_iter().enumerate() {
            shares[i].push(share);
        }
    }

    let mut out = df.clone();
    for (name, values) in value_columns.iter().zip(shares) {
        out.with_column(Column::new((*name).into(), values))?;
    }
    Ok(out)
}

/// Planned value after applying a growth rate.
pub fn projected_increase(value: f64, rate: f64) -> f64 {
    value * rate
}

/// The growth target a rate declares, in percent (`1.02` → `2.0`).
///
/// `(projected - value) / value * 100` reduces to this for every input, so
/// it is a target, not a measurement.
pub fn target_percent(rate: f64) -> f64 {
    (rate - 1.0) * 100.0
}

/// Reshape wide columns into long format (melt).
///
/// Output columns: `[id_column, variable_name, value_name]`, one row per
/// (value column, source row), value columns in the given order. Rows with a
/// missing value are skipped.
pub fn to_long(
    df: &DataFrame,
    id_column: &str,
    value_columns: &[&str],
    variable_name: &str,
    value_name: &str,
) -> Result<DataFrame, DataError> {
    require_rows(df)?;
    let ids = text_values(df, id_column)?;

    let mut out_ids: Vec<String> = Vec::new();
    let mut variables: Vec<String> = Vec::new();
    let mut values: Vec<f64> = Vec::new();

    for value_column in value_columns {
        let cells = column_f64(df, value_column)?;
        for (id, cell) in ids.iter().zip(cells) {
            if let Some(v) = cell.filter(|v| !v.is_nan()) {
                out_ids.push(id.clone());
                variables.push((*value_column).to_string());
                values.push(v);
            }
        }
    }

    let long = DataFrame::new(vec![
        Column::new(id_column.into(), out_ids),
        Column::new(variable_name.into(), variables),
        Column::new(value_name.into(), values),
    ])?;
    Ok(long)
}

/// Keep rows whose `Provincia` is in `provinces`. An empty set keeps all rows.
pub fn filter_provinces(
    df: &DataFrame,
    provinces: &BTreeSet<String>,
) -> Result<DataFrame, DataError> {
    if provinces.is_empty() {
        return Ok(df.clone());
    }
    let mask: Vec<bool> = text_values(df, PROVINCIA)?
        .iter()
        .map(|p| provinces.contains(p))
        .collect();
    filter_by_mask(df, &mask)
}

/// Period of every row, `None` where `Año`/`Trimestre` are not a valid quarter.
pub fn row_periods(df: &DataFrame) -> Result<Vec<Option<Period>>, DataError> {
    let years = column_f64(df, ANIO)?;
    let quarters = column_f64(df, TRIMESTRE)?;
    Ok(years
        .into_iter()
        .zip(quarters)
        .map(|(y, q)| match (y, q) {
            (Some(y), Some(q)) => Period::from_cells(y, q),
            _ => None,
        })
        .collect())
}

/// Keep the rows of one quarter.
pub fn filter_period(df: &DataFrame, period: Period) -> Result<DataFrame, DataError> {
    let mask: Vec<bool> = row_periods(df)?
        .into_iter()
        .map(|p| p == Some(period))
        .collect();
    filter_by_mask(df, &mask)
}

/// Distinct periods present in the table, ascending.
pub fn periods(df: &DataFrame) -> Result<Vec<Period>, DataError> {
    let distinct: BTreeSet<Period> = row_periods(df)?.into_iter().flatten().collect();
    Ok(distinct.into_iter().collect())
}

/// Most recent period in the table.
pub fn latest_period(df: &DataFrame) -> Result<Period, DataError> {
    periods(df)?
        .pop()
        .ok_or_else(|| DataError::schema("la tabla no contiene períodos válidos"))
}

/// Sort by `Año`, `Trimestre` ascending.
pub fn sort_by_period(df: &DataFrame) -> Result<DataFrame, DataError> {
    require_numeric(df, ANIO)?;
    require_numeric(df, TRIMESTRE)?;
    let sorted = df
        .clone()
        .lazy()
        .sort(
            [ANIO, TRIMESTRE],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()?;
    Ok(sorted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speeds() -> DataFrame {
        df!(
            "Provincia" => ["Salta", "CABA", "Chaco", "Córdoba", "Jujuy"],
            "Mbps (Media de bajada)" => [40.0, 170.0, 40.0, 90.0, 12.5]
        )
        .unwrap()
    }

    fn technology() -> DataFrame {
        df!(
            "Año" => [2023, 2023, 2024, 2023, 2024],
            "Trimestre" => [4, 4, 1, 3, 1],
            "Provincia" => ["Salta", "CABA", "Salta", "Salta", "CABA"],
            "ADSL" => [10i64, 20, 8, 12, 15],
            "Fibra óptica" => [5i64, 50, 9, 4, 60]
        )
        .unwrap()
    }

    #[test]
    fn sort_descending_is_stable_permutation() {
        let df = speeds();
        let sorted = sort_descending(&df, "Mbps (Media de bajada)").unwrap();

        assert_eq!(sorted.height(), df.height());
        let values = numeric_values(&sorted, "Mbps (Media de bajada)").unwrap();
        assert!(values.windows(2).all(|w| w[0] >= w[1]));

        // Salta and Chaco tie at 40.0 and keep input order.
        let provinces = text_values(&sorted, "Provincia").unwrap();
        assert_eq!(provinces, vec!["CABA", "Córdoba", "Salta", "Chaco", "Jujuy"]);

        let mut before = text_values(&df, "Provincia").unwrap();
        let mut after = provinces.clone();
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn sort_descending_puts_nan_last() {
        let df = df!(
            "Provincia" => ["Salta", "CABA", "Chaco", "Jujuy"],
            "Mbps (Media de bajada)" => [Some(1.0), Some(f64::NAN), Some(3.0), None]
        )
        .unwrap();
        let sorted = sort_descending(&df, "Mbps (Media de bajada)").unwrap();

        assert_eq!(
            text_values(&sorted, "Provincia").unwrap(),
            vec!["Chaco", "Salta", "CABA", "Jujuy"]
        );
        let values = numeric_values(&sorted, "Mbps (Media de bajada)").unwrap();
        assert_eq!(&values[..2], &[3.0, 1.0]);
        assert!(values[2].is_nan() && values[3].is_nan());
    }

    #[test]
    fn sort_descending_rejects_text_column() {
        let err = sort_descending(&speeds(), "Provincia").unwrap_err();
        assert!(err.is_schema());
    }

    #[test]
    fn group_sum_matches_manual_sums_in_first_seen_order() {
        let df = technology();
        let grouped = group_sum(&df, &["Año", "Trimestre"], &["ADSL", "Fibra óptica"]).unwrap();

        assert_eq!(grouped.height(), 3);
        assert_eq!(
            row_periods(&grouped).unwrap(),
            vec![
                Some(Period::new(2023, 4)),
                Some(Period::new(2024, 1)),
                Some(Period::new(2023, 3)),
            ]
        );
        assert_eq!(numeric_values(&grouped, "ADSL").unwrap(), vec![30.0, 23.0, 12.0]);
        assert_eq!(
            numeric_values(&grouped, "Fibra óptica").unwrap(),
            vec![55.0, 69.0, 4.0]
        );
    }

    #[test]
    fn group_sum_missing_column_is_schema_error() {
        let err = group_sum(&technology(), &["Año"], &["Wireless"]).unwrap_err();
        assert!(err.is_schema());
    }

    #[test]
    fn percent_change_two_rows() {
        let df = df!("Periodo" => ["2024-T1", "2024-T2"], "x" => [100.0, 110.0]).unwrap();
        let out = percent_change(&df, "x").unwrap();

        assert_eq!(out.height(), 1);
        let growth = numeric_values(&out, "x (%)").unwrap();
        assert!((growth[0] - 10.0).abs() < 1e-12);
        assert_eq!(text_values(&out, "Periodo").unwrap(), vec!["2024-T2"]);
    }

    #[test]
    fn percent_change_single_row_is_empty() {
        let df = df!("x" => [100.0]).unwrap();
        let out = percent_change(&df, "x").unwrap();
        assert_eq!(out.height(), 0);
    }

    #[test]
    fn percent_change_empty_table_is_schema_error() {
        let df = df!("x" => Vec::<f64>::new()).unwrap();
        assert!(percent_change(&df, "x").unwrap_err().is_schema());
    }

    #[test]
    fn percent_change_from_zero_is_undefined() {
        assert_eq!(percent_change_values(&[0.0, 5.0, 10.0]), vec![None, Some(100.0)]);
    }

    #[test]
    fn percent_of_total_example() {
        assert_eq!(percent_of_total(&[1.0, 1.0, 2.0]), vec![25.0, 25.0, 50.0]);
        assert_eq!(percent_of_total(&[0.0, 0.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn share_by_row_sums_to_hundred() {
        let shares = share_by_row(&technology(), &["ADSL", "Fibra óptica"]).unwrap();
        let adsl = numeric_values(&shares, "ADSL").unwrap();
        let fibra = numeric_values(&shares, "Fibra óptica").unwrap();
        for (a, f) in adsl.iter().zip(fibra.iter()) {
            assert!((a + f - 100.0).abs() < 1e-9);
        }
        assert!((adsl[1] - 20.0 / 70.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn projection_and_target() {
        assert_eq!(projected_increase(50.0, DEFAULT_KPI_RATE), 51.0);
        assert!((target_percent(DEFAULT_KPI_RATE) - 2.0).abs() < 1e-9);
        for value in [0.5, 33.3, 78.0, 1e6] {
            let projected = projected_increase(value, DEFAULT_KPI_RATE);
            let delta = (projected - value) / value * 100.0;
            assert!((delta - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn with_period_column_labels_rows() {
        let out = with_period_column(&technology()).unwrap();
        assert_eq!(
            text_values(&out, "Periodo").unwrap(),
            vec!["2023-T4", "2023-T4", "2024-T1", "2023-T3", "2024-T1"]
        );
    }

    #[test]
    fn with_period_column_leaves_invalid_quarters_unlabelled() {
        let df = df!(
            "Año" => [2024.0, 2024.0],
            "Trimestre" => [2.0, 2.5]
        )
        .unwrap();
        let out = with_period_column(&df).unwrap();
        let labels = out.column("Periodo").unwrap().str().unwrap();
        assert_eq!(labels.get(0), Some("2024-T2"));
        assert_eq!(labels.get(1), None);
    }

    #[test]
    fn to_long_is_column_major() {
        let wide = df!("Periodo" => ["2024-T1", "2024-T2"], "A" => [1.0, 2.0], "B" => [3.0, 4.0])
            .unwrap();
        let long = to_long(&wide, "Periodo", &["A", "B"], "Tecnología", "Accesos").unwrap();

        assert_eq!(long.height(), 4);
        assert_eq!(
            text_values(&long, "Tecnología").unwrap(),
            vec!["A", "A", "B", "B"]
        );
        assert_eq!(
            numeric_values(&long, "Accesos").unwrap(),
            vec![1.0, 2.0, 3.0, 4.0]
        );
    }

    #[test]
    fn filters_by_province_and_period() {
        let df = technology();

        let salta: BTreeSet<String> = ["Salta".to_string()].into_iter().collect();
        assert_eq!(filter_provinces(&df, &salta).unwrap().height(), 3);
        assert_eq!(filter_provinces(&df, &BTreeSet::new()).unwrap().height(), 5);

        let q1 = filter_period(&df, Period::new(2024, 1)).unwrap();
        assert_eq!(q1.height(), 2);
        assert_eq!(latest_period(&df).unwrap(), Period::new(2024, 1));
        assert_eq!(
            periods(&df).unwrap(),
            vec![Period::new(2023, 3), Period::new(2023, 4), Period::new(2024, 1)]
        );
    }

    #[test]
    fn sort_by_period_orders_ascending() {
        let sorted = sort_by_period(&technology()).unwrap();
        let order: Vec<Period> = row_periods(&sorted).unwrap().into_iter().flatten().collect();
        assert!(order.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn unique_text_keeps_first_seen_order() {
        assert_eq!(
            unique_text(&technology(), "Provincia").unwrap(),
            vec!["Salta", "CABA"]
        );
    }

    #[test]
    fn transforms_are_idempotent() {
        let df = technology();
        let a = group_sum(&df, &["Año", "Trimestre"], &["ADSL"]).unwrap();
        let b = group_sum(&df, &["Año", "Trimestre"], &["ADSL"]).unwrap();
        assert!(a.equals_missing(&b));

        let a = sort_descending(&df, "ADSL").unwrap();
        let b = sort_descending(&df, "ADSL").unwrap();
        assert!(a.equals_missing(&b));

        let a = percent_change(&df, "ADSL").unwrap();
        let b = percent_change(&df, "ADSL").unwrap();
        assert!(a.equals_missing(&b));
    }
}
