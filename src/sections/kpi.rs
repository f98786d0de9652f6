//! KPI's
//!
//! KPI 1 projects household access per province with the configured growth
//! rate; the rate itself is shown as a declared target. KPI 2 is the
//! quarter-over-quarter growth of each technology over national totals.

use super::content;
use super::{Section, SectionFilters, SectionView, Session};
use crate::charts::{ChartSpec, Metric, TableView};
use crate::data::schema::{ACCESOS_HOGARES, ANIO, PERIODO, PROVINCIA, TECHNOLOGIES, TRIMESTRE};
use crate::data::transform::{
    filter_period, group_sum, latest_period, numeric_values, percent_change,
    percent_change_column, projected_increase, sort_by_period, target_percent, text_values,
    with_period_column,
};
use crate::data::{DataError, Dataset, Period};
use polars::prelude::*;
use rayon::prelude::*;
use tracing::debug;

pub const ACCESS_CHART: &str = "kpi_acceso";
pub const ACCESS_TABLE: &str = "kpi_acceso_detalle";
pub const GROWTH_CHART: &str = "kpi_crecimiento";

pub const CURRENT_COLUMN: &str = "Acceso Actual";
pub const PLANNED_COLUMN: &str = "Nuevo acceso";
pub const TARGET_COLUMN: &str = "Meta (%)";

pub fn build(session: &mut Session, filters: &SectionFilters) -> SectionView {
    let mut view = SectionView::new(Section::Kpis);
    view.heading("4. KPI's");

    let rate = session.config().kpi_rate;
    let configured_period = session.config().kpi_period;

    view.subheading("KPI 1: Aumento del acceso a internet por cada 100 hogares");
    view.paragraph(content::KPI_ACCESS_TEXT);
    let access = session
        .table(Dataset::HouseholdPenetration)
        .and_then(|df| filters.apply_provinces(&df))
        .and_then(|df| {
            let period = kpi_period(&df, filters.period.or(configured_period))?;
            access_projection(&df, period, rate)
        });

    view.metrics(Ok(vec![Metric::new(
        "Meta declarada",
        target_percent(rate),
        "%",
    )]));
    view.chart(access.as_ref().map_err(Clone::clone).and_then(|df| access_chart(df, rate)));
    view.table(access.and_then(|df| {
        TableView::from_frame(
            ACCESS_TABLE,
            &df,
            &[PROVINCIA, CURRENT_COLUMN, PLANNED_COLUMN, TARGET_COLUMN],
        )
    }));

    view.subheading("KPI 2: Crecimiento trimestral de accesos por tecnología");
    view.paragraph(content::KPI_GROWTH_TEXT);
    let growth = session
        .table(Dataset::AccessByTechnology)
        .and_then(|df| technology_growth(&df));
    match growth {
        Ok(df) if df.height() == 0 => view.paragraph(content::KPI_GROWTH_SHORT_TEXT),
        other => view.chart(other.and_then(|df| growth_chart(&df))),
    }
    view.insights(content::kpi_growth_notes());
    view
}

/// The requested quarter, or the latest one in the table.
fn kpi_period(df: &DataFrame, requested: Option<Period>) -> Result<Period, DataError> {
    match requested {
        Some(p) => Ok(p),
        None => latest_period(df),
    }
}

/// Current and projected access per province for one quarter.
///
/// Output columns: `Provincia`, `Acceso Actual`, `Nuevo acceso`, `Meta (%)`.
pub fn access_projection(
    df: &DataFrame,
    period: Period,
    rate: f64,
) -> Result<DataFrame, DataError> {
    let quarter = filter_period(df, period)?;
    if quarter.height() == 0 {
        return Err(DataError::schema(format!("sin datos para el período {}", period)));
    }

    let provinces = text_values(&quarter, PROVINCIA)?;
    let current = numeric_values(&quarter, ACCESOS_HOGARES)?;
    let planned: Vec<f64> = current.iter().map(|v| projected_increase(*v, rate)).collect();
    let target = vec![target_percent(rate); current.len()];

    let out = DataFrame::new(vec![
        Column::new(PROVINCIA.into(), provinces),
        Column::new(CURRENT_COLUMN.into(), current),
        Column::new(PLANNED_COLUMN.into(), planned),
        Column::new(TARGET_COLUMN.into(), target),
    ])?;
    Ok(out)
}

pub fn access_chart(projection: &DataFrame, rate: f64) -> Result<ChartSpec, DataError> {
    let planned = format!("Acceso Planificado ({:.0}%)", target_percent(rate));
    Ok(ChartSpec::grouped_bar(
        ACCESS_CHART,
        projection,
        PROVINCIA,
        &[(CURRENT_COLUMN, "Acceso Actual"), (PLANNED_COLUMN, planned.as_str())],
    )?
    .with_title("Acceso actual y planificado por provincia")
    .with_labels("Provincia", "Accesos por cada 100 hogares")
    .with_legend_title("Tipo de Acceso"))
}

/// Quarter-over-quarter growth (%) of every technology.
///
/// Rows are summed per quarter before growth is computed, so provinces never
/// mix. The first quarter has no predecessor and is dropped. Output columns:
/// `Periodo` plus one column per technology.
pub fn technology_growth(df: &DataFrame) -> Result<DataFrame, DataError> {
    let grouped = group_sum(df, &[ANIO, TRIMESTRE], &TECHNOLOGIES)?;
    let totals = with_period_column(&sort_by_period(&grouped)?)?;
    debug!(quarters = totals.height(), "computing technology growth");

    let per_technology: Vec<(String, Column)> = TECHNOLOGIES
        .par_iter()
        .map(|tech| -> Result<(String, Column), DataError> {
            let changed = percent_change(&totals, tech)?;
            let growth = changed.column(&percent_change_column(tech))?.clone();
            Ok((tech.to_string(), growth))
        })
        .collect::<Result<_, DataError>>()?;

    let labels = totals.column(PERIODO)?.slice(1, totals.height().saturating_sub(1));
    let mut columns = vec![labels];
    for (tech, growth) in per_technology {
        columns.push(growth.with_name(tech.into()));
    }
    Ok(DataFrame::new(columns)?)
}

pub fn growth_chart(growth: &DataFrame) -> Result<ChartSpec, DataError> {
    let series: Vec<(&str, &str)> = TECHNOLOGIES.iter().map(|t| (*t, *t)).collect();
    Ok(ChartSpec::line(GROWTH_CHART, growth, PERIODO, &series)?
        .with_title("Crecimiento trimestral de accesos por tecnología")
        .with_labels("Periodo", "Crecimiento (%)")
        .with_legend_title("Tecnología"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartBody;

    fn household() -> DataFrame {
        df!(
            "Año" => [2024, 2024, 2023],
            "Trimestre" => [2, 2, 4],
            "Provincia" => ["CABA", "Salta", "CABA"],
            "Accesos por cada 100 hogares" => [100.0, 50.0, 90.0]
        )
        .unwrap()
    }

    fn access() -> DataFrame {
        df!(
            "Año" => [2023, 2023, 2024, 2024, 2024, 2024],
            "Trimestre" => [4, 4, 1, 1, 2, 2],
            "Provincia" => ["CABA", "Salta", "CABA", "Salta", "CABA", "Salta"],
            "ADSL" => [60.0, 40.0, 50.0, 40.0, 45.0, 45.0],
            "Cablemodem" => [100.0, 100.0, 110.0, 110.0, 121.0, 121.0],
            "Fibra óptica" => [10.0, 0.0, 20.0, 0.0, 20.0, 20.0],
            "Wireless" => [5.0, 5.0, 5.0, 5.0, 5.0, 5.0],
            "Otros" => [0.0, 0.0, 0.0, 0.0, 1.0, 1.0]
        )
        .unwrap()
    }

    #[test]
    fn projection_applies_rate() {
        let out = access_projection(&household(), Period::new(2024, 2), 1.02).unwrap();
        assert_eq!(out.height(), 2);
        let planned = numeric_values(&out, PLANNED_COLUMN).unwrap();
        assert!((planned[1] - 51.0).abs() < 1e-9);
        let target = numeric_values(&out, TARGET_COLUMN).unwrap();
        assert!(target.iter().all(|t| (t - 2.0).abs() < 1e-9));
    }

    #[test]
    fn projection_for_missing_period_fails() {
        let err = access_projection(&household(), Period::new(2020, 1), 1.02).unwrap_err();
        assert!(err.is_schema());
    }

    #[test]
    fn chart_names_planned_series_after_target() {
        let out = access_projection(&household(), Period::new(2024, 2), 1.05).unwrap();
        let spec = access_chart(&out, 1.05).unwrap();
        match spec.body {
            ChartBody::Categorical { series, .. } => {
                assert_eq!(series[1].name, "Acceso Planificado (5%)");
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn growth_uses_national_totals() {
        let growth = technology_growth(&access()).unwrap();
        assert_eq!(growth.height(), 2);

        let labels = text_values(&growth, PERIODO).unwrap();
        assert_eq!(labels, vec!["2024-T1", "2024-T2"]);

        let adsl = growth.column("ADSL").unwrap().f64().unwrap();
        assert!((adsl.get(0).unwrap() + 10.0).abs() < 1e-9);
        assert_eq!(adsl.get(1), Some(0.0));

        let cable = growth.column("Cablemodem").unwrap().f64().unwrap();
        assert!((cable.get(1).unwrap() - 10.0).abs() < 1e-9);

        // 0 -> 0 -> 2: growth from zero is undefined
        let otros = growth.column("Otros").unwrap().f64().unwrap();
        assert_eq!(otros.get(0), None);
        assert_eq!(otros.get(1), None);
    }

    #[test]
    fn single_quarter_has_no_growth() {
        let one = access().slice(0, 2);
        let growth = technology_growth(&one).unwrap();
        assert_eq!(growth.height(), 0);
    }
}
