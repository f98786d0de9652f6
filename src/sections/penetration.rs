//! Penetración del Servicio: access per 100 inhabitants / households.

use super::content;
use super::{Section, SectionFilters, SectionView, Session};
use crate::charts::{mean_metric, ratio_metric, ChartSpec, Metric};
use crate::data::schema::{ACCESOS_HAB, ACCESOS_HOGARES, PERIODO, PROVINCIA};
use crate::data::transform::{
    has_period_columns, sort_by_period, sort_descending, with_period_column,
};
use crate::data::{DataError, Dataset};
use crate::stats::StatsCalculator;
use polars::prelude::DataFrame;

pub const POPULATION_CHART: &str = "penetracion_poblacion";
pub const HOUSEHOLD_CHART: &str = "penetracion_hogares";
pub const TRENDS_CHART: &str = "penetracion_tendencias";
pub const HEATMAP_CHART: &str = "penetracion_mapa_calor";

pub fn build(session: &mut Session, filters: &SectionFilters) -> SectionView {
    let mut view = SectionView::new(Section::Penetracion);
    view.heading("1.1 Penetración del Servicio");
    view.paragraph(content::PENETRATION_INTRO);

    let population = session
        .table(Dataset::PopulationPenetration)
        .and_then(|df| filters.apply(&df));
    let household = session
        .table(Dataset::HouseholdPenetration)
        .and_then(|df| filters.apply(&df));

    view.metrics(match (&population, &household) {
        (Ok(p), Ok(h)) => summary_metrics(p, h),
        (Err(e), _) | (_, Err(e)) => Err(e.clone()),
    });

    view.subheading("Penetración de Internet en la Población por Provincia");
    view.paragraph(content::POPULATION_CHART_TEXT);
    view.chart(population.and_then(|df| population_chart(&df)));

    view.subheading("Penetración de Internet en los Hogares por Provincia");
    view.paragraph(content::HOUSEHOLD_CHART_TEXT);
    view.chart(household.and_then(|df| household_chart(&df)));

    view.subheading("Tendencias de Penetración Total a lo Largo del Tiempo");
    view.paragraph(content::TRENDS_CHART_TEXT);
    view.chart(
        session
            .table(Dataset::PenetrationTotals)
            .and_then(|df| trends_chart(&df)),
    );

    view.subheading("Mapa de Calor por Provincia y Trimestre");
    view.paragraph(content::HEATMAP_TEXT);
    view.chart(
        session
            .table(Dataset::HouseholdPenetration)
            .and_then(|df| filters.apply_provinces(&df))
            .and_then(|df| heatmap_chart(&df)),
    );

    view.subheading("Insights Significativos");
    view.insights(content::penetration_insights());
    view
}

fn summary_metrics(
    population: &DataFrame,
    household: &DataFrame,
) -> Result<Vec<Metric>, DataError> {
    let per_inhabitant = mean_metric(population, ACCESOS_HAB, "Promedio cada 100 habitantes", "")?;
    let per_household = StatsCalculator::mean(household, ACCESOS_HOGARES)?;
    Ok(vec![
        per_inhabitant.clone(),
        ratio_metric(
            "Promedio cada 100 hogares",
            per_household,
            per_inhabitant.value,
            "",
            "vs habitantes",
        ),
    ])
}

pub fn population_chart(df: &DataFrame) -> Result<ChartSpec, DataError> {
    let sorted = sort_descending(df, ACCESOS_HAB)?;
    Ok(ChartSpec::bar(POPULATION_CHART, &sorted, PROVINCIA, ACCESOS_HAB)?
        .colored_by(PROVINCIA)
        .with_title("Accesos por cada 100 habitantes en las provincias")
        .with_labels("Provincia", "Accesos por cada 100 habitantes"))
}

pub fn household_chart(df: &DataFrame) -> Result<ChartSpec, DataError> {
    let sorted = sort_descending(df, ACCESOS_HOGARES)?;
    Ok(ChartSpec::bar(HOUSEHOLD_CHART, &sorted, PROVINCIA, ACCESOS_HOGARES)?
        .colored_by(PROVINCIA)
        .with_title("Accesos por cada 100 hogares en las provincias")
        .with_labels("Provincia", "Accesos por cada 100 hogares"))
}

/// National trend; ordered by quarter when the table has `Año`/`Trimestre`,
/// file order otherwise.
pub fn trends_chart(df: &DataFrame) -> Result<ChartSpec, DataError> {
    let ordered = if has_period_columns(df) {
        sort_by_period(df)?
    } else {
        df.clone()
    };

    Ok(ChartSpec::line(
        TRENDS_CHART,
        &ordered,
        PERIODO,
        &[
            (ACCESOS_HOGARES, "Accesos por cada 100 hogares"),
            (ACCESOS_HAB, "Accesos por cada 100 hab"),
        ],
    )?
    .with_title("Tendencias de Accesos por cada 100 hogares y habitantes")
    .with_labels("Periodo", "Accesos por cada 100")
    .with_legend_title("Indicador"))
}

pub fn heatmap_chart(df: &DataFrame) -> Result<ChartSpec, DataError> {
    let labelled = with_period_column(&sort_by_period(df)?)?;
    Ok(
        ChartSpec::heatmap(HEATMAP_CHART, &labelled, PROVINCIA, PERIODO, ACCESOS_HOGARES)?
            .with_title("Accesos por cada 100 hogares por provincia y trimestre")
            .with_labels("Periodo", "Provincia"),
    )
}
