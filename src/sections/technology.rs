//! Tecnologías de Conexión: national access counts per technology.

use super::content;
use super::{Section, SectionFilters, SectionView, Session};
use crate::charts::{ChartSpec, Metric};
use crate::data::schema::{ANIO, PERIODO, TECHNOLOGIES, TRIMESTRE};
use crate::data::transform::{
    filter_period, group_sum, latest_period, numeric_values, share_by_row, sort_by_period,
    to_long, with_period_column,
};
use crate::data::{DataError, Dataset, Period};
use polars::prelude::DataFrame;

pub const TRENDS_CHART: &str = "tecnologias_tendencias";
pub const SHARE_CHART: &str = "tecnologias_participacion";

pub const TECHNOLOGY_LABEL: &str = "Tecnología";
pub const ACCESS_COUNT_LABEL: &str = "Cantidad de Accesos";

pub fn build(session: &mut Session, filters: &SectionFilters) -> SectionView {
    let mut view = SectionView::new(Section::Tecnologias);
    view.heading("3. Tecnologías de Conexión");
    view.paragraph(content::TECHNOLOGY_INTRO);

    let totals = session
        .table(Dataset::TechnologyTotals)
        .and_then(|df| national_totals(&df));

    view.subheading("Evolución de las Tecnologías de Acceso a Internet");
    view.paragraph(content::TECHNOLOGY_TRENDS_TEXT);
    view.chart(totals.as_ref().map_err(Clone::clone).and_then(trends_chart));

    view.subheading("Participación por Tecnología");
    view.paragraph(content::TECHNOLOGY_SHARE_TEXT);
    view.metrics(
        totals
            .as_ref()
            .map_err(Clone::clone)
            .and_then(|df| share_metrics(df, filters)),
    );
    view.chart(totals.and_then(|df| share_chart(&df, filters)));

    view.subheading("Insights Significativos");
    view.insights(content::technology_insights());
    view
}

/// Technology columns summed per quarter, sorted, with a `Periodo` label.
pub fn national_totals(df: &DataFrame) -> Result<DataFrame, DataError> {
    let grouped = group_sum(df, &[ANIO, TRIMESTRE], &TECHNOLOGIES)?;
    with_period_column(&sort_by_period(&grouped)?)
}

pub fn trends_chart(totals: &DataFrame) -> Result<ChartSpec, DataError> {
    let long = to_long(totals, PERIODO, &TECHNOLOGIES, TECHNOLOGY_LABEL, ACCESS_COUNT_LABEL)?;
    Ok(
        ChartSpec::long_line(TRENDS_CHART, &long, PERIODO, TECHNOLOGY_LABEL, ACCESS_COUNT_LABEL)?
            .with_title("Evolución de las Tecnologías de Acceso a Internet")
            .with_labels("Periodo", ACCESS_COUNT_LABEL),
    )
}

/// The selected quarter's row, or the latest one when none is selected.
fn selected_quarter(
    totals: &DataFrame,
    filters: &SectionFilters,
) -> Result<(Period, DataFrame), DataError> {
    let period = match filters.period {
        Some(p) => p,
        None => latest_period(totals)?,
    };
    let quarter = filter_period(totals, period)?;
    if quarter.height() == 0 {
        return Err(DataError::schema(format!("sin datos para el período {}", period)));
    }
    Ok((period, quarter))
}

pub fn share_chart(totals: &DataFrame, filters: &SectionFilters) -> Result<ChartSpec, DataError> {
    let (period, quarter) = selected_quarter(totals, filters)?;
    let long = to_long(&quarter, PERIODO, &TECHNOLOGIES, TECHNOLOGY_LABEL, ACCESS_COUNT_LABEL)?;
    Ok(
        ChartSpec::pie(SHARE_CHART, &long, TECHNOLOGY_LABEL, ACCESS_COUNT_LABEL)?
            .with_title(&format!("Participación por tecnología ({})", period)),
    )
}

/// Share (%) of each technology in the selected quarter's total.
pub fn share_metrics(
    totals: &DataFrame,
    filters: &SectionFilters,
) -> Result<Vec<Metric>, DataError> {
    let (_, quarter) = selected_quarter(totals, filters)?;
    let shares = share_by_row(&quarter, &TECHNOLOGIES)?;
    TECHNOLOGIES
        .iter()
        .map(|tech| -> Result<Metric, DataError> {
            let share = numeric_values(&shares, tech)?;
            Ok(Metric::new(tech, share[0], "%"))
        })
        .collect()
}
