//! Calidad y Velocidad del Servicio.

use super::content;
use super::{Section, SectionFilters, SectionView, Session};
use crate::charts::{max_metric, min_metric, ChartSpec, Metric};
use crate::data::schema::{MBPS_BAJADA, PROVINCIA};
use crate::data::transform::sort_descending;
use crate::data::{DataError, Dataset};
use crate::stats::{ratio_to_baseline, StatsCalculator};
use polars::prelude::DataFrame;

pub const SPEED_CHART: &str = "velocidad_provincias";

pub fn build(session: &mut Session, filters: &SectionFilters) -> SectionView {
    let mut view = SectionView::new(Section::Velocidad);
    view.heading("2. Calidad y Velocidad del Servicio");
    view.paragraph(content::SPEED_INTRO);

    let speeds = session
        .table(Dataset::SpeedByProvince)
        .and_then(|df| filters.apply(&df));

    view.subheading("Estadísticas de velocidad");
    view.metrics(speeds.as_ref().map_err(Clone::clone).and_then(speed_metrics));

    view.subheading("Velocidad Media de Bajada por Provincia");
    view.chart(speeds.and_then(|df| speed_chart(&df)));

    view.subheading("Insights Significativos");
    view.insights(content::speed_insights());
    view
}

/// Summary cards over the filtered provinces. The maximum carries its ratio
/// to the mean.
pub fn speed_metrics(df: &DataFrame) -> Result<Vec<Metric>, DataError> {
    let summary = StatsCalculator::summarize(df, MBPS_BAJADA)?;
    if summary.count == 0 {
        return Err(DataError::schema(format!(
            "la columna '{}' no tiene valores",
            MBPS_BAJADA
        )));
    }

    let max = max_metric(df, MBPS_BAJADA, "Máximo", "Mbps")?;
    Ok(vec![
        Metric::new("Promedio nacional", summary.mean, "Mbps"),
        Metric::new("Mediana", summary.median, "Mbps"),
        max.with_delta(ratio_to_baseline(summary.max, summary.mean), "vs promedio"),
        min_metric(df, MBPS_BAJADA, "Mínimo", "Mbps")?,
        Metric::new("Desvío estándar", summary.std, "Mbps"),
    ])
}

pub fn speed_chart(df: &DataFrame) -> Result<ChartSpec, DataError> {
    let sorted = sort_descending(df, MBPS_BAJADA)?;
    Ok(ChartSpec::bar(SPEED_CHART, &sorted, PROVINCIA, MBPS_BAJADA)?
        .colored_by(PROVINCIA)
        .with_title("Velocidad Media de Bajada por Provincia")
        .with_labels("Provincia", "Mbps (Media de bajada)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn speeds() -> DataFrame {
        df!(
            "Provincia" => ["Chubut", "CABA", "Salta"],
            "Mbps (Media de bajada)" => [20.0, 160.0, 60.0]
        )
        .unwrap()
    }

    #[test]
    fn metrics_describe_the_distribution() {
        let metrics = speed_metrics(&speeds()).unwrap();
        let labels: Vec<&str> = metrics.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Promedio nacional", "Mediana", "Máximo", "Mínimo", "Desvío estándar"]
        );
        assert!((metrics[0].value - 80.0).abs() < 1e-9);
        assert_eq!(metrics[1].value, 60.0);
        assert_eq!(metrics[2].value, 160.0);
        assert_eq!(metrics[2].delta, Some(2.0));
        assert_eq!(metrics[3].value, 20.0);
    }

    #[test]
    fn chart_orders_fastest_first() {
        let spec = speed_chart(&speeds()).unwrap();
        assert_eq!(spec.color_by.as_deref(), Some("Provincia"));
        assert_eq!(spec.point_count(), 3);
        match spec.body {
            crate::charts::ChartBody::Categorical { categories, .. } => {
                assert_eq!(categories, vec!["CABA", "Salta", "Chubut"]);
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn missing_speed_column_is_schema_error() {
        let df = df!("Provincia" => ["CABA"], "Mbps" => [1.0]).unwrap();
        assert!(speed_metrics(&df).unwrap_err().is_schema());
        assert!(speed_chart(&df).unwrap_err().is_schema());
    }
}
