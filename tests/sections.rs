mod common;

use common::{fixture_copy, fixtures_dir, session_for};
use conectividad_dashboard::charts::ChartBody;
use conectividad_dashboard::data::{Dataset, Period};
use conectividad_dashboard::sections::{Block, Section, SectionFilters};
use std::fs;

fn categories(body: &ChartBody) -> Vec<String> {
    match body {
        ChartBody::Categorical { categories, .. } => categories.clone(),
        other => panic!("expected categorical chart, got {:?}", other),
    }
}

#[test]
fn every_section_builds_from_fixtures() {
    let mut session = session_for(&fixtures_dir());
    let filters = SectionFilters::default();

    for section in Section::ALL {
        let view = section.build(&mut session, &filters);
        assert_eq!(view.section, section);
        assert!(view.errors().is_empty(), "{:?}: {:?}", section, view.errors());
        assert!(matches!(view.blocks.first(), Some(Block::Heading(_))));
    }
}

#[test]
fn home_needs_no_data() {
    let tmp = tempfile::tempdir().unwrap();
    let mut session = session_for(tmp.path());
    let view = Section::Inicio.build(&mut session, &SectionFilters::default());
    assert!(view.errors().is_empty());
    assert_eq!(session.loader().cached_count(), 0);
}

#[test]
fn penetration_charts_follow_latest_quarter() {
    let mut session = session_for(&fixtures_dir());
    let view = Section::Penetracion.build(&mut session, &SectionFilters::default());

    let population = view.find_chart("penetracion_poblacion").unwrap();
    assert_eq!(
        categories(&population.body),
        vec!["Capital Federal", "Buenos Aires", "Salta"]
    );
    assert_eq!(population.point_count(), 3);

    let trends = view.find_chart("penetracion_tendencias").unwrap();
    assert_eq!(
        categories(&trends.body),
        vec!["Oct-Dic 2023", "Ene-Mar 2024", "Abr-Jun 2024"]
    );

    match &view.find_chart("penetracion_mapa_calor").unwrap().body {
        ChartBody::Grid { rows, columns, cells } => {
            assert_eq!(rows.len(), 3);
            assert_eq!(columns, &vec!["2023-T4", "2024-T1", "2024-T2"]);
            assert!(cells.iter().flatten().all(|c| c.is_some()));
        }
        other => panic!("expected grid, got {:?}", other),
    }

    let metrics = view.metric_list();
    assert_eq!(metrics.len(), 2);
    assert!(metrics[1].delta.unwrap() > 1.0);
}

#[test]
fn speed_metrics_respect_province_filter() {
    let mut session = session_for(&fixtures_dir());

    let all = Section::Velocidad.build(&mut session, &SectionFilters::default());
    let metrics = all.metric_list();
    assert_eq!(metrics[0].label, "Promedio nacional");
    assert!((metrics[0].value - 167.34).abs() < 1e-9);
    assert_eq!(metrics[1].value, 157.41);
    assert_eq!(metrics[2].value, 233.01);
    assert_eq!(metrics[3].value, 111.60);

    let salta = SectionFilters {
        provinces: ["Salta".to_string()].into_iter().collect(),
        period: Some(Period::new(2024, 1)),
    };
    let view = Section::Velocidad.build(&mut session, &salta);
    assert_eq!(view.metric_list()[0].value, 100.0);
    assert_eq!(
        categories(&view.find_chart("velocidad_provincias").unwrap().body),
        vec!["Salta"]
    );
}

#[test]
fn technology_share_sums_to_one_hundred() {
    let mut session = session_for(&fixtures_dir());
    let view = Section::Tecnologias.build(&mut session, &SectionFilters::default());

    let share: f64 = view
        .metric_list()
        .iter()
        .filter(|m| m.unit == "%")
        .map(|m| m.value)
        .sum();
    assert!((share - 100.0).abs() < 1e-6);

    let trend = view.find_chart("tecnologias_tendencias").unwrap();
    match &trend.body {
        ChartBody::Categorical { categories, series } => {
            assert_eq!(categories.len(), 3);
            assert_eq!(series.len(), 5);
        }
        other => panic!("expected categorical chart, got {:?}", other),
    }
}

#[test]
fn kpi_section_projects_and_grows() {
    let mut session = session_for(&fixtures_dir());
    let view = Section::Kpis.build(&mut session, &SectionFilters::default());

    let target = view.metric_list()[0];
    assert_eq!(target.label, "Meta declarada");
    assert!((target.value - 2.0).abs() < 1e-9);

    let tables = view.tables();
    let table = tables[0];
    assert_eq!(table.rows.len(), 3);
    // Salta, 2024-T2: 50.00 -> 51.00
    let salta = table.rows.iter().find(|r| r[0] == "Salta").unwrap();
    assert_eq!(salta[1], "50.00");
    assert_eq!(salta[2], "51.00");
    assert_eq!(salta[3], "2.00");

    let growth = view.find_chart("kpi_crecimiento").unwrap();
    match &growth.body {
        ChartBody::Categorical { categories, series } => {
            assert_eq!(categories, &vec!["2024-T1", "2024-T2"]);
            let adsl = &series[0];
            assert_eq!(adsl.name, "ADSL");
            assert!((adsl.values[0].unwrap() + 20.0).abs() < 1e-9);
            assert!((adsl.values[1].unwrap() + 12.5).abs() < 1e-9);
            let wireless = &series[3];
            assert_eq!(wireless.values, vec![Some(0.0), Some(0.0)]);
        }
        other => panic!("expected categorical chart, got {:?}", other),
    }
}

#[test]
fn kpi_uses_configured_period() {
    let mut session = conectividad_dashboard::sections::Session::new(
        conectividad_dashboard::config::DashboardConfig {
            data_dir: fixtures_dir(),
            kpi_rate: 1.10,
            kpi_period: Some(Period::new(2023, 4)),
            ..Default::default()
        },
    );
    let view = Section::Kpis.build(&mut session, &SectionFilters::default());

    let tables = view.tables();
    let table = tables[0];
    let caba = table.rows.iter().find(|r| r[0] == "Capital Federal").unwrap();
    assert_eq!(caba[1], "120.00");
    assert_eq!(caba[2], "132.00");
}

#[test]
fn single_quarter_growth_is_explained() {
    let tmp = fixture_copy();
    let path = tmp.path().join(Dataset::AccessByTechnology.file_name());
    let text = fs::read_to_string(&path).unwrap();
    let one_quarter: Vec<&str> = text
        .lines()
        .filter(|l| l.starts_with("Año") || l.starts_with("2024,2,"))
        .collect();
    fs::write(&path, one_quarter.join("\n")).unwrap();

    let mut session = session_for(tmp.path());
    let view = Section::Kpis.build(&mut session, &SectionFilters::default());
    assert!(view.errors().is_empty());
    assert!(view.find_chart("kpi_crecimiento").is_none());
    assert!(view
        .blocks
        .iter()
        .any(|b| matches!(b, Block::Paragraph(p) if p.contains("al menos dos trimestres"))));
}

#[test]
fn missing_file_only_breaks_its_section() {
    let tmp = fixture_copy();
    fs::remove_file(tmp.path().join(Dataset::SpeedByProvince.file_name())).unwrap();
    let mut session = session_for(tmp.path());
    let filters = SectionFilters::default();

    let speed = Section::Velocidad.build(&mut session, &filters);
    assert_eq!(speed.errors().len(), 2);
    assert!(speed.charts().is_empty());

    let penetration = Section::Penetracion.build(&mut session, &filters);
    assert!(penetration.errors().is_empty());
}

#[test]
fn broken_column_only_breaks_its_chart() {
    let tmp = fixture_copy();
    let path = tmp.path().join(Dataset::PenetrationTotals.file_name());
    let text = fs::read_to_string(&path).unwrap();
    fs::write(&path, text.replace("Accesos por cada 100 hab", "hab")).unwrap();

    let mut session = session_for(tmp.path());
    let view = Section::Penetracion.build(&mut session, &SectionFilters::default());
    assert_eq!(view.errors().len(), 1);
    assert!(view.find_chart("penetracion_poblacion").is_some());
    assert!(view.find_chart("penetracion_tendencias").is_none());
}

#[test]
fn tables_are_cached_per_session() {
    let tmp = fixture_copy();
    let mut session = session_for(tmp.path());
    let filters = SectionFilters::default();

    Section::Penetracion.build(&mut session, &filters);
    assert_eq!(session.loader().cached_count(), 3);

    // Cached tables survive the files disappearing.
    fs::remove_file(tmp.path().join(Dataset::PopulationPenetration.file_name())).unwrap();
    let again = Section::Penetracion.build(&mut session, &filters);
    assert!(again.errors().is_empty());

    session.set_data_dir(tmp.path().to_path_buf());
    assert_eq!(session.loader().cached_count(), 0);
    let reloaded = Section::Penetracion.build(&mut session, &filters);
    assert!(!reloaded.errors().is_empty());
}
