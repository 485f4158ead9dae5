//! Integration tests for station loading and document preparation.

use chrono::{DateTime, TimeZone, Utc};
use grid_extract::{Axis, FieldDescriptor, InMemoryDataset};
use metro_protocol::parse_roadcast;
use projection::{GridProjection, LatLonGrid};
use road_common::{ForecastTag, StationType};
use roadcast_prep::{forecast_document, load_station_file, station_document, summarize_roadcast};
use std::collections::BTreeMap;
use test_utils::fixtures::{station, ROADCAST_XML, STATION_YAML};
use test_utils::{assert_approx_eq, unit_steps, units, write_temp_file};

fn production() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
}

fn fixture_station() -> roadcast_prep::Station {
    let file = write_temp_file(".yaml", STATION_YAML);
    load_station_file(file.path()).unwrap().activate().unwrap()
}

// ============================================================================
// Loading and activation
// ============================================================================

#[test]
fn test_fixture_station_activates() {
    let station = fixture_station();
    assert_eq!(station.id, station::STATION_ID);
    assert_eq!(station.station_type, StationType::Road);
    assert_eq!(station.observation.len(), 7);
    assert_eq!(station.forecast.len(), 7);
    assert_eq!(station.horizon.as_ref().map(|h| h.step()), Some(90.0));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_station_file(dir.path().join("absent.yaml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read station config"));
}

#[test]
fn test_all_problems_reported() {
    let yaml = STATION_YAML
        .replace("  ap:\n", "  ap_removed:\n")
        .replace("{ azimuth: 180, elevation: 2 }", "{ azimuth: 170, elevation: 2 }")
        .replace("thickness_m: 0.3", "thickness_m: 0.0");
    let file = write_temp_file(".yaml", &yaml);

    let err = load_station_file(file.path()).unwrap().activate().unwrap_err();
    let message = err.to_string();
    assert!(message.contains("visible horizon"), "{}", message);
    assert!(message.contains("road layer 2"), "{}", message);
    assert!(message.contains("ap"), "{}", message);
}

#[test]
fn test_env_substitution() {
    std::env::set_var("ROADCAST_PREP_IT_STATION", "bridge-12");
    let yaml = STATION_YAML.replace("station_id: vt4-ruskeasuo", "station_id: ${ROADCAST_PREP_IT_STATION}");
    let file = write_temp_file(".yaml", &yaml);
    let station = load_station_file(file.path()).unwrap().activate().unwrap();
    assert_eq!(station.id, "bridge-12");
}

// ============================================================================
// Documents
// ============================================================================

#[test]
fn test_station_document() {
    let xml = station_document(&fixture_station(), production()).unwrap().to_xml();
    assert!(xml.contains("<road-station>vt4-ruskeasuo</road-station>"));
    assert!(xml.contains("<sst-sensor-depth>0.40</sst-sensor-depth>"));
    assert_eq!(xml.matches("<roadlayer>").count(), 2);
    assert_eq!(xml.matches("<projection>").count(), 4);
}

fn grid() -> GridProjection {
    LatLonGrid::new(60.0, 24.8, 0.1, 0.1, 4, 4).unwrap().into()
}

fn constant(dataset: InMemoryDataset, variable: &str, value: f64) -> InMemoryDataset {
    let descriptor = FieldDescriptor::new(grid(), Axis::new(units::HOURS_2020, unit_steps(3)));
    dataset.with_field(variable, descriptor, vec![value; 3 * 16]).unwrap()
}

/// Every forecast variable of the fixture, under its parameter label.
fn meps() -> InMemoryDataset {
    let mut dataset = InMemoryDataset::new();
    for (variable, value) in [
        ("air_temperature_150cm", 271.15),
        ("dew_point_150cm", 269.15),
        ("rain_amount", 0.2),
        ("snow_amount", 0.0),
        ("wind_speed_10m", 5.0),
        ("air_pressure", 100_500.0),
        ("cloud_cover", 50.0),
    ] {
        dataset = constant(dataset, variable, value);
    }
    dataset
}

#[test]
fn test_forecast_document_from_grid() {
    let station = fixture_station();
    let datasets = BTreeMap::from([("meps".to_string(), meps())]);

    let inputs = forecast_document(&station, &datasets, production()).unwrap();
    assert!(inputs.fallbacks.is_empty());
    assert_eq!(inputs.failed_steps, 0);

    let doc = inputs.document;
    assert_eq!(doc.len(), 3);
    assert_approx_eq!(doc.value(&production(), ForecastTag::At).unwrap(), -2.0, 1e-9);
    assert_approx_eq!(doc.value(&production(), ForecastTag::Ap).unwrap(), 1005.0, 1e-9);
    assert_approx_eq!(doc.value(&production(), ForecastTag::Cc).unwrap(), 4.0, 1e-9);
}

#[test]
fn test_forecast_fallback_source() {
    let yaml = STATION_YAML.replacen(
        "  ap:\n    - { type: forecast, location: { latitude: 60.192059, longitude: 24.945831 }, parameter: air_pressure, source_id: meps }",
        "  ap:\n    - { type: forecast, location: { latitude: 60.192059, longitude: 24.945831 }, parameter: air_pressure, source_id: harmonie }\n    - { type: forecast, location: { latitude: 60.192059, longitude: 24.945831 }, parameter: air_pressure, source_id: meps }",
        1,
    );
    let file = write_temp_file(".yaml", &yaml);
    let station = load_station_file(file.path()).unwrap().activate().unwrap();

    // the harmonie dataset lacks the pressure field, so meps serves it
    let datasets = BTreeMap::from([
        ("harmonie".to_string(), constant(InMemoryDataset::new(), "rain_amount", 0.0)),
        ("meps".to_string(), meps()),
    ]);
    let inputs = forecast_document(&station, &datasets, production()).unwrap();
    assert_eq!(inputs.fallbacks, vec![ForecastTag::Ap]);
}

#[test]
fn test_forecast_missing_variable() {
    let station = fixture_station();
    let partial = constant(InMemoryDataset::new(), "air_temperature_150cm", 271.15);
    let datasets = BTreeMap::from([("meps".to_string(), partial)]);

    let err = forecast_document(&station, &datasets, production()).unwrap_err();
    assert!(err.to_string().contains("No usable forecast source"));
}

#[test]
fn test_roadcast_summary() {
    let summary = summarize_roadcast(&parse_roadcast(ROADCAST_XML).unwrap());
    assert_eq!(summary.station.as_deref(), Some(station::STATION_ID));
    assert_eq!(summary.series.len(), 3);

    let surface = summary.series.iter().find(|s| s.tag == "st").unwrap();
    assert_eq!(surface.values, 2);
    assert_eq!(surface.first.as_deref(), Some("2020-01-01T00:00Z"));
    assert_approx_eq!(surface.min, -1.5, 1e-9);
    assert_approx_eq!(surface.max, -1.2, 1e-9);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["production"], "2020-01-01T00:00Z");
}
