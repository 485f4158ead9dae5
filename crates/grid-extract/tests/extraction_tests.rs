//! Integration tests for grid extraction over in-memory datasets.

use chrono::{TimeZone, Utc};
use grid_extract::{
    extract, extract_batch, Axis, ExtractError, ExtractResult, ExtractionRequest,
    FieldDescriptor, GridIndex, GriddedDataset, InMemoryDataset, LayerSelector,
    StepFailureReason,
};
use projection::{GridProjection, LambertConformal, LatLonGrid};
use road_common::{GeographicLocation, ParameterKind, SeriesError};
use test_utils::{indexed_grid, station, unit_steps, units};

fn location(lat: f64, lon: f64) -> GeographicLocation {
    GeographicLocation::new(lat, lon).unwrap()
}

/// 3x3 grid at 0.1° around 60N 24E.
fn small_grid() -> GridProjection {
    LatLonGrid::new(60.0, 24.0, 0.1, 0.1, 3, 3).unwrap().into()
}

/// `t2m` in kelvin, one constant field repeated over `steps` steps.
fn constant_field(steps: &[f64], value: f64) -> InMemoryDataset {
    let descriptor = FieldDescriptor::new(small_grid(), Axis::new(units::HOURS_2020, steps.to_vec()));
    InMemoryDataset::new()
        .with_field("t2m", descriptor, vec![value; steps.len() * 9])
        .unwrap()
}

// ============================================================================
// Time axis decoding
// ============================================================================

#[test]
fn test_three_hourly_steps() {
    let dataset = constant_field(&unit_steps(3), 271.5);
    let request = ExtractionRequest::new("t2m", ParameterKind::AirTemperature150cm, location(60.1, 24.1));

    let extraction = extract(&dataset, &request).unwrap();

    let reference = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(extraction.reference_time, reference);
    assert!(extraction.step_failures.is_empty());

    let points: Vec<_> = extraction.series.iter().collect();
    assert_eq!(
        points,
        vec![
            (reference, 271.5),
            (Utc.with_ymd_and_hms(2020, 1, 1, 1, 0, 0).unwrap(), 271.5),
            (Utc.with_ymd_and_hms(2020, 1, 1, 2, 0, 0).unwrap(), 271.5),
        ]
    );
    assert_eq!(extraction.series.reference_time(), Some(reference));
}

#[test]
fn test_minute_axis() {
    let descriptor = FieldDescriptor::new(small_grid(), Axis::new(units::MINUTES_2020, vec![0.0, 20.0, 40.0]));
    let dataset = InMemoryDataset::new()
        .with_field("ws", descriptor, vec![3.0; 27])
        .unwrap();
    let request = ExtractionRequest::new("ws", ParameterKind::WindSpeed10m, location(60.0, 24.0));

    let extraction = extract(&dataset, &request).unwrap();
    let last = extraction.series.last().unwrap();
    assert_eq!(last.0, Utc.with_ymd_and_hms(2020, 1, 1, 0, 40, 0).unwrap());
}

#[test]
fn test_unsupported_time_units() {
    let descriptor = FieldDescriptor::new(small_grid(), Axis::new(units::SECONDS_2020, vec![0.0]));
    let dataset = InMemoryDataset::new()
        .with_field("t2m", descriptor, vec![270.0; 9])
        .unwrap();
    let request = ExtractionRequest::new("t2m", ParameterKind::AirTemperature150cm, location(60.0, 24.0));

    assert!(matches!(
        extract(&dataset, &request),
        Err(ExtractError::UnsupportedTimeUnits(_))
    ));
}

// ============================================================================
// Spatial lookup
// ============================================================================

#[test]
fn test_point_one_spacing_outside() {
    let dataset = constant_field(&unit_steps(3), 271.5);
    // one full 0.1° step south of the first row
    let request = ExtractionRequest::new("t2m", ParameterKind::AirTemperature150cm, location(59.9, 24.1));

    assert_eq!(
        extract(&dataset, &request).unwrap_err(),
        ExtractError::PointOutsideGrid {
            latitude: 59.9,
            longitude: 24.1
        }
    );
}

#[test]
fn test_nearest_cell_value_selected() {
    let descriptor = FieldDescriptor::new(small_grid(), Axis::new(units::HOURS_2020, vec![0.0]));
    let dataset = InMemoryDataset::new()
        .with_field("rr", descriptor, indexed_grid(3, 3, 0.0))
        .unwrap();
    let request = ExtractionRequest::new("rr", ParameterKind::RainAmount, location(60.19, 24.04));

    let extraction = extract(&dataset, &request).unwrap();
    // row 2, col 0
    assert_eq!(extraction.series.first().map(|(_, v)| v), Some(200.0));
}

#[test]
fn test_lambert_grid_extraction() {
    let grid = LambertConformal::from_first_point(
        50.319616, 0.278972, 15.0, 63.3, 63.3, 2500.0, 2500.0, 949, 1069,
    );
    let cell = grid.nearest_cell(station::LATITUDE, station::LONGITUDE).unwrap();
    let (rows, cols) = grid.shape();

    let mut values = vec![0.0; rows * cols];
    values[cell.row * cols + cell.col] = 101_300.0;
    let descriptor = FieldDescriptor::new(grid.into(), Axis::new(units::HOURS_2020, vec![0.0]));
    let dataset = InMemoryDataset::new()
        .with_field("air_pressure_at_sea_level", descriptor, values)
        .unwrap();

    let request = ExtractionRequest::new(
        "air_pressure_at_sea_level",
        ParameterKind::AirPressure,
        location(station::LATITUDE, station::LONGITUDE),
    );
    let extraction = extract(&dataset, &request).unwrap();
    assert_eq!(extraction.series.first().map(|(_, v)| v), Some(101_300.0));
}

// ============================================================================
// Vertical layers
// ============================================================================

fn soil_dataset() -> InMemoryDataset {
    let descriptor = FieldDescriptor::new(small_grid(), Axis::new(units::HOURS_2020, unit_steps(2)))
        .with_vertical_axis(Axis::new(units::METERS, vec![0.05, 0.2, 0.4]));
    // value encodes the layer: 270 + layer
    let mut values = Vec::new();
    for _ in 0..2 {
        for layer in 0..3 {
            values.extend(vec![270.0 + layer as f64; 9]);
        }
    }
    InMemoryDataset::new()
        .with_field("tsoil", descriptor, values)
        .unwrap()
}

#[test]
fn test_layer_selected() {
    let request = ExtractionRequest::new("tsoil", ParameterKind::AirTemperature150cm, location(60.1, 24.1))
        .with_layer(LayerSelector::new(0.2, units::METERS));
    let extraction = extract(&soil_dataset(), &request).unwrap();
    assert!(extraction.series.iter().all(|(_, v)| v == 271.0));
}

#[test]
fn test_layer_unit_mismatch() {
    let request = ExtractionRequest::new("tsoil", ParameterKind::AirTemperature150cm, location(60.1, 24.1))
        .with_layer(LayerSelector::new(0.2, units::PRESSURE));
    assert!(matches!(
        extract(&soil_dataset(), &request),
        Err(ExtractError::UnitMismatch { .. })
    ));
}

#[test]
fn test_layer_not_found() {
    let request = ExtractionRequest::new("tsoil", ParameterKind::AirTemperature150cm, location(60.1, 24.1))
        .with_layer(LayerSelector::new(0.3, units::METERS));
    assert!(matches!(
        extract(&soil_dataset(), &request),
        Err(ExtractError::LayerNotFound { .. })
    ));
}

// ============================================================================
// Per-step failures
// ============================================================================

/// Dataset returning two values for time step 1.
struct DoubledStep(InMemoryDataset);

impl GriddedDataset for DoubledStep {
    fn field_descriptor(&self, variable: &str) -> ExtractResult<FieldDescriptor> {
        self.0.field_descriptor(variable)
    }

    fn read_point(&self, variable: &str, index: GridIndex) -> ExtractResult<Vec<f64>> {
        let mut values = self.0.read_point(variable, index)?;
        if index.time == 1 {
            values.push(0.0);
        }
        Ok(values)
    }
}

#[test]
fn test_malformed_step_does_not_abort_series() {
    let dataset = DoubledStep(constant_field(&unit_steps(3), 271.5));
    let request = ExtractionRequest::new("t2m", ParameterKind::AirTemperature150cm, location(60.1, 24.1));

    let extraction = extract(&dataset, &request).unwrap();
    assert_eq!(extraction.series.len(), 2);
    assert_eq!(extraction.step_failures.len(), 1);
    assert_eq!(extraction.step_failures[0].step, 1);
    assert_eq!(
        extraction.step_failures[0].reason,
        StepFailureReason::MalformedGrid(2)
    );
}

#[test]
fn test_out_of_range_and_missing_steps() {
    let descriptor = FieldDescriptor::new(small_grid(), Axis::new(units::HOURS_2020, unit_steps(3)));
    let mut values = vec![270.0; 27];
    values[9..18].fill(400.0);
    values[18..27].fill(f64::NAN);
    let dataset = InMemoryDataset::new()
        .with_field("t2m", descriptor, values)
        .unwrap();
    let request = ExtractionRequest::new("t2m", ParameterKind::AirTemperature150cm, location(60.1, 24.1));

    let extraction = extract(&dataset, &request).unwrap();
    assert_eq!(extraction.series.len(), 1);
    assert!(matches!(
        extraction.step_failures[0].reason,
        StepFailureReason::OutOfRange(_)
    ));
    assert_eq!(extraction.step_failures[1].reason, StepFailureReason::Missing);
}

#[test]
fn test_negative_steps_reported() {
    let dataset = constant_field(&[-1.0, 0.0, 1.0], 271.5);
    let request = ExtractionRequest::new("t2m", ParameterKind::AirTemperature150cm, location(60.1, 24.1));

    let extraction = extract(&dataset, &request).unwrap();
    assert_eq!(extraction.series.len(), 2);
    assert_eq!(
        extraction.step_failures[0].reason,
        StepFailureReason::BeforeReference
    );
}

#[test]
fn test_extreme_step_value_reported() {
    let steps = [0.0, i64::MIN as f64 / 60_000.0, 20.0];
    let descriptor = FieldDescriptor::new(small_grid(), Axis::new(units::MINUTES_2020, steps.to_vec()));
    let dataset = InMemoryDataset::new()
        .with_field("t2m", descriptor, vec![271.5; steps.len() * 9])
        .unwrap();
    let request = ExtractionRequest::new("t2m", ParameterKind::AirTemperature150cm, location(60.1, 24.1));

    let extraction = extract(&dataset, &request).unwrap();
    assert_eq!(extraction.series.len(), 2);
    assert_eq!(extraction.step_failures.len(), 1);
    assert_eq!(extraction.step_failures[0].step, 1);
    assert_eq!(extraction.step_failures[0].instant, None);
    assert_eq!(extraction.step_failures[0].reason, StepFailureReason::InvalidStep);
}

#[test]
fn test_every_step_failing_is_empty_series() {
    let dataset = constant_field(&unit_steps(2), 10.0);
    let request = ExtractionRequest::new("t2m", ParameterKind::AirTemperature150cm, location(60.1, 24.1));

    assert_eq!(
        extract(&dataset, &request).unwrap_err(),
        ExtractError::Series(SeriesError::Empty(ParameterKind::AirTemperature150cm))
    );
}

// ============================================================================
// Batch extraction
// ============================================================================

#[test]
fn test_batch_keeps_order_and_isolates_failures() {
    let dataset = constant_field(&unit_steps(3), 271.5);
    let requests = vec![
        ExtractionRequest::new("t2m", ParameterKind::AirTemperature150cm, location(60.0, 24.0)),
        ExtractionRequest::new("t2m", ParameterKind::AirTemperature150cm, location(50.0, 24.0)),
        ExtractionRequest::new("missing", ParameterKind::AirTemperature150cm, location(60.0, 24.0)),
        ExtractionRequest::new("t2m", ParameterKind::AirTemperature150cm, location(60.2, 24.2)),
    ];

    let results = extract_batch(&dataset, &requests);
    assert_eq!(results.len(), 4);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(ExtractError::PointOutsideGrid { .. })));
    assert!(matches!(results[2], Err(ExtractError::FieldNotFound(_))));
    assert_eq!(results[3].as_ref().map(|e| e.series.len()).ok(), Some(3));
}
