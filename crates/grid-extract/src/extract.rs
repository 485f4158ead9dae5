//! Nearest-point extraction of a forecast time series.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use road_common::{CatalogError, GeographicLocation, ParameterKind, TimeSeries};
use tracing::{debug, info, warn};

use crate::dataset::{Axis, GridIndex, GriddedDataset};
use crate::error::{ExtractError, ExtractResult};
use crate::time_units::TimeAxisUnits;

/// A vertical layer, identified by its coordinate value and unit.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSelector {
    pub value: f64,
    pub units: String,
}

impl LayerSelector {
    pub fn new(value: f64, units: impl Into<String>) -> Self {
        Self {
            value,
            units: units.into(),
        }
    }
}

/// One extraction: which field, as which parameter kind, where.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionRequest {
    pub variable: String,
    pub kind: ParameterKind,
    pub location: GeographicLocation,
    pub layer: Option<LayerSelector>,
}

impl ExtractionRequest {
    pub fn new(variable: impl Into<String>, kind: ParameterKind, location: GeographicLocation) -> Self {
        Self {
            variable: variable.into(),
            kind,
            location,
            layer: None,
        }
    }

    pub fn with_layer(mut self, layer: LayerSelector) -> Self {
        self.layer = Some(layer);
        self
    }
}

/// Why a single time step produced no value.
#[derive(Debug, Clone, PartialEq)]
pub enum StepFailureReason {
    /// The read returned this many values instead of one.
    MalformedGrid(usize),
    /// The cell holds a fill value.
    Missing,
    /// The step value does not map to a representable instant.
    InvalidStep,
    /// The instant precedes the axis reference instant.
    BeforeReference,
    OutOfRange(CatalogError),
    Read(String),
}

/// A time step that was skipped, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct StepFailure {
    pub step: usize,
    pub instant: Option<DateTime<Utc>>,
    pub reason: StepFailureReason,
}

/// Result of one extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct GridExtraction {
    /// Reference instant decoded from the time axis units.
    pub reference_time: DateTime<Utc>,
    pub series: TimeSeries,
    /// Steps that did not contribute to `series`.
    pub step_failures: Vec<StepFailure>,
}

/// Extract the time series of one variable at the nearest grid cell.
///
/// Whole-request problems (unknown field, point outside the grid, unit
/// strings, layer selection) fail the request. A failing time step is
/// recorded in [`GridExtraction::step_failures`] and the remaining steps
/// still populate the series; only when no step succeeds does the request
/// fail, with [`SeriesError::Empty`](road_common::SeriesError::Empty).
pub fn extract<D>(dataset: &D, request: &ExtractionRequest) -> ExtractResult<GridExtraction>
where
    D: GriddedDataset + ?Sized,
{
    let variable = request.variable.as_str();
    let descriptor = dataset.field_descriptor(variable)?;

    let latitude = request.location.latitude();
    let longitude = request.location.longitude();
    let cell = descriptor.projection.nearest_cell(latitude, longitude)?;

    let units: TimeAxisUnits = descriptor.time_axis.units.parse()?;
    let layer = resolve_layer(variable, request.layer.as_ref(), descriptor.vertical_axis.as_ref())?;

    debug!(
        variable = %variable,
        location = %request.location,
        row = cell.row,
        col = cell.col,
        layer = ?layer,
        projection = descriptor.projection.name(),
        "Resolved grid cell"
    );

    let mut builder = TimeSeries::builder(request.kind).reference_time(units.reference);
    let mut step_failures = Vec::new();

    for (step, &offset) in descriptor.time_axis.values.iter().enumerate() {
        let instant = units.instant(offset);
        let index = GridIndex { time: step, layer, cell };

        match read_step(dataset, request, index, instant, units.reference) {
            Ok((instant, value)) => builder.push(instant, value),
            Err(reason) => {
                warn!(
                    variable = %variable,
                    location = %request.location,
                    step = step,
                    reason = ?reason,
                    "Skipping time step"
                );
                step_failures.push(StepFailure {
                    step,
                    instant,
                    reason,
                });
            }
        }
    }

    let series = builder.build()?;

    info!(
        variable = %variable,
        kind = %request.kind,
        location = %request.location,
        values = series.len(),
        failed_steps = step_failures.len(),
        "Extracted grid time series"
    );

    Ok(GridExtraction {
        reference_time: units.reference,
        series,
        step_failures,
    })
}

/// Run independent extractions in parallel against one shared dataset.
///
/// Results come back in request order; one failing request never affects
/// the others.
pub fn extract_batch<D>(
    dataset: &D,
    requests: &[ExtractionRequest],
) -> Vec<ExtractResult<GridExtraction>>
where
    D: GriddedDataset + Sync + ?Sized,
{
    requests
        .par_iter()
        .map(|request| extract(dataset, request))
        .collect()
}

fn read_step<D>(
    dataset: &D,
    request: &ExtractionRequest,
    index: GridIndex,
    instant: Option<DateTime<Utc>>,
    reference: DateTime<Utc>,
) -> Result<(DateTime<Utc>, f64), StepFailureReason>
where
    D: GriddedDataset + ?Sized,
{
    let instant = instant.ok_or(StepFailureReason::InvalidStep)?;
    if instant < reference {
        return Err(StepFailureReason::BeforeReference);
    }

    let values = dataset
        .read_point(&request.variable, index)
        .map_err(|e| StepFailureReason::Read(e.to_string()))?;
    let value = match values.as_slice() {
        [value] => *value,
        other => return Err(StepFailureReason::MalformedGrid(other.len())),
    };
    if value.is_nan() {
        return Err(StepFailureReason::Missing);
    }

    let value = request
        .kind
        .checked(value)
        .map_err(StepFailureReason::OutOfRange)?;
    Ok((instant, value))
}

/// Index of the requested layer on the vertical axis.
///
/// The unit is compared before the value so that `500 hPa` is never
/// matched against a `500 m` axis.
fn resolve_layer(
    variable: &str,
    requested: Option<&LayerSelector>,
    axis: Option<&Axis>,
) -> ExtractResult<Option<usize>> {
    match (requested, axis) {
        (None, None) => Ok(None),
        (None, Some(axis)) if axis.len() == 1 => Ok(Some(0)),
        (None, Some(_)) => Err(ExtractError::LayerRequired(variable.to_string())),
        (Some(layer), None) => Err(ExtractError::LayerNotFound {
            value: layer.value,
            units: layer.units.clone(),
        }),
        (Some(layer), Some(axis)) => {
            if layer.units != axis.units {
                return Err(ExtractError::UnitMismatch {
                    requested: layer.units.clone(),
                    axis: axis.units.clone(),
                });
            }
            axis.values
                .iter()
                .position(|v| *v == layer.value)
                .map(Some)
                .ok_or_else(|| ExtractError::LayerNotFound {
                    value: layer.value,
                    units: layer.units.clone(),
                })
        }
    }
}
