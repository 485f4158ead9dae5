//! Error types for grid extraction.

use projection::ProjectionError;
use road_common::SeriesError;
use thiserror::Error;

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Failures that abort a whole extraction.
///
/// Failures of a single time step are not errors; they are collected in
/// [`GridExtraction::step_failures`](crate::GridExtraction::step_failures).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractError {
    #[error("point ({latitude}, {longitude}) lies outside the grid")]
    PointOutsideGrid { latitude: f64, longitude: f64 },

    #[error("unsupported time axis units: '{0}'")]
    UnsupportedTimeUnits(String),

    #[error("malformed grid: {0}")]
    MalformedGrid(String),

    #[error("layer {value} {units} not found on the vertical axis")]
    LayerNotFound { value: f64, units: String },

    #[error("layer units '{requested}' do not match the vertical axis units '{axis}'")]
    UnitMismatch { requested: String, axis: String },

    #[error("variable '{0}' is layered; a layer must be requested")]
    LayerRequired(String),

    #[error("field not found: {0}")]
    FieldNotFound(String),

    #[error("dataset error: {0}")]
    Dataset(String),

    #[error(transparent)]
    Series(#[from] SeriesError),
}

impl From<ProjectionError> for ExtractError {
    fn from(err: ProjectionError) -> Self {
        match err {
            ProjectionError::OutsideGrid {
                latitude,
                longitude,
            } => ExtractError::PointOutsideGrid {
                latitude,
                longitude,
            },
            other => ExtractError::MalformedGrid(other.to_string()),
        }
    }
}
