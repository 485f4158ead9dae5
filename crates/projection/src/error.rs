//! Projection errors.

use thiserror::Error;

pub type ProjectionResult<T> = Result<T, ProjectionError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error("point ({latitude}, {longitude}) lies outside the grid")]
    OutsideGrid { latitude: f64, longitude: f64 },

    #[error("malformed grid axis: {0}")]
    MalformedAxis(String),

    #[error("coordinate arrays hold {found} points, expected {expected}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("grid cells around ({row}, {col}) are degenerate")]
    DegenerateGrid { row: usize, col: usize },
}
