//! The dataset handle the extractor reads from.

use projection::{GridCell, GridProjection};

use crate::error::ExtractResult;

/// A coordinate axis: its declared unit string and values.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub units: String,
    pub values: Vec<f64>,
}

impl Axis {
    pub fn new(units: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            units: units.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Everything the extractor needs to know about one field.
///
/// Fields are `(time, row, col)` or, with a vertical axis,
/// `(time, layer, row, col)`.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub projection: GridProjection,
    pub time_axis: Axis,
    pub vertical_axis: Option<Axis>,
}

impl FieldDescriptor {
    pub fn new(projection: GridProjection, time_axis: Axis) -> Self {
        Self {
            projection,
            time_axis,
            vertical_axis: None,
        }
    }

    pub fn with_vertical_axis(mut self, axis: Axis) -> Self {
        self.vertical_axis = Some(axis);
        self
    }

    /// Number of values the field holds.
    pub fn len(&self) -> usize {
        let (rows, cols) = self.projection.shape();
        let layers = self.vertical_axis.as_ref().map_or(1, Axis::len);
        self.time_axis.len() * layers * rows * cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Position of a single scalar in a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridIndex {
    pub time: usize,
    pub layer: Option<usize>,
    pub cell: GridCell,
}

/// Read access to a gridded forecast dataset.
///
/// Implementations must be safe to read through `&self`; the extractor
/// shares one handle across concurrent extractions.
pub trait GriddedDataset {
    /// Metadata of a named field, or [`ExtractError::FieldNotFound`](crate::ExtractError::FieldNotFound).
    fn field_descriptor(&self, variable: &str) -> ExtractResult<FieldDescriptor>;

    /// Read the values at one index.
    ///
    /// A well-formed dataset returns exactly one value; the extractor
    /// reports anything else as a malformed step.
    fn read_point(&self, variable: &str, index: GridIndex) -> ExtractResult<Vec<f64>>;
}

impl<T: GriddedDataset + ?Sized> GriddedDataset for &T {
    fn field_descriptor(&self, variable: &str) -> ExtractResult<FieldDescriptor> {
        (**self).field_descriptor(variable)
    }

    fn read_point(&self, variable: &str, index: GridIndex) -> ExtractResult<Vec<f64>> {
        (**self).read_point(variable, index)
    }
}
