//! In-memory dataset for synthetic fields and tests.

use std::collections::HashMap;

use crate::dataset::{FieldDescriptor, GridIndex, GriddedDataset};
use crate::error::{ExtractError, ExtractResult};

#[derive(Debug, Clone)]
struct MemoryField {
    descriptor: FieldDescriptor,
    /// Row-major `(time, [layer], row, col)` values
    values: Vec<f64>,
}

/// A dataset whose fields live in plain vectors.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataset {
    fields: HashMap<String, MemoryField>,
}

impl InMemoryDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, checking that `values` matches the descriptor's shape.
    pub fn with_field(
        mut self,
        variable: impl Into<String>,
        descriptor: FieldDescriptor,
        values: Vec<f64>,
    ) -> ExtractResult<Self> {
        let variable = variable.into();
        if values.len() != descriptor.len() {
            return Err(ExtractError::MalformedGrid(format!(
                "field '{}' holds {} values, its axes describe {}",
                variable,
                values.len(),
                descriptor.len()
            )));
        }
        self.fields
            .insert(variable, MemoryField { descriptor, values });
        Ok(self)
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    fn field(&self, variable: &str) -> ExtractResult<&MemoryField> {
        self.fields
            .get(variable)
            .ok_or_else(|| ExtractError::FieldNotFound(variable.to_string()))
    }
}

impl GriddedDataset for InMemoryDataset {
    fn field_descriptor(&self, variable: &str) -> ExtractResult<FieldDescriptor> {
        Ok(self.field(variable)?.descriptor.clone())
    }

    fn read_point(&self, variable: &str, index: GridIndex) -> ExtractResult<Vec<f64>> {
        let field = self.field(variable)?;
        let (rows, cols) = field.descriptor.projection.shape();
        let layers = field.descriptor.vertical_axis.as_ref().map_or(1, |a| a.len());
        let layer = index.layer.unwrap_or(0);

        if index.time >= field.descriptor.time_axis.len()
            || layer >= layers
            || index.cell.row >= rows
            || index.cell.col >= cols
        {
            // an out-of-bounds slice is empty, as with a file-backed read
            return Ok(Vec::new());
        }

        let flat = ((index.time * layers + layer) * rows + index.cell.row) * cols + index.cell.col;
        Ok(vec![field.values[flat]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Axis;
    use projection::{GridCell, LatLonGrid};
    use test_utils::{indexed_grid, unit_steps, units};

    fn descriptor() -> FieldDescriptor {
        let grid = LatLonGrid::new(60.0, 24.0, 0.1, 0.1, 3, 4).unwrap();
        FieldDescriptor::new(grid.into(), Axis::new(units::HOURS_2020, unit_steps(2)))
    }

    #[test]
    fn test_read_point_layout() {
        let mut values = indexed_grid(3, 4, 0.0);
        values.extend(indexed_grid(3, 4, 1000.0));
        let dataset = InMemoryDataset::new()
            .with_field("t2m", descriptor(), values)
            .unwrap();

        let index = GridIndex {
            time: 1,
            layer: None,
            cell: GridCell::new(2, 3),
        };
        assert_eq!(dataset.read_point("t2m", index).unwrap(), vec![1203.0]);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let err = InMemoryDataset::new()
            .with_field("t2m", descriptor(), vec![0.0; 5])
            .unwrap_err();
        assert!(matches!(err, ExtractError::MalformedGrid(_)));
    }

    #[test]
    fn test_unknown_field() {
        let dataset = InMemoryDataset::new();
        assert_eq!(
            dataset.field_descriptor("nope").unwrap_err(),
            ExtractError::FieldNotFound("nope".to_string())
        );
    }

    #[test]
    fn test_out_of_bounds_read_is_empty() {
        let dataset = InMemoryDataset::new()
            .with_field("t2m", descriptor(), vec![0.0; 24])
            .unwrap();
        let index = GridIndex {
            time: 5,
            layer: None,
            cell: GridCell::new(0, 0),
        };
        assert!(dataset.read_point("t2m", index).unwrap().is_empty());
    }
}
