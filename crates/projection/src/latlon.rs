//! Regular latitude/longitude grids.
//!
//! Rows follow the latitude axis and columns the longitude axis. Either axis
//! may run in decreasing order (negative spacing). Grids spanning the whole
//! circle of longitude wrap, so a point east of the last column snaps back
//! to column 0.

use crate::error::{ProjectionError, ProjectionResult};
use crate::grid::{index_from_fraction, wrap_longitude, GridCell};

/// Relative tolerance on axis regularity.
const AXIS_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct LatLonGrid {
    first_lat: f64,
    first_lon: f64,
    dlat: f64,
    dlon: f64,
    nlat: usize,
    nlon: usize,
}

impl LatLonGrid {
    /// Create a grid from its first point, spacing and size (degrees).
    pub fn new(
        first_lat: f64,
        first_lon: f64,
        dlat: f64,
        dlon: f64,
        nlat: usize,
        nlon: usize,
    ) -> ProjectionResult<Self> {
        if nlat == 0 || nlon == 0 {
            return Err(ProjectionError::MalformedAxis(format!(
                "empty grid {}x{}",
                nlat, nlon
            )));
        }
        if dlat == 0.0 || dlon == 0.0 || !dlat.is_finite() || !dlon.is_finite() {
            return Err(ProjectionError::MalformedAxis(format!(
                "invalid spacing dlat={} dlon={}",
                dlat, dlon
            )));
        }
        Ok(Self {
            first_lat,
            first_lon,
            dlat,
            dlon,
            nlat,
            nlon,
        })
    }

    /// Build a grid from coordinate variables, checking they are regular.
    pub fn from_axes(lats: &[f64], lons: &[f64]) -> ProjectionResult<Self> {
        let dlat = regular_step("latitude", lats)?;
        let dlon = regular_step("longitude", lons)?;
        Self::new(lats[0], lons[0], dlat, dlon, lats.len(), lons.len())
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nlat, self.nlon)
    }

    /// True when the longitude axis covers the full circle.
    pub fn is_global(&self) -> bool {
        (self.nlon as f64 * self.dlon.abs()) >= 360.0 - self.dlon.abs() * AXIS_TOLERANCE
    }

    /// Fractional `(row, col)` of a point.
    pub fn fractional_index(&self, latitude: f64, longitude: f64) -> (f64, f64) {
        let row = (latitude - self.first_lat) / self.dlat;

        let col = if self.is_global() {
            let offset = if self.dlon > 0.0 {
                (longitude - self.first_lon).rem_euclid(360.0)
            } else {
                (self.first_lon - longitude).rem_euclid(360.0)
            };
            offset / self.dlon.abs()
        } else {
            // measure from the grid centre so 0..360 and -180..180 both work
            let centre = self.first_lon + self.dlon * (self.nlon - 1) as f64 / 2.0;
            let offset = centre - self.first_lon + wrap_longitude(longitude - centre);
            offset / self.dlon
        };

        (row, col)
    }

    pub fn nearest_cell(&self, latitude: f64, longitude: f64) -> Option<GridCell> {
        let (row_f, col_f) = self.fractional_index(latitude, longitude);
        let row = index_from_fraction(row_f, self.nlat)?;

        let col = if self.is_global() {
            let col = col_f.round() as usize;
            if col >= self.nlon {
                0
            } else {
                col
            }
        } else {
            index_from_fraction(col_f, self.nlon)?
        };

        Some(GridCell { row, col })
    }

    /// Centre of a cell as `(lat, lon)`.
    pub fn cell_center(&self, cell: GridCell) -> (f64, f64) {
        (
            self.first_lat + cell.row as f64 * self.dlat,
            self.first_lon + cell.col as f64 * self.dlon,
        )
    }
}

fn regular_step(name: &str, values: &[f64]) -> ProjectionResult<f64> {
    if values.len() < 2 {
        return Err(ProjectionError::MalformedAxis(format!(
            "{} axis needs at least 2 values, found {}",
            name,
            values.len()
        )));
    }
    let step = values[1] - values[0];
    if step == 0.0 || !step.is_finite() {
        return Err(ProjectionError::MalformedAxis(format!(
            "{} axis has zero spacing",
            name
        )));
    }
    for (i, pair) in values.windows(2).enumerate() {
        let found = pair[1] - pair[0];
        if (found - step).abs() > step.abs() * AXIS_TOLERANCE {
            return Err(ProjectionError::MalformedAxis(format!(
                "{} axis is irregular at index {}: step {} vs {}",
                name,
                i + 1,
                found,
                step
            )));
        }
    }
    Ok(step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::axis;

    fn nordic() -> LatLonGrid {
        // 59.0..=61.0 by 0.5, 20.0..=30.0 by 0.5
        LatLonGrid::new(59.0, 20.0, 0.5, 0.5, 5, 21).unwrap()
    }

    #[test]
    fn test_nearest_cell_rounds() {
        let grid = nordic();
        assert_eq!(grid.nearest_cell(60.2, 24.9), Some(GridCell::new(2, 10)));
        assert_eq!(grid.nearest_cell(60.26, 24.76), Some(GridCell::new(3, 10)));
    }

    #[test]
    fn test_half_cell_margin() {
        let grid = nordic();
        // a quarter cell south of the first row is still inside
        assert_eq!(grid.nearest_cell(58.875, 20.0), Some(GridCell::new(0, 0)));
        // a full cell outside is not
        assert_eq!(grid.nearest_cell(58.5, 20.0), None);
        assert_eq!(grid.nearest_cell(60.0, 30.5), None);
    }

    #[test]
    fn test_descending_latitude() {
        let grid = LatLonGrid::from_axes(&axis(61.0, -0.5, 5), &axis(20.0, 0.5, 21)).unwrap();
        assert_eq!(grid.nearest_cell(61.0, 20.0), Some(GridCell::new(0, 0)));
        assert_eq!(grid.nearest_cell(59.0, 20.0), Some(GridCell::new(4, 0)));
    }

    #[test]
    fn test_regional_grid_in_0_360() {
        // 350E..10E crossing the prime meridian
        let grid = LatLonGrid::new(50.0, 350.0, 1.0, 1.0, 3, 21).unwrap();
        assert!(!grid.is_global());
        assert_eq!(grid.nearest_cell(51.0, -5.0), Some(GridCell::new(1, 5)));
        assert_eq!(grid.nearest_cell(51.0, 5.0), Some(GridCell::new(1, 15)));
        assert_eq!(grid.nearest_cell(51.0, 20.0), None);
    }

    #[test]
    fn test_global_grid_wraps() {
        let grid = LatLonGrid::new(-90.0, 0.0, 1.0, 1.0, 181, 360).unwrap();
        assert!(grid.is_global());
        assert_eq!(grid.nearest_cell(0.0, -0.2), Some(GridCell::new(90, 0)));
        assert_eq!(grid.nearest_cell(0.0, 359.7), Some(GridCell::new(90, 0)));
        assert_eq!(grid.nearest_cell(0.0, -1.0), Some(GridCell::new(90, 359)));
    }

    #[test]
    fn test_irregular_axis_rejected() {
        let err = LatLonGrid::from_axes(&[60.0, 60.5, 61.2], &[20.0, 21.0]).unwrap_err();
        assert!(matches!(err, ProjectionError::MalformedAxis(_)));
        assert!(LatLonGrid::from_axes(&[60.0], &[20.0, 21.0]).is_err());
    }

    #[test]
    fn test_single_point_grid() {
        let grid = LatLonGrid::new(60.0, 24.0, 0.1, 0.1, 1, 1).unwrap();
        assert_eq!(grid.nearest_cell(60.04, 24.04), Some(GridCell::new(0, 0)));
        assert_eq!(grid.nearest_cell(60.1, 24.0), None);
    }

    #[test]
    fn test_cell_center() {
        let grid = nordic();
        assert_eq!(grid.cell_center(GridCell::new(2, 10)), (60.0, 25.0));
    }
}
