//! Curvilinear grids described by 2-D latitude/longitude arrays.
//!
//! Rotated-pole and swath products ship explicit coordinates for every
//! cell instead of projection parameters. The nearest cell is found by
//! great-circle distance; whether the point is inside the grid at all is
//! decided in the nearest cell's local tangent plane, against half the
//! spacing to its neighbours.

use crate::error::{ProjectionError, ProjectionResult};
use crate::grid::{index_from_fraction, wrap_longitude, GridCell};
use crate::EARTH_RADIUS;

#[derive(Debug, Clone)]
pub struct CurvilinearGrid {
    /// Row-major cell-centre latitudes
    lats: Vec<f64>,
    /// Row-major cell-centre longitudes
    lons: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl CurvilinearGrid {
    pub fn new(lats: Vec<f64>, lons: Vec<f64>, rows: usize, cols: usize) -> ProjectionResult<Self> {
        if rows < 2 || cols < 2 {
            return Err(ProjectionError::MalformedAxis(format!(
                "curvilinear grid needs at least 2x2 cells, found {}x{}",
                rows, cols
            )));
        }
        for values in [&lats, &lons] {
            if values.len() != rows * cols {
                return Err(ProjectionError::ShapeMismatch {
                    expected: rows * cols,
                    found: values.len(),
                });
            }
        }
        Ok(Self {
            lats,
            lons,
            rows,
            cols,
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Centre of a cell as `(lat, lon)`.
    pub fn cell_center(&self, cell: GridCell) -> (f64, f64) {
        let idx = cell.row * self.cols + cell.col;
        (self.lats[idx], self.lons[idx])
    }

    pub fn nearest_cell(&self, latitude: f64, longitude: f64) -> ProjectionResult<Option<GridCell>> {
        let Some(cell) = self.closest_center(latitude, longitude) else {
            return Ok(None);
        };

        let (row_f, col_f) = self.local_fraction(cell, latitude, longitude)?;
        let inside = index_from_fraction(row_f, self.rows).is_some()
            && index_from_fraction(col_f, self.cols).is_some();

        Ok(inside.then_some(cell))
    }

    /// Cell whose centre is closest along the great circle.
    fn closest_center(&self, latitude: f64, longitude: f64) -> Option<GridCell> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, (&lat, &lon)) in self.lats.iter().zip(&self.lons).enumerate() {
            if !lat.is_finite() || !lon.is_finite() {
                continue;
            }
            let distance = great_circle_distance(latitude, longitude, lat, lon);
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((idx, distance));
            }
        }
        best.map(|(idx, _)| GridCell::new(idx / self.cols, idx % self.cols))
    }

    /// Fractional `(row, col)` of a point, linearised around `cell`.
    fn local_fraction(
        &self,
        cell: GridCell,
        latitude: f64,
        longitude: f64,
    ) -> ProjectionResult<(f64, f64)> {
        let (lat0, lon0) = self.cell_center(cell);
        let to_plane = |lat: f64, lon: f64| -> (f64, f64) {
            (
                wrap_longitude(lon - lon0) * lat0.to_radians().cos(),
                lat - lat0,
            )
        };

        // neighbour one step along each axis, pointing inward at the last row/column
        let (row_step, row_sign) = if cell.row + 1 < self.rows {
            (GridCell::new(cell.row + 1, cell.col), 1.0)
        } else {
            (GridCell::new(cell.row - 1, cell.col), -1.0)
        };
        let (col_step, col_sign) = if cell.col + 1 < self.cols {
            (GridCell::new(cell.row, cell.col + 1), 1.0)
        } else {
            (GridCell::new(cell.row, cell.col - 1), -1.0)
        };

        let (lat_r, lon_r) = self.cell_center(row_step);
        let (lat_c, lon_c) = self.cell_center(col_step);
        let u = to_plane(lat_r, lon_r);
        let v = to_plane(lat_c, lon_c);
        let d = to_plane(latitude, longitude);

        let det = u.0 * v.1 - u.1 * v.0;
        if !det.is_finite() || det.abs() < 1e-12 {
            return Err(ProjectionError::DegenerateGrid {
                row: cell.row,
                col: cell.col,
            });
        }

        // d = a*u + b*v
        let a = (d.0 * v.1 - d.1 * v.0) / det;
        let b = (u.0 * d.1 - u.1 * d.0) / det;

        Ok((
            cell.row as f64 + row_sign * a,
            cell.col as f64 + col_sign * b,
        ))
    }
}

/// Great-circle distance between two points in meters (haversine).
pub fn great_circle_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS * h.sqrt().min(1.0).asin()
}
