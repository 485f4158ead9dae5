//! Grid-projection dispatch and the nearest-cell rule shared by all grids.

use serde::Serialize;

use crate::curvilinear::CurvilinearGrid;
use crate::error::{ProjectionError, ProjectionResult};
use crate::lambert::LambertConformal;
use crate::latlon::LatLonGrid;

/// Integer horizontal index of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
}

impl GridCell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// The native horizontal projection of a gridded field.
#[derive(Debug, Clone)]
pub enum GridProjection {
    LatLon(LatLonGrid),
    Lambert(LambertConformal),
    Curvilinear(CurvilinearGrid),
}

impl GridProjection {
    /// Grid shape as `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        match self {
            GridProjection::LatLon(g) => g.shape(),
            GridProjection::Lambert(g) => g.shape(),
            GridProjection::Curvilinear(g) => g.shape(),
        }
    }

    /// Nearest grid cell to a geographic point.
    ///
    /// Fails with [`ProjectionError::OutsideGrid`] when the point lies more
    /// than half the local cell spacing beyond the grid.
    pub fn nearest_cell(&self, latitude: f64, longitude: f64) -> ProjectionResult<GridCell> {
        let cell = match self {
            GridProjection::LatLon(g) => g.nearest_cell(latitude, longitude),
            GridProjection::Lambert(g) => g.nearest_cell(latitude, longitude),
            GridProjection::Curvilinear(g) => g.nearest_cell(latitude, longitude)?,
        };
        cell.ok_or(ProjectionError::OutsideGrid {
            latitude,
            longitude,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            GridProjection::LatLon(_) => "latitude_longitude",
            GridProjection::Lambert(_) => "lambert_conformal_conic",
            GridProjection::Curvilinear(_) => "curvilinear",
        }
    }
}

impl From<LatLonGrid> for GridProjection {
    fn from(grid: LatLonGrid) -> Self {
        GridProjection::LatLon(grid)
    }
}

impl From<LambertConformal> for GridProjection {
    fn from(grid: LambertConformal) -> Self {
        GridProjection::Lambert(grid)
    }
}

impl From<CurvilinearGrid> for GridProjection {
    fn from(grid: CurvilinearGrid) -> Self {
        GridProjection::Curvilinear(grid)
    }
}

/// Round a fractional index to a cell index, or `None` when it lies more
/// than half a cell outside `[0, count - 1]`.
pub(crate) fn index_from_fraction(fraction: f64, count: usize) -> Option<usize> {
    if count == 0 || !fraction.is_finite() {
        return None;
    }
    let last = (count - 1) as f64;
    if fraction < -0.5 || fraction > last + 0.5 {
        return None;
    }
    Some(fraction.round().clamp(0.0, last) as usize)
}

/// Wrap a longitude difference into `[-180, 180)`.
pub(crate) fn wrap_longitude(delta: f64) -> f64 {
    (delta + 180.0).rem_euclid(360.0) - 180.0
}
