//! Coordinate reference system transformations for forecast grids.
//!
//! Implements the grid projections found in numerical weather model output
//! from scratch, and resolves a geographic point to the nearest grid cell
//! under the grid's native projection.
//!
//! A point is inside a grid when its fractional index lies within half a
//! cell of the outermost row and column centres on every axis.

pub mod curvilinear;
pub mod error;
pub mod grid;
pub mod lambert;
pub mod latlon;

pub use curvilinear::CurvilinearGrid;
pub use error::{ProjectionError, ProjectionResult};
pub use grid::{GridCell, GridProjection};
pub use lambert::{LambertConformal, LambertParameters};
pub use latlon::LatLonGrid;

/// Mean Earth radius used by the spherical projections (meters).
pub const EARTH_RADIUS: f64 = 6_371_229.0;
