//! Lambert Conformal Conic projection.
//!
//! Used by most limited-area models (MEPS, HARMONIE-AROME, HRRR). It maps a
//! cone tangent or secant to the Earth's surface onto a flat plane.
//!
//! The projection parameters include:
//! - Central meridian (lon0, LoV in GRIB2)
//! - Latitude of the projection origin (lat0)
//! - Standard parallel(s): latin1 and latin2 (equal for a tangent cone)
//! - False easting/northing of the origin
//! - Grid: first point in projected meters, spacing dx/dy, size nx/ny
//!
//! Grid column `i` follows projected x and row `j` follows projected y.

use std::f64::consts::PI;

use crate::grid::{index_from_fraction, GridCell};
use crate::EARTH_RADIUS;

/// Lambert Conformal Conic grid.
#[derive(Debug, Clone)]
pub struct LambertConformal {
    /// Central meridian in radians
    lon0: f64,
    /// Cone constant
    n: f64,
    /// Scale constant F
    f: f64,
    /// Rho at the origin latitude
    rho0: f64,
    earth_radius: f64,
    false_easting: f64,
    false_northing: f64,
    /// Projected x of column 0 (meters)
    x_first: f64,
    /// Projected y of row 0 (meters)
    y_first: f64,
    dx: f64,
    dy: f64,
    nx: usize,
    ny: usize,
}

/// Projection parameters as given by a CF `lambert_conformal_conic` grid mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertParameters {
    pub standard_parallel_1: f64,
    pub standard_parallel_2: f64,
    pub longitude_of_central_meridian: f64,
    pub latitude_of_projection_origin: f64,
    pub false_easting: f64,
    pub false_northing: f64,
    pub earth_radius: f64,
}

impl LambertParameters {
    /// Tangent-cone parameters with the origin on the standard parallel.
    pub fn tangent(latin: f64, lov: f64) -> Self {
        Self {
            standard_parallel_1: latin,
            standard_parallel_2: latin,
            longitude_of_central_meridian: lov,
            latitude_of_projection_origin: latin,
            false_easting: 0.0,
            false_northing: 0.0,
            earth_radius: EARTH_RADIUS,
        }
    }
}

impl LambertConformal {
    /// Create a grid from GRIB2-style parameters.
    ///
    /// # Arguments
    /// * `lat1_deg`, `lon1_deg` - First grid point (degrees)
    /// * `lov_deg` - Central meridian (degrees)
    /// * `latin1_deg`, `latin2_deg` - Standard parallels (degrees)
    /// * `dx`, `dy` - Grid spacing (meters)
    /// * `nx`, `ny` - Grid size
    #[allow(clippy::too_many_arguments)]
    pub fn from_first_point(
        lat1_deg: f64,
        lon1_deg: f64,
        lov_deg: f64,
        latin1_deg: f64,
        latin2_deg: f64,
        dx: f64,
        dy: f64,
        nx: usize,
        ny: usize,
    ) -> Self {
        let params = LambertParameters {
            standard_parallel_1: latin1_deg,
            standard_parallel_2: latin2_deg,
            longitude_of_central_meridian: lov_deg,
            latitude_of_projection_origin: latin1_deg,
            false_easting: 0.0,
            false_northing: 0.0,
            earth_radius: EARTH_RADIUS,
        };
        let mut grid = Self::from_cf(params, 0.0, 0.0, dx, dy, nx, ny);
        let (x_first, y_first) = grid.project(lat1_deg, lon1_deg);
        grid.x_first = x_first;
        grid.y_first = y_first;
        grid
    }

    /// Create a grid from CF grid-mapping attributes and the first values
    /// and spacing of the projected `x`/`y` coordinate variables (meters).
    pub fn from_cf(
        params: LambertParameters,
        x_first: f64,
        y_first: f64,
        dx: f64,
        dy: f64,
        nx: usize,
        ny: usize,
    ) -> Self {
        let latin1 = params.standard_parallel_1.to_radians();
        let latin2 = params.standard_parallel_2.to_radians();
        let lat0 = params.latitude_of_projection_origin.to_radians();

        let n = if (latin1 - latin2).abs() < 1e-10 {
            // Tangent cone (single standard parallel)
            latin1.sin()
        } else {
            // Secant cone (two standard parallels)
            let ln_ratio = (latin1.cos() / latin2.cos()).ln();
            let tan_ratio =
                ((PI / 4.0 + latin2 / 2.0).tan() / (PI / 4.0 + latin1 / 2.0).tan()).ln();
            ln_ratio / tan_ratio
        };

        let f = (latin1.cos() * (PI / 4.0 + latin1 / 2.0).tan().powf(n)) / n;
        let rho0 = params.earth_radius * f / (PI / 4.0 + lat0 / 2.0).tan().powf(n);

        Self {
            lon0: params.longitude_of_central_meridian.to_radians(),
            n,
            f,
            rho0,
            earth_radius: params.earth_radius,
            false_easting: params.false_easting,
            false_northing: params.false_northing,
            x_first,
            y_first,
            dx,
            dy,
            nx,
            ny,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.ny, self.nx)
    }

    /// Project geographic coordinates (degrees) to projected meters.
    pub fn project(&self, lat_deg: f64, lon_deg: f64) -> (f64, f64) {
        let lat = lat_deg.to_radians();
        let mut dlon = lon_deg.to_radians() - self.lon0;
        while dlon > PI {
            dlon -= 2.0 * PI;
        }
        while dlon < -PI {
            dlon += 2.0 * PI;
        }

        let rho = self.earth_radius * self.f / (PI / 4.0 + lat / 2.0).tan().powf(self.n);
        let theta = self.n * dlon;

        let x = self.false_easting + rho * theta.sin();
        let y = self.false_northing + self.rho0 - rho * theta.cos();
        (x, y)
    }

    /// Inverse of [`project`](Self::project), returning `(lat, lon)` in degrees.
    pub fn unproject(&self, x: f64, y: f64) -> (f64, f64) {
        let x = x - self.false_easting;
        let y = self.rho0 - (y - self.false_northing);
        let sign = self.n.signum();

        let rho = sign * (x * x + y * y).sqrt();
        let theta = (sign * x).atan2(sign * y);

        let lat = 2.0 * (self.earth_radius * self.f / rho).powf(1.0 / self.n).atan() - PI / 2.0;
        let lon = self.lon0 + theta / self.n;

        (lat.to_degrees(), lon.to_degrees())
    }

    /// Fractional grid indices `(i, j)` (column, row) of a point.
    pub fn geo_to_grid(&self, lat_deg: f64, lon_deg: f64) -> (f64, f64) {
        let (x, y) = self.project(lat_deg, lon_deg);
        ((x - self.x_first) / self.dx, (y - self.y_first) / self.dy)
    }

    /// Geographic coordinates `(lat, lon)` of fractional grid indices.
    pub fn grid_to_geo(&self, i: f64, j: f64) -> (f64, f64) {
        self.unproject(self.x_first + i * self.dx, self.y_first + j * self.dy)
    }

    pub fn nearest_cell(&self, lat_deg: f64, lon_deg: f64) -> Option<GridCell> {
        let (i, j) = self.geo_to_grid(lat_deg, lon_deg);
        Some(GridCell {
            row: index_from_fraction(j, self.ny)?,
            col: index_from_fraction(i, self.nx)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_approx_eq;

    /// MEPS 2.5 km grid over the Nordic countries.
    fn meps() -> LambertConformal {
        LambertConformal::from_first_point(
            50.319616, 0.278972, 15.0, 63.3, 63.3, 2500.0, 2500.0, 949, 1069,
        )
    }

    #[test]
    fn test_first_grid_point() {
        let proj = meps();
        let (i, j) = proj.geo_to_grid(50.319616, 0.278972);
        assert!(i.abs() < 1e-6, "i should be ~0, got {}", i);
        assert!(j.abs() < 1e-6, "j should be ~0, got {}", j);
        assert_eq!(proj.nearest_cell(50.319616, 0.278972), Some(GridCell::new(0, 0)));
    }

    #[test]
    fn test_roundtrip() {
        let proj = meps();
        let (lat, lon) = proj.grid_to_geo(470.0, 530.0);
        let (i, j) = proj.geo_to_grid(lat, lon);
        assert_approx_eq!(i, 470.0, 0.01);
        assert_approx_eq!(j, 530.0, 0.01);
    }

    #[test]
    fn test_helsinki_inside() {
        let proj = meps();
        let cell = proj.nearest_cell(60.192059, 24.945831).unwrap();
        assert!(cell.col > 400 && cell.col < 900, "col {}", cell.col);
        assert!(cell.row > 300 && cell.row < 800, "row {}", cell.row);
    }

    #[test]
    fn test_outside_domain() {
        let proj = meps();
        // Mediterranean
        assert_eq!(proj.nearest_cell(38.0, 15.0), None);
    }

    #[test]
    fn test_cf_false_origin_matches_first_point() {
        // Same tangent cone expressed with the origin on the standard parallel
        let first = meps();
        let params = LambertParameters::tangent(63.3, 15.0);
        let origin = LambertConformal::from_cf(params, 0.0, 0.0, 2500.0, 2500.0, 949, 1069);
        let (x_first, y_first) = origin.project(50.319616, 0.278972);
        let cf = LambertConformal::from_cf(params, x_first, y_first, 2500.0, 2500.0, 949, 1069);

        assert_eq!(
            cf.nearest_cell(60.192059, 24.945831),
            first.nearest_cell(60.192059, 24.945831)
        );
    }

    #[test]
    fn test_false_easting_shifts_projected_coordinates() {
        let mut params = LambertParameters::tangent(25.0, -95.0);
        let plain = LambertConformal::from_cf(params, 0.0, 0.0, 1000.0, 1000.0, 10, 10);
        params.false_easting = 5000.0;
        params.false_northing = -2000.0;
        let shifted = LambertConformal::from_cf(params, 0.0, 0.0, 1000.0, 1000.0, 10, 10);

        let (x1, y1) = plain.project(30.0, -90.0);
        let (x2, y2) = shifted.project(30.0, -90.0);
        assert_approx_eq!(x2 - x1, 5000.0, 1e-6);
        assert_approx_eq!(y2 - y1, -2000.0, 1e-6);

        let (lat, lon) = shifted.unproject(x2, y2);
        assert_approx_eq!(lat, 30.0, 1e-9);
        assert_approx_eq!(lon, -90.0, 1e-9);
    }

    #[test]
    fn test_origin_projects_to_zero() {
        let proj = LambertConformal::from_cf(
            LambertParameters::tangent(63.3, 15.0),
            0.0,
            0.0,
            2500.0,
            2500.0,
            1,
            1,
        );
        let (x, y) = proj.project(63.3, 15.0);
        assert_approx_eq!(x, 0.0, 1e-6);
        assert_approx_eq!(y, 0.0, 1e-6);
    }
}
