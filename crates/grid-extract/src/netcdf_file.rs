//! CF-convention NetCDF forecast files.
//!
//! Fields are `(time, [level], y, x)` variables. The horizontal projection
//! is taken from the variable's `grid_mapping` (Lambert conformal conic) or
//! from its coordinate variables (regular 1-D latitude/longitude, or 2-D
//! latitude/longitude arrays for curvilinear grids). Packed values are
//! unpacked with `scale_factor`/`add_offset`; `_FillValue` becomes NaN.

use std::path::Path;

use netcdf::AttributeValue;
use projection::{CurvilinearGrid, GridProjection, LambertConformal, LambertParameters, LatLonGrid};
use tracing::{debug, info};

use crate::dataset::{Axis, FieldDescriptor, GridIndex, GriddedDataset};
use crate::error::{ExtractError, ExtractResult};

const LATITUDE_NAMES: &[&str] = &["latitude", "lat"];
const LONGITUDE_NAMES: &[&str] = &["longitude", "lon"];

/// An open NetCDF file.
pub struct NetcdfDataset {
    file: netcdf::File,
}

impl NetcdfDataset {
    pub fn open<P: AsRef<Path>>(path: P) -> ExtractResult<Self> {
        let path = path.as_ref();
        let file = netcdf::open(path).map_err(|e| {
            ExtractError::Dataset(format!("failed to open {}: {}", path.display(), e))
        })?;
        info!(path = %path.display(), "Opened NetCDF dataset");
        Ok(Self { file })
    }

    fn variable(&self, name: &str) -> ExtractResult<netcdf::Variable<'_>> {
        self.file
            .variable(name)
            .ok_or_else(|| ExtractError::FieldNotFound(name.to_string()))
    }

    fn read_axis(&self, name: &str) -> ExtractResult<Axis> {
        let var = self.variable(name)?;
        let values: Vec<f64> = var
            .get_values(..)
            .map_err(|e| ExtractError::Dataset(format!("failed to read '{}': {}", name, e)))?;
        let units = get_string_attr(&var, "units").unwrap_or_default();
        Ok(Axis::new(units, values))
    }

    fn read_values(&self, name: &str) -> ExtractResult<Vec<f64>> {
        self.variable(name)?
            .get_values(..)
            .map_err(|e| ExtractError::Dataset(format!("failed to read '{}': {}", name, e)))
    }

    fn projection(&self, var: &netcdf::Variable<'_>, y_dim: &str, x_dim: &str) -> ExtractResult<GridProjection> {
        if let Some(mapping_name) = get_string_attr(var, "grid_mapping") {
            let mapping = self.variable(&mapping_name)?;
            let kind = get_string_attr(&mapping, "grid_mapping_name").unwrap_or_default();
            if kind == "lambert_conformal_conic" {
                return self.lambert(&mapping, y_dim, x_dim);
            }
            debug!(grid_mapping = %kind, "Falling back to coordinate variables");
        }

        // regular grid: 1-D coordinate variables named after the dimensions
        let y = self.read_axis(y_dim);
        let x = self.read_axis(x_dim);
        if let (Ok(y), Ok(x)) = (&y, &x) {
            if y.units.starts_with("degree") && x.units.starts_with("degree") {
                return Ok(LatLonGrid::from_axes(&y.values, &x.values)?.into());
            }
        }

        // curvilinear grid: 2-D latitude/longitude arrays
        let lat_name = find_name(&self.file, LATITUDE_NAMES)?;
        let lon_name = find_name(&self.file, LONGITUDE_NAMES)?;
        let rows = dimension_len(&self.file, y_dim)?;
        let cols = dimension_len(&self.file, x_dim)?;
        let grid = CurvilinearGrid::new(
            self.read_values(lat_name)?,
            self.read_values(lon_name)?,
            rows,
            cols,
        )?;
        Ok(grid.into())
    }

    fn lambert(&self, mapping: &netcdf::Variable<'_>, y_dim: &str, x_dim: &str) -> ExtractResult<GridProjection> {
        let parallels = get_f64_list_attr(mapping, "standard_parallel")
            .ok_or_else(|| missing_attr("standard_parallel"))?;
        let first_parallel = *parallels.first().ok_or_else(|| missing_attr("standard_parallel"))?;
        let second_parallel = parallels.get(1).copied().unwrap_or(first_parallel);

        let params = LambertParameters {
            standard_parallel_1: first_parallel,
            standard_parallel_2: second_parallel,
            longitude_of_central_meridian: get_f64_attr(mapping, "longitude_of_central_meridian")
                .ok_or_else(|| missing_attr("longitude_of_central_meridian"))?,
            latitude_of_projection_origin: get_f64_attr(mapping, "latitude_of_projection_origin")
                .unwrap_or(first_parallel),
            false_easting: get_f64_attr(mapping, "false_easting").unwrap_or(0.0),
            false_northing: get_f64_attr(mapping, "false_northing").unwrap_or(0.0),
            earth_radius: get_f64_attr(mapping, "earth_radius").unwrap_or(projection::EARTH_RADIUS),
        };

        let x = self.read_axis(x_dim)?;
        let y = self.read_axis(y_dim)?;
        let (x_first, dx) = projected_axis(x_dim, &x)?;
        let (y_first, dy) = projected_axis(y_dim, &y)?;

        Ok(LambertConformal::from_cf(params, x_first, y_first, dx, dy, x.len(), y.len()).into())
    }
}

impl GriddedDataset for NetcdfDataset {
    fn field_descriptor(&self, variable: &str) -> ExtractResult<FieldDescriptor> {
        let var = self.variable(variable)?;
        let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();

        let (time_dim, level_dim, y_dim, x_dim) = match dims.as_slice() {
            [t, y, x] => (t, None, y, x),
            [t, z, y, x] => (t, Some(z), y, x),
            other => {
                return Err(ExtractError::MalformedGrid(format!(
                    "'{}' has {} dimensions, expected 3 or 4",
                    variable,
                    other.len()
                )))
            }
        };

        let mut descriptor = FieldDescriptor::new(
            self.projection(&var, y_dim, x_dim)?,
            self.read_axis(time_dim)?,
        );
        if let Some(level_dim) = level_dim {
            descriptor = descriptor.with_vertical_axis(self.read_axis(level_dim)?);
        }
        Ok(descriptor)
    }

    fn read_point(&self, variable: &str, index: GridIndex) -> ExtractResult<Vec<f64>> {
        let var = self.variable(variable)?;
        let (t, r, c) = (index.time, index.cell.row, index.cell.col);

        let raw: Vec<f64> = match index.layer {
            Some(l) => var.get_values::<f64, _>([t..t + 1, l..l + 1, r..r + 1, c..c + 1]),
            None => var.get_values::<f64, _>([t..t + 1, r..r + 1, c..c + 1]),
        }
        .map_err(|e| ExtractError::Dataset(format!("failed to read '{}': {}", variable, e)))?;

        let scale = get_f64_attr(&var, "scale_factor").unwrap_or(1.0);
        let offset = get_f64_attr(&var, "add_offset").unwrap_or(0.0);
        let fill = get_f64_attr(&var, "_FillValue");

        Ok(raw
            .into_iter()
            .map(|v| {
                if Some(v) == fill {
                    f64::NAN
                } else {
                    v * scale + offset
                }
            })
            .collect())
    }
}

/// First value and spacing of a projected axis, in meters.
fn projected_axis(name: &str, axis: &Axis) -> ExtractResult<(f64, f64)> {
    let scale = match axis.units.as_str() {
        "km" => 1000.0,
        _ => 1.0,
    };
    match axis.values.as_slice() {
        [first, second, ..] => Ok((first * scale, (second - first) * scale)),
        _ => Err(ExtractError::MalformedGrid(format!(
            "projected axis '{}' needs at least 2 values",
            name
        ))),
    }
}

fn find_name(file: &netcdf::File, candidates: &[&'static str]) -> ExtractResult<&'static str> {
    candidates
        .iter()
        .copied()
        .find(|name| file.variable(name).is_some())
        .ok_or_else(|| ExtractError::MalformedGrid(format!("no coordinate variable among {:?}", candidates)))
}

fn dimension_len(file: &netcdf::File, name: &str) -> ExtractResult<usize> {
    file.dimension(name)
        .map(|d| d.len())
        .ok_or_else(|| ExtractError::MalformedGrid(format!("missing dimension '{}'", name)))
}

fn missing_attr(name: &str) -> ExtractError {
    ExtractError::MalformedGrid(format!("grid mapping lacks '{}'", name))
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable<'_>, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

fn get_f64_attr(var: &netcdf::Variable<'_>, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}

fn get_f64_list_attr(var: &netcdf::Variable<'_>, name: &str) -> Option<Vec<f64>> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        AttributeValue::Doubles(values) => Some(values),
        AttributeValue::Floats(values) => Some(values.into_iter().map(f64::from).collect()),
        single => f64::try_from(single).ok().map(|v| vec![v]),
    }
}

fn get_string_attr(var: &netcdf::Variable<'_>, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        AttributeValue::Str(value) => Some(value),
        _ => None,
    }
}
