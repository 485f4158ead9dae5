//! Point time-series extraction from gridded forecast datasets.
//!
//! Given a dataset handle, a variable, a location and (for layered
//! variables) a vertical layer, the extractor resolves the nearest grid cell
//! under the field's native projection, decodes the time axis and reads one
//! scalar per time step into a [`TimeSeries`](road_common::TimeSeries).
//!
//! Extraction is read-only over the dataset and may run concurrently
//! against one shared handle; see [`extract_batch`].

pub mod dataset;
pub mod error;
pub mod extract;
pub mod memory;
#[cfg(feature = "netcdf")]
pub mod netcdf_file;
pub mod time_units;

pub use dataset::{Axis, FieldDescriptor, GridIndex, GriddedDataset};
pub use error::{ExtractError, ExtractResult};
pub use extract::{
    extract, extract_batch, ExtractionRequest, GridExtraction, LayerSelector, StepFailure,
    StepFailureReason,
};
pub use memory::InMemoryDataset;
#[cfg(feature = "netcdf")]
pub use netcdf_file::NetcdfDataset;
pub use time_units::{TimeAxisUnits, TimeStepUnit};
