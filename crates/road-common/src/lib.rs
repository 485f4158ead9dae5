//! Common types shared by the road-weather model bridge crates.
//!
//! Everything in here is an immutable value type: constructors enforce the
//! invariants, and "updates" hand back a new value.

pub mod error;
pub mod horizon;
pub mod location;
pub mod parameter;
pub mod series;
pub mod station;
pub mod tags;
pub mod time;

pub use error::{CatalogError, HorizonError, LocationError, SeriesError};
pub use horizon::{DirectionConfig, HorizonDirection, VisibleHorizon};
pub use location::{GeographicLocation, LocationConfig};
pub use parameter::{catalog, ParameterCatalog, ParameterKind, SensorDepth, SourceType, ValidRange};
pub use series::{TimeSeries, TimeSeriesBuilder};
pub use station::{RoadLayer, RoadMaterial, StationType};
pub use tags::{
    DocumentTag, FluxFlags, ForecastTag, ModelInputTag, ObservationTag, RoadcastTag, TableKind,
    TagRequirement,
};
pub use time::{format_minute, parse_instant, truncate_to_minute};
