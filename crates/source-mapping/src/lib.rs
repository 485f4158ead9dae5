//! Data-source mapping tables for the road-weather model.
//!
//! A station configures, for every input tag of the model, an ordered list
//! of data sources: point measurements or forecast grids. This crate turns
//! raw configuration into typed [`MappingTable`]s and proves, as a pure
//! predicate, that a table is complete for the station's flux settings and
//! that every source is physically compatible with its tag.
//!
//! Validation never stops at the first problem; every failure found is
//! reported in one [`ValidationFailures`].

pub mod compatibility;
pub mod config;
pub mod error;
pub mod resolver;
pub mod source;
pub mod table;

pub use compatibility::{allowed_kinds, is_compatible};
pub use config::{DataSourceConfig, MappingTableConfig};
pub use error::{SourceError, ValidationFailure, ValidationFailures};
pub use resolver::{resolve_forecast_table, resolve_observation_table, resolve_table, validate, ResolverContext};
pub use source::DataSource;
pub use table::{ForecastMapping, MappingTable, MappingTag, ObservationMapping};
