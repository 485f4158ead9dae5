//! Road-weather model input preparation.
//!
//! Loads a station configuration, proves it usable (mapping tables,
//! horizon, road layers) and turns it into the documents the model reads.

pub mod config;
pub mod prepare;

pub use config::{load_station_file, Station, StationFile};
pub use prepare::{
    forecast_document, station_document, summarize_roadcast, ForecastInputs, RoadcastSummary,
    SeriesSummary,
};
