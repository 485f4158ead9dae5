//! Error types for the shared road-weather value types.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::parameter::ParameterKind;

/// Result type alias for catalog lookups and conversions.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Failures of the parameter catalog's range check and external conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("value {value} of '{kind}' is outside the valid range [{min}, {max}]")]
    OutOfRange {
        kind: ParameterKind,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("value {value} of '{kind}' has no representation in the model's value space")]
    NotConvertible { kind: ParameterKind, value: f64 },
}

/// Failures constructing or parsing a [`GeographicLocation`](crate::GeographicLocation).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    #[error("latitude {0} is outside [-85, 85]")]
    InvalidLatitude(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    InvalidLongitude(f64),

    #[error("malformed location identifier: '{0}'")]
    MalformedIdentifier(String),
}

/// Failures building a [`TimeSeries`](crate::TimeSeries).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("time series of '{0}' contains no values")]
    Empty(ParameterKind),

    #[error("at {instant}: {source}")]
    OutOfRange {
        instant: DateTime<Utc>,
        source: CatalogError,
    },

    #[error("instant {instant} precedes the reference instant {reference}")]
    BeforeReference {
        instant: DateTime<Utc>,
        reference: DateTime<Utc>,
    },
}

/// Failures validating a visible horizon description.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HorizonError {
    #[error("invalid horizon direction (azimuth {azimuth}, elevation {elevation})")]
    InvalidDirection { azimuth: f64, elevation: f64 },

    #[error("horizon must start at azimuth 0, found {0}")]
    MissingNorth(f64),

    #[error("horizon closing at 360 needs at least 3 directions, found {0}")]
    TooFewClosed(usize),

    #[error("horizon without a 360 entry needs at least 2 directions, found {0}")]
    TooFewOpen(usize),

    #[error("horizon elevation at 360 ({closing}) differs from the elevation at 0 ({opening})")]
    UnclosedCircle { opening: f64, closing: f64 },

    #[error("horizon is not uniformly sampled: step {found} between azimuth {from} and {to}, expected {expected}")]
    NonUniformHorizon {
        from: f64,
        to: f64,
        found: f64,
        expected: f64,
    },
}
