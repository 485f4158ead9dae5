//! Geographic locations and their derived identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::LocationError;

/// Latitude limit; the model's solar geometry is undefined closer to the poles.
pub const MAX_LATITUDE: f64 = 85.0;
/// Longitude limit.
pub const MAX_LONGITUDE: f64 = 180.0;

const LATITUDE_SUFFIX: &str = "N";
const LONGITUDE_SUFFIX: &str = "E";
const SEPARATOR: &str = "_";

/// A validated point on the Earth's surface.
///
/// Equality and hashing use latitude and longitude only; the elevation is
/// carried along for the station description but never distinguishes two
/// locations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "LocationConfig")]
pub struct GeographicLocation {
    latitude: f64,
    longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    elevation: Option<f64>,
}

/// Unvalidated location as written in configuration files.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub elevation: Option<f64>,
}

impl TryFrom<LocationConfig> for GeographicLocation {
    type Error = LocationError;

    fn try_from(raw: LocationConfig) -> Result<Self, Self::Error> {
        let location = Self::new(raw.latitude, raw.longitude)?;
        Ok(match raw.elevation {
            Some(elevation) => location.with_elevation(elevation),
            None => location,
        })
    }
}

impl GeographicLocation {
    /// Create a location, rejecting coordinates outside the supported range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, LocationError> {
        // NaN fails both comparisons
        if !(-MAX_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
            return Err(LocationError::InvalidLatitude(latitude));
        }
        if !(-MAX_LONGITUDE..=MAX_LONGITUDE).contains(&longitude) {
            return Err(LocationError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
            elevation: None,
        })
    }

    /// Return a copy carrying the given elevation (meters above sea level).
    pub fn with_elevation(self, elevation: f64) -> Self {
        Self {
            elevation: Some(elevation),
            ..self
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn elevation(&self) -> Option<f64> {
        self.elevation
    }

    /// Deterministic identifier, e.g. `60.123456N_-24.000001E`.
    ///
    /// Each coordinate is truncated toward zero to six decimal digits.
    pub fn identifier(&self) -> String {
        format!(
            "{}{}{}{}{}",
            format_micro(truncate_micro(self.latitude)),
            LATITUDE_SUFFIX,
            SEPARATOR,
            format_micro(truncate_micro(self.longitude)),
            LONGITUDE_SUFFIX
        )
    }

    /// Rebuild a location from an identifier produced by [`identifier`](Self::identifier).
    pub fn from_identifier(id: &str) -> Result<Self, LocationError> {
        let malformed = || LocationError::MalformedIdentifier(id.to_string());

        let (lat_part, lon_part) = id.split_once(SEPARATOR).ok_or_else(malformed)?;
        let lat_text = lat_part.strip_suffix(LATITUDE_SUFFIX).ok_or_else(malformed)?;
        let lon_text = lon_part.strip_suffix(LONGITUDE_SUFFIX).ok_or_else(malformed)?;

        let latitude: f64 = lat_text.parse().map_err(|_| malformed())?;
        let longitude: f64 = lon_text.parse().map_err(|_| malformed())?;

        Self::new(latitude, longitude)
    }
}

impl PartialEq for GeographicLocation {
    fn eq(&self, other: &Self) -> bool {
        self.latitude == other.latitude && self.longitude == other.longitude
    }
}

// Coordinates are never NaN once validated.
impl Eq for GeographicLocation {}

impl Hash for GeographicLocation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        normalized_bits(self.latitude).hash(state);
        normalized_bits(self.longitude).hash(state);
    }
}

impl fmt::Display for GeographicLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier())
    }
}

/// -0.0 and 0.0 compare equal, so they must hash equal.
fn normalized_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

/// Coordinate in whole micro-degrees, truncated toward zero.
///
/// Rounding to nano-degrees first keeps binary noise (0.29 is stored as
/// 0.28999999999999998) from pulling the value below the sixth digit.
fn truncate_micro(value: f64) -> i64 {
    let nano = (value * 1e9).round();
    (nano / 1e3).trunc() as i64
}

fn format_micro(micro: i64) -> String {
    let sign = if micro < 0 { "-" } else { "" };
    let abs = micro.unsigned_abs();
    format!("{}{}.{:06}", sign, abs / 1_000_000, abs % 1_000_000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_truncates() {
        let loc = GeographicLocation::new(60.1234569, 24.9876541).unwrap();
        assert_eq!(loc.identifier(), "60.123456N_24.987654E");
    }

    #[test]
    fn test_identifier_negative_coordinates() {
        let loc = GeographicLocation::new(-0.5, -24.0000015).unwrap();
        assert_eq!(loc.identifier(), "-0.500000N_-24.000001E");
    }

    #[test]
    fn test_identifier_binary_noise() {
        let loc = GeographicLocation::new(0.29, 10.0).unwrap();
        assert_eq!(loc.identifier(), "0.290000N_10.000000E");
    }

    #[test]
    fn test_rejects_polar_latitude() {
        assert_eq!(
            GeographicLocation::new(85.5, 0.0),
            Err(LocationError::InvalidLatitude(85.5))
        );
        assert!(GeographicLocation::new(f64::NAN, 0.0).is_err());
        assert!(GeographicLocation::new(0.0, 180.5).is_err());
    }

    #[test]
    fn test_malformed_identifier() {
        assert!(GeographicLocation::from_identifier("60.0_24.0").is_err());
        assert!(GeographicLocation::from_identifier("60.0N-24.0E").is_err());
        assert!(GeographicLocation::from_identifier("abcN_24.0E").is_err());
        assert!(GeographicLocation::from_identifier("95.0N_24.0E").is_err());
    }

    #[test]
    fn test_signed_zero_equal() {
        let a = GeographicLocation::new(0.0, 10.0).unwrap();
        let b = GeographicLocation::new(-0.0, 10.0).unwrap();
        assert_eq!(a, b);
        assert_eq!(normalized_bits(0.0), normalized_bits(-0.0));
    }
}
