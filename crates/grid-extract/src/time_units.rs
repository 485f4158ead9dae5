//! Decoding of CF-style time axis unit strings.
//!
//! Forecast grids label their time axis `"<unit> since <instant>"`, where the
//! unit is hour or minute and the instant is a possibly truncated ISO-8601
//! timestamp such as `2020-01-01T00:00Z`.

use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::str::FromStr;

use crate::error::ExtractError;

/// Sampling unit of a time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeStepUnit {
    Hour,
    Minute,
}

impl TimeStepUnit {
    fn seconds(&self) -> f64 {
        match self {
            TimeStepUnit::Hour => 3600.0,
            TimeStepUnit::Minute => 60.0,
        }
    }

    fn from_word(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "hour" | "hours" => Some(TimeStepUnit::Hour),
            "minute" | "minutes" => Some(TimeStepUnit::Minute),
            _ => None,
        }
    }
}

/// A decoded time axis unit: step unit plus reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeAxisUnits {
    pub unit: TimeStepUnit,
    pub reference: DateTime<Utc>,
}

impl TimeAxisUnits {
    /// Absolute instant of a step value, rounded to the millisecond.
    pub fn instant(&self, step: f64) -> Option<DateTime<Utc>> {
        if !step.is_finite() {
            return None;
        }
        let millis = (step * self.unit.seconds() * 1000.0).round();
        // i64::MAX as f64 rounds up to 2^63, which is already out of range
        if millis.abs() >= i64::MAX as f64 {
            return None;
        }
        self.reference
            .checked_add_signed(Duration::try_milliseconds(millis as i64)?)
    }
}

impl FromStr for TimeAxisUnits {
    type Err = ExtractError;

    fn from_str(units: &str) -> Result<Self, Self::Err> {
        let unsupported = || ExtractError::UnsupportedTimeUnits(units.to_string());

        // the reference instant may itself contain a space: "2020-01-01 00:00:00"
        let (unit_word, rest) = units.trim().split_once(char::is_whitespace).ok_or_else(unsupported)?;
        let unit = TimeStepUnit::from_word(unit_word).ok_or_else(unsupported)?;
        let (since, reference_text) = rest
            .trim_start()
            .split_once(char::is_whitespace)
            .ok_or_else(unsupported)?;
        if !since.eq_ignore_ascii_case("since") {
            return Err(unsupported());
        }
        let reference = road_common::parse_instant(reference_text).ok_or_else(unsupported)?;

        Ok(Self { unit, reference })
    }
}

impl fmt::Display for TimeAxisUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            TimeStepUnit::Hour => "Hour",
            TimeStepUnit::Minute => "Minute",
        };
        write!(f, "{} since {}", unit, road_common::format_minute(self.reference))
    }
}
