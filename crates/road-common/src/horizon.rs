//! Visible horizon descriptions for the solar-shading calculation.

use serde::{Deserialize, Serialize};

use crate::error::HorizonError;

/// Tolerance on the uniform-step comparison, in degrees.
///
/// Azimuths such as 360/7 are not representable exactly; anything beyond
/// this is a genuine sampling gap.
const STEP_TOLERANCE: f64 = 1e-9;

/// Elevation angle of the terrain at one azimuth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DirectionConfig")]
pub struct HorizonDirection {
    azimuth: f64,
    elevation: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionConfig {
    pub azimuth: f64,
    pub elevation: f64,
}

impl TryFrom<DirectionConfig> for HorizonDirection {
    type Error = HorizonError;

    fn try_from(raw: DirectionConfig) -> Result<Self, Self::Error> {
        Self::new(raw.azimuth, raw.elevation)
    }
}

impl HorizonDirection {
    /// Azimuth in [0, 360] degrees from north, elevation in [-90, 90] degrees.
    pub fn new(azimuth: f64, elevation: f64) -> Result<Self, HorizonError> {
        if !(0.0..=360.0).contains(&azimuth) || !(-90.0..=90.0).contains(&elevation) {
            return Err(HorizonError::InvalidDirection { azimuth, elevation });
        }
        Ok(Self { azimuth, elevation })
    }

    pub fn azimuth(&self) -> f64 {
        self.azimuth
    }

    pub fn elevation(&self) -> f64 {
        self.elevation
    }
}

/// A validated, uniformly sampled horizon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibleHorizon {
    directions: Vec<HorizonDirection>,
    step: f64,
}

impl VisibleHorizon {
    /// Validate a horizon description.
    ///
    /// An empty list means "no obstruction data" and yields `Ok(None)`.
    /// Otherwise the directions, ordered by azimuth, must start at north and
    /// step uniformly around the circle; a closing 360 entry must repeat the
    /// elevation at 0.
    pub fn new(mut directions: Vec<HorizonDirection>) -> Result<Option<Self>, HorizonError> {
        if directions.is_empty() {
            return Ok(None);
        }

        directions.sort_by(|a, b| a.azimuth.total_cmp(&b.azimuth));

        let count = directions.len();
        let first = directions[0];
        let last = directions[count - 1];

        if first.azimuth != 0.0 {
            return Err(HorizonError::MissingNorth(first.azimuth));
        }

        let step = if last.azimuth == 360.0 {
            if count < 3 {
                return Err(HorizonError::TooFewClosed(count));
            }
            if last.elevation != first.elevation {
                return Err(HorizonError::UnclosedCircle {
                    opening: first.elevation,
                    closing: last.elevation,
                });
            }
            360.0 / (count - 1) as f64
        } else {
            if count < 2 {
                return Err(HorizonError::TooFewOpen(count));
            }
            360.0 - last.azimuth
        };

        for pair in directions.windows(2) {
            let found = pair[1].azimuth - pair[0].azimuth;
            if (found - step).abs() > STEP_TOLERANCE {
                return Err(HorizonError::NonUniformHorizon {
                    from: pair[0].azimuth,
                    to: pair[1].azimuth,
                    found,
                    expected: step,
                });
            }
        }

        Ok(Some(Self { directions, step }))
    }

    /// Validate raw `(azimuth, elevation)` pairs.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Option<Self>, HorizonError> {
        let directions = pairs
            .iter()
            .map(|&(azimuth, elevation)| HorizonDirection::new(azimuth, elevation))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(directions)
    }

    pub fn directions(&self) -> &[HorizonDirection] {
        &self.directions
    }

    /// Angular sampling step in degrees.
    pub fn step(&self) -> f64 {
        self.step
    }
}
