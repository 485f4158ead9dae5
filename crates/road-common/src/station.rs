//! Station description value types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of road structure the station sits on.
///
/// A bridge deck has air underneath instead of soil, which changes which
/// sources are acceptable for the sub-surface temperature input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationType {
    #[default]
    Road,
    Bridge,
}

impl StationType {
    pub fn label(&self) -> &'static str {
        match self {
            StationType::Road => "road",
            StationType::Bridge => "bridge",
        }
    }
}

impl fmt::Display for StationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Construction material of one road layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoadMaterial {
    Asphalt,
    Crushed,
    Sand,
    Cement,
}

impl RoadMaterial {
    pub fn label(&self) -> &'static str {
        match self {
            RoadMaterial::Asphalt => "asphalt",
            RoadMaterial::Crushed => "crushed rock",
            RoadMaterial::Sand => "sand",
            RoadMaterial::Cement => "cement",
        }
    }
}

/// One layer of the road body, listed top-down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadLayer {
    pub material: RoadMaterial,
    /// Layer thickness in meters.
    pub thickness_m: f64,
}

impl RoadLayer {
    pub fn new(material: RoadMaterial, thickness_m: f64) -> Self {
        Self {
            material,
            thickness_m,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.thickness_m.is_finite() && self.thickness_m > 0.0
    }
}
