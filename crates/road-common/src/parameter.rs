//! Closed catalog of measured and forecast parameter kinds.
//!
//! Each kind carries three things, all resolved through exhaustive matches:
//! a stable label, an inclusive valid range in the kind's native units, and
//! a conversion into the road-weather model's value space. The label
//! registry is built once and asserts that no two kinds share a label.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{CatalogError, CatalogResult};
use crate::tags::RoadcastTag;

const KELVIN_OFFSET: f64 = 273.15;
const MS_TO_KMH: f64 = 3.6;

/// Valid range of a parameter kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidRange {
    /// Minimum valid value (inclusive).
    pub min: f64,
    /// Maximum valid value (inclusive).
    pub max: f64,
}

impl ValidRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Check if a value lies within the range. NaN never does.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Whether a value comes from a point sensor or from a forecast grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Measurement,
    Forecast,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceType::Measurement => f.write_str("measurement"),
            SourceType::Forecast => f.write_str("forecast"),
        }
    }
}

/// Installation depth of a sub-surface temperature sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum SensorDepth {
    Cm5,
    Cm10,
    Cm20,
    Cm30,
    Cm40,
    Cm50,
}

impl SensorDepth {
    pub const ALL: [SensorDepth; 6] = [
        SensorDepth::Cm5,
        SensorDepth::Cm10,
        SensorDepth::Cm20,
        SensorDepth::Cm30,
        SensorDepth::Cm40,
        SensorDepth::Cm50,
    ];

    pub fn centimeters(&self) -> u32 {
        match self {
            SensorDepth::Cm5 => 5,
            SensorDepth::Cm10 => 10,
            SensorDepth::Cm20 => 20,
            SensorDepth::Cm30 => 30,
            SensorDepth::Cm40 => 40,
            SensorDepth::Cm50 => 50,
        }
    }
}

impl TryFrom<u32> for SensorDepth {
    type Error = String;

    fn try_from(cm: u32) -> Result<Self, Self::Error> {
        SensorDepth::ALL
            .into_iter()
            .find(|d| d.centimeters() == cm)
            .ok_or_else(|| format!("unsupported sensor depth {} cm", cm))
    }
}

impl From<SensorDepth> for u32 {
    fn from(depth: SensorDepth) -> Self {
        depth.centimeters()
    }
}

/// Every parameter the bridge knows how to source or receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParameterKind {
    // Measured at the station (°C, m/s, mm/h, sensor codes)
    AirTemperature,
    DewPoint,
    RoadSurfaceTemperature,
    SubSurfaceTemperature(SensorDepth),
    WindSpeed,
    PrecipitationPresence,
    PrecipitationIntensity,
    RoadCondition,

    // Forecast grids (K, m/s, Pa, mm, %, W/m²)
    AirTemperature150cm,
    DewPoint150cm,
    WindSpeed10m,
    AirPressure,
    RainAmount,
    SnowAmount,
    CloudCover,
    SolarFlux,
    InfraredFlux,
    AnthropogenicFlux,

    /// Output of a previous model run, already in model units.
    Roadcast(RoadcastTag),
}

impl ParameterKind {
    /// Every kind in the catalog.
    pub fn all() -> Vec<ParameterKind> {
        use ParameterKind::*;

        let mut kinds = vec![
            AirTemperature,
            DewPoint,
            RoadSurfaceTemperature,
        ];
        kinds.extend(SensorDepth::ALL.into_iter().map(SubSurfaceTemperature));
        kinds.extend([
            WindSpeed,
            PrecipitationPresence,
            PrecipitationIntensity,
            RoadCondition,
            AirTemperature150cm,
            DewPoint150cm,
            WindSpeed10m,
            AirPressure,
            RainAmount,
            SnowAmount,
            CloudCover,
            SolarFlux,
            InfraredFlux,
            AnthropogenicFlux,
        ]);
        kinds.extend(
            <RoadcastTag as crate::tags::DocumentTag>::ALL
                .iter()
                .copied()
                .map(Roadcast),
        );
        kinds
    }

    pub fn label(&self) -> &'static str {
        use ParameterKind::*;

        match self {
            AirTemperature => "air_temperature",
            DewPoint => "dew_point",
            RoadSurfaceTemperature => "road_surface_temperature",
            SubSurfaceTemperature(depth) => match depth {
                SensorDepth::Cm5 => "sub_surface_temperature_5cm",
                SensorDepth::Cm10 => "sub_surface_temperature_10cm",
                SensorDepth::Cm20 => "sub_surface_temperature_20cm",
                SensorDepth::Cm30 => "sub_surface_temperature_30cm",
                SensorDepth::Cm40 => "sub_surface_temperature_40cm",
                SensorDepth::Cm50 => "sub_surface_temperature_50cm",
            },
            WindSpeed => "wind_speed",
            PrecipitationPresence => "precipitation_presence",
            PrecipitationIntensity => "precipitation_intensity",
            RoadCondition => "road_condition",
            AirTemperature150cm => "air_temperature_150cm",
            DewPoint150cm => "dew_point_150cm",
            WindSpeed10m => "wind_speed_10m",
            AirPressure => "air_pressure",
            RainAmount => "rain_amount",
            SnowAmount => "snow_amount",
            CloudCover => "cloud_cover",
            SolarFlux => "solar_flux",
            InfraredFlux => "infrared_flux",
            AnthropogenicFlux => "anthropogenic_flux",
            Roadcast(tag) => match tag {
                RoadcastTag::At => "roadcast_air_temperature",
                RoadcastTag::Td => "roadcast_dew_point",
                RoadcastTag::Ws => "roadcast_wind_speed",
                RoadcastTag::St => "roadcast_surface_temperature",
                RoadcastTag::Sst => "roadcast_sub_surface_temperature",
                RoadcastTag::Ra => "roadcast_rain_accumulation",
                RoadcastTag::Sn => "roadcast_snow_accumulation",
                RoadcastTag::Rc => "roadcast_road_condition",
                RoadcastTag::QpRa => "roadcast_rain_on_road",
                RoadcastTag::QpSn => "roadcast_snow_on_road",
                RoadcastTag::Sf => "roadcast_solar_flux",
                RoadcastTag::Ir => "roadcast_infrared_flux",
                RoadcastTag::Fv => "roadcast_vapour_flux",
                RoadcastTag::Fc => "roadcast_sensible_heat_flux",
                RoadcastTag::Fa => "roadcast_anthropogenic_flux",
                RoadcastTag::Fg => "roadcast_ground_flux",
                RoadcastTag::Bb => "roadcast_blackbody_flux",
                RoadcastTag::Fp => "roadcast_phase_change_flux",
            },
        }
    }

    pub fn source_type(&self) -> SourceType {
        use ParameterKind::*;

        match self {
            AirTemperature
            | DewPoint
            | RoadSurfaceTemperature
            | SubSurfaceTemperature(_)
            | WindSpeed
            | PrecipitationPresence
            | PrecipitationIntensity
            | RoadCondition => SourceType::Measurement,
            AirTemperature150cm
            | DewPoint150cm
            | WindSpeed10m
            | AirPressure
            | RainAmount
            | SnowAmount
            | CloudCover
            | SolarFlux
            | InfraredFlux
            | AnthropogenicFlux
            | Roadcast(_) => SourceType::Forecast,
        }
    }

    /// Inclusive valid range in the kind's native units.
    pub fn valid_range(&self) -> ValidRange {
        use ParameterKind::*;

        match self {
            AirTemperature | DewPoint => ValidRange::new(-60.0, 60.0),
            RoadSurfaceTemperature | SubSurfaceTemperature(_) => ValidRange::new(-60.0, 80.0),
            WindSpeed | WindSpeed10m => ValidRange::new(0.0, 75.0),
            PrecipitationPresence => ValidRange::new(0.0, 1.0),
            PrecipitationIntensity => ValidRange::new(0.0, 500.0),
            RoadCondition => ValidRange::new(0.0, 99.0),
            AirTemperature150cm | DewPoint150cm => ValidRange::new(183.15, 333.15),
            AirPressure => ValidRange::new(50_000.0, 110_000.0),
            RainAmount | SnowAmount => ValidRange::new(0.0, 500.0),
            CloudCover => ValidRange::new(0.0, 100.0),
            SolarFlux => ValidRange::new(0.0, 1500.0),
            InfraredFlux => ValidRange::new(0.0, 1000.0),
            AnthropogenicFlux => ValidRange::new(0.0, 500.0),
            Roadcast(tag) => match tag {
                RoadcastTag::At | RoadcastTag::Td => ValidRange::new(-60.0, 60.0),
                RoadcastTag::St | RoadcastTag::Sst => ValidRange::new(-60.0, 80.0),
                RoadcastTag::Ws => ValidRange::new(0.0, 270.0),
                RoadcastTag::Ra | RoadcastTag::Sn => ValidRange::new(0.0, 1000.0),
                RoadcastTag::Rc => ValidRange::new(0.0, 8.0),
                RoadcastTag::QpRa | RoadcastTag::QpSn => ValidRange::new(0.0, 100.0),
                RoadcastTag::Sf => ValidRange::new(0.0, 1500.0),
                RoadcastTag::Ir | RoadcastTag::Bb => ValidRange::new(0.0, 1000.0),
                RoadcastTag::Fa => ValidRange::new(0.0, 500.0),
                RoadcastTag::Fv | RoadcastTag::Fc | RoadcastTag::Fg | RoadcastTag::Fp => {
                    ValidRange::new(-1000.0, 1000.0)
                }
            },
        }
    }

    /// True iff the value lies within the kind's valid range.
    pub fn check_value(&self, value: f64) -> bool {
        self.valid_range().contains(value)
    }

    /// Range-check a value, reporting the failing interval.
    pub fn checked(&self, value: f64) -> CatalogResult<f64> {
        let range = self.valid_range();
        if range.contains(value) {
            Ok(value)
        } else {
            Err(CatalogError::OutOfRange {
                kind: *self,
                value,
                min: range.min,
                max: range.max,
            })
        }
    }

    /// Convert a raw value into the model's representation.
    ///
    /// The value is range-checked first. Categorical kinds fail with
    /// [`CatalogError::NotConvertible`] for codes the model has no analogue for.
    pub fn to_external_value(&self, value: f64) -> CatalogResult<f64> {
        use ParameterKind::*;

        let value = self.checked(value)?;
        let not_convertible = || CatalogError::NotConvertible { kind: *self, value };

        match self {
            AirTemperature
            | DewPoint
            | RoadSurfaceTemperature
            | SubSurfaceTemperature(_)
            | RainAmount
            | SnowAmount
            | SolarFlux
            | InfraredFlux
            | AnthropogenicFlux
            | Roadcast(_) => Ok(value),
            WindSpeed | WindSpeed10m => Ok(value * MS_TO_KMH),
            AirTemperature150cm | DewPoint150cm => Ok(value - KELVIN_OFFSET),
            AirPressure => Ok(value / 100.0),
            CloudCover => Ok((value * 8.0 / 100.0).round()),
            PrecipitationIntensity => Ok(if value > 0.0 { 1.0 } else { 0.0 }),
            PrecipitationPresence => {
                if value == 0.0 || value == 1.0 {
                    Ok(value)
                } else {
                    Err(not_convertible())
                }
            }
            RoadCondition => road_condition_code(value).ok_or_else(not_convertible),
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sensor road-condition code to the model's surface state code.
///
/// Unknown (0), sensor fault (98), not reported (99) and every code the
/// station network does not define have no model analogue.
fn road_condition_code(code: f64) -> Option<f64> {
    if code.fract() != 0.0 {
        return None;
    }
    match code as u32 {
        1 => Some(33.0),         // dry
        2 | 3 | 4 => Some(34.0), // moist, wet, wet with salt
        5 | 6 => Some(35.0),     // ice, snow
        7 => Some(40.0),         // frost
        _ => None,
    }
}

/// Label → kind registry.
pub struct ParameterCatalog {
    by_label: HashMap<&'static str, ParameterKind>,
}

static CATALOG: Lazy<ParameterCatalog> = Lazy::new(ParameterCatalog::build);

/// The process-wide catalog, built on first use.
pub fn catalog() -> &'static ParameterCatalog {
    &CATALOG
}

impl ParameterCatalog {
    /// Build the registry.
    ///
    /// # Panics
    ///
    /// Panics if two kinds share a label; that is a defect in this module,
    /// caught here rather than as a silent misclassification at lookup time.
    fn build() -> Self {
        let kinds = ParameterKind::all();
        let mut by_label = HashMap::with_capacity(kinds.len());
        for kind in kinds {
            if let Some(previous) = by_label.insert(kind.label(), kind) {
                panic!(
                    "parameter label '{}' is shared by {:?} and {:?}",
                    kind.label(),
                    previous,
                    kind
                );
            }
        }
        tracing::debug!(kinds = by_label.len(), "Built parameter catalog");
        Self { by_label }
    }

    /// Resolve a label. Unknown labels resolve to `None`.
    pub fn lookup_by_label(&self, label: &str) -> Option<ParameterKind> {
        self.by_label.get(label.trim()).copied()
    }

    /// Resolve a label, accepting it only for the given source type.
    pub fn lookup(&self, label: &str, source_type: SourceType) -> Option<ParameterKind> {
        self.lookup_by_label(label)
            .filter(|kind| kind.source_type() == source_type)
    }

    pub fn check_value(&self, kind: ParameterKind, value: f64) -> bool {
        kind.check_value(value)
    }

    pub fn to_external_value(&self, kind: ParameterKind, value: f64) -> CatalogResult<f64> {
        kind.to_external_value(value)
    }

    pub fn len(&self) -> usize {
        self.by_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }
}
