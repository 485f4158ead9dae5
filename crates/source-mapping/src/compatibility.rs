//! Which parameter kinds may feed which model input tag.
//!
//! The table is keyed by (tag, source type, station type). Forecast-table
//! tags only ever accept forecast sources: weather ahead of the run cannot
//! come from past measurements.

use road_common::{
    ForecastTag, ModelInputTag, ObservationTag, ParameterKind, RoadcastTag, SensorDepth,
    SourceType, StationType,
};

/// Parameter kinds acceptable for `tag` from a source of `source_type`.
pub fn allowed_kinds(
    tag: ModelInputTag,
    source_type: SourceType,
    station_type: StationType,
    sensor_depth: SensorDepth,
) -> Vec<ParameterKind> {
    use ParameterKind::*;

    match (tag, source_type) {
        (ModelInputTag::Observation(tag), SourceType::Measurement) => match tag {
            ObservationTag::At => vec![AirTemperature],
            ObservationTag::Td => vec![DewPoint],
            ObservationTag::Pi => vec![PrecipitationPresence, PrecipitationIntensity],
            ObservationTag::Ws => vec![WindSpeed],
            ObservationTag::Sc => vec![RoadCondition],
            ObservationTag::St => vec![RoadSurfaceTemperature],
            ObservationTag::Sst => match station_type {
                StationType::Road => vec![SubSurfaceTemperature(sensor_depth)],
                // a bridge deck has air below it
                StationType::Bridge => vec![SubSurfaceTemperature(sensor_depth), AirTemperature],
            },
        },
        (ModelInputTag::Observation(tag), SourceType::Forecast) => match tag {
            ObservationTag::At => vec![AirTemperature150cm],
            ObservationTag::Td => vec![DewPoint150cm],
            ObservationTag::Ws => vec![WindSpeed10m],
            // chained runs feed the previous cycle's output back in
            ObservationTag::St => vec![Roadcast(RoadcastTag::St)],
            ObservationTag::Sst => vec![Roadcast(RoadcastTag::Sst)],
            ObservationTag::Pi | ObservationTag::Sc => Vec::new(),
        },
        (ModelInputTag::Forecast(_), SourceType::Measurement) => Vec::new(),
        (ModelInputTag::Forecast(tag), SourceType::Forecast) => vec![match tag {
            ForecastTag::At => AirTemperature150cm,
            ForecastTag::Td => DewPoint150cm,
            ForecastTag::Ra => RainAmount,
            ForecastTag::Sn => SnowAmount,
            ForecastTag::Ws => WindSpeed10m,
            ForecastTag::Ap => AirPressure,
            ForecastTag::Cc => CloudCover,
            ForecastTag::Sf => SolarFlux,
            ForecastTag::Ir => InfraredFlux,
            ForecastTag::Fa => AnthropogenicFlux,
        }],
    }
}

/// True iff `kind`, from a source of `source_type`, may feed `tag`.
pub fn is_compatible(
    tag: ModelInputTag,
    source_type: SourceType,
    kind: ParameterKind,
    station_type: StationType,
    sensor_depth: SensorDepth,
) -> bool {
    allowed_kinds(tag, source_type, station_type, sensor_depth).contains(&kind)
}
