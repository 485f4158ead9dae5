//! Station configuration files.
//!
//! A station is described in one YAML file. `${VAR}` and `${VAR:-default}`
//! references are expanded from the environment before parsing.

use anyhow::{Context, Result};
use road_common::{
    DirectionConfig, FluxFlags, GeographicLocation, HorizonDirection, RoadLayer, SensorDepth,
    StationType, VisibleHorizon,
};
use serde::Deserialize;
use source_mapping::{
    resolve_forecast_table, resolve_observation_table, ForecastMapping, MappingTableConfig,
    ObservationMapping, ResolverContext,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

// ============================================================================
// File layout
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct StationFile {
    pub station_id: String,
    pub location: GeographicLocation,
    #[serde(default)]
    pub station_type: StationType,
    pub sensor_depth_cm: SensorDepth,
    #[serde(default)]
    pub flux: FluxFlags,
    #[serde(default)]
    pub road_layers: Vec<RoadLayer>,
    #[serde(default)]
    pub horizon: Vec<DirectionConfig>,
    /// Parameter label to dataset variable name, where the two differ.
    #[serde(default)]
    pub grid_variables: BTreeMap<String, String>,
    pub observation_mapping: MappingTableConfig,
    pub forecast_mapping: MappingTableConfig,
}

/// A station whose configuration passed every check.
#[derive(Debug, Clone)]
pub struct Station {
    pub id: String,
    pub location: GeographicLocation,
    pub station_type: StationType,
    pub sensor_depth: SensorDepth,
    pub flux: FluxFlags,
    pub road_layers: Vec<RoadLayer>,
    pub horizon: Option<VisibleHorizon>,
    pub observation: ObservationMapping,
    pub forecast: ForecastMapping,
    pub grid_variables: BTreeMap<String, String>,
}

impl Station {
    /// Dataset variable that holds the parameter `label`.
    pub fn grid_variable<'a>(&'a self, label: &'a str) -> &'a str {
        self.grid_variables
            .get(label)
            .map(String::as_str)
            .unwrap_or(label)
    }
}

impl StationFile {
    /// Check everything the model depends on and report all problems at once.
    pub fn activate(self) -> Result<Station> {
        let StationFile {
            station_id,
            location,
            station_type,
            sensor_depth_cm,
            flux,
            road_layers,
            horizon,
            grid_variables,
            observation_mapping,
            forecast_mapping,
        } = self;

        let ctx = ResolverContext::new(station_type, sensor_depth_cm, flux);
        let mut problems = Vec::new();

        if station_id.trim().is_empty() {
            problems.push("station_id is empty".to_string());
        }

        if road_layers.is_empty() {
            problems.push("road_layers is empty".to_string());
        }
        for (position, layer) in road_layers.iter().enumerate() {
            if !layer.is_valid() {
                problems.push(format!(
                    "road layer {} has thickness {} m",
                    position + 1,
                    layer.thickness_m
                ));
            }
        }

        let horizon = horizon
            .into_iter()
            .map(HorizonDirection::try_from)
            .collect::<Result<Vec<_>, _>>()
            .and_then(VisibleHorizon::new)
            .unwrap_or_else(|e| {
                problems.push(format!("visible horizon: {}", e));
                None
            });

        let observation = match resolve_observation_table(&observation_mapping, &ctx) {
            Ok(table) => Some(table),
            Err(failures) => {
                problems.extend(failures.into_iter().map(|f| f.to_string()));
                None
            }
        };
        let forecast = match resolve_forecast_table(&forecast_mapping, &ctx) {
            Ok(table) => Some(table),
            Err(failures) => {
                problems.extend(failures.into_iter().map(|f| f.to_string()));
                None
            }
        };

        match (observation, forecast) {
            (Some(observation), Some(forecast)) if problems.is_empty() => {
                info!(
                    station = %station_id,
                    location = %location,
                    station_type = %station_type,
                    horizon = horizon.is_some(),
                    "Station configuration accepted"
                );
                Ok(Station {
                    id: station_id,
                    location,
                    station_type,
                    sensor_depth: sensor_depth_cm,
                    flux,
                    road_layers,
                    horizon,
                    observation,
                    forecast,
                    grid_variables,
                })
            }
            _ => {
                warn!(station = %station_id, problems = problems.len(), "Station configuration rejected");
                anyhow::bail!(
                    "station '{}' rejected:\n  - {}",
                    station_id,
                    problems.join("\n  - ")
                )
            }
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Read, expand and parse a station file.
pub fn load_station_file<P: AsRef<Path>>(path: P) -> Result<StationFile> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read station config from {:?}", path.as_ref()))?;

    let expanded = expand_env_vars(&content)?;

    serde_yaml::from_str(&expanded)
        .with_context(|| format!("Failed to parse station config from {:?}", path.as_ref()))
}

fn expand_env_vars(content: &str) -> Result<String> {
    let mut expanded = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("${") {
        expanded.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find('}')
            .with_context(|| format!("Unclosed variable substitution near '${{{}'", after.lines().next().unwrap_or("")))?;
        expanded.push_str(&resolve_var_expr(&after[..end])?);
        rest = &after[end + 1..];
    }
    expanded.push_str(rest);

    Ok(expanded)
}

/// `VAR` or `VAR:-default`; an empty variable counts as unset.
fn resolve_var_expr(expr: &str) -> Result<String> {
    match expr.split_once(":-") {
        Some((name, default)) => Ok(std::env::var(name.trim())
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default.to_string())),
        None => std::env::var(expr.trim())
            .with_context(|| format!("Environment variable {} not set", expr.trim())),
    }
}
