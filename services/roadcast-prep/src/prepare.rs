//! Building model documents for an activated station.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use grid_extract::{extract_batch, ExtractResult, ExtractionRequest, GridExtraction, GriddedDataset};
use metro_protocol::{
    DocumentHeader, ForecastDocument, ForecastDocumentBuilder, RoadcastDocument, StationDocument,
};
use road_common::{format_minute, DocumentTag, ForecastTag};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::config::Station;

pub fn station_document(station: &Station, production: DateTime<Utc>) -> Result<StationDocument> {
    let header = DocumentHeader::new(production).with_station(station.id.as_str());
    let document = StationDocument::new(
        header,
        station.location,
        station.station_type,
        station.road_layers.clone(),
    )
    .with_context(|| format!("Failed to describe station '{}'", station.id))?
    .with_sensor_depth(station.sensor_depth)
    .with_horizon(station.horizon.clone());
    Ok(document)
}

/// The forecast document and how it was sourced.
#[derive(Debug)]
pub struct ForecastInputs {
    pub document: ForecastDocument,
    /// Tags served by a later source because the earlier ones failed.
    pub fallbacks: Vec<ForecastTag>,
    /// Time steps skipped across all chosen series.
    pub failed_steps: usize,
}

/// Extract every forecast tag of the station from the loaded datasets.
///
/// `datasets` is keyed by source id. Each tag takes the first of its
/// configured sources that extracts successfully; sources without a loaded
/// dataset are passed over. Requests against one dataset run in parallel.
pub fn forecast_document<D>(
    station: &Station,
    datasets: &BTreeMap<String, D>,
    production: DateTime<Utc>,
) -> Result<ForecastInputs>
where
    D: GriddedDataset + Sync,
{
    let mut planned: BTreeMap<&str, Vec<(ForecastTag, usize, ExtractionRequest)>> = BTreeMap::new();
    for (tag, sources) in station.forecast.iter() {
        for (position, source) in sources.iter().enumerate() {
            if !datasets.contains_key(source.source_id()) {
                debug!(tag = %tag, source = %source, "No dataset loaded for source");
                continue;
            }
            let variable = station.grid_variable(source.kind().label());
            planned.entry(source.source_id()).or_default().push((
                tag,
                position,
                ExtractionRequest::new(variable, source.kind(), *source.location()),
            ));
        }
    }

    let mut outcomes: BTreeMap<(ForecastTag, usize), ExtractResult<GridExtraction>> = BTreeMap::new();
    for (source_id, batch) in planned {
        let Some(dataset) = datasets.get(source_id) else {
            continue;
        };
        let requests: Vec<ExtractionRequest> = batch.iter().map(|(_, _, r)| r.clone()).collect();
        let results = extract_batch(dataset, &requests);
        for ((tag, position, _), result) in batch.into_iter().zip(results) {
            outcomes.insert((tag, position), result);
        }
    }

    let header = DocumentHeader::new(production).with_station(station.id.as_str());
    let mut builder = ForecastDocumentBuilder::new(header);
    let mut fallbacks = Vec::new();
    let mut failed_steps = 0;
    let mut missing = Vec::new();

    for tag in station.forecast.tags() {
        let mut chosen = None;
        for ((_, position), result) in outcomes.range((tag, 0)..=(tag, usize::MAX)) {
            match result {
                Ok(extraction) => {
                    chosen = Some((*position, extraction));
                    break;
                }
                Err(e) => warn!(tag = %tag, position = *position, error = %e, "Forecast source failed"),
            }
        }

        match chosen {
            Some((position, extraction)) => {
                if position > 0 {
                    fallbacks.push(tag);
                }
                failed_steps += extraction.step_failures.len();
                builder = builder.add_series(tag, &extraction.series);
            }
            None => missing.push(tag.label()),
        }
    }

    if !missing.is_empty() {
        anyhow::bail!("No usable forecast source for: {}", missing.join(", "));
    }

    let document = builder
        .build()
        .context("Failed to build the forecast document")?;

    info!(
        station = %station.id,
        records = document.len(),
        fallbacks = fallbacks.len(),
        failed_steps = failed_steps,
        "Forecast document ready"
    );

    Ok(ForecastInputs {
        document,
        fallbacks,
        failed_steps,
    })
}

/// Compact JSON view of a parsed roadcast.
#[derive(Debug, Clone, Serialize)]
pub struct RoadcastSummary {
    pub station: Option<String>,
    pub production: String,
    pub series: Vec<SeriesSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesSummary {
    pub tag: &'static str,
    pub values: usize,
    pub first: Option<String>,
    pub last: Option<String>,
    pub min: f64,
    pub max: f64,
}

pub fn summarize_roadcast(document: &RoadcastDocument) -> RoadcastSummary {
    let series = document
        .iter()
        .map(|(tag, series)| {
            let (min, max) = series
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, v)| {
                    (lo.min(v), hi.max(v))
                });
            SeriesSummary {
                tag: tag.label(),
                values: series.len(),
                first: series.first().map(|(t, _)| format_minute(t)),
                last: series.last().map(|(t, _)| format_minute(t)),
                min,
                max,
            }
        })
        .collect();

    RoadcastSummary {
        station: document.header().station_id().map(str::to_string),
        production: format_minute(document.header().production()),
        series,
    }
}
