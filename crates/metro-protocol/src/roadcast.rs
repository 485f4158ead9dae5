//! Roadcast output of the model, turned back into time series.

use road_common::{ParameterKind, RoadcastTag, TimeSeries, TimeSeriesBuilder};
use std::collections::BTreeMap;
use tracing::info;

use crate::error::ProtocolResult;
use crate::header::DocumentHeader;
use crate::series::{parse_series_document, SeriesDocument};

/// A parsed roadcast: one validated series per tag present in the document.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadcastDocument {
    header: DocumentHeader,
    series: BTreeMap<RoadcastTag, TimeSeries>,
}

impl RoadcastDocument {
    pub fn header(&self) -> &DocumentHeader {
        &self.header
    }

    pub fn series(&self, tag: RoadcastTag) -> Option<&TimeSeries> {
        self.series.get(&tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = RoadcastTag> + '_ {
        self.series.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RoadcastTag, &TimeSeries)> + '_ {
        self.series.iter().map(|(tag, s)| (*tag, s))
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn into_series(self) -> BTreeMap<RoadcastTag, TimeSeries> {
        self.series
    }
}

impl TryFrom<SeriesDocument<RoadcastTag>> for RoadcastDocument {
    type Error = crate::error::ProtocolError;

    fn try_from(document: SeriesDocument<RoadcastTag>) -> ProtocolResult<Self> {
        let mut builders: BTreeMap<RoadcastTag, TimeSeriesBuilder> = BTreeMap::new();
        for (instant, fields) in document.records() {
            for (tag, value) in fields {
                builders
                    .entry(*tag)
                    .or_insert_with(|| TimeSeries::builder(ParameterKind::Roadcast(*tag)))
                    .push(instant, *value);
            }
        }

        let series = builders
            .into_iter()
            .map(|(tag, builder)| Ok((tag, builder.build()?)))
            .collect::<ProtocolResult<BTreeMap<_, _>>>()?;

        info!(
            station = document.header().station_id().unwrap_or("-"),
            records = document.len(),
            series = series.len(),
            "Parsed roadcast"
        );

        Ok(Self {
            header: document.header().clone(),
            series,
        })
    }
}

/// Parse a roadcast document into per-tag series.
///
/// The forecast hour counter is skipped. Values outside a tag's range fail
/// the whole document.
pub fn parse_roadcast(xml: &str) -> ProtocolResult<RoadcastDocument> {
    RoadcastDocument::try_from(parse_series_document::<RoadcastTag>(xml)?)
}
