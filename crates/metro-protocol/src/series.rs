//! Observation and weather-forecast series documents.

use chrono::{DateTime, Utc};
use road_common::{
    format_minute, parse_instant, truncate_to_minute, ForecastTag, ObservationTag, ParameterKind,
    TimeSeries,
};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::error::{ProtocolError, ProtocolResult};
use crate::header::DocumentHeader;
use crate::vocabulary::SeriesVocabulary;
use crate::xml::{self, parse_tree, push_element, XML_DECLARATION};

/// Collects values per (instant, tag) before conversion to model units.
///
/// Instants are truncated to the minute; a second insert for the same
/// instant and tag replaces the first.
#[derive(Debug, Clone)]
pub struct SeriesDocumentBuilder<T: SeriesVocabulary> {
    header: DocumentHeader,
    records: BTreeMap<DateTime<Utc>, BTreeMap<T, (ParameterKind, f64)>>,
}

pub type ObservationDocumentBuilder = SeriesDocumentBuilder<ObservationTag>;
pub type ForecastDocumentBuilder = SeriesDocumentBuilder<ForecastTag>;

impl<T: SeriesVocabulary> SeriesDocumentBuilder<T> {
    pub fn new(header: DocumentHeader) -> Self {
        Self {
            header,
            records: BTreeMap::new(),
        }
    }

    /// Add one raw value of `kind`, in the kind's native units.
    pub fn insert(mut self, tag: T, kind: ParameterKind, instant: DateTime<Utc>, value: f64) -> Self {
        self.push(tag, kind, instant, value);
        self
    }

    pub fn push(&mut self, tag: T, kind: ParameterKind, instant: DateTime<Utc>, value: f64) {
        let previous = self
            .records
            .entry(truncate_to_minute(instant))
            .or_default()
            .insert(tag, (kind, value));
        if previous.is_some() {
            debug!(tag = %tag, instant = %instant, "Replacing earlier value");
        }
    }

    /// Add every point of a series under `tag`.
    pub fn add_series(mut self, tag: T, series: &TimeSeries) -> Self {
        for (instant, value) in series.iter() {
            self.push(tag, series.kind(), instant, value);
        }
        self
    }

    /// Convert every value to the model's units and freeze the document.
    pub fn build(self) -> ProtocolResult<SeriesDocument<T>> {
        if self.records.is_empty() {
            return Err(ProtocolError::EmptyDocument);
        }

        let mut records = BTreeMap::new();
        for (instant, fields) in self.records {
            let mut converted = BTreeMap::new();
            for (tag, (kind, value)) in fields {
                let external = kind.to_external_value(value).map_err(|source| {
                    ProtocolError::InvalidValue {
                        tag: tag.label(),
                        instant,
                        source,
                    }
                })?;
                converted.insert(tag, external);
            }
            records.insert(instant, converted);
        }

        Ok(SeriesDocument {
            header: self.header,
            records,
        })
    }
}

/// A series document: one record per instant, values in model units.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesDocument<T: SeriesVocabulary> {
    header: DocumentHeader,
    records: BTreeMap<DateTime<Utc>, BTreeMap<T, f64>>,
}

pub type ObservationDocument = SeriesDocument<ObservationTag>;
pub type ForecastDocument = SeriesDocument<ForecastTag>;

impl<T: SeriesVocabulary> SeriesDocument<T> {
    pub fn header(&self) -> &DocumentHeader {
        &self.header
    }

    /// Records in ascending instant order.
    pub fn records(&self) -> impl Iterator<Item = (DateTime<Utc>, &BTreeMap<T, f64>)> + '_ {
        self.records.iter().map(|(t, fields)| (*t, fields))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn value(&self, instant: &DateTime<Utc>, tag: T) -> Option<f64> {
        self.records.get(instant).and_then(|f| f.get(&tag)).copied()
    }

    /// Every (instant, value) carried by one tag, ascending.
    pub fn values(&self, tag: T) -> Vec<(DateTime<Utc>, f64)> {
        self.records
            .iter()
            .filter_map(|(t, fields)| fields.get(&tag).map(|v| (*t, *v)))
            .collect()
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::from(XML_DECLARATION);
        xml::open(&mut out, 0, T::ROOT);

        xml::open(&mut out, 1, "header");
        self.header.write_fields(&mut out, 2, T::ROOT);
        xml::close(&mut out, 1, "header");

        xml::open(&mut out, 1, T::LIST);
        for (instant, fields) in &self.records {
            xml::open(&mut out, 2, T::RECORD);
            push_element(&mut out, 3, T::TIME, &format_minute(*instant));
            for (tag, value) in fields {
                push_element(&mut out, 3, tag.label(), &xml::format_value(*value));
            }
            xml::close(&mut out, 2, T::RECORD);
        }
        xml::close(&mut out, 1, T::LIST);

        xml::close(&mut out, 0, T::ROOT);
        out
    }
}

/// Parse a series document of vocabulary `T`.
///
/// Records are re-sorted by instant. When two records share an instant the
/// later one in the document wins. A tag repeated inside one record, an
/// unknown tag or an unreadable instant or value rejects the document.
pub fn parse_series_document<T: SeriesVocabulary>(xml: &str) -> ProtocolResult<SeriesDocument<T>> {
    let root = parse_tree(xml)?;
    if root.name != T::ROOT {
        return Err(ProtocolError::MalformedDocument(format!(
            "expected <{}> document, found <{}>",
            T::ROOT,
            root.name
        )));
    }

    let header = DocumentHeader::from_element(root.required_child("header")?, T::ROOT)?;
    let list = root.required_child(T::LIST)?;

    let mut records = BTreeMap::new();
    for record in &list.children {
        if record.name != T::RECORD {
            return Err(ProtocolError::MalformedDocument(format!(
                "unexpected <{}> in <{}>",
                record.name,
                T::LIST
            )));
        }

        let time_text = record.required_child(T::TIME)?.text();
        let instant = parse_instant(time_text).map(truncate_to_minute).ok_or_else(|| {
            ProtocolError::MalformedDocument(format!("unparsable instant '{}'", time_text))
        })?;

        let mut fields = BTreeMap::new();
        for field in &record.children {
            if field.name == T::TIME || T::IGNORED.contains(&field.name.as_str()) {
                continue;
            }
            let tag = T::from_label(&field.name).ok_or_else(|| {
                ProtocolError::MalformedDocument(format!("unknown tag <{}>", field.name))
            })?;
            let value = field
                .text()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    ProtocolError::MalformedDocument(format!(
                        "unreadable value '{}' for <{}> at {}",
                        field.text(),
                        field.name,
                        format_minute(instant)
                    ))
                })?;
            if fields.insert(tag, value).is_some() {
                return Err(ProtocolError::MalformedDocument(format!(
                    "<{}> repeated in the record at {}",
                    tag,
                    format_minute(instant)
                )));
            }
        }

        if records.insert(instant, fields).is_some() {
            warn!(instant = %instant, document = T::ROOT, "Duplicate record instant, keeping the later record");
        }
    }

    if records.is_empty() {
        return Err(ProtocolError::EmptyDocument);
    }

    Ok(SeriesDocument { header, records })
}
