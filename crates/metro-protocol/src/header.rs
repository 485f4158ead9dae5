//! Document headers.

use chrono::{DateTime, Utc};
use road_common::{format_minute, parse_instant, truncate_to_minute};

use crate::error::{ProtocolError, ProtocolResult};
use crate::xml::{push_element, Element};

/// Format version written into every document.
pub const FORMAT_VERSION: &str = "1.0";

/// Header shared by all documents: format version, production instant and,
/// when known, the road station the document is about.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentHeader {
    version: String,
    production: DateTime<Utc>,
    station_id: Option<String>,
}

impl DocumentHeader {
    pub fn new(production: DateTime<Utc>) -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            production: truncate_to_minute(production),
            station_id: None,
        }
    }

    pub fn with_station(mut self, station_id: impl Into<String>) -> Self {
        self.station_id = Some(station_id.into());
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn production(&self) -> DateTime<Utc> {
        self.production
    }

    pub fn station_id(&self) -> Option<&str> {
        self.station_id.as_deref()
    }

    /// Write the common header fields; the caller owns the `<header>` element.
    pub(crate) fn write_fields(&self, xml: &mut String, depth: usize, filetype: &str) {
        push_element(xml, depth, "filetype", filetype);
        push_element(xml, depth, "version", &self.version);
        push_element(xml, depth, "production-date", &format_minute(self.production));
        if let Some(ref station) = self.station_id {
            push_element(xml, depth, "road-station", station);
        }
    }

    pub(crate) fn from_element(header: &Element, filetype: &str) -> ProtocolResult<Self> {
        if let Some(found) = header.child("filetype") {
            if !found.text().eq_ignore_ascii_case(filetype) {
                return Err(ProtocolError::MalformedDocument(format!(
                    "expected filetype '{}', found '{}'",
                    filetype,
                    found.text()
                )));
            }
        }

        let version = header.required_child("version")?.text().to_string();
        let production_text = header.required_child("production-date")?.text();
        let production = parse_instant(production_text).ok_or_else(|| {
            ProtocolError::MalformedDocument(format!(
                "unparsable production date '{}'",
                production_text
            ))
        })?;
        let station_id = header
            .child("road-station")
            .map(|s| s.text().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            version,
            production: truncate_to_minute(production),
            station_id,
        })
    }
}
