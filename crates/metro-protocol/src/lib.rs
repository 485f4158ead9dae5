//! Document exchange with the road-weather model.
//!
//! Builds the three input documents the model reads (station description,
//! observation series, weather-forecast series) and parses the roadcast
//! document it writes. All instants are UTC truncated to whole minutes.
//!
//! Builders keep one record per instant (a later insert replaces an earlier
//! one) and convert every value into the model's units, rejecting values the
//! parameter catalog does not accept. Parsers do not trust the producer's
//! ordering: records are re-sorted and de-duplicated on read.

pub mod error;
pub mod header;
pub mod roadcast;
pub mod series;
pub mod station;
pub mod vocabulary;
mod xml;

pub use error::{ProtocolError, ProtocolResult};
pub use header::DocumentHeader;
pub use roadcast::{parse_roadcast, RoadcastDocument};
pub use series::{
    parse_series_document, ForecastDocument, ForecastDocumentBuilder, ObservationDocument,
    ObservationDocumentBuilder, SeriesDocument, SeriesDocumentBuilder,
};
pub use station::StationDocument;
pub use vocabulary::SeriesVocabulary;
