//! Protocol document errors.

use chrono::{DateTime, Utc};
use road_common::{CatalogError, SeriesError};
use thiserror::Error;

pub type ProtocolResult<T> = Result<T, ProtocolError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProtocolError {
    /// A value the builder cannot hand to the model.
    #[error("'{tag}' at {instant}: {source}")]
    InvalidValue {
        tag: &'static str,
        instant: DateTime<Utc>,
        source: CatalogError,
    },

    #[error("document has no records")]
    EmptyDocument,

    #[error("invalid station description: {0}")]
    InvalidStation(String),

    #[error("malformed document: {0}")]
    MalformedDocument(String),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("roadcast series: {0}")]
    Series(#[from] SeriesError),
}

impl From<quick_xml::Error> for ProtocolError {
    fn from(err: quick_xml::Error) -> Self {
        ProtocolError::Xml(err.to_string())
    }
}
