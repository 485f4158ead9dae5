//! Error types for data sources and mapping validation.

use road_common::{ModelInputTag, SourceType, TableKind};
use std::fmt;
use thiserror::Error;

use crate::source::DataSource;

/// Failures constructing a single [`DataSource`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("field '{0}' is empty")]
    EmptyField(&'static str),

    #[error("unknown source type '{0}'")]
    UnknownSourceType(String),

    #[error("'{label}' is not a {source_type} parameter")]
    UnknownParameter {
        label: String,
        source_type: SourceType,
    },

    #[error("invalid location: {0}")]
    InvalidLocation(#[from] road_common::LocationError),
}

/// One reason a mapping table cannot be activated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationFailure {
    #[error("{table} mapping lacks required tag '{tag}'")]
    IncompleteMapping { table: TableKind, tag: &'static str },

    #[error("{table} mapping contains '{tag}' but its flux flag is off")]
    UnexpectedTag { table: TableKind, tag: &'static str },

    #[error("{table} mapping contains unknown tag '{label}'")]
    UnknownTag { table: TableKind, label: String },

    #[error("{table} mapping contains tag '{tag}' more than once")]
    DuplicateTag { table: TableKind, tag: &'static str },

    #[error("tag {tag} has no data sources")]
    EmptySourceList { tag: ModelInputTag },

    #[error("tag {tag} has an empty source entry at position {position}")]
    EmptySourceEntry { tag: ModelInputTag, position: usize },

    #[error("tag {tag}, source {position}: {source}")]
    MalformedSource {
        tag: ModelInputTag,
        position: usize,
        source: SourceError,
    },

    #[error("tag {tag} cannot be sourced from {data_source}")]
    IncompatibleMapping {
        tag: ModelInputTag,
        data_source: Box<DataSource>,
    },
}

/// Every failure found while validating one table.
#[derive(Debug, Clone, PartialEq, Error)]
pub struct ValidationFailures(pub Vec<ValidationFailure>);

impl ValidationFailures {
    pub fn failures(&self) -> &[ValidationFailure] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationFailure> {
        self.0.iter()
    }

    /// `Ok` when nothing was collected.
    pub(crate) fn into_result(self) -> Result<(), ValidationFailures> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mapping failure(s)", self.0.len())?;
        for failure in &self.0 {
            write!(f, "\n  - {}", failure)?;
        }
        Ok(())
    }
}

impl IntoIterator for ValidationFailures {
    type Item = ValidationFailure;
    type IntoIter = std::vec::IntoIter<ValidationFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
