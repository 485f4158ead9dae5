//! Validated data sources.

use road_common::{catalog, GeographicLocation, ParameterKind, SourceType};
use serde::Serialize;
use std::fmt;

use crate::config::DataSourceConfig;
use crate::error::SourceError;

/// Where the values for one model input come from.
///
/// The parameter kind always belongs to the declared source type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSource {
    source_type: SourceType,
    location: GeographicLocation,
    #[serde(serialize_with = "serialize_kind")]
    kind: ParameterKind,
    source_id: String,
}

fn serialize_kind<S: serde::Serializer>(kind: &ParameterKind, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(kind.label())
}

impl DataSource {
    /// Build a source, resolving `parameter` within the source type's kinds.
    pub fn new(
        source_type: SourceType,
        location: GeographicLocation,
        parameter: &str,
        source_id: impl Into<String>,
    ) -> Result<Self, SourceError> {
        let source_id = source_id.into();
        if source_id.trim().is_empty() {
            return Err(SourceError::EmptyField("source_id"));
        }
        let kind = catalog()
            .lookup(parameter, source_type)
            .ok_or_else(|| SourceError::UnknownParameter {
                label: parameter.to_string(),
                source_type,
            })?;
        Ok(Self {
            source_type,
            location,
            kind,
            source_id,
        })
    }

    pub fn from_config(config: &DataSourceConfig) -> Result<Self, SourceError> {
        let source_type = match required(&config.source_type, "type")?.to_ascii_lowercase().as_str() {
            "measurement" => SourceType::Measurement,
            "forecast" => SourceType::Forecast,
            other => return Err(SourceError::UnknownSourceType(other.to_string())),
        };
        let raw_location = config
            .location
            .clone()
            .ok_or(SourceError::MissingField("location"))?;
        let location = GeographicLocation::try_from(raw_location)?;
        let parameter = required(&config.parameter, "parameter")?;
        let source_id = required(&config.source_id, "source_id")?;

        Self::new(source_type, location, parameter, source_id)
    }

    pub fn source_type(&self) -> SourceType {
        self.source_type
    }

    pub fn location(&self) -> &GeographicLocation {
        &self.location
    }

    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' of {} at {}",
            self.source_type, self.kind, self.source_id, self.location
        )
    }
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, SourceError> {
    let value = value.as_deref().ok_or(SourceError::MissingField(field))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SourceError::EmptyField(field));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use road_common::LocationConfig;

    fn config(source_type: &str, parameter: &str) -> DataSourceConfig {
        DataSourceConfig {
            source_type: Some(source_type.to_string()),
            location: Some(LocationConfig {
                latitude: 60.2,
                longitude: 24.9,
                elevation: None,
            }),
            parameter: Some(parameter.to_string()),
            source_id: Some("rws-1001".to_string()),
        }
    }

    #[test]
    fn test_from_config() {
        let source = DataSource::from_config(&config("Measurement", "air_temperature")).unwrap();
        assert_eq!(source.kind(), ParameterKind::AirTemperature);
        assert_eq!(source.source_type(), SourceType::Measurement);
        assert_eq!(source.source_id(), "rws-1001");
    }

    #[test]
    fn test_parameter_must_match_source_type() {
        let err = DataSource::from_config(&config("forecast", "air_temperature")).unwrap_err();
        assert_eq!(
            err,
            SourceError::UnknownParameter {
                label: "air_temperature".to_string(),
                source_type: SourceType::Forecast
            }
        );
    }

    #[test]
    fn test_missing_and_empty_fields() {
        let mut raw = config("measurement", "air_temperature");
        raw.source_id = Some("  ".to_string());
        assert_eq!(
            DataSource::from_config(&raw).unwrap_err(),
            SourceError::EmptyField("source_id")
        );

        raw.location = None;
        assert_eq!(
            DataSource::from_config(&raw).unwrap_err(),
            SourceError::MissingField("location")
        );

        assert!(matches!(
            DataSource::from_config(&config("satellite", "air_temperature")),
            Err(SourceError::UnknownSourceType(_))
        ));
    }

    #[test]
    fn test_invalid_location() {
        let mut raw = config("measurement", "air_temperature");
        raw.location = Some(LocationConfig {
            latitude: 88.0,
            longitude: 24.9,
            elevation: None,
        });
        assert!(matches!(
            DataSource::from_config(&raw),
            Err(SourceError::InvalidLocation(_))
        ));
    }
}
