//! Raw mapping configuration as read from station files.
//!
//! Everything is optional and stringly typed here so that a bad entry is
//! reported as a validation failure alongside every other problem, instead
//! of aborting deserialization at the first one.

use road_common::LocationConfig;
use serde::Deserialize;
use std::collections::BTreeMap;

/// One configured data source.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataSourceConfig {
    #[serde(rename = "type", default)]
    pub source_type: Option<String>,
    #[serde(default)]
    pub location: Option<LocationConfig>,
    #[serde(default)]
    pub parameter: Option<String>,
    #[serde(default)]
    pub source_id: Option<String>,
}

/// Tag label → ordered source list. `null` list items are empty entries.
pub type MappingTableConfig = BTreeMap<String, Vec<Option<DataSourceConfig>>>;
