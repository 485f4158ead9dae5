//! Typed mapping tables.

use road_common::{
    DocumentTag, FluxFlags, ForecastTag, ModelInputTag, ObservationTag, TableKind, TagRequirement,
};
use std::collections::BTreeMap;

use crate::source::DataSource;

/// A tag vocabulary that can key a mapping table.
pub trait MappingTag: DocumentTag {
    const TABLE: TableKind;

    /// Presence rule under the station's flux flags.
    fn requirement(&self, flux: FluxFlags) -> TagRequirement;

    fn input_tag(self) -> ModelInputTag;
}

impl MappingTag for ObservationTag {
    const TABLE: TableKind = TableKind::Observation;

    fn requirement(&self, _flux: FluxFlags) -> TagRequirement {
        ObservationTag::requirement(self)
    }

    fn input_tag(self) -> ModelInputTag {
        ModelInputTag::Observation(self)
    }
}

impl MappingTag for ForecastTag {
    const TABLE: TableKind = TableKind::Forecast;

    fn requirement(&self, flux: FluxFlags) -> TagRequirement {
        ForecastTag::requirement(self, flux)
    }

    fn input_tag(self) -> ModelInputTag {
        ModelInputTag::Forecast(self)
    }
}

/// Tag → ordered list of sources, first source preferred.
///
/// Construction does not validate; run [`validate`](crate::validate)
/// before activating a table.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingTable<T: MappingTag> {
    entries: BTreeMap<T, Vec<DataSource>>,
}

pub type ObservationMapping = MappingTable<ObservationTag>;
pub type ForecastMapping = MappingTable<ForecastTag>;

impl<T: MappingTag> Default for MappingTable<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T: MappingTag> MappingTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy with `sources` mapped to `tag`, replacing any previous list.
    pub fn with_sources(mut self, tag: T, sources: Vec<DataSource>) -> Self {
        self.entries.insert(tag, sources);
        self
    }

    pub fn table(&self) -> TableKind {
        T::TABLE
    }

    pub fn sources(&self, tag: T) -> Option<&[DataSource]> {
        self.entries.get(&tag).map(Vec::as_slice)
    }

    /// Preferred source of a tag.
    pub fn primary(&self, tag: T) -> Option<&DataSource> {
        self.sources(tag).and_then(|s| s.first())
    }

    pub fn contains(&self, tag: T) -> bool {
        self.entries.contains_key(&tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = T> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (T, &[DataSource])> + '_ {
        self.entries.iter().map(|(tag, sources)| (*tag, sources.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: MappingTag> FromIterator<(T, Vec<DataSource>)> for MappingTable<T> {
    fn from_iter<I: IntoIterator<Item = (T, Vec<DataSource>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
