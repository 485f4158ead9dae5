//! Element names of the series documents.

use road_common::{DocumentTag, ForecastTag, ObservationTag, RoadcastTag};

/// Layout of a series document keyed by one tag vocabulary.
pub trait SeriesVocabulary: DocumentTag {
    /// Root element, also written as the header's `filetype`.
    const ROOT: &'static str;
    /// Element wrapping the records.
    const LIST: &'static str;
    /// One record per instant.
    const RECORD: &'static str;
    /// Instant element inside a record.
    const TIME: &'static str;
    /// Record fields recognised and skipped on read.
    const IGNORED: &'static [&'static str] = &[];
}

impl SeriesVocabulary for ObservationTag {
    const ROOT: &'static str = "observation";
    const LIST: &'static str = "measure-list";
    const RECORD: &'static str = "measure";
    const TIME: &'static str = "observation-time";
}

impl SeriesVocabulary for ForecastTag {
    const ROOT: &'static str = "forecast";
    const LIST: &'static str = "prediction-list";
    const RECORD: &'static str = "prediction";
    const TIME: &'static str = "forecast-time";
}

impl SeriesVocabulary for RoadcastTag {
    const ROOT: &'static str = "roadcast";
    const LIST: &'static str = "prediction-list";
    const RECORD: &'static str = "prediction";
    const TIME: &'static str = "roadcast-time";
    // forecast hour counter, derivable from the instant
    const IGNORED: &'static [&'static str] = &["hh"];
}
