//! Fixed tag vocabularies of the road-weather model's documents.
//!
//! Input documents use observation and forecast tags; the model answers
//! with roadcast tags. Labels are matched case-insensitively on input and
//! always written in lower case.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named slot of one of the model's document vocabularies.
pub trait DocumentTag: Copy + Ord + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Every member of the vocabulary, in document order.
    const ALL: &'static [Self];

    /// Element name used in the documents.
    fn label(&self) -> &'static str;

    /// Resolve a label; unknown labels are `None`, never a default tag.
    fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|tag| tag.label().eq_ignore_ascii_case(label))
    }
}

macro_rules! tag_vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl DocumentTag for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

tag_vocabulary! {
    /// Tags of the observation input document.
    ObservationTag {
        At => "at",
        Td => "td",
        Pi => "pi",
        Ws => "ws",
        Sc => "sc",
        St => "st",
        Sst => "sst",
    }
}

tag_vocabulary! {
    /// Tags of the weather-forecast input document.
    ForecastTag {
        At => "at",
        Td => "td",
        Ra => "ra",
        Sn => "sn",
        Ws => "ws",
        Ap => "ap",
        Cc => "cc",
        Sf => "sf",
        Ir => "ir",
        Fa => "fa",
    }
}

tag_vocabulary! {
    /// Tags of the roadcast output document.
    RoadcastTag {
        At => "at",
        Td => "td",
        Ws => "ws",
        St => "st",
        Sst => "sst",
        Ra => "ra",
        Sn => "sn",
        Rc => "rc",
        QpRa => "qp-ra",
        QpSn => "qp-sn",
        Sf => "sf",
        Ir => "ir",
        Fv => "fv",
        Fc => "fc",
        Fa => "fa",
        Fg => "fg",
        Bb => "bb",
        Fp => "fp",
    }
}

/// Which input document a mapping table feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    Observation,
    Forecast,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Observation => f.write_str("observation"),
            TableKind::Forecast => f.write_str("forecast"),
        }
    }
}

/// Any input tag, observation or forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModelInputTag {
    Observation(ObservationTag),
    Forecast(ForecastTag),
}

impl ModelInputTag {
    pub fn table(&self) -> TableKind {
        match self {
            ModelInputTag::Observation(_) => TableKind::Observation,
            ModelInputTag::Forecast(_) => TableKind::Forecast,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ModelInputTag::Observation(tag) => tag.label(),
            ModelInputTag::Forecast(tag) => tag.label(),
        }
    }
}

impl From<ObservationTag> for ModelInputTag {
    fn from(tag: ObservationTag) -> Self {
        ModelInputTag::Observation(tag)
    }
}

impl From<ForecastTag> for ModelInputTag {
    fn from(tag: ForecastTag) -> Self {
        ModelInputTag::Forecast(tag)
    }
}

impl fmt::Display for ModelInputTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.table(), self.label())
    }
}

/// Feature flags that switch the conditional forecast tags on and off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FluxFlags {
    #[serde(default)]
    pub solar: bool,
    #[serde(default)]
    pub infrared: bool,
    #[serde(default)]
    pub anthropogenic: bool,
}

impl FluxFlags {
    pub fn new(solar: bool, infrared: bool, anthropogenic: bool) -> Self {
        Self {
            solar,
            infrared,
            anthropogenic,
        }
    }
}

/// Whether a tag must, may or must not appear in a mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagRequirement {
    Required,
    Optional,
    Forbidden,
}

impl ObservationTag {
    /// Every observation tag is mandatory.
    pub fn requirement(&self) -> TagRequirement {
        TagRequirement::Required
    }
}

impl ForecastTag {
    /// Presence rule of this tag under the given flux flags.
    ///
    /// Cloud cover only feeds the model's own radiation estimate, so it
    /// becomes optional once both measured fluxes replace that estimate.
    pub fn requirement(&self, flux: FluxFlags) -> TagRequirement {
        let gated = |flag: bool| {
            if flag {
                TagRequirement::Required
            } else {
                TagRequirement::Forbidden
            }
        };

        match self {
            ForecastTag::At
            | ForecastTag::Td
            | ForecastTag::Ra
            | ForecastTag::Sn
            | ForecastTag::Ws
            | ForecastTag::Ap => TagRequirement::Required,
            ForecastTag::Cc => {
                if flux.solar && flux.infrared {
                    TagRequirement::Optional
                } else {
                    TagRequirement::Required
                }
            }
            ForecastTag::Sf => gated(flux.solar),
            ForecastTag::Ir => gated(flux.infrared),
            ForecastTag::Fa => gated(flux.anthropogenic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_sizes() {
        assert_eq!(ObservationTag::ALL.len(), 7);
        assert_eq!(ForecastTag::ALL.len(), 10);
        assert_eq!(RoadcastTag::ALL.len(), 18);
    }

    #[test]
    fn test_from_label_case_insensitive() {
        assert_eq!(ObservationTag::from_label("SST"), Some(ObservationTag::Sst));
        assert_eq!(RoadcastTag::from_label(" qp-ra "), Some(RoadcastTag::QpRa));
        assert_eq!(ForecastTag::from_label("sc"), None);
        assert_eq!(ObservationTag::from_label(""), None);
    }

    #[test]
    fn test_mandatory_forecast_tags() {
        let mandatory: Vec<_> = ForecastTag::ALL
            .iter()
            .filter(|t| t.requirement(FluxFlags::default()) == TagRequirement::Required)
            .collect();
        // six always-required tags plus cloud cover
        assert_eq!(mandatory.len(), 7);
    }

    #[test]
    fn test_cloud_cover_requirement() {
        let both = FluxFlags::new(true, true, false);
        assert_eq!(ForecastTag::Cc.requirement(both), TagRequirement::Optional);

        let solar_only = FluxFlags::new(true, false, false);
        assert_eq!(ForecastTag::Cc.requirement(solar_only), TagRequirement::Required);
        assert_eq!(ForecastTag::Sf.requirement(solar_only), TagRequirement::Required);
        assert_eq!(ForecastTag::Ir.requirement(solar_only), TagRequirement::Forbidden);
        assert_eq!(ForecastTag::Fa.requirement(solar_only), TagRequirement::Forbidden);
    }

    #[test]
    fn test_model_input_tag_display() {
        let tag = ModelInputTag::from(ForecastTag::Ap);
        assert_eq!(tag.to_string(), "forecast:ap");
        assert_eq!(tag.table(), TableKind::Forecast);
    }
}
