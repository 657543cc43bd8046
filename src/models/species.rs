// Species identification result
// Author: kelexine (https://github.com/kelexine)

use serde::{Deserialize, Serialize};

/// Reserved value meaning "not identified".
pub const UNKNOWN: &str = "Unknown";

/// Reserved value for a scientific name that could not be determined.
pub const NOT_APPLICABLE: &str = "N/A";

/// What the model reports about the most prominent animal in a photo.
///
/// Every field is free text. `species_name` and `is_endangered_status` are
/// guaranteed non-empty once the value has passed through
/// [`crate::validation::validate_response`]; the others may be empty when
/// the model left them out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesIdentification {
    pub species_name: String,
    pub scientific_name: String,
    pub is_endangered_status: String,
    pub confidence: String,
    pub conservation_summary: String,
    pub common_threats: String,
}

impl SpeciesIdentification {
    /// True when the model could not identify an animal.
    pub fn is_unidentified(&self) -> bool {
        self.species_name == UNKNOWN
    }

    pub fn has_known_status(&self) -> bool {
        self.is_endangered_status != UNKNOWN
    }

    pub fn has_scientific_name(&self) -> bool {
        !self.scientific_name.is_empty() && self.scientific_name != NOT_APPLICABLE
    }

    /// The instruction asks the model to call out poaching explicitly.
    pub fn mentions_poaching(&self) -> bool {
        self.common_threats.to_lowercase().contains("poaching")
    }
}

/// Wire shape of the model's reply before the required fields are checked.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawSpeciesIdentification {
    #[serde(default)]
    pub species_name: Option<String>,
    #[serde(default)]
    pub scientific_name: Option<String>,
    #[serde(default)]
    pub is_endangered_status: Option<String>,
    #[serde(default)]
    pub confidence: Option<String>,
    #[serde(default)]
    pub conservation_summary: Option<String>,
    #[serde(default)]
    pub common_threats: Option<String>,
}
