//! Validation of the model's text reply.
//!
//! The model is asked for bare JSON, but it sometimes still wraps the object
//! in a markdown code fence. [`validate_response`] strips such a fence,
//! parses the JSON and checks the two fields every result must carry.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::error::{IdentifyError, Result};
use crate::models::species::{RawSpeciesIdentification, SpeciesIdentification};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::{debug, error};

/// Characters of raw text kept in a parse error.
pub const MAX_EXCERPT_CHARS: usize = 1000;

/// Lazily initialized regex for a fenced reply
static FENCE_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_fence_regex() -> &'static Regex {
    FENCE_REGEX.get_or_init(|| {
        Regex::new(r"(?s)^```(?:json)?\s*\n?(.*?)\n?\s*```$").expect("Invalid regex pattern")
    })
}

/// Trim the text and remove a surrounding markdown fence, if any.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match get_fence_regex().captures(trimmed).and_then(|caps| caps.get(1)) {
        Some(inner) if !inner.as_str().is_empty() => inner.as_str().trim(),
        _ => trimmed,
    }
}

/// First `max_chars` characters of `text`, never splitting a code point.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Turn raw response text into a validated identification.
pub fn validate_response(text: &str) -> Result<SpeciesIdentification> {
    let json = strip_code_fence(text);

    let malformed = |e: serde_json::Error| {
        error!("Failed to parse JSON response from Gemini: {}", e);
        IdentifyError::MalformedResponse {
            excerpt: excerpt(json, MAX_EXCERPT_CHARS).to_string(),
        }
    };

    // Only an object can carry named fields; arrays would bind by position
    let value: Value = serde_json::from_str(json).map_err(malformed)?;
    if !value.is_object() {
        error!("Parsed data is not a JSON object: {}", excerpt(json, 200));
        return Err(IdentifyError::IncompleteData);
    }
    let raw: RawSpeciesIdentification = serde_json::from_value(value).map_err(malformed)?;

    let species_name = required(raw.species_name);
    let is_endangered_status = required(raw.is_endangered_status);
    let (Some(species_name), Some(is_endangered_status)) = (species_name, is_endangered_status)
    else {
        error!("Parsed data is missing required fields: {}", excerpt(json, 200));
        return Err(IdentifyError::IncompleteData);
    };

    debug!("Validated identification: {}", species_name);

    Ok(SpeciesIdentification {
        species_name,
        scientific_name: raw.scientific_name.unwrap_or_default(),
        is_endangered_status,
        confidence: raw.confidence.unwrap_or_default(),
        conservation_summary: raw.conservation_summary.unwrap_or_default(),
        common_threats: raw.common_threats.unwrap_or_default(),
    })
}

fn required(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}
