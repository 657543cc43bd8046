// Plain-text rendering of an identification for the terminal
// Author: kelexine (https://github.com/kelexine)

use crate::models::SpeciesIdentification;
use std::fmt::Write;

pub const DISCLAIMER: &str = "Information provided is for educational purposes. \
Always consult with experts for critical conservation decisions.";

/// Render a result card.
///
/// Sentinel values are not printed as if they were data: an unidentified
/// animal gets a "not clearly identified" headline, and an `N/A`
/// scientific name is omitted. The status line of an unidentified animal is
/// shown only when the status is unknown too.
pub fn render_text(id: &SpeciesIdentification) -> String {
    let mut out = String::new();

    if id.is_unidentified() {
        let _ = writeln!(out, "Species Not Clearly Identified");
        if !id.has_known_status() {
            let _ = writeln!(out, "Status: {}", id.is_endangered_status);
        }
    } else {
        let _ = writeln!(out, "{}", id.species_name);
        if id.has_scientific_name() {
            let _ = writeln!(out, "Scientific name: {}", id.scientific_name);
        }
        if id.has_known_status() {
            let _ = writeln!(out, "Conservation status: {}", id.is_endangered_status);
        }
        if !id.confidence.is_empty() {
            let _ = writeln!(out, "Identification confidence: {}", id.confidence);
        }
    }

    if !id.conservation_summary.is_empty() {
        let _ = writeln!(out, "\nConservation summary:\n  {}", id.conservation_summary);
    }
    if !id.common_threats.is_empty() {
        let _ = writeln!(out, "\nCommon threats:\n  {}", id.common_threats);
        if id.mentions_poaching() {
            let _ = writeln!(out, "  ! Poaching is a reported threat to this animal.");
        }
    }

    out
}
