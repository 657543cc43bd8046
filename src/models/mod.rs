//! Data models for wildlife-id.
//!
//! - `gemini`: wire types for the Gemini `generateContent` endpoint.
//! - `species`: the `SpeciesIdentification` entity returned to callers.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod gemini;
pub mod species;

pub use species::SpeciesIdentification;
