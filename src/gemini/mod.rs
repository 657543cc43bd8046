// Gemini API client module
// Author: kelexine (https://github.com/kelexine)

mod client;
pub mod prompt;

pub use client::GeminiClient;

use crate::error::Result;
use crate::models::gemini::{
    Content, GenerateContentRequest, GenerationConfig, Part, SystemInstruction,
};
use crate::models::SpeciesIdentification;
use crate::vision::{to_inline_data, ImageUpload};
use async_trait::async_trait;

/// Something that can turn a photo into an identification.
///
/// [`GeminiClient`] is the production implementation; the session only
/// depends on this trait.
#[async_trait]
pub trait SpeciesIdentifier: Send + Sync {
    async fn identify(&self, image: &ImageUpload) -> Result<SpeciesIdentification>;

    /// Whether a credential is available. Without one every call fails.
    fn is_configured(&self) -> bool;
}

/// Build the `generateContent` body for one identification.
pub fn encode_request(image: &ImageUpload) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user".to_string(),
            parts: vec![
                Part::InlineData {
                    inline_data: to_inline_data(image),
                },
                Part::text(prompt::USER_PROMPT),
            ],
        }],
        system_instruction: Some(SystemInstruction {
            parts: vec![Part::text(prompt::SYSTEM_INSTRUCTION)],
        }),
        generation_config: Some(GenerationConfig {
            response_mime_type: Some(prompt::RESPONSE_MIME_TYPE.to_string()),
        }),
    }
}
