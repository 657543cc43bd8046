// Image encoding for the inference request
// Author: kelexine (https://github.com/kelexine)

use super::models::ImageUpload;
use crate::models::gemini::InlineData;
use base64::Engine;

/// Encode an upload as Gemini InlineData.
///
/// Gemini expects bare base64 (no prefix like "data:image/png;base64,").
pub fn to_inline_data(image: &ImageUpload) -> InlineData {
    InlineData {
        mime_type: image.mime_type.clone(),
        data: base64::engine::general_purpose::STANDARD.encode(&image.data),
    }
}
