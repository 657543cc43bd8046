// Error types for wildlife-id
// Author: kelexine (https://github.com/kelexine)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentifyError {
    #[error("Gemini API Key is not configured. Please set the API_KEY environment variable.")]
    MissingApiKey,

    #[error("Invalid Gemini API Key. Please check your configuration.")]
    InvalidApiKey,

    /// Transport, auth or quota failure from the provider. `detail` is logged, never shown.
    #[error("Failed to get species information from AI. Please try again later.")]
    Provider { detail: String },

    #[error("Failed to parse AI response. Raw text: {excerpt}")]
    MalformedResponse { excerpt: String },

    #[error("Received incomplete data from AI.")]
    IncompleteData,

    #[error("Invalid file type. Please select an image (JPEG, PNG, GIF, WEBP).")]
    UnsupportedImageType(String),

    #[error("File is too large. Please select an image under {}.", format_limit(.max))]
    ImageTooLarge { size: usize, max: usize },

    #[error("Please select an image first.")]
    NoImageSelected,

    #[error("An identification is already in progress.")]
    Busy,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Human form of a byte ceiling, e.g. `5MB` for 5 MiB.
fn format_limit(bytes: &usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * 1024;
    match *bytes {
        b if b >= MB && b % MB == 0 => format!("{}MB", b / MB),
        b if b >= KB && b % KB == 0 => format!("{}KB", b / KB),
        b => format!("{} bytes", b),
    }
}

impl IdentifyError {
    /// Short machine-readable kind, used for error bodies and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            IdentifyError::MissingApiKey | IdentifyError::InvalidApiKey => "authentication_error",
            IdentifyError::Provider { .. } => "api_error",
            IdentifyError::MalformedResponse { .. } => "malformed_response",
            IdentifyError::IncompleteData => "incomplete_data",
            IdentifyError::UnsupportedImageType(_) => "unsupported_media_type",
            IdentifyError::ImageTooLarge { .. } => "payload_too_large",
            IdentifyError::NoImageSelected => "invalid_request_error",
            IdentifyError::Busy => "busy",
            IdentifyError::Config(_) => "configuration_error",
            IdentifyError::Io(_) | IdentifyError::Internal(_) => "internal_error",
        }
    }
}

impl From<config::ConfigError> for IdentifyError {
    fn from(err: config::ConfigError) -> Self {
        IdentifyError::Config(err.to_string())
    }
}

// Convert IdentifyError to HTTP responses for Axum
impl IntoResponse for IdentifyError {
    fn into_response(self) -> Response {
        let status = match self {
            IdentifyError::MissingApiKey | IdentifyError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            IdentifyError::Provider { .. }
            | IdentifyError::MalformedResponse { .. }
            | IdentifyError::IncompleteData => StatusCode::BAD_GATEWAY,
            IdentifyError::UnsupportedImageType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            IdentifyError::ImageTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            IdentifyError::NoImageSelected => StatusCode::BAD_REQUEST,
            IdentifyError::Busy => StatusCode::CONFLICT,
            IdentifyError::Config(_) | IdentifyError::Io(_) | IdentifyError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = json!({
            "type": "error",
            "error": {
                "type": self.kind(),
                "message": self.to_string(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, IdentifyError>;
