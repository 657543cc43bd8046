// Gemini API client for species identification
// Author: kelexine (https://github.com/kelexine)

use super::{encode_request, SpeciesIdentifier};
use crate::config::{GeminiConfig, LoggingConfig};
use crate::error::{IdentifyError, Result};
use crate::metrics;
use crate::models::gemini::{ErrorResponse, GenerateContentResponse};
use crate::models::SpeciesIdentification;
use crate::utils::logging::sanitize;
use crate::validation::validate_response;
use crate::vision::ImageUpload;
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};
use zeroize::Zeroizing;

/// Substring the API uses when the key is rejected.
const INVALID_KEY_MARKER: &str = "API key not valid";

/// Client for the Gemini `generateContent` endpoint.
///
/// Makes exactly one request per identification. There is no retry: a
/// failure is reported to the caller, who may try again.
pub struct GeminiClient {
    http_client: Client,
    config: GeminiConfig,
    api_key: Option<Zeroizing<String>>,
    sanitize_logs: bool,
}

impl GeminiClient {
    /// Create a client. A missing API key is not an error here; it is
    /// reported when an identification is attempted.
    pub fn new(config: &GeminiConfig, logging: &LoggingConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .use_rustls_tls()
            .build()
            .map_err(|e| IdentifyError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .map(Zeroizing::new);

        Ok(Self {
            http_client,
            config: GeminiConfig {
                api_key: None,
                ..config.clone()
            },
            api_key,
            sanitize_logs: logging.sanitize_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn base_url(&self) -> &str {
        &self.config.api_base_url
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn scrub(&self, text: &str) -> String {
        if self.sanitize_logs {
            sanitize(text)
        } else {
            text.to_string()
        }
    }

    /// Call `generateContent` once and return the model's answer text.
    pub async fn generate_text(&self, image: &ImageUpload) -> Result<String> {
        // Checked before anything touches the network
        let api_key = self.api_key.as_ref().ok_or(IdentifyError::MissingApiKey)?;

        let url = self.endpoint();
        let request = encode_request(image);

        debug!(
            "Calling generateContent for model {} with {} image ({} bytes)",
            self.config.model,
            image.mime_type,
            image.data.len()
        );

        let start = Instant::now();
        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", api_key.as_str())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                metrics::record_gemini_call(&self.config.model, 0, start.elapsed().as_secs_f64());
                self.provider_error(e.to_string())
            })?;

        let status = response.status();
        metrics::record_gemini_call(
            &self.config.model,
            status.as_u16(),
            start.elapsed().as_secs_f64(),
        );

        let response_text = response
            .text()
            .await
            .map_err(|e| self.provider_error(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            let message = Self::extract_error_message(&response_text)
                .unwrap_or_else(|| response_text.clone());
            return Err(self.provider_error(format!("HTTP {}: {}", status, message)));
        }

        debug!(
            "Raw Gemini response (first 500 chars): {}",
            response_text.chars().take(500).collect::<String>()
        );

        let gemini_response: GenerateContentResponse = serde_json::from_str(&response_text)
            .map_err(|e| self.provider_error(format!("Response parsing error: {}", e)))?;

        if let Some(usage) = &gemini_response.usage_metadata {
            debug!(
                "Token usage: prompt={:?} candidates={:?} total={:?}",
                usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
            );
        }

        gemini_response.text().ok_or_else(|| {
            let reason = gemini_response
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.clone())
                .or_else(|| {
                    gemini_response
                        .candidates
                        .first()
                        .and_then(|c| c.finish_reason.clone())
                })
                .unwrap_or_else(|| "no candidates".to_string());
            self.provider_error(format!("Response contained no text ({})", reason))
        })
    }

    /// Classify a provider failure. Only a rejected key gets its own kind.
    fn provider_error(&self, detail: String) -> IdentifyError {
        let detail = self.scrub(&detail);
        error!("Error calling Gemini API: {}", detail);
        if detail.contains(INVALID_KEY_MARKER) {
            IdentifyError::InvalidApiKey
        } else {
            IdentifyError::Provider { detail }
        }
    }

    /// Extract error message from API response JSON
    fn extract_error_message(response_text: &str) -> Option<String> {
        let error = serde_json::from_str::<ErrorResponse>(response_text).ok()?.error?;
        error.message.or(error.status)
    }
}

#[async_trait]
impl SpeciesIdentifier for GeminiClient {
    async fn identify(&self, image: &ImageUpload) -> Result<SpeciesIdentification> {
        let text = self.generate_text(image).await?;
        let identification = validate_response(&text)?;
        info!(
            "Identified {} ({}), confidence {}",
            identification.species_name,
            identification.is_endangered_status,
            identification.confidence
        );
        Ok(identification)
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(
            GeminiClient::extract_error_message(body).as_deref(),
            Some("API key not valid. Please pass a valid API key.")
        );
        assert_eq!(
            GeminiClient::extract_error_message(r#"{"error":{"status":"UNAVAILABLE"}}"#).as_deref(),
            Some("UNAVAILABLE")
        );
        assert!(GeminiClient::extract_error_message("<html>").is_none());
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let config = GeminiConfig {
            api_key: Some("  ".into()),
            ..Default::default()
        };
        let client = GeminiClient::new(&config, &LoggingConfig::default()).unwrap();
        assert!(!client.is_configured());
    }

    #[test]
    fn test_endpoint_format() {
        let config = GeminiConfig {
            api_base_url: "http://localhost:1234/v1beta/".into(),
            model: "gemini-test".into(),
            ..Default::default()
        };
        let client = GeminiClient::new(&config, &LoggingConfig::default()).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:1234/v1beta/models/gemini-test:generateContent"
        );
    }
}
