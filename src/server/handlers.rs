// HTTP request handlers
// Author: kelexine (https://github.com/kelexine)

use super::routes::AppState;
use crate::error::IdentifyError;
use crate::models::SpeciesIdentification;
use crate::session::SessionSnapshot;
use crate::vision::{ImageUpload, SelectedImage};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, info};

/// Optional header carrying the original file name of an upload.
pub const FILE_NAME_HEADER: &str = "x-file-name";

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub checks: HashMap<String, HealthCheck>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub message: String,
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut checks = HashMap::new();
    let mut overall_status = HealthStatus::Healthy;

    // A missing key does not stop the server, but nothing can be identified
    let api_key_check = if state.session.identifier().is_configured() {
        HealthCheck {
            status: "ok".to_string(),
            message: "Detected (validity is checked on first use)".to_string(),
        }
    } else {
        overall_status = HealthStatus::Degraded;
        HealthCheck {
            status: "warning".to_string(),
            message: "Not Detected (app may not function)".to_string(),
        }
    };
    checks.insert("api_key".to_string(), api_key_check);

    let config_check = HealthCheck {
        status: "ok".to_string(),
        message: format!(
            "Model: {}, API base: {}",
            state.config.gemini.model, state.config.gemini.api_base_url
        ),
    };
    checks.insert("configuration".to_string(), config_check);

    Json(HealthResponse {
        status: overall_status,
        checks,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        crate::metrics::gather_metrics(),
    )
}

pub async fn session_handler(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.session.snapshot())
}

pub async fn dismiss_error_handler(State(state): State<AppState>) -> StatusCode {
    state.session.dismiss_error();
    StatusCode::NO_CONTENT
}

/// Select an image. The body is the raw image and `Content-Type` its MIME type.
pub async fn upload_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SelectedImage>, IdentifyError> {
    let mime_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();
    let file_name = headers
        .get(FILE_NAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let selected = state
        .session
        .select_image(ImageUpload::new(file_name, mime_type, body))?;
    Ok(Json(selected))
}

/// Run the identification to completion, even if the client goes away.
pub async fn identify_handler(
    State(state): State<AppState>,
) -> Result<Json<SpeciesIdentification>, IdentifyError> {
    info!("Received identify request");

    let session = state.session.clone();
    let identification = tokio::spawn(async move { session.identify().await })
        .await
        .map_err(|e| {
            error!("Identification task failed: {}", e);
            IdentifyError::Internal(format!("Identification task failed: {}", e))
        })??;

    Ok(Json(identification))
}
