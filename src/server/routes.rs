// HTTP routes configuration
// Author: kelexine (https://github.com/kelexine)

use super::handlers::{
    dismiss_error_handler, health_handler, identify_handler, metrics_handler, session_handler,
    upload_handler,
};
use crate::config::AppConfig;
use crate::session::IdentificationSession;
use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub session: Arc<IdentificationSession>,
}

pub fn create_router(config: AppConfig, session: Arc<IdentificationSession>) -> Router {
    // Bodies up to twice the image ceiling reach the handler, so an
    // oversized image gets the same JSON rejection as any other
    let body_limit = config.upload.max_image_bytes.saturating_mul(2);

    let state = AppState { config, session };

    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/api/session", get(session_handler))
        .route("/api/session/error", delete(dismiss_error_handler))
        .route("/api/image", post(upload_handler))
        .route("/api/identify", post(identify_handler))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}
