//! Structured logging and secret redaction.
//!
//! This module configures the `tracing` ecosystem for the application,
//! supporting multiple output formats and providing a helper that keeps
//! Google API keys out of logged upstream error text.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::config::LoggingConfig;
use crate::error::{IdentifyError, Result};
use regex::Regex;
use std::sync::OnceLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the global tracing subscriber for the application.
///
/// Supports two output formats:
/// - `json`: Structured JSON logs for production ingestion.
/// - `pretty` (default): Human-readable, colorized output for development.
///
/// Logs go to stderr so `identify` output on stdout stays clean.
/// Log levels are controlled via the `RUST_LOG` environment variable or
/// the provided `LoggingConfig`.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let result = match config.format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
    };

    result.map_err(|e| IdentifyError::Internal(format!("Failed to initialize logging: {}", e)))
}

static API_KEY_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_api_key_regex() -> &'static Regex {
    // Google API keys: "AIza" followed by 35 URL-safe characters
    API_KEY_REGEX.get_or_init(|| {
        Regex::new(r"AIza[0-9A-Za-z_\-]{35}").expect("Invalid regex pattern")
    })
}

/// Replaces every Google API key in `input` with `[REDACTED_API_KEY]`.
pub fn sanitize(input: &str) -> String {
    get_api_key_regex()
        .replace_all(input, "[REDACTED_API_KEY]")
        .into_owned()
}
