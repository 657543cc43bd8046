// Configuration module
// Author: kelexine (https://github.com/kelexine)

mod models;

pub use models::*;

use crate::error::{IdentifyError, Result};
use config::{Config, Environment, File};
use std::path::{Path, PathBuf};

/// Environment variables consulted, in order, when no key is configured.
pub const API_KEY_ENV_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest, prefix `WILDLIFE_ID__`)
    /// 2. Config file (`--config` or `~/.wildlife-id/config.toml`)
    /// 3. Defaults (lowest)
    ///
    /// The API key is then resolved from `API_KEY` / `GEMINI_API_KEY` if
    /// none of the above supplied one.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            // An explicit path must exist
            Some(path) => File::from(path.to_path_buf()).required(true),
            None => File::from(Self::default_config_path()).required(false),
        };

        let config = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(file)
            .add_source(
                Environment::with_prefix("WILDLIFE_ID")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .map_err(|e| IdentifyError::Config(e.to_string()))?;

        let mut app_config: AppConfig = config
            .try_deserialize()
            .map_err(|e| IdentifyError::Config(e.to_string()))?;

        app_config.gemini.api_key =
            resolve_api_key(app_config.gemini.api_key.take(), |name| std::env::var(name).ok());

        Ok(app_config)
    }

    fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".wildlife-id")
            .join("config.toml")
    }
}

/// Pick the first non-blank key: the configured one, then each of
/// [`API_KEY_ENV_VARS`] as returned by `lookup`.
pub fn resolve_api_key<F>(configured: Option<String>, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    configured
        .into_iter()
        .chain(API_KEY_ENV_VARS.iter().filter_map(|name| lookup(name)))
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_configured_key_wins() {
        let key = resolve_api_key(Some("from-config".into()), |_| Some("from-env".into()));
        assert_eq!(key.as_deref(), Some("from-config"));
    }

    #[test]
    fn test_env_fallback_order() {
        let key = resolve_api_key(None, |name| match name {
            "API_KEY" => None,
            "GEMINI_API_KEY" => Some("gemini".into()),
            _ => None,
        });
        assert_eq!(key.as_deref(), Some("gemini"));

        let key = resolve_api_key(None, |name| Some(format!("{}-value", name)));
        assert_eq!(key.as_deref(), Some("API_KEY-value"));
    }

    #[test]
    fn test_blank_keys_are_ignored() {
        let key = resolve_api_key(Some("   ".into()), |_| Some(String::new()));
        assert!(key.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 9191\n\n[gemini]\nmodel = \"gemini-test\"\napi_key = \"file-key\"\n\n[upload]\nmax_image_bytes = 1024"
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 9191);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.gemini.model, "gemini-test");
        assert_eq!(config.gemini.api_key.as_deref(), Some("file-key"));
        assert_eq!(config.upload.max_image_bytes, 1024);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/wildlife-id.toml")));
        assert!(matches!(result, Err(IdentifyError::Config(_))));
    }
}
