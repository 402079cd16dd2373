//! Configuration file parser for `~/.config/retro-news/config.toml`.
//!
//! The file is optional: a missing or empty file yields `Config::default()`.
//! The API key may come from the file or from `NEWSDATA_API_KEY`; the
//! environment variable wins.

use std::path::Path;
use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::source::Category;

/// Environment variable holding the provider credential.
pub const API_KEY_ENV: &str = "NEWSDATA_API_KEY";

pub const DEFAULT_ENDPOINT: &str = "https://newsdata.io/api/1/news";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0} bytes (max {max} bytes)", max = Config::MAX_FILE_SIZE)]
    TooLarge(u64),

    #[error("Invalid endpoint URL '{0}': {1}")]
    Endpoint(String, url::ParseError),

    #[error("No API key: set NEWSDATA_API_KEY or `api_key` in the config file")]
    MissingApiKey,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Provider credential (alternative to the env var).
    pub api_key: Option<String>,

    /// News endpoint, without query string.
    pub endpoint: String,

    /// Section shown at startup.  Unknown names mean "All".
    pub default_category: String,

    /// Upper bound for one feed request.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            default_category: "all".to_string(),
            request_timeout_secs: 15,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("endpoint", &self.endpoint)
            .field("default_category", &self.default_category)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(meta.len()));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), ?config, "Loaded config");
        Ok(config)
    }

    /// The API key, preferring `env_value` (the contents of
    /// [`API_KEY_ENV`]) over the file.  Blank values count as absent.
    pub fn resolve_api_key(&self, env_value: Option<String>) -> Result<SecretString, ConfigError> {
        env_value
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
            .map(SecretString::from)
            .ok_or(ConfigError::MissingApiKey)
    }

    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.endpoint).map_err(|e| ConfigError::Endpoint(self.endpoint.clone(), e))
    }

    pub fn category(&self) -> Category {
        Category::from_name_or_all(&self.default_category)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.category(), Category::All);
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn empty_file_yields_defaults() {
        let file = write_config("   \n");
        let config = Config::load(file.path()).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn parses_partial_file() {
        let file = write_config("default_category = \"Science\"\napi_key = \"from-file\"\n");
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.category(), Category::Science);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let file = write_config("default_category = ");
        assert!(matches!(Config::load(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn env_key_takes_precedence() {
        let config = Config {
            api_key: Some("from-file".into()),
            ..Config::default()
        };
        let key = config.resolve_api_key(Some("from-env".into())).unwrap();
        assert_eq!(key.expose_secret(), "from-env");

        let key = config.resolve_api_key(Some("  ".into())).unwrap();
        assert_eq!(key.expose_secret(), "from-file");
    }

    #[test]
    fn missing_key_is_an_error() {
        let config = Config::default();
        assert!(matches!(
            config.resolve_api_key(None),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn debug_output_masks_api_key() {
        let config = Config {
            api_key: Some("super-secret".into()),
            ..Config::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn bad_endpoint_is_reported() {
        let config = Config {
            endpoint: "not a url".into(),
            ..Config::default()
        };
        assert!(matches!(config.endpoint_url(), Err(ConfigError::Endpoint(..))));
    }
}
