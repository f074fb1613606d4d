//! Runtime settings resolved from CLI flags, environment and an optional YAML file.
//!
//! Precedence is flag/env first, then the YAML file, then built-in defaults.
//! The API key is only ever taken from the flag or the `API_KEY` environment
//! variable; it is never read from the file.

use crate::cli::Cli;
use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use tracing::{info, instrument};
use url::Url;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Optional settings file, e.g.
///
/// ```yaml
/// model: gemini-2.5-flash
/// bind: 0.0.0.0:8080
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub bind: Option<String>,
}

impl FileConfig {
    #[instrument(level = "info")]
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_string(),
            source,
        })?;
        let config = serde_yaml::from_str(&text).map_err(|source| ConfigError::InvalidFile {
            path: path.to_string(),
            source,
        })?;
        info!("Loaded configuration file");
        Ok(config)
    }
}

/// Fully resolved settings.
#[derive(Clone)]
pub struct Settings {
    pub api_key: String,
    pub model: String,
    pub base_url: Url,
    pub bind: String,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url.as_str())
            .field("bind", &self.bind)
            .finish()
    }
}

impl Settings {
    /// Resolve settings from parsed CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApiKey`] when no non-blank key was given,
    /// and file or URL errors when the YAML file or base URL is invalid.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let api_key = cli
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?
            .to_string();

        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        let model = cli
            .model
            .clone()
            .or(file.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let bind = cli
            .bind
            .clone()
            .or(file.bind)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let raw_base = cli
            .base_url
            .clone()
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&raw_base).map_err(|source| ConfigError::InvalidBaseUrl {
            url: raw_base.clone(),
            source,
        })?;

        Ok(Self {
            api_key,
            model,
            base_url,
            bind,
        })
    }

    #[cfg(test)]
    pub fn with_api_key(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: Url::parse(DEFAULT_BASE_URL).unwrap(),
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use std::io::Write;

    fn cli(api_key: Option<&str>) -> Cli {
        Cli {
            api_key: api_key.map(str::to_string),
            model: None,
            base_url: None,
            bind: None,
            config: None,
            once: false,
            format: OutputFormat::Html,
        }
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        assert!(matches!(
            Settings::resolve(&cli(None)),
            Err(ConfigError::MissingApiKey)
        ));
        assert!(matches!(
            Settings::resolve(&cli(Some("   "))),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn test_defaults_apply() {
        let settings = Settings::resolve(&cli(Some("k"))).unwrap();
        assert_eq!(settings.api_key, "k");
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert_eq!(settings.bind, DEFAULT_BIND);
        assert_eq!(settings.base_url.as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_file_values_yield_to_flags() {
        let mut file = std::env::temp_dir();
        file.push(format!("subcul_news_test_{}.yaml", std::process::id()));
        let mut handle = fs::File::create(&file).unwrap();
        writeln!(handle, "model: gemini-file\nbind: 0.0.0.0:9000").unwrap();

        let mut args = cli(Some("k"));
        args.config = Some(file.to_string_lossy().into_owned());
        args.model = Some("gemini-flag".to_string());
        let settings = Settings::resolve(&args).unwrap();
        let _ = fs::remove_file(&file);

        assert_eq!(settings.model, "gemini-flag");
        assert_eq!(settings.bind, "0.0.0.0:9000");
    }

    #[test]
    fn test_unreadable_config_file_is_error() {
        let mut args = cli(Some("k"));
        args.config = Some("/nonexistent/subcul_news.yaml".to_string());
        assert!(matches!(
            Settings::resolve(&args),
            Err(ConfigError::ReadFile { .. })
        ));
    }

    #[test]
    fn test_invalid_base_url_is_error() {
        let mut args = cli(Some("k"));
        args.base_url = Some("not a url".to_string());
        assert!(matches!(
            Settings::resolve(&args),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let settings = Settings::with_api_key("super-secret");
        assert!(!format!("{settings:?}").contains("super-secret"));
    }
}
