//! Configuration management for limenovel.
//!
//! Handles loading, saving, and validating configuration from
//! platform-specific config directories.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application name used for config directory.
const APP_NAME: &str = "limenovel";

/// Default config filename.
const CONFIG_FILENAME: &str = "config.toml";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote API endpoints.
    pub api: ApiConfig,

    /// HTTP client settings.
    pub http: HttpConfig,

    /// Carousel geometry and timing.
    pub carousel: CarouselConfig,

    /// Page names used when building navigation links.
    pub pages: PagesConfig,

    /// On-page diagnostic log settings.
    pub diagnostics: DiagnosticsConfig,
}

/// Remote API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL for JSON endpoints (`{base_url}/novels`).
    pub base_url: String,

    /// Base URL for static uploads.
    pub static_base_url: String,

    /// Image references starting with this prefix live under `static_base_url`.
    pub upload_prefix: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.limenovel.my.id/api".to_string(),
            static_base_url: "https://api.limenovel.my.id".to_string(),
            upload_prefix: "/uploads/".to_string(),
        }
    }
}

impl ApiConfig {
    /// Catalog endpoint.
    pub fn novels_url(&self) -> String {
        format!("{}/novels", self.base_url.trim_end_matches('/'))
    }

    /// Single-novel endpoint. The id is percent-encoded as a path segment.
    pub fn novel_url(&self, id: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(id.as_bytes()).collect();
        format!("{}/{}", self.novels_url(), encoded.replace('+', "%20"))
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds.
    pub timeout_sec: f64,

    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_sec: 30.0,
            user_agent: format!("{}/{}", APP_NAME, env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Carousel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Auto-advance period in milliseconds.
    pub interval_ms: u64,

    /// Rendered slide width in pixels.
    pub slide_width_px: f64,

    /// Gap between slides in pixels.
    pub slide_gap_px: f64,

    /// Width of the carousel viewport in pixels.
    pub viewport_width_px: f64,

    /// Suspend auto-advance while a drag is in progress.
    pub pause_while_dragging: bool,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            interval_ms: 3000,
            slide_width_px: 300.0,
            slide_gap_px: 20.0,
            viewport_width_px: 1200.0,
            pause_while_dragging: false,
        }
    }
}

impl CarouselConfig {
    /// Auto-advance period.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Page names for navigation links.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PagesConfig {
    /// Landing page (back target of the detail view).
    pub home: String,

    /// Detail page, parametrized by `id`.
    pub detail: String,

    /// Chapter page, parametrized by `id` and `ch`.
    pub chapter: String,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            home: "index.html".to_string(),
            detail: "desk.html".to_string(),
            chapter: "ch.html".to_string(),
        }
    }
}

/// Diagnostic log configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Maximum number of entries kept in the log.
    pub capacity: usize,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self { capacity: 200 }
    }
}

impl Config {
    /// Returns the platform-specific config directory path.
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Returns the full path to the config file.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join(CONFIG_FILENAME))
    }

    /// Loads configuration from a specific path.
    ///
    /// If the config file doesn't exist, creates a default one.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    /// Saves configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_url("api.base_url", &self.api.base_url)?;
        check_url("api.static_base_url", &self.api.static_base_url)?;

        if !self.api.upload_prefix.starts_with('/') {
            return Err(invalid("api.upload_prefix", "must start with '/'"));
        }
        if !self.http.timeout_sec.is_finite() || self.http.timeout_sec <= 0.0 {
            return Err(invalid("http.timeout_sec", "must be a number greater than 0"));
        }
        if Duration::try_from_secs_f64(self.http.timeout_sec).is_err() {
            return Err(invalid("http.timeout_sec", "is too large"));
        }
        if self.carousel.interval_ms == 0 {
            return Err(invalid("carousel.interval_ms", "must be greater than 0"));
        }
        if self.carousel.slide_width_px <= 0.0 {
            return Err(invalid("carousel.slide_width_px", "must be greater than 0"));
        }
        if self.carousel.slide_gap_px < 0.0 {
            return Err(invalid("carousel.slide_gap_px", "must not be negative"));
        }
        if self.diagnostics.capacity == 0 {
            return Err(invalid("diagnostics.capacity", "must be greater than 0"));
        }

        Ok(())
    }
}

fn check_url(key: &str, value: &str) -> Result<(), ConfigError> {
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        Ok(_) => Err(invalid(key, "must be an http(s) URL")),
        Err(e) => Err(invalid(key, &e.to_string())),
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.upload_prefix, "/uploads/");
        assert_eq!(config.carousel.interval(), Duration::from_millis(3000));
        assert_eq!(config.pages.detail, "desk.html");
        assert!(!config.carousel.pause_while_dragging);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_endpoint_urls() {
        let mut api = ApiConfig::default();
        api.base_url = "https://example.com/api/".to_string();
        assert_eq!(api.novels_url(), "https://example.com/api/novels");
        assert_eq!(api.novel_url("abc"), "https://example.com/api/novels/abc");
        assert_eq!(
            api.novel_url("a b/c"),
            "https://example.com/api/novels/a%20b%2Fc"
        );
    }

    #[test]
    fn test_config_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.carousel.interval_ms = 5000;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.carousel.interval_ms, 5000);
        assert_eq!(loaded.api.base_url, config.api.base_url);
    }

    #[test]
    fn test_missing_file_creates_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.diagnostics.capacity, 200);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[carousel]\ninterval_ms = 1500\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.carousel.interval_ms, 1500);
        assert_eq!(config.carousel.slide_gap_px, 20.0);
        assert_eq!(config.pages.chapter, "ch.html");
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api.static_base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.carousel.interval_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("carousel.interval_ms"));

        let mut config = Config::default();
        config.api.upload_prefix = "uploads/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_timeout_must_be_a_usable_duration() {
        for timeout in [f64::NAN, f64::INFINITY, 1e300, -1.0, 0.0] {
            let mut config = Config::default();
            config.http.timeout_sec = timeout;
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("http.timeout_sec"), "{timeout}");
        }
    }

    #[test]
    fn test_nan_timeout_in_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[http]\ntimeout_sec = nan\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.http.timeout_sec.is_nan());
        assert!(config.validate().is_err());
    }
}
