//! Configuration management for the RiskAtlas dashboard.
//!
//! Configuration is YAML. Every section has defaults so an empty file (or no
//! file at all) yields a working setup pointed at `http://localhost:8000`.
//! Environment variables prefixed with `RISKATLAS_` override file values, with
//! `__` between nested keys, e.g. `RISKATLAS_API__BASE_URL=http://risk.internal:8000`.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::Level;

/// Environment variable prefix used by [`AppConfig::load`].
pub const ENV_PREFIX: &str = "RISKATLAS";

/// Main application configuration.
///
/// # Examples
///
/// ```
/// use riskatlas_core::config::AppConfig;
///
/// let config = AppConfig::from_yaml("api:\n  base_url: http://10.0.0.5:8000\n").unwrap();
/// assert_eq!(config.api.base_url, "http://10.0.0.5:8000");
/// assert_eq!(config.map.max_scale, 8.0);
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Polling intervals
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// World map interaction settings
    #[serde(default)]
    pub map: MapConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Initial window geometry
    #[serde(default)]
    pub window: WindowConfig,
}

impl AppConfig {
    /// Loads configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_yaml(&contents)
    }

    /// Loads configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes as unit, not as an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(yaml).map_err(|e| {
            ConfigError::InvalidFormat {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Loads configuration by layering defaults, an optional YAML file and
    /// `RISKATLAS_*` environment variables, in that order.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = config::Config::try_from(&AppConfig::default()).map_err(|e| {
            ConfigError::InvalidFormat {
                reason: e.to_string(),
            }
        })?;

        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Yaml)
                    .required(true),
            );
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigError::LoadFailed {
                path: path
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<environment>".to_string()),
                reason: e.to_string(),
            })?;

        config.try_deserialize().map_err(|e| {
            ConfigError::InvalidFormat {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        self.api.validate()?;
        self.refresh.validate()?;
        self.map.validate()?;
        self.logging.parse_level()?;
        Ok(())
    }
}

/// Backend API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the RiskAtlas REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::invalid_value(
                "api.base_url",
                format!("expected an http(s) URL, got '{}'", self.base_url),
            )
            .into());
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid_value("api.timeout_secs", "must be non-zero").into());
        }

        Ok(())
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Polling intervals for panels that refresh on their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Dashboard metrics poll interval in seconds
    #[serde(default = "default_metrics_interval")]
    pub metrics_interval_secs: u64,

    /// Backend health poll interval in seconds
    #[serde(default = "default_health_interval")]
    pub health_interval_secs: u64,
}

fn default_metrics_interval() -> u64 {
    30
}

fn default_health_interval() -> u64 {
    60
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            metrics_interval_secs: default_metrics_interval(),
            health_interval_secs: default_health_interval(),
        }
    }
}

impl RefreshConfig {
    pub fn validate(&self) -> Result<()> {
        if self.metrics_interval_secs == 0 {
            return Err(ConfigError::invalid_value(
                "refresh.metrics_interval_secs",
                "must be non-zero",
            )
            .into());
        }
        if self.health_interval_secs == 0 {
            return Err(ConfigError::invalid_value(
                "refresh.health_interval_secs",
                "must be non-zero",
            )
            .into());
        }
        Ok(())
    }

    pub fn metrics_interval(&self) -> Duration {
        Duration::from_secs(self.metrics_interval_secs)
    }

    pub fn health_interval(&self) -> Duration {
        Duration::from_secs(self.health_interval_secs)
    }
}

/// World map interaction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Smallest allowed zoom scale
    #[serde(default = "default_min_scale")]
    pub min_scale: f32,

    /// Largest allowed zoom scale
    #[serde(default = "default_max_scale")]
    pub max_scale: f32,

    /// Pointer travel (in points) before a press becomes a drag
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold_px: f32,

    /// Exponential zoom rate per wheel point
    #[serde(default = "default_zoom_sensitivity")]
    pub zoom_sensitivity: f32,

    /// Mercator scale in points at zoom 1
    #[serde(default = "default_projection_scale")]
    pub projection_scale: f64,

    /// Projection center as `[lng, lat]`
    #[serde(default = "default_projection_center")]
    pub projection_center: [f64; 2],

    /// Optional GeoJSON FeatureCollection with country outlines
    #[serde(default)]
    pub geojson_path: Option<PathBuf>,
}

fn default_min_scale() -> f32 {
    0.5
}

fn default_max_scale() -> f32 {
    8.0
}

fn default_drag_threshold() -> f32 {
    4.0
}

fn default_zoom_sensitivity() -> f32 {
    0.0015
}

fn default_projection_scale() -> f64 {
    140.0
}

fn default_projection_center() -> [f64; 2] {
    [0.0, 25.0]
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            min_scale: default_min_scale(),
            max_scale: default_max_scale(),
            drag_threshold_px: default_drag_threshold(),
            zoom_sensitivity: default_zoom_sensitivity(),
            projection_scale: default_projection_scale(),
            projection_center: default_projection_center(),
            geojson_path: None,
        }
    }
}

impl MapConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.min_scale > 0.0) {
            return Err(ConfigError::invalid_value("map.min_scale", "must be positive").into());
        }
        if self.min_scale >= self.max_scale {
            return Err(ConfigError::invalid_value(
                "map.max_scale",
                format!(
                    "must be greater than min_scale ({} >= {})",
                    self.min_scale, self.max_scale
                ),
            )
            .into());
        }
        if self.drag_threshold_px < 0.0 {
            return Err(
                ConfigError::invalid_value("map.drag_threshold_px", "must not be negative").into(),
            );
        }
        if !(self.zoom_sensitivity > 0.0) {
            return Err(
                ConfigError::invalid_value("map.zoom_sensitivity", "must be positive").into(),
            );
        }
        if !(self.projection_scale > 0.0) {
            return Err(
                ConfigError::invalid_value("map.projection_scale", "must be positive").into(),
            );
        }
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Text,
        }
    }
}

impl LoggingConfig {
    /// Parses the log level string to a tracing Level.
    pub fn parse_level(&self) -> Result<Level> {
        self.level.parse().map_err(|_| {
            ConfigError::invalid_value("logging.level", format!("Invalid log level: {}", self.level))
                .into()
        })
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
}

/// Initial window geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: f32,

    #[serde(default = "default_height")]
    pub height: f32,
}

fn default_width() -> f32 {
    1600.0
}

fn default_height() -> f32 {
    1000.0
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}
