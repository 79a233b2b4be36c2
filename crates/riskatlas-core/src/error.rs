//! Error types for the RiskAtlas dashboard.
//!
//! Network failures are not modelled here: the REST client reports them through
//! `anyhow` with context. These enums cover what the client itself decides:
//! configuration, form validation and map geometry loading.

use thiserror::Error;

/// Result type alias using RiskAtlasError as the error type.
pub type Result<T> = std::result::Result<T, RiskAtlasError>;

/// Top-level error type for RiskAtlas client operations.
#[derive(Debug, Error)]
pub enum RiskAtlasError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// User input rejected before reaching the API
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Map geometry errors
    #[error("Geometry error: {0}")]
    Geo(#[from] GeoError),

    /// Internal errors that shouldn't normally occur
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors related to configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {reason}")]
    LoadFailed { path: String, reason: String },

    /// Invalid configuration format
    #[error("Invalid configuration format: {reason}")]
    InvalidFormat { reason: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    /// Creates an invalid value error.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Cost simulator form validation.
///
/// The display text is shown verbatim under the form.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid base cost")]
    InvalidBaseCost,

    #[error("Please enter a valid tariff percentage")]
    InvalidTariff,
}

/// Errors loading country outlines.
#[derive(Debug, Error)]
pub enum GeoError {
    #[error("Failed to read {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Invalid GeoJSON: {reason}")]
    Parse { reason: String },
}

impl GeoError {
    pub fn parse(reason: impl Into<String>) -> Self {
        Self::Parse {
            reason: reason.into(),
        }
    }
}
