//! # RiskAtlas Core
//!
//! Types, local analysis helpers, configuration and errors for the RiskAtlas
//! trade-risk dashboard.
//!
//! - **Types**: the JSON shapes served by the RiskAtlas REST API (`Country`,
//!   `CountryDetail`, `PolicyAlert`, `CostSimulationResponse`, ...).
//! - **Analysis**: banding and formatting of already-computed scores. All risk
//!   scoring happens server-side.
//! - **Country codes**: ISO alpha-2 / alpha-3 mapping used to join API
//!   countries with map outlines.
//! - **Configuration**: YAML configuration with `RISKATLAS_*` environment
//!   overrides.
//!
//! ## Example
//!
//! ```
//! use riskatlas_core::analysis::{RiskBand, FriendShoreRating};
//! use riskatlas_core::types::Country;
//!
//! let country: Country = serde_json::from_str(r#"{
//!     "id": "MX", "name": "Mexico", "risk_score": 48, "risk_level": "Medium",
//!     "tariff_percentage": 5.0, "coordinates": {"lat": 23.6, "lng": -102.5},
//!     "friend_shore_score": 82
//! }"#).unwrap();
//!
//! assert_eq!(RiskBand::from_score(country.risk_score), RiskBand::Elevated);
//! assert_eq!(
//!     FriendShoreRating::from_score(country.friend_shore_score.unwrap()),
//!     FriendShoreRating::Excellent
//! );
//! ```

pub mod analysis;
pub mod config;
pub mod country_codes;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{ConfigError, GeoError, Result, RiskAtlasError, ValidationError};
pub use types::{Country, CountryDetail, Trend};
