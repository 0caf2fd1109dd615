//! Indexing configuration.
//!
//! The defaults reproduce the free functions of this crate: Web Mercator
//! latitude clamping and unbounded covers.

use crate::mercator::MAX_LATITUDE;
use serde::de::Error;
use serde::{Deserialize, Serialize};

/// Latitude band points are clamped to before they are projected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LatitudeBound {
    /// ±85.051129°, the edge of the square Web Mercator world
    #[default]
    WebMercator,
    /// ±89°, keeps high-latitude points apart at the cost of tiles near the
    /// poles covering less than their nominal extent
    Extended,
}

impl LatitudeBound {
    /// Clamping bound in degrees.
    pub fn max_latitude(&self) -> f64 {
        match self {
            LatitudeBound::WebMercator => MAX_LATITUDE,
            LatitudeBound::Extended => 89.0,
        }
    }
}

/// Configuration for an [`Indexer`](crate::Indexer).
///
/// # Example
///
/// ```rust
/// use quadbin::{Config, LatitudeBound};
///
/// let config = Config::default();
/// assert_eq!(config.latitude_bound, LatitudeBound::WebMercator);
///
/// let json = r#"{
///     "latitude_bound": "extended",
///     "max_cover_cells": 10000
/// }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.max_cover_cells, Some(10000));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Latitude clamping convention
    #[serde(default)]
    pub latitude_bound: LatitudeBound,

    /// Largest number of cells a single geometry cover may produce (None means
    /// unbounded)
    #[serde(default)]
    pub max_cover_cells: Option<usize>,
}

impl Config {
    pub fn with_latitude_bound(mut self, bound: LatitudeBound) -> Self {
        self.latitude_bound = bound;
        self
    }

    pub fn with_max_cover_cells(mut self, limit: usize) -> Self {
        self.max_cover_cells = Some(limit);
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.max_cover_cells == Some(0) {
            return Err("Cover cell limit must be greater than zero".to_string());
        }

        Ok(())
    }

    /// Load configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load configuration from TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.latitude_bound, LatitudeBound::WebMercator);
        assert!(config.max_cover_cells.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_latitude_bounds() {
        assert_eq!(LatitudeBound::WebMercator.max_latitude(), 85.051129);
        assert_eq!(LatitudeBound::Extended.max_latitude(), 89.0);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default()
            .with_latitude_bound(LatitudeBound::Extended)
            .with_max_cover_cells(512);

        let json = config.to_json().unwrap();
        assert!(json.contains("\"extended\""));
        assert_eq!(Config::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_config_missing_fields_use_defaults() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn test_config_rejects_zero_limit() {
        let err = Config::from_json(r#"{"max_cover_cells": 0}"#).unwrap_err();
        assert!(err.to_string().contains("Cover cell limit"));
        assert!(Config::default().with_max_cover_cells(0).validate().is_err());
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_config_toml() {
        let text = "latitude_bound = \"extended\"\nmax_cover_cells = 64\n";
        let config = Config::from_toml(text).unwrap();
        assert_eq!(config.latitude_bound, LatitudeBound::Extended);
        assert_eq!(config.max_cover_cells, Some(64));

        let text = config.to_toml().unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), config);
        assert!(Config::from_toml("max_cover_cells = 0").is_err());
    }
}
