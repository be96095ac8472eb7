//! Runtime configuration.
//!
//! Loaded from YAML; every field has a default so an empty file (or no file)
//! is a valid configuration.

use cropwise_core::MissingFieldPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid duration for {field}: {source}")]
    InvalidDuration {
        field: &'static str,
        #[source]
        source: humantime::DurationError,
    },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Points awarded for participation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointsConfig {
    /// Awarded to a logged-in user for posting a question
    pub question: i64,

    /// Awarded to a logged-in user for answering
    pub answer: i64,
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self {
            question: 5,
            answer: 3,
        }
    }
}

/// Listing sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Posts shown on the home listing
    pub home_limit: usize,

    /// Rows shown per reference table
    pub reference_limit: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            home_limit: 10,
            reference_limit: 5,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropwiseConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// How long a login session stays valid (humantime, e.g. "7d", "12h")
    pub session_ttl: String,

    /// Handling of missing numeric advice fields
    pub missing_fields: MissingFieldPolicy,

    pub points: PointsConfig,

    pub listing: ListingConfig,
}

impl Default for CropwiseConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("cropwise.db"),
            session_ttl: "7d".to_string(),
            missing_fields: MissingFieldPolicy::default(),
            points: PointsConfig::default(),
            listing: ListingConfig::default(),
        }
    }
}

impl CropwiseConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not a map.
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Session lifetime as a `Duration`.
    pub fn session_ttl(&self) -> Result<Duration, ConfigError> {
        humantime::parse_duration(&self.session_ttl).map_err(|source| ConfigError::InvalidDuration {
            field: "session_ttl",
            source,
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.session_ttl()?.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "session_ttl",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.listing.home_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "listing.home_limit",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.listing.reference_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "listing.reference_limit",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
