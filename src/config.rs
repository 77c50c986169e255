// ABOUTME: Runtime configuration for the inference service and retrain scheduler
// ABOUTME: Defaults with environment variable overrides and range validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Momentum Labs

//! Inference service configuration
//!
//! All values have working defaults; `INTELLIGENCE_*` environment variables
//! override them. Validation rejects configurations that would make the
//! registry unusable or the scheduler spin.

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default registry location relative to the working directory
const DEFAULT_MODEL_DIR: &str = "models";

/// Default number of recent versions kept per model when archiving
const DEFAULT_KEEP_VERSIONS: usize = 3;

/// Default retrain interval: once a day
const DEFAULT_RETRAIN_INTERVAL_SECS: u64 = 86_400;

/// Configuration for the inference service and scheduler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Directory holding model artifacts and the version index
    pub model_dir: PathBuf,
    /// Recent versions kept per model by `archive` (current is always kept)
    pub keep_versions: usize,
    /// Interval between scheduled retrain runs
    pub retrain_interval: Duration,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            keep_versions: DEFAULT_KEEP_VERSIONS,
            retrain_interval: Duration::from_secs(DEFAULT_RETRAIN_INTERVAL_SECS),
        }
    }
}

impl InferenceConfig {
    /// Load defaults with environment variable overrides
    ///
    /// # Errors
    /// Returns `ConfigError` when an override fails to parse or a value is
    /// out of range.
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("INTELLIGENCE_MODEL_DIR") {
            config.model_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("INTELLIGENCE_KEEP_VERSIONS") {
            config.keep_versions = val
                .parse()
                .map_err(|_| AppError::config("Invalid INTELLIGENCE_KEEP_VERSIONS"))?;
        }

        if let Ok(val) = std::env::var("INTELLIGENCE_RETRAIN_INTERVAL_SECS") {
            let secs: u64 = val
                .parse()
                .map_err(|_| AppError::config("Invalid INTELLIGENCE_RETRAIN_INTERVAL_SECS"))?;
            config.retrain_interval = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check values the rest of the crate assumes
    ///
    /// # Errors
    /// Returns `ConfigError` for an empty model directory and
    /// `ValueOutOfRange` for zero retained versions or a sub-minute
    /// retrain interval.
    pub fn validate(&self) -> AppResult<()> {
        if self.model_dir.as_os_str().is_empty() {
            return Err(AppError::config("model_dir must not be empty"));
        }
        if self.keep_versions == 0 {
            return Err(AppError::out_of_range("keep_versions must be at least 1"));
        }
        if self.retrain_interval < Duration::from_secs(60) {
            return Err(AppError::out_of_range(
                "retrain_interval must be at least 60 seconds",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_defaults_are_valid() {
        let config = InferenceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model_dir, PathBuf::from("models"));
        assert_eq!(config.keep_versions, 3);
        assert_eq!(config.retrain_interval, Duration::from_secs(86_400));
    }

    #[test]
    fn test_zero_keep_versions_rejected() {
        let config = InferenceConfig {
            keep_versions: 0,
            ..InferenceConfig::default()
        };
        let error = config.validate().unwrap_err();
        assert_eq!(error.code, crate::errors::ErrorCode::ValueOutOfRange);
    }

    #[test]
    fn test_short_retrain_interval_rejected() {
        let config = InferenceConfig {
            retrain_interval: Duration::from_secs(5),
            ..InferenceConfig::default()
        };
        let error = config.validate().unwrap_err();
        assert_eq!(error.code, crate::errors::ErrorCode::ValueOutOfRange);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        std::env::set_var("INTELLIGENCE_MODEL_DIR", "/tmp/intelligence-models");
        std::env::set_var("INTELLIGENCE_KEEP_VERSIONS", "5");
        std::env::set_var("INTELLIGENCE_RETRAIN_INTERVAL_SECS", "3600");

        let config = InferenceConfig::from_env().unwrap();
        assert_eq!(config.model_dir, PathBuf::from("/tmp/intelligence-models"));
        assert_eq!(config.keep_versions, 5);
        assert_eq!(config.retrain_interval, Duration::from_secs(3600));

        std::env::remove_var("INTELLIGENCE_MODEL_DIR");
        std::env::remove_var("INTELLIGENCE_KEEP_VERSIONS");
        std::env::remove_var("INTELLIGENCE_RETRAIN_INTERVAL_SECS");
    }

    #[test]
    #[serial]
    fn test_invalid_env_override_is_an_error() {
        std::env::set_var("INTELLIGENCE_KEEP_VERSIONS", "lots");
        let result = InferenceConfig::from_env();
        std::env::remove_var("INTELLIGENCE_KEEP_VERSIONS");
        assert!(result.is_err());
    }
}
