// ABOUTME: Model artifact bundle: fitted predictor plus optional normalization statistics
// ABOUTME: Linear regression and logistic classifier inference over encoded feature vectors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Momentum Labs

//! Model artifacts
//!
//! A `ModelArtifact` is the unit published by the training collaborator and
//! consumed by the engines: a fitted predictor, optionally a fitted scaler,
//! and optionally raw (mean, std) statistics. Artifacts are JSON documents
//! on disk, resolved through the registry, loaded once per process, and
//! cached by the service for its lifetime. Absence of an artifact is a
//! valid state (no model trained yet), never an error condition by itself.

use crate::errors::{AppError, AppResult};
use crate::features::FeatureVector;
use crate::normalize::{normalize, EPSILON};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Fitted predictor variants the inference core can evaluate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predictor {
    /// Multi-output linear regression: one weight row and intercept per output
    LinearRegression {
        weights: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    },
    /// Binary logistic classifier; `predict_proba` yields the positive class
    LogisticRegression { weights: Vec<f64>, intercept: f64 },
}

impl Predictor {
    /// Evaluate regression outputs for one feature vector
    ///
    /// # Errors
    /// Returns `ArtifactInvalid` if the predictor is a classifier or its
    /// dimensions do not match the feature vector.
    pub fn predict(&self, features: &[f64]) -> AppResult<Vec<f64>> {
        match self {
            Self::LinearRegression {
                weights,
                intercepts,
            } => {
                if weights.len() != intercepts.len() {
                    return Err(AppError::artifact_invalid(
                        "weight rows and intercepts disagree on output count",
                    ));
                }
                weights
                    .iter()
                    .zip(intercepts.iter())
                    .map(|(row, intercept)| dot(row, features).map(|sum| sum + intercept))
                    .collect()
            }
            Self::LogisticRegression { .. } => Err(AppError::artifact_invalid(
                "classifier artifact used where a regressor was expected",
            )),
        }
    }

    /// Positive-class probability for one feature vector
    ///
    /// # Errors
    /// Returns `ArtifactInvalid` if the predictor is a regressor or its
    /// dimensions do not match the feature vector.
    pub fn predict_proba(&self, features: &[f64]) -> AppResult<f64> {
        match self {
            Self::LogisticRegression { weights, intercept } => {
                let logit = dot(weights, features)? + intercept;
                Ok(sigmoid(logit))
            }
            Self::LinearRegression { .. } => Err(AppError::artifact_invalid(
                "regressor artifact used where a classifier was expected",
            )),
        }
    }
}

fn dot(weights: &[f64], features: &[f64]) -> AppResult<f64> {
    if weights.len() != features.len() {
        return Err(AppError::artifact_invalid(format!(
            "feature count mismatch: artifact expects {}, vector has {}",
            weights.len(),
            features.len()
        )));
    }
    Ok(weights
        .iter()
        .zip(features.iter())
        .map(|(w, x)| w * x)
        .sum())
}

fn sigmoid(logit: f64) -> f64 {
    1.0 / (1.0 + (-logit).exp())
}

/// Fitted standard scaler persisted alongside a predictor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl Scaler {
    /// Apply the fitted z-score transform
    ///
    /// # Errors
    /// Returns `ArtifactInvalid` on a dimension mismatch.
    pub fn transform(&self, features: &[f64]) -> AppResult<Vec<f64>> {
        if self.mean.len() != features.len() || self.std.len() != features.len() {
            return Err(AppError::artifact_invalid(format!(
                "scaler expects {} features, vector has {}",
                self.mean.len(),
                features.len()
            )));
        }
        Ok(features
            .iter()
            .zip(self.mean.iter().zip(self.std.iter()))
            .map(|(value, (m, s))| (value - m) / (s + EPSILON))
            .collect())
    }
}

/// Trained predictor bundle published by the training collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub predictor: Predictor,
    /// Fitted scaler; preferred over raw statistics when both exist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler: Option<Scaler>,
    /// Raw normalization statistics from training
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_mean: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_std: Option<Vec<f64>>,
}

impl ModelArtifact {
    /// Load an artifact bundle from disk
    ///
    /// # Errors
    /// Returns a storage error if the file cannot be read and a
    /// serialization error if it is not a valid bundle.
    pub fn load(path: &Path) -> AppResult<Self> {
        let raw = fs::read_to_string(path)?;
        let artifact: Self = serde_json::from_str(&raw)?;
        debug!(path = %path.display(), "loaded model artifact");
        Ok(artifact)
    }

    /// Persist an artifact bundle to disk (used by training-side tooling
    /// and test fixtures)
    ///
    /// # Errors
    /// Returns a storage/serialization error if the bundle cannot be written.
    pub fn save(&self, path: &Path) -> AppResult<()> {
        let serialized = serde_json::to_string_pretty(self)?;
        fs::write(path, serialized)?;
        Ok(())
    }

    /// Scale a feature vector with whatever statistics this artifact
    /// carries: fitted scaler first, raw statistics second, raw features
    /// unchanged when neither exists
    ///
    /// # Errors
    /// Returns `ArtifactInvalid` on a scaler dimension mismatch.
    pub fn apply_normalization(&self, features: &FeatureVector) -> AppResult<FeatureVector> {
        if let Some(scaler) = &self.scaler {
            return Ok(features.with_values(scaler.transform(features.as_slice())?));
        }
        if let (Some(mean), Some(std)) = (&self.feature_mean, &self.feature_std) {
            let (scaled, _, _) = normalize(features.as_slice(), Some(mean), Some(std));
            return Ok(features.with_values(scaled));
        }
        Ok(features.clone())
    }
}
