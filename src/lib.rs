// ABOUTME: Main library entry point for the Momentum intelligence service
// ABOUTME: Personalized Pomodoro recommendations and distraction risk prediction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Momentum Labs

#![deny(unsafe_code)]

//! # Momentum Intelligence
//!
//! Personalization layer for the Momentum productivity app: recommends
//! Pomodoro focus/break durations per user and predicts the risk that a
//! planned session gets derailed, using lightweight trained models when
//! available and deterministic heuristics when not.
//!
//! ## Features
//!
//! - **Tiered predictions**: trend extrapolation, trained model, or rule
//!   table, each with an explicit confidence score
//! - **Total entry points**: inference never errors toward the caller;
//!   internal faults yield documented defaults
//! - **Versioned model registry**: timestamped artifact versions with an
//!   atomic JSON index and archival of old versions
//! - **Pluggable persistence**: user features arrive through the
//!   `UserFeatureProvider` trait
//! - **Background retraining**: `RetrainScheduler` drives a `ModelTrainer`
//!   collaborator on a fixed interval
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use momentum_intelligence::config::InferenceConfig;
//! use momentum_intelligence::models::TaskPriority;
//! use momentum_intelligence::providers::InMemoryFeatureProvider;
//! use momentum_intelligence::service::IntelligenceService;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = InferenceConfig::from_env()?;
//!     let provider = Arc::new(InMemoryFeatureProvider::new());
//!     let service = IntelligenceService::new(provider, &config)?;
//!
//!     let recommendation = service.recommend(42, TaskPriority::Medium).await;
//!     println!(
//!         "focus {}min, break {}min ({})",
//!         recommendation.focus_minutes,
//!         recommendation.break_minutes,
//!         recommendation.explanation
//!     );
//!     Ok(())
//! }
//! ```

/// Model artifact format: predictors, scaler, and normalization statistics
pub mod artifact;

/// Runtime configuration with environment overrides
pub mod config;

/// Heuristic constants shared by the engines and tests
pub mod constants;

/// Error taxonomy and the `AppResult` alias
pub mod errors;

/// Feature vector codec for both models
pub mod features;

/// Structured logging setup
pub mod logging;

/// Core data types: snapshots, recommendations, risk estimates
pub mod models;

/// Z-score normalization used at training and inference time
pub mod normalize;

/// Persistence seam producing per-user feature snapshots
pub mod providers;

/// Pomodoro recommendation engine
pub mod recommendation;

/// Versioned model artifact registry
pub mod registry;

/// Distraction risk predictor
pub mod risk;

/// Background retrain scheduler
pub mod scheduler;

/// Inference service facade
pub mod service;

pub use errors::{AppError, AppResult, ErrorCode};
pub use models::{
    DistractionTrigger, FeatureSnapshot, Mood, Recommendation, RiskEstimate, TaskPriority,
};
pub use service::IntelligenceService;
