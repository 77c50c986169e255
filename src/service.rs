// ABOUTME: IntelligenceService, the public entry points for recommendations and risk estimates
// ABOUTME: Caches current model artifacts and maps internal failures to fixed default responses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Momentum Labs

//! Inference service
//!
//! `IntelligenceService` is the long-lived object embedding applications
//! construct once and call per request. It resolves the current model
//! versions from the registry at construction, caches the loaded artifacts
//! for its lifetime, and exposes two total entry points: `recommend` and
//! `predict_risk`. Neither returns an error to the caller; an internal
//! fault yields the documented fixed default with zero confidence (or the
//! 0.5 / unknown-trigger risk estimate). A missing artifact is the normal
//! pre-training state and routes to the heuristic tier instead.

use crate::artifact::ModelArtifact;
use crate::config::InferenceConfig;
use crate::constants::model_names;
use crate::errors::{AppError, AppResult};
use crate::models::{Recommendation, RiskEstimate, TaskPriority};
use crate::providers::UserFeatureProvider;
use crate::recommendation::PomodoroEngine;
use crate::registry::ModelRegistry;
use crate::risk::DistractionPredictor;
use std::sync::{Arc, RwLock};
use tracing::{error, info, warn};

/// Cached artifacts for the two registered models
#[derive(Default)]
struct ArtifactCache {
    pomodoro: Option<ModelArtifact>,
    distraction: Option<ModelArtifact>,
}

/// Long-lived inference facade over the engines, registry, and provider
pub struct IntelligenceService {
    provider: Arc<dyn UserFeatureProvider>,
    registry: Arc<RwLock<ModelRegistry>>,
    cache: RwLock<ArtifactCache>,
    engine: PomodoroEngine,
    predictor: DistractionPredictor,
    keep_versions: usize,
}

impl IntelligenceService {
    /// Open the registry under `config.model_dir` and load current artifacts
    ///
    /// Missing artifacts are not an error here; the affected model serves
    /// its heuristic tier until training publishes a version.
    ///
    /// # Errors
    /// Returns `StorageError` when the registry index cannot be read.
    pub fn new(
        provider: Arc<dyn UserFeatureProvider>,
        config: &InferenceConfig,
    ) -> AppResult<Self> {
        let registry = ModelRegistry::open(config.model_dir.clone())?;
        let service = Self {
            provider,
            registry: Arc::new(RwLock::new(registry)),
            cache: RwLock::new(ArtifactCache::default()),
            engine: PomodoroEngine::new(),
            predictor: DistractionPredictor::new(),
            keep_versions: config.keep_versions,
        };
        service.reload_models();
        Ok(service)
    }

    /// Build a service around an already-open registry
    ///
    /// Used when the embedding application (or a training job) shares the
    /// registry handle with the service.
    #[must_use]
    pub fn with_registry(
        provider: Arc<dyn UserFeatureProvider>,
        registry: Arc<RwLock<ModelRegistry>>,
    ) -> Self {
        let service = Self {
            provider,
            registry,
            cache: RwLock::new(ArtifactCache::default()),
            engine: PomodoroEngine::new(),
            predictor: DistractionPredictor::new(),
            keep_versions: InferenceConfig::default().keep_versions,
        };
        service.reload_models();
        service
    }

    /// Re-resolve current versions and replace the cached artifacts
    ///
    /// Called at construction and by operators after training publishes new
    /// versions; inference between reloads keeps using the cached artifacts.
    pub fn reload_models(&self) {
        let pomodoro = self.load_current(model_names::POMODORO_RECOMMENDER);
        let distraction = self.load_current(model_names::DISTRACTION_PREDICTOR);

        let mut cache = self
            .cache
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        cache.pomodoro = pomodoro;
        cache.distraction = distraction;
    }

    fn load_current(&self, model_name: &str) -> Option<ModelArtifact> {
        match self.resolve_and_load(model_name) {
            Ok(artifact) => Some(artifact),
            Err(error) if error.is_artifact_missing() => {
                warn!(model = %model_name, "no trained artifact registered, heuristic tier active");
                None
            }
            Err(error) => {
                warn!(model = %model_name, %error, "artifact unusable, heuristic tier active");
                None
            }
        }
    }

    fn resolve_and_load(&self, model_name: &str) -> AppResult<ModelArtifact> {
        let path = {
            let registry = self
                .registry
                .read()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            registry.resolve_path(model_name, None)
        }
        .ok_or_else(|| AppError::artifact_missing(model_name))?;

        let artifact = ModelArtifact::load(&path)?;
        info!(model = %model_name, path = %path.display(), "model artifact loaded");
        Ok(artifact)
    }

    /// Archive old versions of both models per the configured retention
    ///
    /// Keeps the current version plus the `keep_versions` most recent ones
    /// for each model and returns the total number of versions archived.
    /// Typically called after training publishes new versions.
    ///
    /// # Errors
    /// Returns a storage error if an artifact cannot be relocated or the
    /// index cannot be persisted.
    pub fn archive_old_versions(&self) -> AppResult<usize> {
        let mut registry = self
            .registry
            .write()
            .map_err(|_| AppError::internal("registry lock poisoned"))?;
        let mut archived = registry.archive(model_names::POMODORO_RECOMMENDER, self.keep_versions)?;
        archived += registry.archive(model_names::DISTRACTION_PREDICTOR, self.keep_versions)?;
        Ok(archived)
    }

    /// Recommend Pomodoro focus and break durations for a user
    ///
    /// Total: internal failures return the fixed 25/5 default with zero
    /// confidence instead of an error.
    pub async fn recommend(&self, user_id: i64, priority: TaskPriority) -> Recommendation {
        match self.try_recommend(user_id, priority).await {
            Ok(recommendation) => recommendation,
            Err(error) => {
                error!(user_id, %error, "recommendation failed, returning default");
                Recommendation::fallback_default()
            }
        }
    }

    /// Estimate distraction risk for a planned session length (minutes)
    ///
    /// Total: internal failures return probability 0.5 with an unknown
    /// trigger instead of an error.
    pub async fn predict_risk(&self, user_id: i64, planned_duration: i64) -> RiskEstimate {
        match self.try_predict_risk(user_id, planned_duration).await {
            Ok(estimate) => estimate,
            Err(error) => {
                error!(user_id, %error, "risk prediction failed, returning default");
                RiskEstimate::fallback_default()
            }
        }
    }

    async fn try_recommend(
        &self,
        user_id: i64,
        priority: TaskPriority,
    ) -> AppResult<Recommendation> {
        let snapshot = self.provider.snapshot(user_id).await?;
        let cache = self
            .cache
            .read()
            .map_err(|_| AppError::internal("artifact cache lock poisoned"))?;
        self.engine.recommend(&snapshot, priority, cache.pomodoro.as_ref())
    }

    async fn try_predict_risk(
        &self,
        user_id: i64,
        planned_duration: i64,
    ) -> AppResult<RiskEstimate> {
        let snapshot = self.provider.snapshot(user_id).await?;
        let cache = self
            .cache
            .read()
            .map_err(|_| AppError::internal("artifact cache lock poisoned"))?;
        self.predictor
            .predict(&snapshot, planned_duration, cache.distraction.as_ref())
    }
}
