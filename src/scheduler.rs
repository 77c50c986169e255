// ABOUTME: Background retrain scheduler driving periodic model training runs
// ABOUTME: Defines the ModelTrainer seam and a tokio interval loop that survives trainer failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Momentum Labs

//! Retrain scheduler
//!
//! Training is a collaborator behind the [`ModelTrainer`] trait; this module
//! only owns the cadence. The scheduler runs one training pass at startup so
//! a fresh deployment gets models without waiting a full interval, then
//! repeats on a fixed `tokio` interval. A failed pass is logged and the loop
//! keeps going; inference serves its heuristic tiers in the meantime.

use crate::config::InferenceConfig;
use crate::errors::AppResult;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Training collaborator invoked on each scheduled pass
///
/// Implementations load training data, fit fresh artifacts, and register
/// them as the current versions. One call covers all models.
#[async_trait::async_trait]
pub trait ModelTrainer: Send + Sync {
    /// Run one full training pass
    ///
    /// # Errors
    /// Any failure aborts this pass only; the scheduler logs it and waits
    /// for the next tick.
    async fn train_all(&self) -> AppResult<()>;
}

/// Periodic driver for a [`ModelTrainer`]
pub struct RetrainScheduler {
    trainer: Arc<dyn ModelTrainer>,
    interval: Duration,
}

impl RetrainScheduler {
    #[must_use]
    pub fn new(trainer: Arc<dyn ModelTrainer>, interval: Duration) -> Self {
        Self { trainer, interval }
    }

    /// Build a scheduler with the configured retrain interval
    #[must_use]
    pub fn from_config(trainer: Arc<dyn ModelTrainer>, config: &InferenceConfig) -> Self {
        Self::new(trainer, config.retrain_interval)
    }

    /// Spawn the scheduling loop on the current runtime
    ///
    /// The first training pass runs immediately. The returned handle can be
    /// aborted to stop scheduling; an in-flight pass is cancelled with it.
    #[must_use]
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(interval_secs = self.interval.as_secs(), "retrain scheduler started");
            let mut ticker = tokio::time::interval(self.interval);
            loop {
                // First tick fires immediately, giving the startup pass
                ticker.tick().await;
                Self::run_once(&*self.trainer).await;
            }
        })
    }

    async fn run_once(trainer: &dyn ModelTrainer) {
        match trainer.train_all().await {
            Ok(()) => info!("scheduled training pass completed"),
            Err(error) => error!(%error, "scheduled training pass failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingTrainer {
        runs: AtomicU32,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl ModelTrainer for CountingTrainer {
        async fn train_all(&self) -> AppResult<()> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(AppError::internal("no training data"))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_pass_runs_immediately() {
        let trainer = Arc::new(CountingTrainer {
            runs: AtomicU32::new(0),
            fail: false,
        });
        let handle = RetrainScheduler::new(trainer.clone(), Duration::from_secs(3600)).start();

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(trainer.runs.load(Ordering::SeqCst), 1);
        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_from_config_uses_configured_interval() {
        let trainer = Arc::new(CountingTrainer {
            runs: AtomicU32::new(0),
            fail: false,
        });
        let config = InferenceConfig {
            retrain_interval: Duration::from_secs(120),
            ..InferenceConfig::default()
        };
        let handle = RetrainScheduler::from_config(trainer.clone(), &config).start();

        // Startup pass plus two 120-second ticks
        tokio::time::sleep(Duration::from_secs(241)).await;
        assert_eq!(trainer.runs.load(Ordering::SeqCst), 3);
        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_survives_trainer_failures() {
        let trainer = Arc::new(CountingTrainer {
            runs: AtomicU32::new(0),
            fail: true,
        });
        let handle = RetrainScheduler::new(trainer.clone(), Duration::from_secs(60)).start();

        tokio::time::sleep(Duration::from_secs(181)).await;
        // Startup pass plus three interval ticks, all failing, loop intact
        assert!(trainer.runs.load(Ordering::SeqCst) >= 4);
        handle.abort();
    }
}
