// ABOUTME: Persistence seam for user feature snapshots consumed by the inference service
// ABOUTME: Defines the UserFeatureProvider trait plus an in-memory implementation for tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Momentum Labs

//! # Feature Snapshot Providers
//!
//! The inference core never talks to storage directly. It asks a
//! `UserFeatureProvider` for a [`FeatureSnapshot`] and works from that
//! immutable record. Implementations own the aggregation of session logs,
//! task counters, mood entries, and daily focus totals into the snapshot
//! fields.
//!
//! A provider must never fail just because a user has little history;
//! it fills absent fields with the documented neutral defaults (or simply
//! returns [`FeatureSnapshot::neutral`]). Errors are reserved for real
//! storage faults, which the service maps to its fixed default responses.

use crate::errors::{AppError, AppResult};
use crate::models::FeatureSnapshot;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// Source of per-user feature snapshots
///
/// The single await point in an inference call. Implementations aggregate
/// whatever storage they sit on into one `FeatureSnapshot` per request.
#[async_trait]
pub trait UserFeatureProvider: Send + Sync {
    /// Build the current feature snapshot for a user
    ///
    /// Unknown users get a neutral snapshot rather than an error.
    ///
    /// # Errors
    /// Returns `ExternalServiceError` when the backing store is unreachable
    /// or returns corrupt data.
    async fn snapshot(&self, user_id: i64) -> AppResult<FeatureSnapshot>;
}

/// In-memory provider backed by a map of prepared snapshots
///
/// Used by tests and fixtures; unknown users resolve to neutral defaults,
/// matching the contract real providers follow.
#[derive(Debug, Default)]
pub struct InMemoryFeatureProvider {
    snapshots: RwLock<HashMap<i64, FeatureSnapshot>>,
    fail_with: RwLock<Option<String>>,
}

impl InMemoryFeatureProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the snapshot returned for `snapshot.user_id`
    ///
    /// # Panics
    /// Panics if the internal lock is poisoned, which only happens after a
    /// panic inside another provider call.
    pub fn insert(&self, snapshot: FeatureSnapshot) {
        self.snapshots
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(snapshot.user_id, snapshot);
    }

    /// Make every subsequent `snapshot` call fail with a storage error
    pub fn fail_with(&self, message: impl Into<String>) {
        *self
            .fail_with
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(message.into());
    }
}

#[async_trait]
impl UserFeatureProvider for InMemoryFeatureProvider {
    async fn snapshot(&self, user_id: i64) -> AppResult<FeatureSnapshot> {
        if let Some(message) = self
            .fail_with
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .as_ref()
        {
            return Err(AppError::external_service("feature store", message.clone()));
        }

        let snapshots = self
            .snapshots
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(snapshots
            .get(&user_id)
            .cloned()
            .unwrap_or_else(|| FeatureSnapshot::neutral(user_id)))
    }
}
