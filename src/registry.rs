// ABOUTME: Versioned model artifact registry with a JSON index on disk
// ABOUTME: Tracks per-model versions, resolves the current one, and archives old artifacts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Momentum Labs

//! Model registry
//!
//! Tracks named model artifacts by timestamp-ordered version. One index
//! document (`versions.json`) maps model names to version records; exactly
//! one version per model name is flagged current. The index is published
//! with a write-to-temp-then-rename so a concurrent reader never observes a
//! truncated document. Writer coordination across processes is out of
//! scope: the design assumes one writer (the retraining job) and many
//! readers (inference processes).

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name of the version index inside the model directory
const INDEX_FILE: &str = "versions.json";

/// Subdirectory receiving artifacts demoted by `archive`
const ARCHIVE_DIR: &str = "archive";

/// Version id format derived from registration time (second resolution)
const VERSION_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Training metrics attached to a registered version
pub type ModelMetrics = BTreeMap<String, f64>;

/// One registered version of a named model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionRecord {
    /// Location of the artifact file
    pub path: PathBuf,
    /// Registration timestamp
    pub created_at: DateTime<Utc>,
    /// Training metrics for later auditing (possibly empty)
    #[serde(default)]
    pub metrics: ModelMetrics,
    /// Whether this is the version served by new processes
    #[serde(default)]
    pub is_current: bool,
}

type VersionMap = BTreeMap<String, VersionRecord>;

/// Registry of model artifacts, backed by one JSON index per deployment
#[derive(Debug)]
pub struct ModelRegistry {
    model_dir: PathBuf,
    index_path: PathBuf,
    versions: BTreeMap<String, VersionMap>,
}

impl ModelRegistry {
    /// Open (or initialize) the registry rooted at `model_dir`
    ///
    /// # Errors
    /// Returns a storage error if the directory cannot be created or the
    /// index cannot be read, and a serialization error if the index is not
    /// valid JSON.
    pub fn open(model_dir: impl Into<PathBuf>) -> AppResult<Self> {
        let model_dir = model_dir.into();
        fs::create_dir_all(&model_dir)?;

        let index_path = model_dir.join(INDEX_FILE);
        let versions = if index_path.exists() {
            let raw = fs::read_to_string(&index_path)?;
            serde_json::from_str(&raw)?
        } else {
            BTreeMap::new()
        };

        let mut registry = Self {
            model_dir,
            index_path,
            versions,
        };
        if !registry.index_path.exists() {
            registry.save()?;
        }
        Ok(registry)
    }

    /// Directory holding artifacts and the index
    #[must_use]
    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    /// Register a new model version and mark it current
    ///
    /// The version id derives from the current UTC time at second
    /// resolution. A second registration within the same second gets a
    /// numeric suffix (`-2`, `-3`, ...) instead of overwriting the first.
    ///
    /// # Errors
    /// Returns a storage/serialization error if the index cannot be persisted.
    pub fn register(
        &mut self,
        model_name: &str,
        artifact_path: impl Into<PathBuf>,
        metrics: ModelMetrics,
    ) -> AppResult<String> {
        let created_at = Utc::now();
        let version = self.next_version_id(model_name, created_at);

        let entry = self.versions.entry(model_name.to_string()).or_default();
        entry.insert(
            version.clone(),
            VersionRecord {
                path: artifact_path.into(),
                created_at,
                metrics,
                is_current: false,
            },
        );

        self.set_current(model_name, &version);
        self.save()?;

        info!(model = model_name, version = %version, "registered model version");
        Ok(version)
    }

    fn next_version_id(&self, model_name: &str, created_at: DateTime<Utc>) -> String {
        let base = created_at.format(VERSION_FORMAT).to_string();
        let Some(existing) = self.versions.get(model_name) else {
            return base;
        };
        if !existing.contains_key(&base) {
            return base;
        }
        // Same-second collision: suffix instead of silently overwriting.
        // Suffixed ids sort after their base; the is_current flag, not
        // max(), is the authoritative current-version mechanism.
        let mut counter = 2;
        loop {
            let candidate = format!("{base}-{counter}");
            if !existing.contains_key(&candidate) {
                return candidate;
            }
            counter += 1;
        }
    }

    fn set_current(&mut self, model_name: &str, version: &str) {
        if let Some(entry) = self.versions.get_mut(model_name) {
            for (id, record) in entry.iter_mut() {
                record.is_current = id == version;
            }
        }
    }

    /// Version currently served for a model name
    ///
    /// Falls back to the lexicographically largest version if no record is
    /// flagged current (corrupted index state); `None` for unknown names.
    #[must_use]
    pub fn current_version(&self, model_name: &str) -> Option<String> {
        let entry = self.versions.get(model_name)?;

        if let Some((version, _)) = entry.iter().find(|(_, record)| record.is_current) {
            return Some(version.clone());
        }

        entry.keys().next_back().cloned()
    }

    /// Artifact path for a version of a model (current version if `None`)
    #[must_use]
    pub fn resolve_path(&self, model_name: &str, version: Option<&str>) -> Option<PathBuf> {
        let entry = self.versions.get(model_name)?;
        let version = match version {
            Some(v) => v.to_string(),
            None => self.current_version(model_name)?,
        };
        entry.get(&version).map(|record| record.path.clone())
    }

    /// All recorded versions of a model, keyed by version id
    #[must_use]
    pub fn list_versions(&self, model_name: &str) -> VersionMap {
        self.versions.get(model_name).cloned().unwrap_or_default()
    }

    /// Archive old versions, retaining the current one and the `keep` most
    /// recently created ones (their union)
    ///
    /// Artifacts of demoted versions move to `<model_dir>/archive/<name>/`
    /// and their records are removed. Safe to call with fewer than `keep`
    /// versions present. Returns the number of versions archived.
    ///
    /// # Errors
    /// Returns a storage error if an artifact cannot be relocated or the
    /// index cannot be persisted.
    pub fn archive(&mut self, model_name: &str, keep: usize) -> AppResult<usize> {
        let Some(entry) = self.versions.get(model_name) else {
            return Ok(0);
        };

        let mut by_recency: Vec<(String, DateTime<Utc>)> = entry
            .iter()
            .map(|(version, record)| (version.clone(), record.created_at))
            .collect();
        by_recency.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));

        let current = self.current_version(model_name);
        let mut to_keep: Vec<String> = by_recency
            .iter()
            .take(keep)
            .map(|(version, _)| version.clone())
            .collect();
        if let Some(current) = current {
            if !to_keep.contains(&current) {
                to_keep.push(current);
            }
        }

        let to_archive: Vec<String> = by_recency
            .iter()
            .map(|(version, _)| version.clone())
            .filter(|version| !to_keep.contains(version))
            .collect();
        if to_archive.is_empty() {
            return Ok(0);
        }

        let archive_dir = self.model_dir.join(ARCHIVE_DIR).join(model_name);
        fs::create_dir_all(&archive_dir)?;

        for version in &to_archive {
            let record = self
                .versions
                .get_mut(model_name)
                .and_then(|entry| entry.remove(version))
                .ok_or_else(|| AppError::internal(format!("version {version} vanished")))?;

            if record.path.exists() {
                let extension = record
                    .path
                    .extension()
                    .map(|ext| format!(".{}", ext.to_string_lossy()))
                    .unwrap_or_default();
                let target = archive_dir.join(format!("{model_name}_{version}{extension}"));
                fs::rename(&record.path, &target)?;
                debug!(model = model_name, version = %version, "archived artifact");
            }
        }

        self.save()?;
        info!(
            model = model_name,
            archived = to_archive.len(),
            "archived old model versions"
        );
        Ok(to_archive.len())
    }

    /// Persist the index atomically (write temp file, then rename)
    fn save(&self) -> AppResult<()> {
        let serialized = serde_json::to_string_pretty(&self.versions)?;
        let temp_path = self.index_path.with_extension("json.tmp");
        fs::write(&temp_path, serialized)?;
        fs::rename(&temp_path, &self.index_path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn registry() -> (TempDir, ModelRegistry) {
        let dir = TempDir::new().unwrap();
        let registry = ModelRegistry::open(dir.path()).unwrap();
        (dir, registry)
    }

    #[test]
    fn test_open_creates_index() {
        let (dir, _registry) = registry();
        assert!(dir.path().join(INDEX_FILE).exists());
    }

    #[test]
    fn test_register_marks_exactly_one_current() {
        let (_dir, mut registry) = registry();

        let mut last = String::new();
        for i in 0..3 {
            last = registry
                .register("m", format!("/tmp/m_{i}.json"), ModelMetrics::new())
                .unwrap();
        }

        assert_eq!(registry.current_version("m").unwrap(), last);
        let current_count = registry
            .list_versions("m")
            .values()
            .filter(|record| record.is_current)
            .count();
        assert_eq!(current_count, 1);
    }

    #[test]
    fn test_same_second_registrations_get_suffixes() {
        let (_dir, mut registry) = registry();

        // Registrations in a tight loop land within one second
        let a = registry.register("m", "/tmp/a.json", ModelMetrics::new()).unwrap();
        let b = registry.register("m", "/tmp/b.json", ModelMetrics::new()).unwrap();

        assert_ne!(a, b);
        assert_eq!(registry.list_versions("m").len(), 2);
        assert_eq!(registry.current_version("m").unwrap(), b);
    }

    #[test]
    fn test_current_version_unknown_model() {
        let (_dir, registry) = registry();
        assert!(registry.current_version("nope").is_none());
        assert!(registry.resolve_path("nope", None).is_none());
    }

    #[test]
    fn test_current_falls_back_to_max_when_flag_lost() {
        let (dir, mut registry) = registry();
        registry.register("m", "/tmp/a.json", ModelMetrics::new()).unwrap();
        registry.register("m", "/tmp/b.json", ModelMetrics::new()).unwrap();

        // Simulate a corrupted index with no current flag
        for record in registry.versions.get_mut("m").unwrap().values_mut() {
            record.is_current = false;
        }
        let max = registry.versions["m"].keys().next_back().cloned().unwrap();
        assert_eq!(registry.current_version("m").unwrap(), max);
        drop(dir);
    }

    #[test]
    fn test_resolve_path_specific_version() {
        let (_dir, mut registry) = registry();
        let v1 = registry.register("m", "/tmp/v1.json", ModelMetrics::new()).unwrap();
        registry.register("m", "/tmp/v2.json", ModelMetrics::new()).unwrap();

        assert_eq!(
            registry.resolve_path("m", Some(&v1)).unwrap(),
            PathBuf::from("/tmp/v1.json")
        );
        assert_eq!(
            registry.resolve_path("m", None).unwrap(),
            PathBuf::from("/tmp/v2.json")
        );
    }

    #[test]
    fn test_index_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let version = {
            let mut registry = ModelRegistry::open(dir.path()).unwrap();
            let mut metrics = ModelMetrics::new();
            metrics.insert("mae".into(), 2.5);
            registry.register("m", "/tmp/m.json", metrics).unwrap()
        };

        let reopened = ModelRegistry::open(dir.path()).unwrap();
        assert_eq!(reopened.current_version("m").unwrap(), version);
        assert_eq!(reopened.list_versions("m")[&version].metrics["mae"], 2.5);
    }

    #[test]
    fn test_archive_keeps_current_and_recent() {
        let (dir, mut registry) = registry();

        // Five versions with real artifact files, distinct created_at
        let mut versions = Vec::new();
        for i in 0..5 {
            let artifact = dir.path().join(format!("m_{i}.json"));
            fs::write(&artifact, "{}").unwrap();
            let version = registry.register("m", &artifact, ModelMetrics::new()).unwrap();
            registry
                .versions
                .get_mut("m")
                .unwrap()
                .get_mut(&version)
                .unwrap()
                .created_at = Utc::now() + chrono::Duration::seconds(i);
            versions.push(version);
        }
        // Make the middle version current
        registry.set_current("m", &versions[2]);
        registry.save().unwrap();

        let archived = registry.archive("m", 2).unwrap();
        assert_eq!(archived, 2);

        let surviving = registry.list_versions("m");
        assert!(surviving.len() <= 3);
        assert!(surviving.contains_key(&versions[2]));
        assert_eq!(registry.current_version("m").unwrap(), versions[2]);

        // Demoted artifacts moved to the archive area
        let archive_dir = dir.path().join(ARCHIVE_DIR).join("m");
        assert_eq!(std::fs::read_dir(archive_dir).unwrap().count(), 2);
    }

    #[test]
    fn test_archive_is_noop_below_keep() {
        let (dir, mut registry) = registry();
        let artifact = dir.path().join("m.json");
        fs::write(&artifact, "{}").unwrap();
        registry.register("m", &artifact, ModelMetrics::new()).unwrap();

        assert_eq!(registry.archive("m", 5).unwrap(), 0);
        assert_eq!(registry.archive("missing", 5).unwrap(), 0);
        assert_eq!(registry.list_versions("m").len(), 1);
    }
}
