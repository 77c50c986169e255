// ABOUTME: Integration tests for the model registry and artifact lifecycle
// ABOUTME: Covers register/publish/resolve/load, archival, and index durability on disk
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Momentum Labs

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use momentum_intelligence::artifact::{ModelArtifact, Predictor, Scaler};
use momentum_intelligence::features::POMODORO_FEATURE_COUNT;
use momentum_intelligence::registry::{ModelMetrics, ModelRegistry};
use std::fs;
use tempfile::TempDir;

fn pomodoro_artifact(focus: f64, break_minutes: f64) -> ModelArtifact {
    ModelArtifact {
        predictor: Predictor::LinearRegression {
            weights: vec![vec![0.0; POMODORO_FEATURE_COUNT]; 2],
            intercepts: vec![focus, break_minutes],
        },
        scaler: Some(Scaler {
            mean: vec![0.0; POMODORO_FEATURE_COUNT],
            std: vec![1.0; POMODORO_FEATURE_COUNT],
        }),
        feature_mean: None,
        feature_std: None,
    }
}

#[test]
fn test_train_publish_resolve_load_cycle() {
    let dir = TempDir::new().unwrap();
    let mut registry = ModelRegistry::open(dir.path()).unwrap();

    // A training job saves the artifact, then registers it
    let artifact_path = dir.path().join("pomodoro_recommender_v1.json");
    pomodoro_artifact(40.0, 8.0).save(&artifact_path).unwrap();

    let mut metrics = ModelMetrics::new();
    metrics.insert("focus_mae".into(), 3.2);
    let version = registry
        .register("pomodoro_recommender", &artifact_path, metrics)
        .unwrap();

    // An inference process resolves the current version and loads it
    let resolved = registry.resolve_path("pomodoro_recommender", None).unwrap();
    assert_eq!(resolved, artifact_path);

    let loaded = ModelArtifact::load(&resolved).unwrap();
    let outputs = loaded
        .predictor
        .predict(&vec![0.0; POMODORO_FEATURE_COUNT])
        .unwrap();
    assert_eq!(outputs, vec![40.0, 8.0]);

    assert_eq!(
        registry.current_version("pomodoro_recommender").unwrap(),
        version
    );
}

#[test]
fn test_newer_registration_becomes_current() {
    let dir = TempDir::new().unwrap();
    let mut registry = ModelRegistry::open(dir.path()).unwrap();

    let first = dir.path().join("m_first.json");
    let second = dir.path().join("m_second.json");
    pomodoro_artifact(30.0, 5.0).save(&first).unwrap();
    pomodoro_artifact(45.0, 9.0).save(&second).unwrap();

    registry.register("pomodoro_recommender", &first, ModelMetrics::new()).unwrap();
    registry.register("pomodoro_recommender", &second, ModelMetrics::new()).unwrap();

    let resolved = registry.resolve_path("pomodoro_recommender", None).unwrap();
    assert_eq!(resolved, second);

    let loaded = ModelArtifact::load(&resolved).unwrap();
    let outputs = loaded
        .predictor
        .predict(&vec![0.0; POMODORO_FEATURE_COUNT])
        .unwrap();
    assert_eq!(outputs[0], 45.0);
}

#[test]
fn test_index_is_plain_readable_json() {
    let dir = TempDir::new().unwrap();
    let mut registry = ModelRegistry::open(dir.path()).unwrap();
    let artifact_path = dir.path().join("m.json");
    pomodoro_artifact(30.0, 5.0).save(&artifact_path).unwrap();
    registry.register("pomodoro_recommender", &artifact_path, ModelMetrics::new()).unwrap();

    // Another process (or an operator) can read the index directly
    let raw = fs::read_to_string(dir.path().join("versions.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entry = &parsed["pomodoro_recommender"];
    let versions = entry.as_object().unwrap();
    assert_eq!(versions.len(), 1);
    let record = versions.values().next().unwrap();
    assert_eq!(record["is_current"], serde_json::Value::Bool(true));
}

#[test]
fn test_archive_relocates_old_artifacts() {
    let dir = TempDir::new().unwrap();
    let mut registry = ModelRegistry::open(dir.path()).unwrap();

    for i in 0..4 {
        let path = dir.path().join(format!("m_{i}.json"));
        pomodoro_artifact(30.0 + f64::from(i), 5.0).save(&path).unwrap();
        registry.register("pomodoro_recommender", &path, ModelMetrics::new()).unwrap();
    }

    let archived = registry.archive("pomodoro_recommender", 2).unwrap();
    assert_eq!(archived, 2);
    assert_eq!(registry.list_versions("pomodoro_recommender").len(), 2);

    // The current version still resolves and loads after archival
    let resolved = registry.resolve_path("pomodoro_recommender", None).unwrap();
    assert!(ModelArtifact::load(&resolved).is_ok());

    let archive_dir = dir.path().join("archive").join("pomodoro_recommender");
    assert_eq!(fs::read_dir(archive_dir).unwrap().count(), 2);
}

#[test]
fn test_registry_state_survives_process_restart() {
    let dir = TempDir::new().unwrap();
    let artifact_path = dir.path().join("m.json");
    pomodoro_artifact(35.0, 7.0).save(&artifact_path).unwrap();

    let version = {
        let mut registry = ModelRegistry::open(dir.path()).unwrap();
        registry
            .register("pomodoro_recommender", &artifact_path, ModelMetrics::new())
            .unwrap()
    };

    let reopened = ModelRegistry::open(dir.path()).unwrap();
    assert_eq!(
        reopened.current_version("pomodoro_recommender").unwrap(),
        version
    );
    assert_eq!(
        reopened.resolve_path("pomodoro_recommender", None).unwrap(),
        artifact_path
    );
}

#[test]
fn test_corrupt_artifact_fails_to_load_with_clear_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "not json").unwrap();

    let error = ModelArtifact::load(&path).unwrap_err();
    assert!(!error.to_string().is_empty());
}
