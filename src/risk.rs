// ABOUTME: Distraction risk predictor combining a classifier or additive heuristic with triggers
// ABOUTME: Produces a clamped probability and attributes the top contributing trigger
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Momentum Labs

//! Risk predictor
//!
//! Estimates the probability that a planned session gets derailed. With a
//! trained classifier the positive-class probability is used directly;
//! otherwise an additive heuristic scores the snapshot. Trigger attribution
//! is independent of the probability source: candidates are scored in a
//! fixed order and the first strict maximum wins, so ties resolve
//! deterministically.

use crate::artifact::ModelArtifact;
use crate::constants::{risk, triggers};
use crate::errors::AppResult;
use crate::features::{encode_distraction_features, stress_score, time_features};
use crate::models::{DistractionTrigger, FeatureSnapshot, Mood, RiskEstimate};
use tracing::warn;

/// Distraction probability estimator with trigger attribution
#[derive(Debug, Default)]
pub struct DistractionPredictor;

impl DistractionPredictor {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Predict distraction risk for a planned session length (minutes)
    ///
    /// # Errors
    /// Returns `InvalidInput` if the snapshot encodes to a malformed
    /// feature vector; the service boundary maps that to the fixed default.
    pub fn predict(
        &self,
        snapshot: &FeatureSnapshot,
        planned_duration: i64,
        artifact: Option<&ModelArtifact>,
    ) -> AppResult<RiskEstimate> {
        let features = encode_distraction_features(snapshot, planned_duration)?;

        let probability = match artifact {
            Some(artifact) => {
                match artifact
                    .apply_normalization(&features)
                    .and_then(|scaled| artifact.predictor.predict_proba(scaled.as_slice()))
                {
                    Ok(probability) => probability.clamp(0.0, 1.0),
                    Err(error) => {
                        warn!(%error, "distraction artifact unusable, using heuristic scoring");
                        heuristic_probability(snapshot, planned_duration)
                    }
                }
            }
            None => heuristic_probability(snapshot, planned_duration),
        };

        Ok(RiskEstimate {
            probability: round3(probability),
            top_trigger: identify_trigger(snapshot),
        })
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Additive heuristic distraction probability, clamped to [0, 1]
#[must_use]
pub fn heuristic_probability(snapshot: &FeatureSnapshot, planned_duration: i64) -> f64 {
    let mut probability = risk::BASE_PROBABILITY;

    if snapshot.recent_mood.is_low() {
        probability += risk::LOW_MOOD_ADJUSTMENT;
    } else if snapshot.recent_mood == Mood::Happy {
        probability += risk::HAPPY_MOOD_ADJUSTMENT;
    }

    let time = time_features(snapshot.hour_of_day, snapshot.day_of_week);
    if time.is_night {
        probability += risk::NIGHT_ADJUSTMENT;
    } else if (risk::SLUMP_START_HOUR..=risk::SLUMP_END_HOUR).contains(&snapshot.hour_of_day) {
        probability += risk::SLUMP_ADJUSTMENT;
    }

    if snapshot.is_weekend {
        probability += risk::WEEKEND_ADJUSTMENT;
    }

    if snapshot.pending_tasks > risk::PENDING_TASKS_THRESHOLD {
        probability += risk::PENDING_TASKS_ADJUSTMENT;
    }

    if snapshot.current_streak < risk::SHORT_STREAK_THRESHOLD {
        probability += risk::SHORT_STREAK_ADJUSTMENT;
    } else if snapshot.current_streak > risk::LONG_STREAK_THRESHOLD {
        probability += risk::LONG_STREAK_ADJUSTMENT;
    }

    if planned_duration > risk::LONG_SESSION_MINUTES {
        probability += risk::LONG_SESSION_ADJUSTMENT;
    } else if planned_duration < risk::SHORT_SESSION_MINUTES {
        probability += risk::SHORT_SESSION_ADJUSTMENT;
    }

    if snapshot.sessions_today > risk::MANY_SESSIONS_THRESHOLD {
        probability += risk::MANY_SESSIONS_ADJUSTMENT;
    }

    probability.clamp(0.0, 1.0)
}

/// Attribute the top distraction trigger for a snapshot
///
/// Candidates are considered in a fixed order (task load, mood, late hour,
/// weekend, streak, stress); only strictly higher scores displace an
/// earlier candidate. `None` when nothing qualifies.
#[must_use]
pub fn identify_trigger(snapshot: &FeatureSnapshot) -> DistractionTrigger {
    let mut candidates: Vec<(DistractionTrigger, f64)> = Vec::new();

    if snapshot.pending_tasks > risk::PENDING_TASKS_THRESHOLD {
        let score = (f64::from(snapshot.pending_tasks) / triggers::TASK_LOAD_NORMALIZER).min(1.0);
        candidates.push((DistractionTrigger::HighTaskLoad, score));
    }

    if snapshot.recent_mood.is_low() {
        candidates.push((DistractionTrigger::LowMood, triggers::LOW_MOOD_SCORE));
    }

    if time_features(snapshot.hour_of_day, snapshot.day_of_week).is_night {
        candidates.push((DistractionTrigger::LateHour, triggers::LATE_HOUR_SCORE));
    }

    if snapshot.is_weekend {
        candidates.push((DistractionTrigger::Weekend, triggers::WEEKEND_SCORE));
    }

    if snapshot.current_streak < risk::SHORT_STREAK_THRESHOLD {
        candidates.push((DistractionTrigger::LowStreak, triggers::LOW_STREAK_SCORE));
    }

    // Composite stress uses the same weighting as the codec's stress score
    let stress = stress_score(snapshot);
    if stress > triggers::STRESS_QUALIFYING_THRESHOLD {
        candidates.push((DistractionTrigger::Stress, stress));
    }

    let mut top: Option<(DistractionTrigger, f64)> = None;
    for (trigger, score) in candidates {
        match top {
            Some((_, best)) if score <= best => {}
            _ => top = Some((trigger, score)),
        }
    }

    top.map_or(DistractionTrigger::None, |(trigger, _)| trigger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::Predictor;
    use crate::features::DISTRACTION_FEATURE_COUNT;

    #[test]
    fn test_probability_base_case() {
        let mut snapshot = FeatureSnapshot::neutral(1);
        snapshot.current_streak = 3;

        // Only base probability applies at a neutral midday weekday
        let probability = heuristic_probability(&snapshot, 25);
        assert!((probability - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_probability_stacked_adjustments() {
        let mut snapshot = FeatureSnapshot::neutral(1);
        snapshot.recent_mood = Mood::Anxious;
        snapshot.pending_tasks = 8;
        snapshot.current_streak = 1;
        snapshot.hour_of_day = 23;

        // 0.3 + 0.2 (mood) + 0.15 (night) + 0.15 (pending) + 0.1 (streak)
        let probability = heuristic_probability(&snapshot, 25);
        assert!((probability - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_probability_is_always_in_unit_interval() {
        let mut snapshot = FeatureSnapshot::neutral(1);
        snapshot.recent_mood = Mood::Sad;
        snapshot.pending_tasks = 20;
        snapshot.sessions_today = 12;
        snapshot.hour_of_day = 2;
        snapshot.is_weekend = true;
        snapshot.current_streak = 0;
        assert!(heuristic_probability(&snapshot, 60) <= 1.0);

        let mut calm = FeatureSnapshot::neutral(1);
        calm.recent_mood = Mood::Happy;
        calm.current_streak = 10;
        assert!(heuristic_probability(&calm, 10) >= 0.0);
    }

    #[test]
    fn test_trigger_none_when_nothing_qualifies() {
        let mut snapshot = FeatureSnapshot::neutral(1);
        snapshot.current_streak = 5;
        assert_eq!(identify_trigger(&snapshot), DistractionTrigger::None);
    }

    #[test]
    fn test_task_load_wins_tie_against_low_mood() {
        // high_task_load = 8/10 = 0.8 ties low_mood = 0.8; fixed candidate
        // order keeps task load on top
        let mut snapshot = FeatureSnapshot::neutral(1);
        snapshot.recent_mood = Mood::Anxious;
        snapshot.pending_tasks = 8;
        snapshot.current_streak = 1;
        snapshot.hour_of_day = 23;

        assert_eq!(identify_trigger(&snapshot), DistractionTrigger::HighTaskLoad);
    }

    #[test]
    fn test_stress_displaces_task_load_when_higher() {
        let mut snapshot = FeatureSnapshot::neutral(1);
        snapshot.recent_mood = Mood::Anxious;
        snapshot.pending_tasks = 6; // task load 0.6
        snapshot.high_priority_tasks = 4;
        snapshot.current_streak = 5;

        // stress = 0.5 + 0.3 + 0.2 = 1.0 beats everything
        assert_eq!(identify_trigger(&snapshot), DistractionTrigger::Stress);
    }

    #[test]
    fn test_low_streak_trigger() {
        let mut snapshot = FeatureSnapshot::neutral(1);
        snapshot.current_streak = 0;
        assert_eq!(identify_trigger(&snapshot), DistractionTrigger::LowStreak);
    }

    #[test]
    fn test_classifier_probability_is_clamped_and_rounded() {
        let predictor = DistractionPredictor::new();
        let snapshot = FeatureSnapshot::neutral(1);
        let artifact = ModelArtifact {
            predictor: Predictor::LogisticRegression {
                weights: vec![0.0; DISTRACTION_FEATURE_COUNT],
                intercept: 2.0,
            },
            scaler: None,
            feature_mean: None,
            feature_std: None,
        };

        let estimate = predictor.predict(&snapshot, 25, Some(&artifact)).unwrap();
        // sigmoid(2.0) = 0.8807970779..., rounded to 3 decimals
        assert!((estimate.probability - 0.881).abs() < 1e-12);
        assert!((0.0..=1.0).contains(&estimate.probability));
    }

    #[test]
    fn test_broken_artifact_falls_back_to_heuristic() {
        let predictor = DistractionPredictor::new();
        let mut snapshot = FeatureSnapshot::neutral(1);
        snapshot.current_streak = 3;

        let artifact = ModelArtifact {
            predictor: Predictor::LogisticRegression {
                weights: vec![0.0; 2], // wrong feature count
                intercept: 0.0,
            },
            scaler: None,
            feature_mean: None,
            feature_std: None,
        };

        let estimate = predictor.predict(&snapshot, 25, Some(&artifact)).unwrap();
        assert!((estimate.probability - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_heuristic_estimate_end_to_end() {
        let predictor = DistractionPredictor::new();
        let mut snapshot = FeatureSnapshot::neutral(1);
        snapshot.recent_mood = Mood::Anxious;
        snapshot.pending_tasks = 8;
        snapshot.current_streak = 1;
        snapshot.hour_of_day = 23;

        let estimate = predictor.predict(&snapshot, 25, None).unwrap();
        assert!(estimate.probability >= 0.9);
        assert_eq!(estimate.top_trigger, DistractionTrigger::HighTaskLoad);
    }
}
