// ABOUTME: Feature codec mapping user snapshots to fixed-order numeric vectors
// ABOUTME: Categorical encoders, day-part flags, and composite productivity/stress scores
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Momentum Labs

//! Feature codec
//!
//! Deterministic mapping from a `FeatureSnapshot` plus request parameters to
//! a fixed-length numeric vector. Field order and length are a contract with
//! every trained artifact: reordering or inserting a field invalidates all
//! registered models for that family.
//!
//! Pomodoro vector layout (23 fields):
//! ```text
//!  0 avg_focus_duration       8 focus_time_day_before    16 is_morning
//!  1 avg_break_duration       9 focus_time_three_days_ago 17 is_afternoon
//!  2 completion_rate         10 daily_trend               18 is_evening
//!  3 current_streak          11 avg_focus_last_3_days     19 pending_tasks
//!  4 level                   12 mood                      20 high_priority_tasks
//!  5 total_sessions          13 hour                      21 task_priority
//!  6 sessions_today          14 day_of_week               22 productivity_score
//!  7 focus_time_yesterday    15 is_weekend
//! ```
//!
//! Distraction vector layout (13 fields):
//! ```text
//!  0 planned_duration   5 completion_rate   10 pending_tasks
//!  1 sessions_today     6 mood              11 high_priority_tasks
//!  2 avg_session_dur    7 hour              12 stress_score
//!  3 current_streak     8 is_weekend
//!  4 level              9 is_afternoon
//! ```

use crate::constants::{composite_scores, day_parts};
use crate::errors::{AppError, AppResult};
use crate::models::{FeatureSnapshot, TaskPriority};
use serde::{Deserialize, Serialize};

/// Number of fields in the Pomodoro feature vector
pub const POMODORO_FEATURE_COUNT: usize = 23;

/// Number of fields in the distraction feature vector
pub const DISTRACTION_FEATURE_COUNT: usize = 13;

/// Fixed-order numeric encoding of a snapshot for model consumption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    fn new(values: Vec<f64>) -> AppResult<Self> {
        for (index, value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(AppError::invalid_input(format!(
                    "feature {index} is not a finite number: {value}"
                )));
            }
        }
        Ok(Self { values })
    }

    /// Feature values in contract order
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Number of features
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replace the values with a scaled copy, preserving length
    pub(crate) fn with_values(&self, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), self.values.len());
        Self { values }
    }
}

/// Mutually exclusive day-part flags plus the weekend flag
#[derive(Debug, Clone, Copy)]
pub struct TimeFeatures {
    pub is_weekend: bool,
    pub is_morning: bool,
    pub is_afternoon: bool,
    pub is_evening: bool,
    pub is_night: bool,
}

/// Derive day-part and weekend flags from the clock context
#[must_use]
pub fn time_features(hour: u32, day_of_week: u32) -> TimeFeatures {
    TimeFeatures {
        is_weekend: day_of_week >= day_parts::WEEKEND_FIRST_DAY,
        is_morning: (day_parts::MORNING_START..day_parts::AFTERNOON_START).contains(&hour),
        is_afternoon: (day_parts::AFTERNOON_START..day_parts::EVENING_START).contains(&hour),
        is_evening: (day_parts::EVENING_START..day_parts::NIGHT_START).contains(&hour),
        is_night: hour >= day_parts::NIGHT_START || hour < day_parts::MORNING_START,
    }
}

/// Composite productivity score from completion rate, streak, and level
#[must_use]
pub fn productivity_score(snapshot: &FeatureSnapshot) -> f64 {
    snapshot.completion_rate * composite_scores::PRODUCTIVITY_COMPLETION_WEIGHT
        + f64::from(snapshot.current_streak)
            * composite_scores::PRODUCTIVITY_STREAK_MULTIPLIER
            * composite_scores::PRODUCTIVITY_STREAK_WEIGHT
        + (f64::from(snapshot.level) / composite_scores::PRODUCTIVITY_LEVEL_DIVISOR)
            * composite_scores::PRODUCTIVITY_LEVEL_WEIGHT
}

/// Composite stress score from mood and task backlog
#[must_use]
pub fn stress_score(snapshot: &FeatureSnapshot) -> f64 {
    let mood_component = if snapshot.recent_mood.is_stressed() {
        composite_scores::STRESS_MOOD_WEIGHT
    } else {
        0.0
    };
    let high_priority_component =
        if snapshot.high_priority_tasks > composite_scores::STRESS_HIGH_PRIORITY_THRESHOLD {
            composite_scores::STRESS_HIGH_PRIORITY_WEIGHT
        } else {
            0.0
        };
    let pending_component = if snapshot.pending_tasks > composite_scores::STRESS_PENDING_THRESHOLD {
        composite_scores::STRESS_PENDING_WEIGHT
    } else {
        0.0
    };
    mood_component + high_priority_component + pending_component
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Encode the Pomodoro recommendation feature vector
///
/// Pure function: identical snapshot and priority always yield a
/// bit-identical vector.
///
/// # Errors
/// Returns `AppError::InvalidInput` if any snapshot field is non-finite.
pub fn encode_pomodoro_features(
    snapshot: &FeatureSnapshot,
    priority: TaskPriority,
) -> AppResult<FeatureVector> {
    let time = time_features(snapshot.hour_of_day, snapshot.day_of_week);

    let values = vec![
        snapshot.avg_focus_duration,
        snapshot.avg_break_duration,
        snapshot.completion_rate,
        f64::from(snapshot.current_streak),
        f64::from(snapshot.level),
        f64::from(snapshot.total_sessions),
        f64::from(snapshot.sessions_today),
        snapshot.focus_time_yesterday,
        snapshot.focus_time_day_before,
        snapshot.focus_time_three_days_ago,
        snapshot.daily_trend,
        snapshot.avg_focus_last_3_days,
        snapshot.recent_mood.encode() as f64,
        f64::from(snapshot.hour_of_day),
        f64::from(snapshot.day_of_week),
        flag(time.is_weekend),
        flag(time.is_morning),
        flag(time.is_afternoon),
        flag(time.is_evening),
        f64::from(snapshot.pending_tasks),
        f64::from(snapshot.high_priority_tasks),
        priority.encode() as f64,
        productivity_score(snapshot),
    ];
    debug_assert_eq!(values.len(), POMODORO_FEATURE_COUNT);

    FeatureVector::new(values)
}

/// Encode the distraction prediction feature vector
///
/// # Errors
/// Returns `AppError::InvalidInput` if any snapshot field is non-finite.
pub fn encode_distraction_features(
    snapshot: &FeatureSnapshot,
    planned_duration: i64,
) -> AppResult<FeatureVector> {
    let time = time_features(snapshot.hour_of_day, snapshot.day_of_week);

    let values = vec![
        planned_duration as f64,
        f64::from(snapshot.sessions_today),
        snapshot.avg_session_duration,
        f64::from(snapshot.current_streak),
        f64::from(snapshot.level),
        snapshot.completion_rate,
        snapshot.recent_mood.encode() as f64,
        f64::from(snapshot.hour_of_day),
        flag(time.is_weekend),
        flag(time.is_afternoon),
        f64::from(snapshot.pending_tasks),
        f64::from(snapshot.high_priority_tasks),
        stress_score(snapshot),
    ];
    debug_assert_eq!(values.len(), DISTRACTION_FEATURE_COUNT);

    FeatureVector::new(values)
}
