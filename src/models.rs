// ABOUTME: Core data types for the inference engine: feature snapshots and prediction results
// ABOUTME: Defines FeatureSnapshot, mood/priority/trigger enums, Recommendation, and RiskEstimate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Momentum Labs

//! Data model for the inference core
//!
//! `FeatureSnapshot` is a fixed structured record rather than a dynamic map:
//! every field has an explicit neutral default, so a partial document from
//! the persistence collaborator deserializes without errors and without
//! ad-hoc key lookups.

use crate::constants::defaults;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Most recent self-reported mood for a user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Calm,
    #[default]
    Neutral,
    Tired,
    Anxious,
    Sad,
    /// Unrecognized mood labels encode as neutral
    #[serde(other)]
    Other,
}

impl Mood {
    /// Ordered integer encoding used by the feature codec
    #[must_use]
    pub const fn encode(self) -> i64 {
        match self {
            Self::Happy => 2,
            Self::Calm => 1,
            Self::Neutral | Self::Other => 0,
            Self::Tired => -1,
            Self::Anxious | Self::Sad => -2,
        }
    }

    /// Moods that feed the composite stress score
    #[must_use]
    pub const fn is_stressed(self) -> bool {
        matches!(self, Self::Anxious | Self::Tired)
    }

    /// Moods treated as "low" by the risk heuristics
    #[must_use]
    pub const fn is_low(self) -> bool {
        matches!(self, Self::Anxious | Self::Tired | Self::Sad)
    }
}

/// Priority of the task the user is about to work on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    /// Integer encoding used by the feature codec
    #[must_use]
    pub const fn encode(self) -> i64 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

/// Point-in-time summary of one user's recent activity
///
/// Produced fresh per request by the persistence collaborator and treated as
/// immutable by the core. Daily focus totals are in minutes; `daily_trend`
/// is yesterday minus the day before when both are known.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSnapshot {
    pub user_id: i64,
    #[serde(default)]
    pub total_sessions: u32,
    #[serde(default)]
    pub sessions_today: u32,
    #[serde(default = "default_avg_focus")]
    pub avg_session_duration: f64,
    #[serde(default = "default_avg_focus")]
    pub avg_focus_duration: f64,
    #[serde(default = "default_avg_break")]
    pub avg_break_duration: f64,
    /// Task completion rate in percent (0-100)
    #[serde(default = "default_completion_rate")]
    pub completion_rate: f64,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub recent_mood: Mood,
    #[serde(default = "default_hour")]
    pub hour_of_day: u32,
    /// Weekday with Monday = 0
    #[serde(default)]
    pub day_of_week: u32,
    #[serde(default)]
    pub is_weekend: bool,
    #[serde(default)]
    pub pending_tasks: u32,
    #[serde(default)]
    pub high_priority_tasks: u32,
    /// Total focus minutes logged yesterday (0 = no data)
    #[serde(default)]
    pub focus_time_yesterday: f64,
    #[serde(default)]
    pub focus_time_day_before: f64,
    #[serde(default)]
    pub focus_time_three_days_ago: f64,
    /// Day-over-day focus delta; positive = increasing
    #[serde(default)]
    pub daily_trend: f64,
    #[serde(default = "default_avg_focus")]
    pub avg_focus_last_3_days: f64,
}

fn default_avg_focus() -> f64 {
    defaults::AVG_FOCUS_MINUTES
}

fn default_avg_break() -> f64 {
    defaults::AVG_BREAK_MINUTES
}

fn default_completion_rate() -> f64 {
    defaults::COMPLETION_RATE
}

fn default_level() -> u32 {
    defaults::LEVEL
}

fn default_hour() -> u32 {
    defaults::HOUR_OF_DAY
}

impl FeatureSnapshot {
    /// Neutral-default snapshot for a user with no recorded history
    #[must_use]
    pub fn neutral(user_id: i64) -> Self {
        Self {
            user_id,
            total_sessions: 0,
            sessions_today: 0,
            avg_session_duration: defaults::AVG_FOCUS_MINUTES,
            avg_focus_duration: defaults::AVG_FOCUS_MINUTES,
            avg_break_duration: defaults::AVG_BREAK_MINUTES,
            completion_rate: defaults::COMPLETION_RATE,
            current_streak: 0,
            level: defaults::LEVEL,
            recent_mood: Mood::Neutral,
            hour_of_day: defaults::HOUR_OF_DAY,
            day_of_week: 0,
            is_weekend: false,
            pending_tasks: 0,
            high_priority_tasks: 0,
            focus_time_yesterday: 0.0,
            focus_time_day_before: 0.0,
            focus_time_three_days_ago: 0.0,
            daily_trend: 0.0,
            avg_focus_last_3_days: defaults::AVG_FOCUS_MINUTES,
        }
    }

    /// Whether at least two consecutive days of focus history exist,
    /// which is the precondition for the trend prediction tier
    #[must_use]
    pub fn has_trend_history(&self) -> bool {
        self.focus_time_yesterday > 0.0 && self.focus_time_day_before > 0.0
    }
}

/// Recommended Pomodoro durations with a confidence score and rationale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    /// Focus block length in minutes, within [5, 60]
    pub focus_minutes: i64,
    /// Break length in minutes, within [1, 30]
    pub break_minutes: i64,
    /// Result quality: 0.0 = hard failure, 0.5 = heuristic, 0.75-0.9 = model/trend
    pub confidence: f64,
    /// Human-readable rationale referencing the deciding factors
    pub explanation: String,
}

impl Recommendation {
    /// Fixed default returned when inference fails internally
    #[must_use]
    pub fn fallback_default() -> Self {
        Self {
            focus_minutes: defaults::FOCUS_MINUTES,
            break_minutes: defaults::BREAK_MINUTES,
            confidence: crate::constants::confidence::DEFAULT,
            explanation: "Using default Pomodoro timing due to an internal error".into(),
        }
    }
}

/// Named distraction trigger candidates, plus the two sentinel states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistractionTrigger {
    HighTaskLoad,
    LowMood,
    LateHour,
    Weekend,
    LowStreak,
    Stress,
    /// No candidate qualified
    None,
    /// Inference failed; trigger could not be attributed
    Unknown,
}

impl fmt::Display for DistractionTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::HighTaskLoad => "high_task_load",
            Self::LowMood => "low_mood",
            Self::LateHour => "late_hour",
            Self::Weekend => "weekend",
            Self::LowStreak => "low_streak",
            Self::Stress => "stress",
            Self::None => "none",
            Self::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Distraction-risk estimate for a planned session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskEstimate {
    /// Probability of distraction within [0, 1], rounded to 3 decimals
    pub probability: f64,
    /// Highest-scoring trigger candidate
    pub top_trigger: DistractionTrigger,
}

impl RiskEstimate {
    /// Fixed default returned when inference fails internally
    #[must_use]
    pub const fn fallback_default() -> Self {
        Self {
            probability: crate::constants::risk::FAILURE_PROBABILITY,
            top_trigger: DistractionTrigger::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_encoding_scale() {
        assert_eq!(Mood::Happy.encode(), 2);
        assert_eq!(Mood::Calm.encode(), 1);
        assert_eq!(Mood::Neutral.encode(), 0);
        assert_eq!(Mood::Tired.encode(), -1);
        assert_eq!(Mood::Anxious.encode(), -2);
        assert_eq!(Mood::Sad.encode(), -2);
        assert_eq!(Mood::Other.encode(), 0);
    }

    #[test]
    fn test_unrecognized_mood_deserializes_as_other() {
        let mood: Mood = serde_json::from_str("\"ecstatic\"").unwrap();
        assert_eq!(mood, Mood::Other);
        assert_eq!(mood.encode(), 0);
    }

    #[test]
    fn test_priority_encoding() {
        assert_eq!(TaskPriority::Low.encode(), 1);
        assert_eq!(TaskPriority::Medium.encode(), 2);
        assert_eq!(TaskPriority::High.encode(), 3);
        assert_eq!(TaskPriority::default().encode(), 2);
    }

    #[test]
    fn test_partial_snapshot_gets_neutral_defaults() {
        let snapshot: FeatureSnapshot = serde_json::from_str(r#"{"user_id": 7}"#).unwrap();
        assert_eq!(snapshot.avg_focus_duration, 25.0);
        assert_eq!(snapshot.avg_break_duration, 5.0);
        assert_eq!(snapshot.completion_rate, 50.0);
        assert_eq!(snapshot.current_streak, 0);
        assert_eq!(snapshot.level, 1);
        assert_eq!(snapshot.recent_mood, Mood::Neutral);
        assert_eq!(snapshot.hour_of_day, 12);
        assert_eq!(snapshot.day_of_week, 0);
        assert_eq!(snapshot.avg_focus_last_3_days, 25.0);
    }

    #[test]
    fn test_trend_history_requires_two_positive_days() {
        let mut snapshot = FeatureSnapshot::neutral(1);
        assert!(!snapshot.has_trend_history());

        snapshot.focus_time_yesterday = 30.0;
        assert!(!snapshot.has_trend_history());

        snapshot.focus_time_day_before = 20.0;
        assert!(snapshot.has_trend_history());
    }

    #[test]
    fn test_trigger_labels() {
        assert_eq!(DistractionTrigger::HighTaskLoad.to_string(), "high_task_load");
        assert_eq!(DistractionTrigger::None.to_string(), "none");
        assert_eq!(
            serde_json::to_string(&DistractionTrigger::LateHour).unwrap(),
            "\"late_hour\""
        );
    }

    #[test]
    fn test_fallback_defaults_are_well_formed() {
        let rec = Recommendation::fallback_default();
        assert_eq!(rec.focus_minutes, 25);
        assert_eq!(rec.break_minutes, 5);
        assert_eq!(rec.confidence, 0.0);
        assert!(!rec.explanation.is_empty());

        let risk = RiskEstimate::fallback_default();
        assert_eq!(risk.probability, 0.5);
        assert_eq!(risk.top_trigger, DistractionTrigger::Unknown);
    }
}
