// ABOUTME: Pomodoro duration recommendation engine with trend, model, and heuristic tiers
// ABOUTME: Extrapolates daily focus history, falls back to rule-table adjustments, explains itself
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Momentum Labs

//! Recommendation engine
//!
//! Stateless per call. Two strategies: trend-based extrapolation when at
//! least two consecutive days of focus history exist, otherwise direct
//! model prediction or the rule-table heuristic. Every path yields a
//! non-empty rationale; the confidence score communicates which tier
//! produced the result.

use crate::artifact::ModelArtifact;
use crate::constants::{confidence, duration_bounds, focus_heuristics, trend};
use crate::errors::AppResult;
use crate::features::{encode_pomodoro_features, time_features};
use crate::models::{FeatureSnapshot, Mood, Recommendation, TaskPriority};
use tracing::warn;

/// Pomodoro duration predictor
#[derive(Debug, Default)]
pub struct PomodoroEngine;

impl PomodoroEngine {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Recommend a focus/break pair for one snapshot
    ///
    /// The artifact is optional: absence routes break estimation (trend
    /// tier) or the whole prediction (model tier) to heuristics. A broken
    /// artifact at predict time degrades the same way, logged at `warn`.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the snapshot encodes to a malformed
    /// feature vector; the service boundary maps that to the fixed default.
    pub fn recommend(
        &self,
        snapshot: &FeatureSnapshot,
        priority: TaskPriority,
        artifact: Option<&ModelArtifact>,
    ) -> AppResult<Recommendation> {
        if snapshot.has_trend_history() {
            self.recommend_from_trend(snapshot, priority, artifact)
        } else {
            self.recommend_without_trend(snapshot, priority, artifact)
        }
    }

    fn recommend_from_trend(
        &self,
        snapshot: &FeatureSnapshot,
        priority: TaskPriority,
        artifact: Option<&ModelArtifact>,
    ) -> AppResult<Recommendation> {
        let focus_minutes = predict_from_trend(
            snapshot.focus_time_yesterday,
            snapshot.daily_trend,
            snapshot.avg_focus_last_3_days,
        );

        // The model only supplies the break time on this tier; the focus
        // time always comes from the trend extrapolation. Codec failures
        // propagate; artifact failures degrade to the break ratio rule.
        let model_break = match artifact {
            None => None,
            Some(artifact) => {
                let features = encode_pomodoro_features(snapshot, priority)?;
                match artifact
                    .apply_normalization(&features)
                    .and_then(|scaled| artifact.predictor.predict(scaled.as_slice()))
                {
                    Ok(outputs) if outputs.len() >= 2 => Some(outputs[1]),
                    Ok(_) => {
                        warn!("pomodoro artifact produced fewer than two outputs");
                        None
                    }
                    Err(error) => {
                        warn!(%error, "pomodoro artifact unusable, using break ratio rule");
                        None
                    }
                }
            }
        };

        let (break_minutes, tier_confidence) = match model_break {
            Some(predicted) => (
                clamp_round(
                    predicted,
                    duration_bounds::MIN_BREAK_MINUTES,
                    duration_bounds::MAX_BREAK_MINUTES,
                ),
                confidence::TREND_WITH_MODEL,
            ),
            None => (
                clamp_round(
                    focus_minutes as f64 / duration_bounds::FOCUS_TO_BREAK_RATIO,
                    duration_bounds::RATIO_MIN_BREAK_MINUTES,
                    duration_bounds::RATIO_MAX_BREAK_MINUTES,
                ),
                confidence::TREND_HEURISTIC,
            ),
        };

        Ok(Recommendation {
            focus_minutes,
            break_minutes,
            confidence: tier_confidence,
            explanation: trend_explanation(snapshot, focus_minutes),
        })
    }

    fn recommend_without_trend(
        &self,
        snapshot: &FeatureSnapshot,
        priority: TaskPriority,
        artifact: Option<&ModelArtifact>,
    ) -> AppResult<Recommendation> {
        if let Some(artifact) = artifact {
            let features = encode_pomodoro_features(snapshot, priority)?;
            match artifact
                .apply_normalization(&features)
                .and_then(|scaled| artifact.predictor.predict(scaled.as_slice()))
            {
                Ok(outputs) if outputs.len() >= 2 => {
                    let focus_minutes = clamp_round(
                        outputs[0],
                        duration_bounds::MIN_FOCUS_MINUTES,
                        duration_bounds::MAX_FOCUS_MINUTES,
                    );
                    let break_minutes = clamp_round(
                        outputs[1],
                        duration_bounds::MIN_BREAK_MINUTES,
                        duration_bounds::MAX_BREAK_MINUTES,
                    );
                    return Ok(Recommendation {
                        focus_minutes,
                        break_minutes,
                        confidence: confidence::MODEL,
                        explanation: model_explanation(snapshot, focus_minutes, break_minutes),
                    });
                }
                Ok(_) => warn!("pomodoro artifact produced fewer than two outputs"),
                Err(error) => warn!(%error, "pomodoro artifact unusable, using rule table"),
            }
        }

        Ok(heuristic_recommendation(snapshot))
    }
}

/// Extrapolate today's focus time from the day-over-day trend
///
/// Increasing trends continue at 80% strength, decreasing ones at 50%
/// (drops are often temporary). The 3-day moving average smooths the raw
/// prediction before clamping to [15, 60] and rounding to 5-minute steps.
#[must_use]
pub fn predict_from_trend(yesterday: f64, daily_trend: f64, avg_3days: f64) -> i64 {
    let mut predicted = if daily_trend > 0.0 {
        yesterday + daily_trend * trend::UPWARD_CONTINUATION
    } else if daily_trend < 0.0 {
        yesterday + daily_trend * trend::DOWNWARD_CONTINUATION
    } else if yesterday > 0.0 {
        yesterday
    } else {
        avg_3days
    };

    if avg_3days > 0.0 {
        predicted =
            predicted * trend::PREDICTION_WEIGHT + avg_3days * trend::MOVING_AVERAGE_WEIGHT;
    }

    predicted = predicted.clamp(
        duration_bounds::TREND_MIN_FOCUS_MINUTES,
        duration_bounds::MAX_FOCUS_MINUTES,
    );

    // Round to the nearest 5 minutes for cleaner values
    let rounded =
        (predicted / duration_bounds::FOCUS_ROUNDING_MINUTES).round() * duration_bounds::FOCUS_ROUNDING_MINUTES;
    rounded as i64
}

fn clamp_round(value: f64, min: f64, max: f64) -> i64 {
    value.round().clamp(min, max) as i64
}

fn trend_explanation(snapshot: &FeatureSnapshot, focus_minutes: i64) -> String {
    let yesterday = snapshot.focus_time_yesterday as i64;
    let day_before = snapshot.focus_time_day_before as i64;

    let mut sentences = if snapshot.daily_trend > trend::NOTABLE_TREND_MINUTES {
        vec![
            format!("Your focus time is increasing (from {day_before}min to {yesterday}min)."),
            format!("Predicted {focus_minutes} minutes to continue building momentum."),
        ]
    } else if snapshot.daily_trend < -trend::NOTABLE_TREND_MINUTES {
        vec![
            format!("Your focus time decreased recently ({day_before}min to {yesterday}min)."),
            format!("Recommended {focus_minutes} minutes to help you rebuild focus gradually."),
        ]
    } else {
        vec![format!(
            "Based on your recent pattern ({yesterday}min yesterday), recommended {focus_minutes} minutes for today."
        )]
    };

    if snapshot.current_streak > 3 {
        sentences.push(format!(
            "You're on a {}-day streak.",
            snapshot.current_streak
        ));
    }

    sentences.join(" ")
}

fn model_explanation(
    snapshot: &FeatureSnapshot,
    focus_minutes: i64,
    break_minutes: i64,
) -> String {
    let mut factors = Vec::new();

    if snapshot.current_streak > 7 {
        factors.push(format!(
            "You're on a {}-day streak!",
            snapshot.current_streak
        ));
    }

    if snapshot.completion_rate > 80.0 {
        factors.push("Your high completion rate suggests you can handle longer focus sessions.".to_string());
    } else if snapshot.completion_rate < 50.0 {
        factors.push("Shorter sessions might help improve your focus.".to_string());
    }

    if snapshot.recent_mood.is_stressed() {
        factors.push("Since you're feeling a bit low, shorter sessions are recommended.".to_string());
    } else if snapshot.recent_mood == Mood::Happy {
        factors.push("Your positive mood suggests you're ready for productive work!".to_string());
    }

    if snapshot.sessions_today > 5 {
        factors.push("You've done many sessions today - consider longer breaks.".to_string());
    }

    if time_features(snapshot.hour_of_day, snapshot.day_of_week).is_night {
        factors.push("It's late - shorter sessions are better for your rest.".to_string());
    }

    let base =
        format!("Recommended {focus_minutes}-minute focus sessions with {break_minutes}-minute breaks");

    if factors.is_empty() {
        base
    } else {
        format!("{base}. {}", factors[..factors.len().min(2)].join(" "))
    }
}

/// Rule-table fallback used when no artifact exists and there is no trend
/// history: starts at the standard 25/5 and applies additive adjustments
fn heuristic_recommendation(snapshot: &FeatureSnapshot) -> Recommendation {
    let mut focus: i64 = crate::constants::defaults::FOCUS_MINUTES;
    let mut break_minutes: i64 = crate::constants::defaults::BREAK_MINUTES;

    if snapshot.current_streak > focus_heuristics::LONG_STREAK_THRESHOLD {
        focus = (focus + focus_heuristics::STREAK_FOCUS_BONUS).min(focus_heuristics::STREAK_FOCUS_CAP);
    }

    if snapshot.recent_mood.is_stressed() {
        focus = (focus - focus_heuristics::LOW_MOOD_FOCUS_PENALTY)
            .max(focus_heuristics::LOW_MOOD_FOCUS_FLOOR);
        break_minutes = (break_minutes + focus_heuristics::LOW_MOOD_BREAK_BONUS)
            .min(focus_heuristics::LOW_MOOD_BREAK_CAP);
    } else if snapshot.recent_mood == Mood::Happy {
        focus = (focus + focus_heuristics::HAPPY_FOCUS_BONUS).min(focus_heuristics::HAPPY_FOCUS_CAP);
    }

    if time_features(snapshot.hour_of_day, snapshot.day_of_week).is_night {
        focus = (focus - focus_heuristics::NIGHT_FOCUS_PENALTY)
            .max(focus_heuristics::NIGHT_FOCUS_FLOOR);
    }

    let explanation = format!(
        "Based on your activity pattern: {}min avg focus, {}min avg break",
        snapshot.avg_focus_duration as i64, snapshot.avg_break_duration as i64
    );

    Recommendation {
        focus_minutes: focus,
        break_minutes,
        confidence: confidence::HEURISTIC,
        explanation,
    }
}
