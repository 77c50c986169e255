// ABOUTME: Heuristic constants for Pomodoro recommendation and distraction risk scoring
// ABOUTME: Groups duration bounds, trend weights, and risk adjustments used across the engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Momentum Labs

//! Heuristic constants for the inference engine
//!
//! Every magic number in the recommendation and risk paths lives here so the
//! duration clamps and risk adjustments stay consistent between the engines,
//! the explanations, and the tests. Changing a constant changes model
//! behavior but never the feature vector contract (see `features`).

/// Registered model names in the registry
pub mod model_names {
    /// Multi-output regressor predicting (focus, break) minutes
    pub const POMODORO_RECOMMENDER: &str = "pomodoro_recommender";

    /// Binary classifier predicting distraction probability
    pub const DISTRACTION_PREDICTOR: &str = "distraction_predictor";
}

/// Neutral defaults used when a user has no historical data
pub mod defaults {
    /// Standard Pomodoro focus block in minutes
    pub const FOCUS_MINUTES: i64 = 25;

    /// Standard short break in minutes
    pub const BREAK_MINUTES: i64 = 5;

    /// Completion rate assumed for users with no task history (percent)
    pub const COMPLETION_RATE: f64 = 50.0;

    /// Average focus duration assumed with no session history (minutes)
    pub const AVG_FOCUS_MINUTES: f64 = 25.0;

    /// Average break duration assumed with no session history (minutes)
    pub const AVG_BREAK_MINUTES: f64 = 5.0;

    /// Midday hour assumed when the snapshot carries no clock context
    pub const HOUR_OF_DAY: u32 = 12;

    /// Starting gamification level
    pub const LEVEL: u32 = 1;
}

/// Focus/break duration bounds per prediction tier
pub mod duration_bounds {
    /// Absolute lower bound on recommended focus minutes (model tier)
    pub const MIN_FOCUS_MINUTES: f64 = 5.0;

    /// Absolute upper bound on recommended focus minutes
    pub const MAX_FOCUS_MINUTES: f64 = 60.0;

    /// Trend-tier lower bound; trend extrapolation never suggests micro-sessions
    pub const TREND_MIN_FOCUS_MINUTES: f64 = 15.0;

    /// Lower bound on recommended break minutes (model tier)
    pub const MIN_BREAK_MINUTES: f64 = 1.0;

    /// Upper bound on recommended break minutes
    pub const MAX_BREAK_MINUTES: f64 = 30.0;

    /// Break bounds for the focus/5 ratio rule on the trend tier
    pub const RATIO_MIN_BREAK_MINUTES: f64 = 3.0;
    pub const RATIO_MAX_BREAK_MINUTES: f64 = 15.0;

    /// Trend-tier focus values are rounded to this granularity
    pub const FOCUS_ROUNDING_MINUTES: f64 = 5.0;

    /// Standard focus-to-break ratio (25min focus : 5min break)
    pub const FOCUS_TO_BREAK_RATIO: f64 = 5.0;
}

/// Weights for trend-based extrapolation of daily focus time
pub mod trend {
    /// Continuation factor for an increasing trend (slightly conservative)
    pub const UPWARD_CONTINUATION: f64 = 0.8;

    /// Continuation factor for a decreasing trend (drops may be temporary)
    pub const DOWNWARD_CONTINUATION: f64 = 0.5;

    /// Weight of the raw trend prediction in the smoothed value
    pub const PREDICTION_WEIGHT: f64 = 0.6;

    /// Weight of the 3-day moving average in the smoothed value
    pub const MOVING_AVERAGE_WEIGHT: f64 = 0.4;

    /// Day-over-day delta beyond which the explanation calls the trend out
    pub const NOTABLE_TREND_MINUTES: f64 = 5.0;
}

/// Confidence scores communicated per prediction tier
pub mod confidence {
    /// Trend tier with a trained model supplying the break time
    pub const TREND_WITH_MODEL: f64 = 0.9;

    /// Trend tier with the ratio rule supplying the break time
    pub const TREND_HEURISTIC: f64 = 0.8;

    /// Direct model prediction without trend history
    pub const MODEL: f64 = 0.75;

    /// Rule-table fallback with no trained artifact
    pub const HEURISTIC: f64 = 0.5;

    /// Fixed default after an internal failure
    pub const DEFAULT: f64 = 0.0;
}

/// Additive adjustments in the rule-table focus/break fallback
pub mod focus_heuristics {
    /// Streak length above which focus gets extended
    pub const LONG_STREAK_THRESHOLD: u32 = 5;

    /// Focus bonus for a long streak, capped at `STREAK_FOCUS_CAP`
    pub const STREAK_FOCUS_BONUS: i64 = 5;
    pub const STREAK_FOCUS_CAP: i64 = 35;

    /// Focus penalty when the user reports a low mood, floored at `LOW_MOOD_FOCUS_FLOOR`
    pub const LOW_MOOD_FOCUS_PENALTY: i64 = 5;
    pub const LOW_MOOD_FOCUS_FLOOR: i64 = 15;

    /// Break bonus for a low mood, capped at `LOW_MOOD_BREAK_CAP`
    pub const LOW_MOOD_BREAK_BONUS: i64 = 2;
    pub const LOW_MOOD_BREAK_CAP: i64 = 10;

    /// Focus bonus for a happy mood, capped at `HAPPY_FOCUS_CAP`
    pub const HAPPY_FOCUS_BONUS: i64 = 5;
    pub const HAPPY_FOCUS_CAP: i64 = 30;

    /// Focus penalty at night, floored at `NIGHT_FOCUS_FLOOR`
    pub const NIGHT_FOCUS_PENALTY: i64 = 5;
    pub const NIGHT_FOCUS_FLOOR: i64 = 15;
}

/// Additive adjustments in the heuristic distraction probability
pub mod risk {
    /// Base distraction probability before adjustments
    pub const BASE_PROBABILITY: f64 = 0.3;

    /// Low mood (anxious/tired/sad) raises risk
    pub const LOW_MOOD_ADJUSTMENT: f64 = 0.2;

    /// Happy mood lowers risk
    pub const HAPPY_MOOD_ADJUSTMENT: f64 = -0.1;

    /// Night hours raise risk
    pub const NIGHT_ADJUSTMENT: f64 = 0.15;

    /// Afternoon slump window (inclusive) and its adjustment
    pub const SLUMP_START_HOUR: u32 = 14;
    pub const SLUMP_END_HOUR: u32 = 16;
    pub const SLUMP_ADJUSTMENT: f64 = 0.1;

    /// Weekends raise risk
    pub const WEEKEND_ADJUSTMENT: f64 = 0.1;

    /// Pending-task backlog threshold and adjustment
    pub const PENDING_TASKS_THRESHOLD: u32 = 5;
    pub const PENDING_TASKS_ADJUSTMENT: f64 = 0.15;

    /// Streak thresholds: short streaks raise risk, long streaks lower it
    pub const SHORT_STREAK_THRESHOLD: u32 = 2;
    pub const SHORT_STREAK_ADJUSTMENT: f64 = 0.1;
    pub const LONG_STREAK_THRESHOLD: u32 = 7;
    pub const LONG_STREAK_ADJUSTMENT: f64 = -0.1;

    /// Planned session length thresholds (minutes)
    pub const LONG_SESSION_MINUTES: i64 = 30;
    pub const LONG_SESSION_ADJUSTMENT: f64 = 0.1;
    pub const SHORT_SESSION_MINUTES: i64 = 15;
    pub const SHORT_SESSION_ADJUSTMENT: f64 = -0.05;

    /// Heavy session-count days raise risk
    pub const MANY_SESSIONS_THRESHOLD: u32 = 8;
    pub const MANY_SESSIONS_ADJUSTMENT: f64 = 0.15;

    /// Probability reported when inference fails entirely
    pub const FAILURE_PROBABILITY: f64 = 0.5;
}

/// Trigger attribution scores for distraction candidates
pub mod triggers {
    /// Task backlog normalizer: score = pending / 10, capped at 1.0
    pub const TASK_LOAD_NORMALIZER: f64 = 10.0;

    /// Fixed score assigned to a low mood trigger
    pub const LOW_MOOD_SCORE: f64 = 0.8;

    /// Fixed score assigned to a late-hour trigger
    pub const LATE_HOUR_SCORE: f64 = 0.7;

    /// Fixed score assigned to a weekend trigger
    pub const WEEKEND_SCORE: f64 = 0.6;

    /// Fixed score assigned to a low-streak trigger
    pub const LOW_STREAK_SCORE: f64 = 0.5;

    /// Composite stress score must exceed this to qualify as a trigger
    pub const STRESS_QUALIFYING_THRESHOLD: f64 = 0.5;
}

/// Weights for the composite scores built by the feature codec
pub mod composite_scores {
    /// Productivity score = 0.4*completion + 0.3*(streak*2) + 0.3*(level/10)
    pub const PRODUCTIVITY_COMPLETION_WEIGHT: f64 = 0.4;
    pub const PRODUCTIVITY_STREAK_WEIGHT: f64 = 0.3;
    pub const PRODUCTIVITY_STREAK_MULTIPLIER: f64 = 2.0;
    pub const PRODUCTIVITY_LEVEL_WEIGHT: f64 = 0.3;
    pub const PRODUCTIVITY_LEVEL_DIVISOR: f64 = 10.0;

    /// Stress score = 0.5*low_mood + 0.3*high_priority_backlog + 0.2*pending_backlog
    pub const STRESS_MOOD_WEIGHT: f64 = 0.5;
    pub const STRESS_HIGH_PRIORITY_WEIGHT: f64 = 0.3;
    pub const STRESS_PENDING_WEIGHT: f64 = 0.2;

    /// Backlog thresholds feeding the stress score
    pub const STRESS_HIGH_PRIORITY_THRESHOLD: u32 = 3;
    pub const STRESS_PENDING_THRESHOLD: u32 = 5;
}

/// Time-of-day boundaries for the day-part flags
pub mod day_parts {
    /// Morning: 06:00-11:59
    pub const MORNING_START: u32 = 6;

    /// Afternoon: 12:00-17:59
    pub const AFTERNOON_START: u32 = 12;

    /// Evening: 18:00-21:59
    pub const EVENING_START: u32 = 18;

    /// Night: 22:00-05:59
    pub const NIGHT_START: u32 = 22;

    /// Saturday/Sunday when weekday numbering starts at Monday = 0
    pub const WEEKEND_FIRST_DAY: u32 = 5;
}
