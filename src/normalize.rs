// ABOUTME: Z-score feature normalization with persisted or computed statistics
// ABOUTME: Guards constant features with an epsilon and documents the single-sample case
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Momentum Labs

//! Feature normalization
//!
//! Applies z-score scaling `(x - mean) / (std + ε)` with statistics from a
//! persisted artifact. When no statistics are supplied they are computed
//! from the single input vector, which makes the scaling a near no-op (each
//! feature is its own mean). That degenerate path mirrors training-time
//! behavior for artifacts registered without statistics; it is a documented
//! limitation, not something to silently correct at inference time.

/// Guard against division by zero for constant features
pub const EPSILON: f64 = 1e-8;

/// Z-score normalize a feature vector
///
/// Returns the scaled vector along with the statistics that were applied, so
/// callers computing statistics on the fly can persist them.
#[must_use]
pub fn normalize(
    values: &[f64],
    mean: Option<&[f64]>,
    std: Option<&[f64]>,
) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let (mean, std) = match (mean, std) {
        (Some(mean), Some(std)) if mean.len() == values.len() && std.len() == values.len() => {
            (mean.to_vec(), std.to_vec())
        }
        // Degenerate single-sample statistics: mean = x, std = 0
        _ => (values.to_vec(), vec![0.0; values.len()]),
    };

    let scaled = values
        .iter()
        .zip(mean.iter().zip(std.iter()))
        .map(|(value, (m, s))| (value - m) / (s + EPSILON))
        .collect();

    (scaled, mean, std)
}
