//! Progression analysis: level diffs, linearity, trend and jump detection.
use crate::constants::LINEAR_DIFF_DECIMALS;
use crate::data::{Analysis, Trend, ValuePoint};
use crate::numbers::{level_from_position, position_from_level, round_to};

/// Differences between consecutive values.
#[must_use]
pub fn diffs(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}

/// A progression is linear when every step is identical (at 8 decimals).
#[must_use]
pub fn is_linear(diffs: &[f64]) -> bool {
    let Some((first, rest)) = diffs.split_first() else {
        return false;
    };
    let first = round_to(*first, LINEAR_DIFF_DECIMALS);
    rest.iter()
        .all(|d| round_to(*d, LINEAR_DIFF_DECIMALS).total_cmp(&first).is_eq())
}

#[must_use]
pub fn trend(diffs: &[f64]) -> Trend {
    if diffs.is_empty() {
        Trend::Mixed
    } else if diffs.iter().all(|d| *d >= 0.0) {
        Trend::Increasing
    } else if diffs.iter().all(|d| *d <= 0.0) {
        Trend::Decreasing
    } else {
        Trend::Mixed
    }
}

/// Levels whose step up is at least `threshold` times the median step size.
///
/// The median is the upper median of the absolute diffs. A diff at
/// position `i` describes the step into level `i + 2`.
#[must_use]
pub fn jump_points(diffs: &[f64], threshold: f64) -> Vec<u32> {
    if diffs.is_empty() {
        return Vec::new();
    }
    let mut magnitudes: Vec<f64> = diffs.iter().map(|d| d.abs()).collect();
    magnitudes.sort_by(f64::total_cmp);
    let median = magnitudes[magnitudes.len() / 2];
    if median <= 0.0 {
        return Vec::new();
    }
    diffs
        .iter()
        .enumerate()
        .filter(|(_, d)| **d > 0.0 && **d >= median * threshold)
        .map(|(i, _)| level_from_position(i + 1))
        .collect()
}

/// Level-by-level points for a raw progression, with jump flags applied.
#[must_use]
pub fn value_points(values: &[f64], threshold: f64) -> Vec<ValuePoint> {
    let mut points: Vec<ValuePoint> = values
        .iter()
        .enumerate()
        .map(|(i, value)| ValuePoint {
            level_index: level_from_position(i),
            value: *value,
            diff_to_prev: i.checked_sub(1).map(|prev| value - values[prev]),
            is_jump: false,
        })
        .collect();
    for level in jump_points(&diffs(values), threshold) {
        if let Some(point) = position_from_level(level).and_then(|p| points.get_mut(p)) {
            point.is_jump = true;
        }
    }
    points
}

#[must_use]
pub fn analyze(values: &[f64], threshold: f64) -> Analysis {
    let ds = diffs(values);
    Analysis {
        is_linear: is_linear(&ds),
        trend: trend(&ds),
        jump_points: jump_points(&ds, threshold),
        min: values.iter().copied().reduce(f64::min),
        max: values.iter().copied().reduce(f64::max),
        count: values.len(),
    }
}
