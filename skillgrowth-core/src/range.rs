//! Tail range aggregation over labeled series.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{EMPTY_PLACEHOLDER, TAIL_START_INDEX};
use crate::data::Bucket;
use crate::resolve::SeriesResolver;

/// `(min, max)` summary of a set of values; both are `None` when nothing was selected.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RangeSummary {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RangeSummary {
    pub const EMPTY: Self = Self {
        min: None,
        max: None,
    };

    pub const ZERO: Self = Self {
        min: Some(0.0),
        max: Some(0.0),
    };

    #[must_use]
    pub fn of<I: IntoIterator<Item = f64>>(values: I) -> Self {
        values.into_iter().fold(Self::EMPTY, |acc, v| Self {
            min: Some(acc.min.map_or(v, |m| m.min(v))),
            max: Some(acc.max.map_or(v, |m| m.max(v))),
        })
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.min.is_none() || self.max.is_none()
    }
}

impl fmt::Display for RangeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) => write!(f, "{min} - {max}"),
            _ => f.write_str(EMPTY_PLACEHOLDER),
        }
    }
}

/// Stabilized tail of a progression: everything from `tail_start` on, or
/// the whole series when it is too short to have a tail.
#[must_use]
pub fn tail(values: &[f64], tail_start: usize) -> &[f64] {
    if values.len() > tail_start {
        &values[tail_start..]
    } else {
        values
    }
}

/// Min/max over the tails of every series under `keys`.
pub fn pick_range_with<R, K>(
    resolver: &R,
    skill_id: &str,
    bucket: &Bucket,
    keys: K,
    tail_start: usize,
) -> RangeSummary
where
    R: SeriesResolver + ?Sized,
    K: IntoIterator,
    K::Item: AsRef<str>,
{
    let mut range = RangeSummary::EMPTY;
    for key in keys {
        for series in bucket.get(key.as_ref()).unwrap_or(&[]) {
            let values = resolver.values(skill_id, series);
            let selected = RangeSummary::of(tail(&values, tail_start).iter().copied());
            range = range.merge(selected);
        }
    }
    range
}

/// [`pick_range_with`] using the default tail start (the 10th level).
pub fn pick_range<R, K>(resolver: &R, skill_id: &str, bucket: &Bucket, keys: K) -> RangeSummary
where
    R: SeriesResolver + ?Sized,
    K: IntoIterator,
    K::Item: AsRef<str>,
{
    pick_range_with(resolver, skill_id, bucket, keys, TAIL_START_INDEX)
}

impl RangeSummary {
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        let pick = |a: Option<f64>, b: Option<f64>, f: fn(f64, f64) -> f64| match (a, b) {
            (Some(a), Some(b)) => Some(f(a, b)),
            (a, b) => a.or(b),
        };
        Self {
            min: pick(self.min, other.min, f64::min),
            max: pick(self.max, other.max, f64::max),
        }
    }
}
