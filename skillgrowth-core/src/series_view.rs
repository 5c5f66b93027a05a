//! Flat per-series view with label-type filtering and sorting.
//!
//! This is the derived presentation over the same snapshot as the per-skill
//! rows: one row per series, summarized over the whole progression instead
//! of the stabilized tail.
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    CONSUME_LABEL_PREFIX, DAMAGE_LABEL_MARK, RECOVER_LABEL_MARK, STRIKE_LABEL_MARK,
};
use crate::data::{LabeledSeries, Trend, ValuePoint, series_id};
use crate::numbers::cmp_desc_missing_zero;
use crate::range::RangeSummary;
use crate::resolve::SeriesResolver;
use crate::snapshot::Snapshot;
use crate::text::Query;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelType {
    Consume,
    Damage,
    Strike,
    Recover,
}

impl LabelType {
    #[must_use]
    pub fn accepts(self, label: &str) -> bool {
        match self {
            Self::Consume => label.starts_with(CONSUME_LABEL_PREFIX),
            Self::Damage => label.contains(DAMAGE_LABEL_MARK),
            Self::Strike => label.contains(STRIKE_LABEL_MARK),
            Self::Recover => label.contains(RECOVER_LABEL_MARK),
        }
    }
}

/// `None` accepts every label.
#[must_use]
pub fn filter_type(label: &str, label_type: Option<LabelType>) -> bool {
    label_type.is_none_or(|t| t.accepts(label))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLabelType(pub String);

impl fmt::Display for UnknownLabelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown label type '{}' (expected consume, damage, strike or recover)",
            self.0
        )
    }
}

impl std::error::Error for UnknownLabelType {}

impl FromStr for LabelType {
    type Err = UnknownLabelType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "consume" | "消耗" => Ok(Self::Consume),
            "damage" | "伤害" => Ok(Self::Damage),
            "strike" | "打击" => Ok(Self::Strike),
            "recover" | "恢复" => Ok(Self::Recover),
            other => Err(UnknownLabelType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Jumps,
    Max,
    Linear,
    #[default]
    Source,
}

impl SortKey {
    /// Unrecognized keys keep the source order.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "jumps" => Self::Jumps,
            "max" => Self::Max,
            "linear" => Self::Linear,
            _ => Self::Source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRow {
    pub series_id: String,
    pub skill_id: String,
    pub skill_name: String,
    pub label: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub is_linear: bool,
    pub trend: Trend,
    pub jumps: usize,
}

impl SeriesRow {
    #[must_use]
    pub const fn range(&self) -> RangeSummary {
        RangeSummary {
            min: self.min,
            max: self.max,
        }
    }
}

/// A series to summarize, either named by the series document or taken from a skill group.
#[derive(Debug, Clone)]
pub struct SeriesRef<'a> {
    pub series_id: Cow<'a, str>,
    pub skill_id: &'a str,
    pub label: &'a str,
    pub embedded: Option<&'a LabeledSeries>,
}

/// Series to list: the series document when present, otherwise every
/// labeled series of every skill (consume, deal, recover order).
#[must_use]
pub fn series_refs(snapshot: &Snapshot) -> Vec<SeriesRef<'_>> {
    if !snapshot.series().is_empty() {
        return snapshot
            .series()
            .iter()
            .map(|entry| SeriesRef {
                series_id: Cow::Borrowed(entry.series_id.as_str()),
                skill_id: &entry.skill_id,
                label: &entry.label,
                embedded: None,
            })
            .collect();
    }
    log::debug!("no series document; deriving series from skill groups");
    snapshot
        .skills()
        .iter()
        .flat_map(|skill| {
            let groups = &skill.groups;
            groups
                .consume
                .series()
                .chain(groups.deal.series())
                .chain(groups.recover.series())
                .map(move |series| SeriesRef {
                    series_id: Cow::Owned(series_id(&skill.skill_id, &series.label)),
                    skill_id: &skill.skill_id,
                    label: &series.label,
                    embedded: Some(series),
                })
        })
        .collect()
}

/// Points of a referenced series: the values document first, then the skill's own series.
pub(crate) fn points_for<'s>(
    snapshot: &'s Snapshot,
    reference: &SeriesRef<'s>,
) -> Cow<'s, [ValuePoint]> {
    match reference.embedded {
        Some(series) => match snapshot.values().get(reference.series_id.as_ref()) {
            Some(points) => Cow::Borrowed(points.as_slice()),
            None => Cow::Owned(
                snapshot
                    .resolver()
                    .points(reference.skill_id, series)
                    .into_owned(),
            ),
        },
        None => snapshot
            .values()
            .get(reference.series_id.as_ref())
            .map_or(Cow::Borrowed(&[][..]), |points| Cow::Borrowed(points.as_slice())),
    }
}

#[must_use]
pub fn build_series_row(snapshot: &Snapshot, reference: &SeriesRef<'_>) -> SeriesRow {
    let points = points_for(snapshot, reference);
    let range = RangeSummary::of(points.iter().map(|p| p.value));
    let (is_linear, trend) = snapshot
        .analysis(&reference.series_id)
        .map_or((false, Trend::Mixed), |a| (a.is_linear, a.trend.clone()));
    SeriesRow {
        series_id: reference.series_id.to_string(),
        skill_id: reference.skill_id.to_string(),
        skill_name: snapshot.skill_name(reference.skill_id).to_string(),
        label: reference.label.to_string(),
        min: range.min,
        max: range.max,
        is_linear,
        trend,
        jumps: points.iter().filter(|p| p.is_jump).count(),
    }
}

/// Series rows matching the query and label type, sorted by `sort`.
#[must_use]
pub fn build_series_rows(
    snapshot: &Snapshot,
    query: &Query,
    label_type: Option<LabelType>,
    sort: SortKey,
) -> Vec<SeriesRow> {
    let mut rows: Vec<SeriesRow> = series_refs(snapshot)
        .iter()
        .filter(|r| query.matches(&r.series_id, snapshot.skill_name(r.skill_id)))
        .filter(|r| filter_type(r.label, label_type))
        .map(|r| build_series_row(snapshot, r))
        .collect();
    sort_series(&mut rows, sort);
    rows
}

/// Stable in-place sort; ties keep their relative order.
pub fn sort_series(items: &mut [SeriesRow], by: SortKey) {
    match by {
        SortKey::Jumps => items.sort_by(|a, b| b.jumps.cmp(&a.jumps)),
        SortKey::Max => items.sort_by(|a, b| cmp_desc_missing_zero(a.max, b.max)),
        SortKey::Linear => items.sort_by(|a, b| b.is_linear.cmp(&a.is_linear)),
        SortKey::Source => {}
    }
}

/// Regroup series rows under their skill, keeping first-seen skill order.
#[must_use]
pub fn group_by_skill(rows: Vec<SeriesRow>) -> Vec<(String, Vec<SeriesRow>)> {
    let mut groups: Vec<(String, Vec<SeriesRow>)> = Vec::new();
    for row in rows {
        match groups.iter_mut().find(|(id, _)| *id == row.skill_id) {
            Some((_, list)) => list.push(row),
            None => groups.push((row.skill_id.clone(), vec![row])),
        }
    }
    groups
}
