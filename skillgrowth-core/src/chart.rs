//! Line-chart data for series progressions.
use serde::{Deserialize, Serialize};

use crate::data::ValuePoint;
use crate::series_view::{SeriesRef, points_for, series_refs};
use crate::snapshot::Snapshot;
use crate::text::Query;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartMode {
    #[default]
    Values,
    /// Step into each level; the first level has no step and is omitted.
    Diffs,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub level: u32,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartLine {
    pub series_id: String,
    pub name: String,
    pub points: Vec<ChartPoint>,
    pub is_linear: bool,
    pub jumps: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Chart {
    pub mode: ChartMode,
    /// Level labels of the x axis, `1..=longest series`.
    pub levels: Vec<u32>,
    pub lines: Vec<ChartLine>,
}

fn plot(points: &[ValuePoint], mode: ChartMode) -> Vec<ChartPoint> {
    match mode {
        ChartMode::Values => points
            .iter()
            .map(|p| ChartPoint {
                level: p.level_index,
                y: p.value,
            })
            .collect(),
        ChartMode::Diffs => points
            .iter()
            .skip(1)
            .map(|p| ChartPoint {
                level: p.level_index,
                y: p.diff_to_prev.unwrap_or(0.0),
            })
            .collect(),
    }
}

fn line(snapshot: &Snapshot, reference: &SeriesRef<'_>, mode: ChartMode) -> ChartLine {
    let points = points_for(snapshot, reference);
    let analysis = snapshot.analysis(&reference.series_id);
    let jump_levels: Vec<u32> = analysis.map_or_else(
        || points.iter().filter(|p| p.is_jump).map(|p| p.level_index).collect(),
        |a| a.jump_points.clone(),
    );
    let plotted = plot(&points, mode);
    let jumps = jump_levels
        .iter()
        .filter_map(|level| plotted.iter().find(|p| p.level == *level).copied())
        .collect();
    ChartLine {
        series_id: reference.series_id.to_string(),
        name: format!("{} {}", snapshot.skill_name(reference.skill_id), reference.label),
        points: plotted,
        is_linear: analysis.is_some_and(|a| a.is_linear),
        jumps,
    }
}

/// Chart lines for every series matching `query`.
#[must_use]
pub fn build_chart(snapshot: &Snapshot, query: &Query, mode: ChartMode) -> Chart {
    let lines: Vec<ChartLine> = series_refs(snapshot)
        .iter()
        .filter(|r| query.matches(&r.series_id, snapshot.skill_name(r.skill_id)))
        .map(|r| line(snapshot, r, mode))
        .collect();
    let longest = lines
        .iter()
        .filter_map(|l| l.points.last().map(|p| p.level))
        .max()
        .unwrap_or(0);
    Chart {
        mode,
        levels: (1..=longest).collect(),
        lines,
    }
}
