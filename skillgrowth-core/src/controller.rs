//! View controller: current query/filter/sort/expand parameters over a snapshot.
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::chart::{Chart, ChartMode, build_chart};
use crate::config::ReportConfig;
use crate::detail::{DetailPack, build_details};
use crate::policy::RangePolicy;
use crate::rows::{SkillRow, build_rows};
use crate::series_view::{LabelType, SeriesRow, SortKey, build_series_rows};
use crate::snapshot::Snapshot;
use crate::text::Query;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewParams {
    pub query: String,
    pub label_type: Option<LabelType>,
    pub sort: SortKey,
    pub expanded: BTreeSet<String>,
}

/// Recomputes report outputs from an immutable snapshot and the current parameters.
///
/// Rows are rebuilt in full on every call. Details are cached per skill id
/// because they are only needed once a row is expanded.
#[derive(Debug)]
pub struct ViewController {
    snapshot: Arc<Snapshot>,
    policy: RangePolicy,
    params: ViewParams,
    details: HashMap<String, DetailPack>,
}

impl ViewController {
    #[must_use]
    pub fn new(snapshot: Arc<Snapshot>, config: &ReportConfig) -> Self {
        Self {
            snapshot,
            policy: RangePolicy::from_config(config),
            params: ViewParams::default(),
            details: HashMap::new(),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    #[must_use]
    pub const fn params(&self) -> &ViewParams {
        &self.params
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.params.query = query.into();
    }

    pub const fn set_label_type(&mut self, label_type: Option<LabelType>) {
        self.params.label_type = label_type;
    }

    pub const fn set_sort(&mut self, sort: SortKey) {
        self.params.sort = sort;
    }

    /// Flip the expanded state of a row; returns the new state.
    pub fn toggle(&mut self, skill_id: &str) -> bool {
        let expanded = !self.params.expanded.contains(skill_id);
        self.set_expanded(skill_id, expanded);
        expanded
    }

    pub fn set_expanded(&mut self, skill_id: &str, expanded: bool) {
        if expanded {
            self.params.expanded.insert(skill_id.to_string());
        } else {
            self.params.expanded.remove(skill_id);
        }
    }

    pub fn expanded_ids(&self) -> impl Iterator<Item = &str> {
        self.params.expanded.iter().map(String::as_str)
    }

    #[must_use]
    pub fn rows(&self) -> Vec<SkillRow> {
        build_rows(&self.snapshot, &Query::new(&self.params.query), &self.policy)
    }

    #[must_use]
    pub fn series_rows(&self) -> Vec<SeriesRow> {
        build_series_rows(
            &self.snapshot,
            &Query::new(&self.params.query),
            self.params.label_type,
            self.params.sort,
        )
    }

    #[must_use]
    pub fn chart(&self, mode: ChartMode) -> Chart {
        build_chart(&self.snapshot, &Query::new(&self.params.query), mode)
    }

    /// Level details of a skill, built on first request. `None` for unknown ids.
    pub fn details(&mut self, skill_id: &str) -> Option<&DetailPack> {
        if !self.details.contains_key(skill_id) {
            let skill = self.snapshot.skill(skill_id)?;
            log::debug!("building details for {skill_id}");
            let pack = build_details(skill, &self.snapshot.resolver());
            self.details.insert(skill_id.to_string(), pack);
        }
        self.details.get(skill_id)
    }

    /// Details of every expanded skill, in id order.
    pub fn expanded_details(&mut self) -> Vec<(String, DetailPack)> {
        let ids: Vec<String> = self.params.expanded.iter().cloned().collect();
        ids.into_iter()
            .filter_map(|id| {
                let pack = self.details(&id)?.clone();
                Some((id, pack))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{LabeledSeries, Skill};

    fn controller() -> ViewController {
        let mut a = Skill::new("00001", "烈焰掌");
        a.groups
            .consume
            .push("内力", LabeledSeries::inline("消耗-内力", vec![1.0, 2.0]));
        let mut b = Skill::new("00002", "寒冰诀");
        b.groups
            .deal
            .push("冰冻伤害", LabeledSeries::inline("冰冻伤害", vec![3.0]));
        let cfg = ReportConfig::default();
        ViewController::new(Arc::new(Snapshot::from_skills(vec![a, b], &cfg)), &cfg)
    }

    #[test]
    fn toggle_flips_expanded_state() {
        let mut view = controller();
        assert!(view.toggle("00002"));
        assert_eq!(view.expanded_ids().collect::<Vec<_>>(), vec!["00002"]);
        assert!(!view.toggle("00002"));
        assert_eq!(view.expanded_ids().count(), 0);
    }

    #[test]
    fn rows_follow_query_changes() {
        let mut view = controller();
        assert_eq!(view.rows().len(), 2);
        view.set_query("寒冰");
        let rows = view.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].deal_range.to_string(), "3 - 3");
    }

    #[test]
    fn series_rows_apply_label_type() {
        let mut view = controller();
        view.set_label_type(Some(LabelType::Consume));
        let rows = view.series_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].series_id, "00001:消耗-内力");
        assert_eq!(rows[0].skill_name, "烈焰掌");
    }

    #[test]
    fn details_are_cached_and_unknown_ids_are_none() {
        let mut view = controller();
        assert!(view.details("99999").is_none());
        let first = view.details("00001").cloned().unwrap();
        assert_eq!(first.consume[0].rows.len(), 2);
        assert_eq!(view.details("00001"), Some(&first));
        view.set_expanded("00001", true);
        view.set_expanded("99999", true);
        let expanded = view.expanded_details();
        assert_eq!(expanded.len(), 1);
        assert_eq!(expanded[0].0, "00001");
    }
}
