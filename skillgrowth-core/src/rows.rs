//! Per-skill summary rows.
use serde::{Deserialize, Serialize};

use crate::constants::EFFECTS_SEPARATOR;
use crate::data::Skill;
use crate::policy::RangePolicy;
use crate::range::RangeSummary;
use crate::resolve::SeriesResolver;
use crate::snapshot::Snapshot;
use crate::text::Query;

/// One table row summarizing a skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub effects_text: String,
    pub consume_range: RangeSummary,
    pub deal_range: RangeSummary,
}

#[must_use]
pub fn build_row<R: SeriesResolver + ?Sized>(
    skill: &Skill,
    resolver: &R,
    policy: &RangePolicy,
) -> SkillRow {
    SkillRow {
        id: skill.skill_id.clone(),
        name: skill.name.clone(),
        description: skill.description.clone(),
        effects_text: skill.special_effects.join(EFFECTS_SEPARATOR),
        consume_range: policy.consume_range(resolver, skill),
        deal_range: policy.deal_range(resolver, skill),
    }
}

/// Rows for every skill passing `query`, in load order.
#[must_use]
pub fn build_rows(snapshot: &Snapshot, query: &Query, policy: &RangePolicy) -> Vec<SkillRow> {
    let resolver = snapshot.resolver();
    snapshot
        .skills()
        .iter()
        .filter(|skill| query.matches(&skill.skill_id, &skill.name))
        .map(|skill| build_row(skill, &resolver, policy))
        .collect()
}
