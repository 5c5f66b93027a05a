//! Level-by-level drill-down for a single skill.
use serde::{Deserialize, Serialize};

use crate::data::{Bucket, Skill, ValuePoint};
use crate::resolve::SeriesResolver;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailEntry {
    pub label: String,
    pub rows: Vec<ValuePoint>,
}

/// Every labeled series of a skill, split by group. Recover series land in `other`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DetailPack {
    pub consume: Vec<DetailEntry>,
    pub deal: Vec<DetailEntry>,
    pub other: Vec<DetailEntry>,
}

impl DetailPack {
    /// All entries in consume, deal, other order.
    pub fn entries(&self) -> impl Iterator<Item = &DetailEntry> {
        self.consume.iter().chain(&self.deal).chain(&self.other)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.consume.is_empty() && self.deal.is_empty() && self.other.is_empty()
    }
}

fn attach<R: SeriesResolver + ?Sized>(
    resolver: &R,
    skill_id: &str,
    bucket: &Bucket,
) -> Vec<DetailEntry> {
    bucket
        .series()
        .map(|series| DetailEntry {
            label: series.label.clone(),
            rows: resolver.points(skill_id, series).into_owned(),
        })
        .collect()
}

#[must_use]
pub fn build_details<R: SeriesResolver + ?Sized>(skill: &Skill, resolver: &R) -> DetailPack {
    let groups = &skill.groups;
    DetailPack {
        consume: attach(resolver, &skill.skill_id, &groups.consume),
        deal: attach(resolver, &skill.skill_id, &groups.deal),
        other: attach(resolver, &skill.skill_id, &groups.recover),
    }
}
