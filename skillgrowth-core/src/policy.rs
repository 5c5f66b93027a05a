//! Key selection policies for the consume and deal groups.
//!
//! A policy is an ordered list of tiers. Each tier selects a subset of the
//! keys present in a bucket; the first tier that selects anything wins.
use serde::{Deserialize, Serialize};

use crate::config::ReportConfig;
use crate::data::{Bucket, Skill};
use crate::range::{RangeSummary, pick_range_with};
use crate::resolve::SeriesResolver;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", content = "arg", rename_all = "snake_case")]
pub enum KeyRule {
    /// Listed names that are present with at least one series, in list order.
    Preferred(Vec<String>),
    /// Present keys ending with the suffix, in bucket order.
    Suffix(String),
    /// Every present key, in bucket order.
    All,
}

impl KeyRule {
    #[must_use]
    pub fn select<'b>(&self, bucket: &'b Bucket) -> Vec<&'b str> {
        match self {
            Self::Preferred(names) => names
                .iter()
                .filter_map(|name| {
                    bucket
                        .iter()
                        .find(|(key, list)| *key == name.as_str() && !list.is_empty())
                        .map(|(key, _)| key)
                })
                .collect(),
            Self::Suffix(suffix) => bucket
                .keys()
                .filter(|key| key.ends_with(suffix.as_str()))
                .collect(),
            Self::All => bucket.keys().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPolicy {
    pub tiers: Vec<KeyRule>,
}

impl KeyPolicy {
    #[must_use]
    pub const fn new(tiers: Vec<KeyRule>) -> Self {
        Self { tiers }
    }

    /// Preferred resources first, then every consume key.
    #[must_use]
    pub fn consume(resources: &[String]) -> Self {
        Self::new(vec![KeyRule::Preferred(resources.to_vec()), KeyRule::All])
    }

    /// One tier per suffix in priority order, then every deal key.
    #[must_use]
    pub fn deal(suffixes: &[String]) -> Self {
        let mut tiers: Vec<KeyRule> = suffixes.iter().cloned().map(KeyRule::Suffix).collect();
        tiers.push(KeyRule::All);
        Self::new(tiers)
    }

    /// Keys chosen by the first non-empty tier, or nothing.
    #[must_use]
    pub fn select<'b>(&self, bucket: &'b Bucket) -> Vec<&'b str> {
        for (tier, rule) in self.tiers.iter().enumerate() {
            let keys = rule.select(bucket);
            if !keys.is_empty() {
                log::trace!("key tier {tier} selected {} key(s)", keys.len());
                return keys;
            }
        }
        Vec::new()
    }
}

/// Both policies plus the aggregation settings they feed.
#[derive(Debug, Clone, PartialEq)]
pub struct RangePolicy {
    pub consume: KeyPolicy,
    pub deal: KeyPolicy,
    pub no_cost_flag: String,
    pub tail_start: usize,
}

impl RangePolicy {
    #[must_use]
    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            consume: KeyPolicy::consume(&config.resources),
            deal: KeyPolicy::deal(&config.deal_suffixes),
            no_cost_flag: config.no_cost_flag.clone(),
            tail_start: config.tail_start,
        }
    }

    /// Consume range of a skill; skills flagged as costing nothing report `0 - 0`.
    pub fn consume_range<R: SeriesResolver + ?Sized>(
        &self,
        resolver: &R,
        skill: &Skill,
    ) -> RangeSummary {
        if skill.meta_flag(&self.no_cost_flag) {
            return RangeSummary::ZERO;
        }
        let bucket = &skill.groups.consume;
        let keys = self.consume.select(bucket);
        pick_range_with(resolver, &skill.skill_id, bucket, keys, self.tail_start)
    }

    pub fn deal_range<R: SeriesResolver + ?Sized>(
        &self,
        resolver: &R,
        skill: &Skill,
    ) -> RangeSummary {
        let bucket = &skill.groups.deal;
        let keys = self.deal.select(bucket);
        pick_range_with(resolver, &skill.skill_id, bucket, keys, self.tail_start)
    }
}

impl Default for RangePolicy {
    fn default() -> Self {
        Self::from_config(&ReportConfig::default())
    }
}
