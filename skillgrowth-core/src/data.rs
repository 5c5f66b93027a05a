//! Report documents: skills, series, values and analysis.
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::constants::SERIES_ID_SEPARATOR;

/// One named numeric progression referenced from a skill group.
///
/// `values` is present in the inline data shape; in the lookup shape only the
/// label is meaningful and the points live in the values document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LabeledSeries {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<f64>>,
}

impl LabeledSeries {
    #[must_use]
    pub fn inline(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values: Some(values),
        }
    }

    #[must_use]
    pub fn reference(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            values: None,
        }
    }

    /// Embedded values, or an empty slice for reference-only entries.
    #[must_use]
    pub fn embedded(&self) -> &[f64] {
        self.values.as_deref().unwrap_or(&[])
    }
}

/// Category keys mapped to their labeled series, in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bucket(Vec<(String, Vec<LabeledSeries>)>);

impl Bucket {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, key: impl Into<String>, series: LabeledSeries) {
        let key = key.into();
        if let Some((_, list)) = self.0.iter_mut().find(|(k, _)| *k == key) {
            list.push(series);
        } else {
            self.0.push((key, vec![series]));
        }
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, series: LabeledSeries) -> Self {
        self.push(key, series);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[LabeledSeries]> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, list)| list.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[LabeledSeries])> {
        self.0.iter().map(|(k, list)| (k.as_str(), list.as_slice()))
    }

    /// Every labeled series across all keys, in source order.
    pub fn series(&self) -> impl Iterator<Item = &LabeledSeries> {
        self.0.iter().flat_map(|(_, list)| list.iter())
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Bucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, list) in &self.0 {
            map.serialize_entry(key, list)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Bucket {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BucketVisitor;

        impl<'de> Visitor<'de> for BucketVisitor {
            type Value = Bucket;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of category keys to labeled series")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Bucket, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, list)) =
                    access.next_entry::<String, Option<Vec<LabeledSeries>>>()?
                {
                    entries.push((key, list.unwrap_or_default()));
                }
                Ok(Bucket(entries))
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Bucket, E> {
                Ok(Bucket::new())
            }
        }

        deserializer.deserialize_any(BucketVisitor)
    }
}

/// Consume / deal / recover groupings of a skill's series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SkillGroups {
    #[serde(default)]
    pub consume: Bucket,
    #[serde(default)]
    pub deal: Bucket,
    #[serde(default)]
    pub recover: Bucket,
}

/// A game ability and its grouped progressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub skill_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub special_effects: Vec<String>,
    #[serde(default)]
    pub meta: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub groups: SkillGroups,
}

impl Skill {
    #[must_use]
    pub fn new(skill_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            skill_id: skill_id.into(),
            name: name.into(),
            description: String::new(),
            special_effects: Vec::new(),
            meta: BTreeMap::new(),
            groups: SkillGroups::default(),
        }
    }

    /// Whether a meta attribute is set to a truthy value.
    ///
    /// Follows the loose truthiness of the exported documents: `null`,
    /// `false`, `0` and `""` are unset; everything else counts as set.
    #[must_use]
    pub fn meta_flag(&self, key: &str) -> bool {
        use serde_json::Value;
        match self.meta.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(_) | Value::Object(_)) => true,
        }
    }

    #[must_use]
    pub fn series_id(&self, label: &str) -> String {
        series_id(&self.skill_id, label)
    }
}

/// Build the `<skill_id>:<label>` identifier used by the values and analysis documents.
#[must_use]
pub fn series_id(skill_id: &str, label: &str) -> String {
    format!("{skill_id}{SERIES_ID_SEPARATOR}{label}")
}

/// Skill id portion of a series identifier.
#[must_use]
pub fn skill_id_of(series_id: &str) -> &str {
    series_id
        .split_once(SERIES_ID_SEPARATOR)
        .map_or(series_id, |(skill, _)| skill)
}

/// Entry of the series document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesEntry {
    pub series_id: String,
    pub skill_id: String,
    pub label: String,
    #[serde(default)]
    pub units: String,
    #[serde(default)]
    pub meta: BTreeMap<String, serde_json::Value>,
}

/// A single level of a progression.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuePoint {
    pub level_index: u32,
    pub value: f64,
    #[serde(default)]
    pub diff_to_prev: Option<f64>,
    #[serde(default)]
    pub is_jump: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Trend {
    Increasing,
    Decreasing,
    #[default]
    Mixed,
    Other(String),
}

impl Trend {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Mixed => "mixed",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Trend {
    fn from(value: &str) -> Self {
        match value {
            "increasing" => Self::Increasing,
            "decreasing" => Self::Decreasing,
            "mixed" => Self::Mixed,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Serialize for Trend {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Trend {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map_or(Self::Mixed, Self::from))
    }
}

/// Per-series analysis record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Analysis {
    #[serde(default)]
    pub is_linear: bool,
    #[serde(default)]
    pub trend: Trend,
    #[serde(default)]
    pub jump_points: Vec<u32>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub count: usize,
}

pub type ValuesTable = HashMap<String, Vec<ValuePoint>>;
pub type AnalysisTable = HashMap<String, Analysis>;
