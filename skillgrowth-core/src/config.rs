//! Report configuration
use serde::{Deserialize, Serialize};

use crate::constants::{
    DAMAGE_SUFFIX, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_JUMP_THRESHOLD, DEFAULT_RESOURCES,
    NO_SPIRIT_COST_FLAG, STRIKE_SUFFIX, TAIL_START_INDEX,
};

/// Tunables for key selection, aggregation and loading.
///
/// Every field is optional in JSON; omitted fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Preferred consume resources, in priority order
    pub resources: Vec<String>,
    /// Deal key suffixes, in priority order
    pub deal_suffixes: Vec<String>,
    /// Meta attribute that marks a skill as costing nothing
    pub no_cost_flag: String,
    /// Zero-based index where the stabilized tail starts
    pub tail_start: usize,
    /// Multiple of the median step that counts as a jump
    pub jump_threshold: f64,
    pub fetch_timeout_secs: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            resources: DEFAULT_RESOURCES.iter().map(ToString::to_string).collect(),
            deal_suffixes: vec![DAMAGE_SUFFIX.to_string(), STRIKE_SUFFIX.to_string()],
            no_cost_flag: NO_SPIRIT_COST_FLAG.to_string(),
            tail_start: TAIL_START_INDEX,
            jump_threshold: DEFAULT_JUMP_THRESHOLD,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

impl ReportConfig {
    /// Load configuration from a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a valid configuration.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_report_conventions() {
        let cfg = ReportConfig::default();
        assert_eq!(cfg.resources, vec!["精神", "耐力", "气血", "内力"]);
        assert_eq!(cfg.deal_suffixes, vec!["伤害", "打击"]);
        assert_eq!(cfg.tail_start, 9);
        assert!((cfg.jump_threshold - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = ReportConfig::from_json(r#"{"resources": ["怒气"], "tail_start": 4}"#).unwrap();
        assert_eq!(cfg.resources, vec!["怒气"]);
        assert_eq!(cfg.tail_start, 4);
        assert_eq!(cfg.no_cost_flag, "threefold_no_spirit_cost");
        assert_eq!(cfg.fetch_timeout_secs, 30);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(ReportConfig::from_json("{\"tail_start\": -1}").is_err());
    }
}
