//! Centralized aggregation constants for skill growth reports.
//!
//! These values mirror the conventions of the exported report documents.
//! Anything a report author may want to tune is also surfaced through
//! [`crate::config::ReportConfig`], which defaults to the values below.

// Range aggregation -----------------------------------------------------------
/// Zero-based index of the 10th level; earlier levels are ramp-up noise.
pub const TAIL_START_INDEX: usize = 9;

// Key selection ---------------------------------------------------------------
pub const DEFAULT_RESOURCES: [&str; 4] = ["精神", "耐力", "气血", "内力"];
pub const DAMAGE_SUFFIX: &str = "伤害";
pub const STRIKE_SUFFIX: &str = "打击";
pub const NO_SPIRIT_COST_FLAG: &str = "threefold_no_spirit_cost";

// Label types -----------------------------------------------------------------
pub const CONSUME_LABEL_PREFIX: &str = "消耗-";
pub const DAMAGE_LABEL_MARK: &str = "伤害";
pub const STRIKE_LABEL_MARK: &str = "打击";
pub const RECOVER_LABEL_MARK: &str = "恢复";

// Presentation ----------------------------------------------------------------
pub const EFFECTS_SEPARATOR: &str = "；";
pub const EMPTY_PLACEHOLDER: &str = "-";
pub const SERIES_ID_SEPARATOR: char = ':';

// Analysis --------------------------------------------------------------------
pub const DEFAULT_JUMP_THRESHOLD: f64 = 2.0;
/// Diffs are compared at this many decimals when testing for linearity.
pub const LINEAR_DIFF_DECIMALS: i32 = 8;

// Loading ---------------------------------------------------------------------
pub const DEFAULT_DATA_BASE: &str = "data";
pub const DATA_BASE_ENV_VAR: &str = "SKILL_REPORT_DATA_BASE";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
