//! Skill Growth Report Core
//!
//! Platform-agnostic aggregation for skill growth reports. Turns the skills,
//! series, values and analysis documents into summary rows, per-series rows,
//! chart lines and level-by-level details. Loading and presentation live in
//! the callers.

pub mod analyzer;
pub mod chart;
pub mod config;
pub mod constants;
pub mod controller;
pub mod data;
pub mod detail;
pub mod load;
pub mod numbers;
pub mod policy;
pub mod range;
pub mod resolve;
pub mod rows;
pub mod series_view;
pub mod snapshot;
pub mod text;

// Re-export commonly used types
pub use analyzer::{analyze, value_points};
pub use chart::{Chart, ChartLine, ChartMode, ChartPoint, build_chart};
pub use config::ReportConfig;
pub use controller::{ViewController, ViewParams};
pub use data::{
    Analysis, AnalysisTable, Bucket, LabeledSeries, SeriesEntry, Skill, SkillGroups, Trend,
    ValuePoint, ValuesTable, series_id,
};
pub use detail::{DetailEntry, DetailPack, build_details};
pub use load::{
    DocumentKind, DocumentSource, LoadError, PreloadedSource, RawDocuments, load_all,
    unwrap_global_script,
};
pub use policy::{KeyPolicy, KeyRule, RangePolicy};
pub use range::{RangeSummary, pick_range, pick_range_with};
pub use resolve::{InlineResolver, LookupResolver, Resolution, Resolver, SeriesResolver};
pub use rows::{SkillRow, build_row, build_rows};
pub use series_view::{
    LabelType, SeriesRow, SortKey, build_series_rows, filter_type, group_by_skill, sort_series,
};
pub use snapshot::Snapshot;
pub use text::{Query, extract_id, matches, normalize};

/// Load, parse and snapshot every document from a source.
///
/// # Errors
///
/// Returns an error if any document cannot be loaded or parsed.
pub fn load_snapshot<S: DocumentSource>(
    source: &S,
    config: &ReportConfig,
) -> Result<Snapshot, LoadError> {
    let docs = load_all(source)?;
    Snapshot::from_documents(&docs, config)
}
