mod loader;
mod reports;
mod util;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use skillgrowth_core::constants::{DATA_BASE_ENV_VAR, DEFAULT_DATA_BASE};
use skillgrowth_core::{
    ChartMode, LabelType, LoadError, ReportConfig, Snapshot, SortKey, ViewController,
};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use loader::{DataLocation, Loader};
use reports::Report;
use util::split_csv;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    /// One summary row per skill, with optional level details
    Skills,
    /// One row per series, filterable and sortable
    Series,
    /// Chart lines per series
    Chart,
}

#[derive(Debug, Parser)]
#[command(name = "skill-report", version = "0.1.0")]
#[command(about = "Skill growth report - consume/deal ranges, series trends and level details")]
struct Args {
    /// Directory or http(s) URL holding skills/series/values/analysis.json
    #[arg(long)]
    data_base: Option<String>,

    /// Directory of preloaded documents (<name>.js globals or <name>.json) used when loading fails
    #[arg(long)]
    fallback_dir: Option<PathBuf>,

    /// JSON file overriding the report configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Which view to render
    #[arg(long, value_enum, default_value_t = View::Skills)]
    view: View,

    /// Filter by skill id, name or series id (whitespace and dashes are ignored)
    #[arg(long, default_value = "")]
    query: String,

    /// Series view only: consume, damage, strike or recover
    #[arg(long)]
    label_type: Option<LabelType>,

    /// Series view only: jumps, max or linear (anything else keeps source order)
    #[arg(long, default_value = "")]
    sort: String,

    /// Skill ids to expand into level details (comma-separated)
    #[arg(long, default_value = "")]
    expand: String,

    /// Chart view only: plot the step into each level instead of the value
    #[arg(long)]
    show_diff: bool,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(args.config.as_deref())?;
    let snapshot = load_snapshot(&args, &config).await?;
    let mut view = ViewController::new(Arc::new(snapshot), &config);
    apply_params(&args, &mut view);

    let report = build_report(&args, &mut view);
    write_report(&args, &report)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn data_base(args: &Args) -> String {
    args.data_base
        .clone()
        .or_else(|| std::env::var(DATA_BASE_ENV_VAR).ok())
        .filter(|base| !base.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DATA_BASE.to_string())
}

fn load_config(path: Option<&Path>) -> Result<ReportConfig> {
    let Some(path) = path else {
        return Ok(ReportConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = ReportConfig::from_json(&text)
        .map_err(LoadError::from)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    log::debug!("loaded report configuration from {}", path.display());
    Ok(config)
}

async fn load_snapshot(args: &Args, config: &ReportConfig) -> Result<Snapshot> {
    let location = DataLocation::parse(&data_base(args));
    let loader = Loader::new(
        location,
        Duration::from_secs(config.fetch_timeout_secs),
        args.fallback_dir.clone(),
    )
    .context("load failed")?;
    let docs = loader.load().await?;
    Ok(Snapshot::from_documents(&docs, config)?)
}

fn apply_params(args: &Args, view: &mut ViewController) {
    view.set_query(args.query.as_str());
    view.set_label_type(args.label_type);
    view.set_sort(SortKey::parse(&args.sort));
    for id in split_csv(&args.expand) {
        view.set_expanded(&id, true);
    }
}

fn build_report(args: &Args, view: &mut ViewController) -> Report {
    match args.view {
        View::Skills => {
            let rows = view.rows();
            let details: BTreeMap<_, _> = view.expanded_details().into_iter().collect();
            for id in view.expanded_ids() {
                if !details.contains_key(id) {
                    log::warn!("cannot expand unknown skill {id}");
                }
            }
            Report::Skills { rows, details }
        }
        View::Series => Report::Series {
            rows: view.series_rows(),
        },
        View::Chart => {
            let mode = if args.show_diff {
                ChartMode::Diffs
            } else {
                ChartMode::Values
            };
            Report::Chart {
                chart: view.chart(mode),
            }
        }
    }
}

fn write_report(args: &Args, report: &Report) -> Result<()> {
    let mut sink = ReportSink::open(args.output.as_deref())?;

    match args.report.as_str() {
        "json" => reports::generate_json_report(&mut sink, report)?,
        "markdown" => reports::generate_markdown_report(&mut sink, report)?,
        "csv" => reports::generate_csv_report(&mut sink, report)?,
        _ => reports::generate_console_report(&mut sink, report)?,
    }

    sink.finish()
}

/// Buffered report destination: stdout, or a file created up front.
struct ReportSink {
    out: BufWriter<Box<dyn Write>>,
    path: Option<PathBuf>,
}

impl ReportSink {
    fn open(path: Option<&Path>) -> Result<Self> {
        let inner: Box<dyn Write> = match path {
            Some(path) => Box::new(
                File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?,
            ),
            None => Box::new(stdout()),
        };
        Ok(Self {
            out: BufWriter::new(inner),
            path: path.map(Path::to_path_buf),
        })
    }

    fn finish(mut self) -> Result<()> {
        self.out.flush().with_context(|| match &self.path {
            Some(path) => format!("failed to write {}", path.display()),
            None => "failed to write report to stdout".to_string(),
        })?;
        if let Some(path) = &self.path {
            log::info!("report written to {}", path.display());
        }
        Ok(())
    }
}

impl Write for ReportSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillgrowth_core::{DocumentKind, RangeSummary, RawDocuments};

    fn base_args() -> Args {
        Args {
            data_base: None,
            fallback_dir: None,
            config: None,
            view: View::Skills,
            query: String::new(),
            label_type: None,
            sort: String::new(),
            expand: String::new(),
            show_diff: false,
            report: "json".to_string(),
            verbose: false,
            output: None,
        }
    }

    fn fixture_view(args: &Args) -> ViewController {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../skillgrowth-core/tests/fixtures");
        let mut docs = RawDocuments::default();
        for kind in DocumentKind::ALL {
            docs.set(kind, std::fs::read_to_string(dir.join(kind.file_name())).unwrap());
        }
        let config = ReportConfig::default();
        let snapshot = Snapshot::from_documents(&docs, &config).unwrap();
        let mut view = ViewController::new(Arc::new(snapshot), &config);
        apply_params(args, &mut view);
        view
    }

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "skill-report-main-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn data_base_prefers_the_flag() {
        let args = Args {
            data_base: Some("http://localhost:9000".to_string()),
            ..base_args()
        };
        assert_eq!(data_base(&args), "http://localhost:9000");
    }

    #[test]
    fn missing_config_uses_defaults_and_bad_config_fails() {
        assert_eq!(load_config(None).unwrap(), ReportConfig::default());
        let path = temp_path("config");
        std::fs::write(&path, r#"{"tail_start": 0, "resources": ["怒气"]}"#).unwrap();
        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.tail_start, 0);
        assert_eq!(cfg.resources, vec!["怒气"]);
        std::fs::write(&path, "{not json").unwrap();
        let err = load_config(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("invalid report configuration"));
    }

    #[test]
    fn skills_view_builds_rows_and_expanded_details() {
        let args = Args {
            expand: "10024, 99999".to_string(),
            ..base_args()
        };
        let mut view = fixture_view(&args);
        let Report::Skills { rows, details } = build_report(&args, &mut view) else {
            panic!("expected skills report");
        };
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].consume_range, RangeSummary::of([19.0, 21.0]));
        assert_eq!(rows[1].consume_range, RangeSummary::ZERO);
        assert_eq!(details.keys().collect::<Vec<_>>(), vec!["10024"]);
        assert_eq!(details["10024"].other[0].label, "恢复-气血");
    }

    #[test]
    fn series_view_filters_and_sorts() {
        let args = Args {
            view: View::Series,
            label_type: Some(LabelType::Consume),
            sort: "max".to_string(),
            ..base_args()
        };
        let mut view = fixture_view(&args);
        let Report::Series { rows } = build_report(&args, &mut view) else {
            panic!("expected series report");
        };
        let ids: Vec<&str> = rows.iter().map(|r| r.series_id.as_str()).collect();
        assert_eq!(ids, vec!["10024:消耗-精神", "10023:消耗-内力", "10025:消耗-怒气"]);
    }

    #[test]
    fn chart_view_honours_show_diff() {
        let args = Args {
            view: View::Chart,
            query: "10023".to_string(),
            show_diff: true,
            ..base_args()
        };
        let mut view = fixture_view(&args);
        let Report::Chart { chart } = build_report(&args, &mut view) else {
            panic!("expected chart report");
        };
        assert_eq!(chart.mode, ChartMode::Diffs);
        assert_eq!(chart.lines.len(), 3);
        assert!(chart.lines.iter().all(|l| l.points.first().map(|p| p.level) == Some(2)));
    }

    #[test]
    fn write_report_emits_json_output() {
        let path = temp_path("report.json");
        let args = Args {
            output: Some(path.clone()),
            query: "寒冰诀".to_string(),
            ..base_args()
        };
        let mut view = fixture_view(&args);
        let report = build_report(&args, &mut view);
        write_report(&args, &report).unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["view"], "skills");
        assert_eq!(value["rows"][0]["id"], "10024");
        assert_eq!(value["rows"][0]["deal_range"]["max"], 9.0);
    }

    #[test]
    fn report_sink_persists_only_what_was_written() {
        let path = temp_path("sink.md");
        let mut sink = ReportSink::open(Some(&path)).unwrap();
        write!(sink, "| id |").unwrap();
        sink.finish().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "| id |");

        let missing = temp_path("no-such-dir").join("out.json");
        let err = ReportSink::open(Some(&missing)).err().unwrap();
        assert!(format!("{err:#}").starts_with("failed to create"));
    }
}
