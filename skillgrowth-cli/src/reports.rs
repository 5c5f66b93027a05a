use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use skillgrowth_core::constants::EMPTY_PLACEHOLDER;
use skillgrowth_core::{
    Chart, ChartMode, DetailPack, RangeSummary, SeriesRow, SkillRow, ValuePoint,
};
use std::collections::BTreeMap;
use std::io::Write;

use crate::util::{csv_field, csv_number, md_cell, or_placeholder};

/// Everything one run renders, for whichever view was selected.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum Report {
    Skills {
        rows: Vec<SkillRow>,
        details: BTreeMap<String, DetailPack>,
    },
    Series {
        rows: Vec<SeriesRow>,
    },
    Chart {
        chart: Chart,
    },
}

impl Report {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Skills { rows, .. } => rows.is_empty(),
            Self::Series { rows } => rows.is_empty(),
            Self::Chart { chart } => chart.lines.is_empty(),
        }
    }
}

fn fmt_number(value: Option<f64>) -> String {
    value.map_or_else(|| EMPTY_PLACEHOLDER.to_string(), |v| v.to_string())
}

fn fmt_point(point: &ValuePoint) -> String {
    match point.diff_to_prev {
        Some(diff) if diff >= 0.0 => format!("L{} {} (+{diff})", point.level_index, point.value),
        Some(diff) => format!("L{} {} ({diff})", point.level_index, point.value),
        None => format!("L{} {}", point.level_index, point.value),
    }
}

pub fn generate_console_report<W: Write + ?Sized>(out: &mut W, report: &Report) -> Result<()> {
    writeln!(out, "{}", "📊 Skill Growth Report".bright_cyan().bold())?;
    writeln!(out, "{}", "======================".cyan())?;
    match report {
        Report::Skills { rows, details } => {
            writeln!(out, "Skills: {}", rows.len())?;
            writeln!(out)?;
            for row in rows {
                writeln!(out, "{} {}", row.id.bright_white().bold(), row.name.bold())?;
                writeln!(out, "   Description: {}", or_placeholder(&row.description))?;
                writeln!(out, "   Effects: {}", or_placeholder(&row.effects_text))?;
                writeln!(out, "   Consume: {}", row.consume_range.to_string().yellow())?;
                writeln!(out, "   Deal: {}", row.deal_range.to_string().green())?;
                if let Some(pack) = details.get(&row.id) {
                    console_details(out, pack)?;
                }
                writeln!(out)?;
            }
        }
        Report::Series { rows } => {
            writeln!(out, "Series: {}", rows.len())?;
            writeln!(out)?;
            for row in rows {
                let linear = if row.is_linear {
                    "linear".green()
                } else {
                    "non-linear".yellow()
                };
                writeln!(
                    out,
                    "{} {} {}",
                    row.skill_name.bold(),
                    row.label,
                    row.series_id.dimmed()
                )?;
                writeln!(
                    out,
                    "   Range: {}  Trend: {}  {linear}  Jumps: {}",
                    row.range(),
                    row.trend.as_str(),
                    row.jumps
                )?;
            }
        }
        Report::Chart { chart } => {
            let mode = match chart.mode {
                ChartMode::Values => "values",
                ChartMode::Diffs => "diffs",
            };
            writeln!(out, "Chart ({mode}), levels 1-{}", chart.levels.len())?;
            writeln!(out)?;
            for line in &chart.lines {
                writeln!(out, "{}", line.name.bold())?;
                let points: Vec<String> = line
                    .points
                    .iter()
                    .map(|p| {
                        let text = format!("{}:{}", p.level, p.y);
                        if line.jumps.contains(p) {
                            text.red().bold().to_string()
                        } else {
                            text
                        }
                    })
                    .collect();
                writeln!(out, "   {}", points.join(" "))?;
            }
        }
    }
    if report.is_empty() {
        writeln!(out, "{}", "No matching entries.".yellow())?;
    }
    Ok(())
}

fn console_details<W: Write + ?Sized>(out: &mut W, pack: &DetailPack) -> Result<()> {
    if pack.is_empty() {
        writeln!(out, "   {}", "No level data.".dimmed())?;
        return Ok(());
    }
    let groups = [
        ("consume", &pack.consume),
        ("deal", &pack.deal),
        ("other", &pack.other),
    ];
    for (group, entries) in groups {
        for entry in entries {
            writeln!(out, "   ▸ [{group}] {}", entry.label.cyan())?;
            for point in &entry.rows {
                let text = fmt_point(point);
                if point.is_jump {
                    writeln!(out, "     • {}", text.red())?;
                } else {
                    writeln!(out, "     • {text}")?;
                }
            }
        }
    }
    Ok(())
}

pub fn generate_json_report<W: Write + ?Sized>(out: &mut W, report: &Report) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report<W: Write + ?Sized>(out: &mut W, report: &Report) -> Result<()> {
    writeln!(out, "# Skill Growth Report\n")?;
    match report {
        Report::Skills { rows, details } => {
            writeln!(out, "| ID | Name | Description | Effects | Consume | Deal |")?;
            writeln!(out, "|----|------|-------------|---------|---------|------|")?;
            for row in rows {
                writeln!(
                    out,
                    "| {} | {} | {} | {} | {} | {} |",
                    md_cell(&row.id),
                    md_cell(&row.name),
                    md_cell(&row.description),
                    md_cell(&row.effects_text),
                    row.consume_range,
                    row.deal_range
                )?;
            }
            for (id, pack) in details {
                writeln!(out, "\n## {id}\n")?;
                for entry in pack.entries() {
                    writeln!(out, "### {}\n", md_cell(&entry.label))?;
                    writeln!(out, "| Level | Value | Diff | Jump |")?;
                    writeln!(out, "|-------|-------|------|------|")?;
                    for point in &entry.rows {
                        writeln!(
                            out,
                            "| {} | {} | {} | {} |",
                            point.level_index,
                            point.value,
                            fmt_number(point.diff_to_prev),
                            if point.is_jump { "⚠️" } else { "" }
                        )?;
                    }
                    writeln!(out)?;
                }
            }
        }
        Report::Series { rows } => {
            writeln!(out, "| Series | Skill | Label | Range | Linear | Trend | Jumps |")?;
            writeln!(out, "|--------|-------|-------|-------|--------|-------|-------|")?;
            for row in rows {
                writeln!(
                    out,
                    "| {} | {} | {} | {} | {} | {} | {} |",
                    md_cell(&row.series_id),
                    md_cell(&row.skill_name),
                    md_cell(&row.label),
                    row.range(),
                    if row.is_linear { "✅" } else { "❌" },
                    row.trend.as_str(),
                    row.jumps
                )?;
            }
        }
        Report::Chart { chart } => {
            writeln!(out, "| Series | Points | Jumps |")?;
            writeln!(out, "|--------|--------|-------|")?;
            for line in &chart.lines {
                let range = RangeSummary::of(line.points.iter().map(|p| p.y));
                let jumps: Vec<String> = line.jumps.iter().map(|p| p.level.to_string()).collect();
                writeln!(
                    out,
                    "| {} | {} ({range}) | {} |",
                    md_cell(&line.name),
                    line.points.len(),
                    md_cell(&jumps.join(", "))
                )?;
            }
        }
    }
    if report.is_empty() {
        writeln!(out, "\n_No matching entries._")?;
    }
    Ok(())
}

pub fn generate_csv_report<W: Write + ?Sized>(out: &mut W, report: &Report) -> Result<()> {
    match report {
        Report::Skills { rows, .. } => {
            writeln!(
                out,
                "id,name,description,effects,consume_min,consume_max,deal_min,deal_max"
            )?;
            for row in rows {
                writeln!(
                    out,
                    "{},{},{},{},{},{},{},{}",
                    csv_field(&row.id),
                    csv_field(&row.name),
                    csv_field(&row.description),
                    csv_field(&row.effects_text),
                    csv_number(row.consume_range.min),
                    csv_number(row.consume_range.max),
                    csv_number(row.deal_range.min),
                    csv_number(row.deal_range.max)
                )?;
            }
        }
        Report::Series { rows } => {
            writeln!(out, "series_id,skill_id,skill_name,label,min,max,is_linear,trend,jumps")?;
            for row in rows {
                writeln!(
                    out,
                    "{},{},{},{},{},{},{},{},{}",
                    csv_field(&row.series_id),
                    csv_field(&row.skill_id),
                    csv_field(&row.skill_name),
                    csv_field(&row.label),
                    csv_number(row.min),
                    csv_number(row.max),
                    row.is_linear,
                    row.trend.as_str(),
                    row.jumps
                )?;
            }
        }
        Report::Chart { chart } => {
            writeln!(out, "series_id,name,level,y,is_jump")?;
            for line in &chart.lines {
                for point in &line.points {
                    writeln!(
                        out,
                        "{},{},{},{},{}",
                        csv_field(&line.series_id),
                        csv_field(&line.name),
                        point.level,
                        point.y,
                        line.jumps.contains(point)
                    )?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillgrowth_core::{ChartLine, ChartPoint, DetailEntry, Trend};

    fn skills_report() -> Report {
        let row = SkillRow {
            id: "10023".into(),
            name: "烈焰掌".into(),
            description: "灼烧, 目标".into(),
            effects_text: "灼烧；减速".into(),
            consume_range: RangeSummary::of([19.0, 21.0]),
            deal_range: RangeSummary::EMPTY,
        };
        let pack = DetailPack {
            consume: vec![DetailEntry {
                label: "消耗-内力".into(),
                rows: vec![
                    ValuePoint {
                        level_index: 1,
                        value: 10.0,
                        diff_to_prev: None,
                        is_jump: false,
                    },
                    ValuePoint {
                        level_index: 2,
                        value: 30.0,
                        diff_to_prev: Some(20.0),
                        is_jump: true,
                    },
                ],
            }],
            ..DetailPack::default()
        };
        Report::Skills {
            rows: vec![row],
            details: BTreeMap::from([("10023".to_string(), pack)]),
        }
    }

    fn render(
        report: &Report,
        f: fn(&mut Vec<u8>, &Report) -> Result<()>,
    ) -> String {
        let mut buffer = Vec::new();
        f(&mut buffer, report).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn console_report_shows_ranges_and_details() {
        colored::control::set_override(false);
        let text = render(&skills_report(), generate_console_report);
        assert!(text.contains("烈焰掌"));
        assert!(text.contains("19 - 21"));
        assert!(text.contains("Deal: -"));
        assert!(text.contains("L2 30 (+20)"));
    }

    #[test]
    fn json_report_is_tagged_by_view() {
        let text = render(&skills_report(), generate_json_report);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["view"], "skills");
        assert_eq!(value["rows"][0]["consume_range"]["min"], 19.0);
        assert!(value["rows"][0]["deal_range"]["min"].is_null());
        assert_eq!(value["details"]["10023"]["consume"][0]["rows"][1]["is_jump"], true);
    }

    #[test]
    fn markdown_report_has_tables_and_placeholders() {
        let text = render(&skills_report(), generate_markdown_report);
        assert!(text.contains("| 10023 | 烈焰掌 |"));
        assert!(text.contains("| 19 - 21 | - |"));
        assert!(text.contains("## 10023"));
        assert!(text.contains("| 1 | 10 | - |  |"));
    }

    #[test]
    fn csv_report_quotes_and_leaves_missing_numbers_blank() {
        let text = render(&skills_report(), generate_csv_report);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "10023,烈焰掌,\"灼烧, 目标\",灼烧；减速,19,21,,");
    }

    #[test]
    fn series_and_chart_reports_render() {
        let series = Report::Series {
            rows: vec![SeriesRow {
                series_id: "10023:灼烧伤害".into(),
                skill_id: "10023".into(),
                skill_name: "烈焰掌".into(),
                label: "灼烧伤害".into(),
                min: Some(100.0),
                max: Some(320.0),
                is_linear: false,
                trend: Trend::Increasing,
                jumps: 1,
            }],
        };
        let csv = render(&series, generate_csv_report);
        assert!(csv.contains("10023:灼烧伤害,10023,烈焰掌,灼烧伤害,100,320,false,increasing,1"));

        let jump = ChartPoint { level: 2, y: 9.0 };
        let chart = Report::Chart {
            chart: Chart {
                mode: ChartMode::Values,
                levels: vec![1, 2],
                lines: vec![ChartLine {
                    series_id: "10023:灼烧伤害".into(),
                    name: "烈焰掌 灼烧伤害".into(),
                    points: vec![ChartPoint { level: 1, y: 1.0 }, jump],
                    is_linear: false,
                    jumps: vec![jump],
                }],
            },
        };
        let csv = render(&chart, generate_csv_report);
        assert!(csv.ends_with("10023:灼烧伤害,烈焰掌 灼烧伤害,2,9,true\n"));
        let md = render(&chart, generate_markdown_report);
        assert!(md.contains("| 烈焰掌 灼烧伤害 | 2 (1 - 9) | 2 |"));
    }

    #[test]
    fn empty_reports_say_so() {
        colored::control::set_override(false);
        let report = Report::Series { rows: Vec::new() };
        assert!(render(&report, generate_console_report).contains("No matching entries."));
        assert!(render(&report, generate_markdown_report).contains("_No matching entries._"));
    }
}
