//! Markdown summary report adapter.
//!
//! Writes one dated `etf_report_<YYYYMMDD>.md` per run: top and bottom 10
//! tables by 12-month and 1-week return, a sector breakdown, and any data
//! issues recorded during the run. Tables only list instruments launched
//! for the table's period; ranks are the period's competition ranks.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::analysis::AnalysisResult;
use crate::domain::error::EtfRankError;
use crate::domain::period::Period;
use crate::ports::report_port::ReportPort;

const TABLE_SIZE: usize = 10;

struct Row<'a> {
    rank: u32,
    name: &'a str,
    code: &'a str,
    year_pct: Option<f64>,
    week_pct: Option<f64>,
    sector: &'static str,
    scope: &'static str,
}

fn fmt_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:+.2}%", v),
        None => "n/a".to_string(),
    }
}

/// All launched rows for a period, best return first, AUM rank breaking ties.
fn ranked_rows(result: &AnalysisResult, period: Period) -> Vec<Row<'_>> {
    let mut rows: Vec<(f64, u32, Row<'_>)> = result
        .instruments
        .iter()
        .filter_map(|report| {
            let rec = report.record(period)?;
            let value = rec.value.percentage()?;
            let rank = rec.rank?;
            Some((
                value,
                report.instrument.aum_rank,
                Row {
                    rank,
                    name: &report.instrument.name,
                    code: &report.instrument.code,
                    year_pct: report
                        .record(Period::Month12)
                        .and_then(|r| r.value.percentage()),
                    week_pct: report
                        .record(Period::Week1)
                        .and_then(|r| r.value.percentage()),
                    sector: report.labels.sector.label(),
                    scope: report.labels.scope.label(),
                },
            ))
        })
        .collect();
    rows.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    rows.into_iter().map(|(_, _, row)| row).collect()
}

fn render_table<'a>(out: &mut String, title: &str, rows: impl Iterator<Item = &'a Row<'a>>) {
    out.push_str("## ");
    out.push_str(title);
    out.push_str("\n\n");

    let mut any = false;
    for row in rows {
        if !any {
            out.push_str("| Rank | Name | Code | 12m | 1w | Sector | Scope |\n");
            out.push_str("|-----:|------|------|----:|---:|--------|-------|\n");
            any = true;
        }
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} |\n",
            row.rank,
            row.name,
            row.code,
            fmt_pct(row.year_pct),
            fmt_pct(row.week_pct),
            row.sector,
            row.scope
        ));
    }
    if !any {
        out.push_str("No launched instruments for this period.\n");
    }
    out.push('\n');
}

fn render_sector_counts(out: &mut String, result: &AnalysisResult) {
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for report in &result.instruments {
        *counts.entry(report.labels.sector.label()).or_default() += 1;
    }
    let mut ordered: Vec<(&'static str, usize)> = counts.into_iter().collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    out.push_str("## Sector breakdown\n\n");
    out.push_str("| Sector | Funds |\n");
    out.push_str("|--------|------:|\n");
    for (sector, count) in ordered {
        out.push_str(&format!("| {} | {} |\n", sector, count));
    }
    out.push('\n');
}

fn render_report(result: &AnalysisResult) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "# ETF Performance Report ({})\n\n",
        result.reference_date.format("%Y-%m-%d")
    ));
    out.push_str(&format!(
        "{} instruments ranked by assets under management.\n\n",
        result.instruments.len()
    ));

    let by_year = ranked_rows(result, Period::Month12);
    let by_week = ranked_rows(result, Period::Week1);

    render_table(&mut out, "Top 10 by 12m return", by_year.iter().take(TABLE_SIZE));
    render_table(
        &mut out,
        "Bottom 10 by 12m return",
        by_year.iter().rev().take(TABLE_SIZE),
    );
    render_table(&mut out, "Top 10 by 1w return", by_week.iter().take(TABLE_SIZE));
    render_table(
        &mut out,
        "Bottom 10 by 1w return",
        by_week.iter().rev().take(TABLE_SIZE),
    );

    render_sector_counts(&mut out, result);

    if !result.issues.is_empty() {
        out.push_str("## Data issues\n\n");
        for issue in &result.issues {
            match issue.period {
                Some(period) => out.push_str(&format!(
                    "- {} ({}): {} [{}]\n",
                    issue.code,
                    period.label(),
                    issue.detail,
                    issue.kind.label()
                )),
                None => out.push_str(&format!(
                    "- {}: {} [{}]\n",
                    issue.code,
                    issue.detail,
                    issue.kind.label()
                )),
            }
        }
        out.push('\n');
    }

    out
}

pub struct MarkdownReportAdapter;

impl MarkdownReportAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn file_name(result: &AnalysisResult) -> String {
        format!("etf_report_{}.md", result.reference_date.format("%Y%m%d"))
    }
}

impl Default for MarkdownReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for MarkdownReportAdapter {
    fn write(
        &self,
        result: &AnalysisResult,
        output_dir: &Path,
    ) -> Result<PathBuf, EtfRankError> {
        let report = render_report(result);

        fs::create_dir_all(output_dir).map_err(|e| EtfRankError::Report {
            reason: format!("failed to create {}: {}", output_dir.display(), e),
        })?;
        let path = output_dir.join(Self::file_name(result));
        fs::write(&path, report).map_err(|e| EtfRankError::Report {
            reason: format!("failed to write {}: {}", path.display(), e),
        })?;

        Ok(path)
    }
}
