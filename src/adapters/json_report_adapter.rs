//! JSON snapshot adapter.
//!
//! Writes one dated `etf_performance_<YYYYMMDD>.json` per run with the
//! full record set. Every period entry carries the same four keys so
//! downstream consumers can rely on a fixed shape; values that do not
//! exist for a not-yet-listed period are serialized as null.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::analysis::AnalysisResult;
use crate::domain::error::EtfRankError;
use crate::ports::report_port::ReportPort;

#[derive(Serialize)]
struct SnapshotDoc<'a> {
    analysis_date: String,
    total_instruments: usize,
    instruments: Vec<InstrumentRow<'a>>,
    issues: Vec<IssueRow<'a>>,
}

#[derive(Serialize)]
struct InstrumentRow<'a> {
    code: &'a str,
    name: &'a str,
    aum: f64,
    aum_rank: u32,
    sector: &'static str,
    scope: &'static str,
    leverage: &'static str,
    hedge: &'static str,
    dividend: &'static str,
    tier: &'static str,
    periods: Vec<PeriodRow>,
}

#[derive(Serialize)]
struct PeriodRow {
    period: &'static str,
    return_pct: Option<f64>,
    rank: Option<u32>,
    anchor: Option<String>,
}

pub struct JsonReportAdapter;

impl JsonReportAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn file_name(result: &AnalysisResult) -> String {
        format!(
            "etf_performance_{}.json",
            result.reference_date.format("%Y%m%d")
        )
    }
}

impl Default for JsonReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct IssueRow<'a> {
    code: &'a str,
    period: Option<&'static str>,
    kind: &'static str,
    detail: &'a str,
}

impl ReportPort for JsonReportAdapter {
    fn write(
        &self,
        result: &AnalysisResult,
        output_dir: &Path,
    ) -> Result<PathBuf, EtfRankError> {
        let doc = SnapshotDoc {
            analysis_date: result.reference_date.format("%Y-%m-%d").to_string(),
            total_instruments: result.instruments.len(),
            instruments: result
                .instruments
                .iter()
                .map(|report| InstrumentRow {
                    code: &report.instrument.code,
                    name: &report.instrument.name,
                    aum: report.instrument.aum,
                    aum_rank: report.instrument.aum_rank,
                    sector: report.labels.sector.label(),
                    scope: report.labels.scope.label(),
                    leverage: report.labels.leverage.label(),
                    hedge: report.labels.hedge.label(),
                    dividend: report.labels.dividend.label(),
                    tier: report.tier.label(),
                    periods: report
                        .records
                        .iter()
                        .map(|rec| PeriodRow {
                            period: rec.period.label(),
                            return_pct: rec.value.percentage(),
                            rank: rec.rank,
                            anchor: rec.anchor.map(|d| d.format("%Y-%m-%d").to_string()),
                        })
                        .collect(),
                })
                .collect(),
            issues: result
                .issues
                .iter()
                .map(|issue| IssueRow {
                    code: &issue.code,
                    period: issue.period.map(|p| p.label()),
                    kind: issue.kind.label(),
                    detail: &issue.detail,
                })
                .collect(),
        };

        let json = serde_json::to_string_pretty(&doc).map_err(|e| EtfRankError::Report {
            reason: format!("JSON serialization failed: {}", e),
        })?;

        fs::create_dir_all(output_dir).map_err(|e| EtfRankError::Report {
            reason: format!("failed to create {}: {}", output_dir.display(), e),
        })?;
        let path = output_dir.join(Self::file_name(result));
        fs::write(&path, json).map_err(|e| EtfRankError::Report {
            reason: format!("failed to write {}: {}", path.display(), e),
        })?;

        Ok(path)
    }
}
