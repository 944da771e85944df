//! Compact ranked digest of a run, for notification-style consumers.

use crate::domain::analysis::{AnalysisResult, InstrumentReport};
use crate::domain::period::Period;
use chrono::NaiveDate;
use std::fmt::Write;

pub const DIGEST_SIZE: usize = 5;

/// One digest line. `rank` is the competition rank within the period the
/// entry was selected by; both period figures ride along.
#[derive(Debug, Clone)]
pub struct DigestEntry {
    pub code: String,
    pub name: String,
    pub rank: u32,
    pub year_return: Option<f64>,
    pub week_return: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct Digest {
    pub reference_date: NaiveDate,
    pub universe_size: usize,
    pub top_by_year: Vec<DigestEntry>,
    pub top_by_week: Vec<DigestEntry>,
}

pub fn build_digest(result: &AnalysisResult) -> Digest {
    Digest {
        reference_date: result.reference_date,
        universe_size: result.instruments.len(),
        top_by_year: top_by(result, Period::Month12),
        top_by_week: top_by(result, Period::Week1),
    }
}

fn top_by(result: &AnalysisResult, period: Period) -> Vec<DigestEntry> {
    let mut launched: Vec<(&InstrumentReport, f64, u32)> = result
        .instruments
        .iter()
        .filter_map(|report| {
            let record = report.record(period)?;
            let value = record.value.percentage()?;
            let rank = record.rank?;
            Some((report, value, rank))
        })
        .collect();
    launched.sort_by(|a, b| {
        b.1.total_cmp(&a.1)
            .then_with(|| a.0.instrument.aum_rank.cmp(&b.0.instrument.aum_rank))
    });

    launched
        .into_iter()
        .take(DIGEST_SIZE)
        .map(|(report, _, rank)| DigestEntry {
            code: report.instrument.code.clone(),
            name: report.instrument.name.clone(),
            rank,
            year_return: report
                .record(Period::Month12)
                .and_then(|r| r.value.percentage()),
            week_return: report
                .record(Period::Week1)
                .and_then(|r| r.value.percentage()),
        })
        .collect()
}

fn fmt_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:+.2}%", v),
        None => "n/a".to_string(),
    }
}

/// Plain-text rendering, one screen tall, suitable for a chat notification.
pub fn render_digest(digest: &Digest) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "ETF return digest for {} ({} funds)",
        digest.reference_date, digest.universe_size
    );

    for (heading, entries) in [
        ("Top 5 by 12m return:", &digest.top_by_year),
        ("Top 5 by 1w return:", &digest.top_by_week),
    ] {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", heading);
        if entries.is_empty() {
            let _ = writeln!(out, "  (no launched instruments)");
            continue;
        }
        for entry in entries {
            let _ = writeln!(
                out,
                "  {:>2}. {} ({})  12m {} | 1w {}",
                entry.rank,
                entry.name,
                entry.code,
                fmt_pct(entry.year_return),
                fmt_pct(entry.week_return),
            );
        }
    }
    out
}
