//! Instrument universe selection.
//!
//! Takes raw listing rows from a universe provider, drops malformed rows with
//! a warning, and keeps the top N by assets under management with a unique
//! size rank per instrument.

use crate::domain::error::EtfRankError;
use crate::domain::rounding::round_aum;
use std::collections::HashSet;

/// Raw listing row as returned by a universe provider.
#[derive(Debug, Clone)]
pub struct UniverseEntry {
    pub code: String,
    pub name: String,
    pub aum: f64,
}

/// A selected universe member. `aum_rank` is 1 for the largest fund and is
/// unique across the selection; `aum` is the presentation figure, rounded to
/// one decimal place.
#[derive(Debug, Clone)]
pub struct Instrument {
    pub code: String,
    pub name: String,
    pub aum: f64,
    pub aum_rank: u32,
}

#[derive(Debug, Clone)]
pub struct SkippedEntry {
    pub code: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone)]
pub enum SkipReason {
    EmptyCode,
    EmptyName,
    InvalidAum { aum: f64 },
    DuplicateCode,
}

pub struct UniverseSelection {
    pub instruments: Vec<Instrument>,
    pub skipped: Vec<SkippedEntry>,
}

/// Validate raw entries and keep the top `top_n` by AUM.
///
/// Ties on AUM break by code ascending so the selection is deterministic.
/// Returns an error only when no valid entry remains; individual bad rows are
/// skipped with a warning.
pub fn select_universe(
    entries: Vec<UniverseEntry>,
    top_n: usize,
) -> Result<UniverseSelection, EtfRankError> {
    let mut valid: Vec<UniverseEntry> = Vec::new();
    let mut skipped: Vec<SkippedEntry> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for entry in entries {
        let code = entry.code.trim().to_string();
        let name = entry.name.trim().to_string();

        if code.is_empty() {
            eprintln!("Warning: skipping listing row with empty code");
            skipped.push(SkippedEntry {
                code,
                reason: SkipReason::EmptyCode,
            });
            continue;
        }
        if name.is_empty() {
            eprintln!("Warning: skipping {} (empty name)", code);
            skipped.push(SkippedEntry {
                code,
                reason: SkipReason::EmptyName,
            });
            continue;
        }
        if !entry.aum.is_finite() || entry.aum < 0.0 {
            eprintln!("Warning: skipping {} (invalid AUM {})", code, entry.aum);
            skipped.push(SkippedEntry {
                code,
                reason: SkipReason::InvalidAum { aum: entry.aum },
            });
            continue;
        }
        if !seen.insert(code.clone()) {
            eprintln!("Warning: skipping duplicate listing for {}", code);
            skipped.push(SkippedEntry {
                code,
                reason: SkipReason::DuplicateCode,
            });
            continue;
        }

        valid.push(UniverseEntry {
            code,
            name,
            aum: entry.aum,
        });
    }

    if valid.is_empty() {
        return Err(EtfRankError::UniverseUnavailable {
            reason: "no valid listing rows".to_string(),
        });
    }

    // Rank on the raw AUM; the stored figure is rounded for presentation only.
    valid.sort_by(|a, b| {
        b.aum
            .total_cmp(&a.aum)
            .then_with(|| a.code.cmp(&b.code))
    });
    valid.truncate(top_n);

    let instruments = valid
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| Instrument {
            code: entry.code,
            name: entry.name,
            aum: round_aum(entry.aum),
            aum_rank: (idx + 1) as u32,
        })
        .collect();

    Ok(UniverseSelection {
        instruments,
        skipped,
    })
}
