//! Full analysis run.
//!
//! One pass: fetch the universe, resolve the reference date and the period
//! anchors, pull price history concurrently, compute per-period returns,
//! rank, classify, and partition. Per-instrument failures degrade to
//! not-launched; only universe, calendar, or reference-date failures abort.

use crate::domain::calendar::{self, AnchorSet};
use crate::domain::classify::{classify, ClassificationLabels, ClassifierRules};
use crate::domain::error::EtfRankError;
use crate::domain::instrument::{select_universe, Instrument, SkipReason};
use crate::domain::partition::{assign_tiers, Tier};
use crate::domain::period::Period;
use crate::domain::price_series::{DailyClose, PriceSeries};
use crate::domain::ranking::competition_ranks;
use crate::domain::returns::{compute_returns, DataIssue, IssueKind, ReturnRecord, ReturnValue};
use crate::ports::price_port::PricePort;
use crate::ports::universe_port::UniversePort;
use chrono::{Days, NaiveDate};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::time::Duration;

/// Bounded exponential backoff for transient provider failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt + 1` (zero-based), capped at
    /// `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.powi(attempt as i32);
        let millis = (self.initial_delay.as_millis() as f64 * factor)
            .min(self.max_delay.as_millis() as f64);
        Duration::from_millis(millis as u64)
    }
}

/// Knobs for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Universe size: the top N funds by AUM.
    pub top_n: usize,
    /// Upper bound on in-flight price fetches.
    pub max_concurrency: usize,
    /// Explicit reference date; `None` means the latest trading day strictly
    /// before today.
    pub reference_date: Option<NaiveDate>,
    pub retry: RetryPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            top_n: 100,
            max_concurrency: 8,
            reference_date: None,
            retry: RetryPolicy::default(),
        }
    }
}

/// Everything known about one instrument after a run: identity, labels,
/// tier, and one record per period in [`Period::ALL`] order.
#[derive(Debug, Clone)]
pub struct InstrumentReport {
    pub instrument: Instrument,
    pub labels: ClassificationLabels,
    pub tier: Tier,
    pub records: Vec<ReturnRecord>,
}

impl InstrumentReport {
    pub fn record(&self, period: Period) -> Option<&ReturnRecord> {
        self.records.get(period.index())
    }
}

/// Output of one run. `instruments` keeps AUM-rank order so identical inputs
/// give identical output.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub reference_date: NaiveDate,
    pub instruments: Vec<InstrumentReport>,
    pub issues: Vec<DataIssue>,
}

impl AnalysisResult {
    pub fn launched_count(&self, period: Period) -> usize {
        self.instruments
            .iter()
            .filter(|r| {
                r.record(period)
                    .map(|rec| rec.value.is_launched())
                    .unwrap_or(false)
            })
            .count()
    }
}

async fn fetch_with_retry(
    port: &dyn PricePort,
    code: &str,
    start: NaiveDate,
    end: NaiveDate,
    retry: &RetryPolicy,
) -> Result<Vec<DailyClose>, EtfRankError> {
    let mut attempt = 0;
    loop {
        match port.fetch_closes(code, start, end).await {
            Err(EtfRankError::ProviderTransient { code: c, reason }) if attempt < retry.max_retries => {
                let delay = retry.delay_for(attempt);
                attempt += 1;
                eprintln!(
                    "Warning: transient failure for {} ({}), retry {} of {} after {:?}",
                    c, reason, attempt, retry.max_retries, delay
                );
                tokio::time::sleep(delay).await;
            }
            outcome => return outcome,
        }
    }
}

/// Records and issue for an instrument whose history could not be fetched.
fn degraded_records(
    code: &str,
    err: &EtfRankError,
    anchors: &AnchorSet,
) -> (Vec<ReturnRecord>, Vec<DataIssue>) {
    let kind = match err {
        EtfRankError::ProviderTransient { .. } => IssueKind::ProviderDegraded,
        _ => IssueKind::DataUnavailable,
    };
    let records = anchors
        .iter()
        .map(|(period, anchor)| ReturnRecord::not_launched(period, anchor))
        .collect();
    let issues = vec![DataIssue {
        code: code.to_string(),
        period: None,
        kind,
        detail: err.to_string(),
    }];
    (records, issues)
}

fn skip_detail(reason: &SkipReason) -> String {
    match reason {
        SkipReason::EmptyCode => "empty code".to_string(),
        SkipReason::EmptyName => "empty name".to_string(),
        SkipReason::InvalidAum { aum } => format!("invalid AUM {}", aum),
        SkipReason::DuplicateCode => "duplicate code".to_string(),
    }
}

/// Run the whole analysis. `today` is injected so runs are reproducible;
/// callers normally pass the current local date.
pub async fn run_analysis(
    price_port: &dyn PricePort,
    universe_port: &dyn UniversePort,
    rules: &ClassifierRules,
    config: &AnalysisConfig,
    today: NaiveDate,
) -> Result<AnalysisResult, EtfRankError> {
    // Step 1: universe. Failure here is fatal.
    eprintln!("Step 1: fetching instrument universe");
    let entries = universe_port.fetch_entries().await?;
    let selection = select_universe(entries, config.top_n)?;
    let instruments = selection.instruments;
    eprintln!("  universe: {} instruments", instruments.len());

    let mut issues: Vec<DataIssue> = selection
        .skipped
        .iter()
        .map(|skip| DataIssue {
            code: skip.code.clone(),
            period: None,
            kind: IssueKind::InvalidInput,
            detail: skip_detail(&skip.reason),
        })
        .collect();

    // Step 2: reference date and shared anchors.
    eprintln!("Step 2: resolving reference date");
    let probe = config
        .reference_date
        .unwrap_or_else(|| today.pred_opt().unwrap_or(today));
    let reference = calendar::latest_trading_day_on_or_before(price_port, probe)
        .await?
        .ok_or(EtfRankError::CalendarExhausted {
            date: probe,
            window: calendar::MAX_WALKBACK_DAYS,
        })?;
    let anchors = calendar::resolve_anchors(price_port, reference).await?;
    eprintln!("  reference date: {}", reference);

    // Step 3: price history, bounded concurrency. Each task owns its result
    // until it lands in the map.
    eprintln!(
        "Step 3: fetching price history for {} instruments",
        instruments.len()
    );
    // Six years of history: margin past the 5y anchor, so an instrument whose
    // last print before that anchor is months older still has its base close
    // inside the window.
    let start = reference
        .checked_sub_days(Days::new(6 * 365))
        .unwrap_or(NaiveDate::MIN);
    let retry = &config.retry;
    let series_by_code: HashMap<String, Result<PriceSeries, EtfRankError>> =
        stream::iter(instruments.iter().map(|inst| {
            let code = inst.code.clone();
            async move {
                let outcome = fetch_with_retry(price_port, &code, start, reference, retry).await;
                (code, outcome.map(PriceSeries::new))
            }
        }))
        .buffer_unordered(config.max_concurrency.max(1))
        .collect()
        .await;

    // Step 4: per-period returns, in deterministic universe order.
    eprintln!("Step 4: computing period returns");
    let missing = EtfRankError::PriceData {
        code: String::new(),
        reason: "missing fetch result".to_string(),
    };
    let mut partial: Vec<(Instrument, ClassificationLabels, Vec<ReturnRecord>)> =
        Vec::with_capacity(instruments.len());
    for inst in instruments {
        let (records, inst_issues) = match series_by_code.get(&inst.code) {
            Some(Ok(series)) => compute_returns(&inst.code, series, &anchors, reference),
            Some(Err(err)) => {
                eprintln!("Warning: {} degraded to not-launched ({})", inst.code, err);
                degraded_records(&inst.code, err, &anchors)
            }
            None => degraded_records(&inst.code, &missing, &anchors),
        };
        issues.extend(inst_issues);
        let labels = classify(&inst.name, rules);
        partial.push((inst, labels, records));
    }

    // Step 5: rank per period, then partition by the 12-month record. Both
    // run only after every return is in.
    eprintln!("Step 5: ranking and partitioning");
    for period_idx in 0..Period::ALL.len() {
        let values: Vec<ReturnValue> = partial
            .iter()
            .map(|(_, _, records)| records[period_idx].value)
            .collect();
        let ranks = competition_ranks(&values);
        for ((_, _, records), rank) in partial.iter_mut().zip(ranks) {
            records[period_idx].rank = rank;
        }
    }

    let tier_inputs: Vec<(ReturnValue, u32)> = partial
        .iter()
        .map(|(inst, _, records)| (records[Period::Month12.index()].value, inst.aum_rank))
        .collect();
    let tiers = assign_tiers(&tier_inputs);

    let reports: Vec<InstrumentReport> = partial
        .into_iter()
        .zip(tiers)
        .map(|((instrument, labels, records), tier)| InstrumentReport {
            instrument,
            labels,
            tier,
            records,
        })
        .collect();

    let result = AnalysisResult {
        reference_date: reference,
        instruments: reports,
        issues,
    };
    eprintln!(
        "  done: {} of {} instruments carry a 12m return, {} issues",
        result.launched_count(Period::Month12),
        result.instruments.len(),
        result.issues.len()
    );
    Ok(result)
}
