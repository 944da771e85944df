//! Per-period return computation for one instrument.
//!
//! Each (instrument, period) pair yields exactly one [`ReturnRecord`]. A
//! period whose anchor predates the instrument's history is marked
//! not-launched rather than erroring, so late listings flow through ranking
//! and partitioning without special cases.

use crate::domain::calendar::AnchorSet;
use crate::domain::period::Period;
use crate::domain::price_series::PriceSeries;
use crate::domain::rounding::round_return;
use chrono::NaiveDate;

/// A period return: a computed percentage, or the not-launched sentinel for
/// periods the instrument was not yet trading. Modeled as a tagged variant so
/// ranking and partitioning cannot mistake the sentinel for a real figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReturnValue {
    Launched(f64),
    NotLaunched,
}

impl ReturnValue {
    pub fn percentage(self) -> Option<f64> {
        match self {
            ReturnValue::Launched(v) => Some(v),
            ReturnValue::NotLaunched => None,
        }
    }

    pub fn is_launched(self) -> bool {
        matches!(self, ReturnValue::Launched(_))
    }
}

/// The outcome for one (instrument, period) pair. `rank` stays `None` until
/// the ranking stage fills it, and remains `None` for not-launched records.
#[derive(Debug, Clone)]
pub struct ReturnRecord {
    pub period: Period,
    pub anchor: Option<NaiveDate>,
    pub base_price: Option<f64>,
    pub current_price: Option<f64>,
    pub value: ReturnValue,
    pub rank: Option<u32>,
}

impl ReturnRecord {
    /// A record carrying only the sentinel, as produced for periods before
    /// listing or when an instrument's data could not be obtained at all.
    pub fn not_launched(period: Period, anchor: Option<NaiveDate>) -> Self {
        ReturnRecord {
            period,
            anchor,
            base_price: None,
            current_price: None,
            value: ReturnValue::NotLaunched,
            rank: None,
        }
    }
}

/// Data-quality finding recorded during a run. Issues never abort a run;
/// they annotate the result for the caller.
#[derive(Debug, Clone)]
pub struct DataIssue {
    pub code: String,
    /// `None` when the issue affects the whole instrument rather than a
    /// single period.
    pub period: Option<Period>,
    pub kind: IssueKind,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// No usable price where one was needed; degraded to not-launched.
    DataUnavailable,
    /// Malformed input such as a non-positive base price.
    InvalidInput,
    /// Provider kept failing after retries; degraded to not-launched.
    ProviderDegraded,
}

impl IssueKind {
    pub fn label(self) -> &'static str {
        match self {
            IssueKind::DataUnavailable => "data-unavailable",
            IssueKind::InvalidInput => "invalid-input",
            IssueKind::ProviderDegraded => "provider-degraded",
        }
    }
}

/// `(current - base) / base * 100`, rounded to the fixed precision.
pub fn percentage_return(base: f64, current: f64) -> f64 {
    round_return(((current - base) / base) * 100.0)
}

/// Compute all period records for one instrument.
///
/// The current price is the close on the reference date itself; an instrument
/// that did not print that day (halted or delisted) degrades to not-launched
/// for every period rather than being valued on a stale close. The base price
/// is the most recent close at or before the period's anchor.
pub fn compute_returns(
    code: &str,
    series: &PriceSeries,
    anchors: &AnchorSet,
    reference: NaiveDate,
) -> (Vec<ReturnRecord>, Vec<DataIssue>) {
    let mut issues = Vec::new();

    let Some(current_price) = series.close_on(reference) else {
        issues.push(DataIssue {
            code: code.to_string(),
            period: None,
            kind: IssueKind::DataUnavailable,
            detail: format!("no close at the reference date {}", reference),
        });
        let records = anchors
            .iter()
            .map(|(period, anchor)| ReturnRecord::not_launched(period, anchor))
            .collect();
        return (records, issues);
    };

    if !current_price.is_finite() {
        issues.push(DataIssue {
            code: code.to_string(),
            period: None,
            kind: IssueKind::InvalidInput,
            detail: format!(
                "current price {} at {} is not usable",
                current_price, reference
            ),
        });
        let records = anchors
            .iter()
            .map(|(period, anchor)| ReturnRecord::not_launched(period, anchor))
            .collect();
        return (records, issues);
    }

    let mut records = Vec::with_capacity(Period::ALL.len());
    for (period, anchor) in anchors.iter() {
        let Some(anchor_date) = anchor else {
            // Market history itself does not reach back this far; not an
            // instrument-level issue.
            records.push(ReturnRecord::not_launched(period, None));
            continue;
        };

        let Some(base) = series.latest_at_or_before(anchor_date) else {
            // Listed after the anchor. Expected for young funds.
            records.push(ReturnRecord::not_launched(period, Some(anchor_date)));
            continue;
        };

        if !base.close.is_finite() || base.close <= 0.0 {
            issues.push(DataIssue {
                code: code.to_string(),
                period: Some(period),
                kind: IssueKind::InvalidInput,
                detail: format!("base price {} at {} is not usable", base.close, base.date),
            });
            records.push(ReturnRecord {
                period,
                anchor: Some(anchor_date),
                base_price: Some(base.close),
                current_price: Some(current_price),
                value: ReturnValue::NotLaunched,
                rank: None,
            });
            continue;
        }

        records.push(ReturnRecord {
            period,
            anchor: Some(anchor_date),
            base_price: Some(base.close),
            current_price: Some(current_price),
            value: ReturnValue::Launched(percentage_return(base.close, current_price)),
            rank: None,
        });
    }

    (records, issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price_series::DailyClose;
    use chrono::Days;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn series_from(pairs: &[(NaiveDate, f64)]) -> PriceSeries {
        PriceSeries::new(
            pairs
                .iter()
                .map(|&(date, close)| DailyClose {
                    date,
                    close,
                    volume: 10_000,
                })
                .collect(),
        )
    }

    /// Anchors at exactly `reference - lookback`, as on a market with data
    /// every calendar day.
    fn exact_anchors(reference: NaiveDate) -> AnchorSet {
        AnchorSet::from_fn(|p| reference.checked_sub_days(Days::new(p.lookback_days() as u64)))
    }

    #[test]
    fn five_percent_gain_over_one_day() {
        let reference = day(2024, 6, 14);
        let series = series_from(&[(day(2024, 6, 13), 1000.0), (reference, 1050.0)]);
        let (records, issues) = compute_returns("A", &series, &exact_anchors(reference), reference);

        let one_day = records.iter().find(|r| r.period == Period::Day1).unwrap();
        assert_eq!(one_day.value, ReturnValue::Launched(5.0));
        assert_eq!(one_day.base_price, Some(1000.0));
        assert_eq!(one_day.current_price, Some(1050.0));
        assert_eq!(one_day.anchor, Some(day(2024, 6, 13)));
        assert!(issues.is_empty());
    }

    #[test]
    fn negative_returns_round_the_same_way() {
        let reference = day(2024, 6, 14);
        let series = series_from(&[(day(2024, 6, 13), 300.0), (reference, 299.0)]);
        let (records, _) = compute_returns("A", &series, &exact_anchors(reference), reference);
        let one_day = records.iter().find(|r| r.period == Period::Day1).unwrap();
        // -1/300 = -0.3333...% rounds to -0.33.
        assert_eq!(one_day.value, ReturnValue::Launched(-0.33));
    }

    #[test]
    fn late_listing_is_not_launched_for_long_periods_only() {
        let reference = day(2024, 6, 14);
        // Listed ~2 months before the reference date.
        let listed = day(2024, 4, 10);
        let series = series_from(&[(listed, 500.0), (day(2024, 6, 13), 550.0), (reference, 560.0)]);
        let (records, issues) = compute_returns("B", &series, &exact_anchors(reference), reference);

        let five_year = records.iter().find(|r| r.period == Period::Year5).unwrap();
        assert_eq!(five_year.value, ReturnValue::NotLaunched);
        assert!(five_year.base_price.is_none());
        assert!(five_year.rank.is_none());

        let one_month = records.iter().find(|r| r.period == Period::Month1).unwrap();
        assert_eq!(one_month.value, ReturnValue::Launched(12.0));

        // Being listed late is not a data issue.
        assert!(issues.is_empty());
    }

    #[test]
    fn base_rows_behind_the_anchor_are_used() {
        let reference = day(2024, 6, 14);
        // No close exactly at the 1w anchor (2024-06-07); the one from two
        // days earlier stands in.
        let series = series_from(&[(day(2024, 6, 5), 200.0), (reference, 210.0)]);
        let (records, _) = compute_returns("A", &series, &exact_anchors(reference), reference);
        let one_week = records.iter().find(|r| r.period == Period::Week1).unwrap();
        assert_eq!(one_week.anchor, Some(day(2024, 6, 7)));
        assert_eq!(one_week.base_price, Some(200.0));
        assert_eq!(one_week.value, ReturnValue::Launched(5.0));
    }

    #[test]
    fn zero_base_price_is_reported_not_defaulted() {
        let reference = day(2024, 6, 14);
        let series = series_from(&[(day(2024, 6, 13), 0.0), (reference, 100.0)]);
        let (records, issues) = compute_returns("A", &series, &exact_anchors(reference), reference);

        let one_day = records.iter().find(|r| r.period == Period::Day1).unwrap();
        assert_eq!(one_day.value, ReturnValue::NotLaunched);
        assert_eq!(one_day.base_price, Some(0.0));

        let issue = issues
            .iter()
            .find(|i| i.period == Some(Period::Day1))
            .unwrap();
        assert_eq!(issue.kind, IssueKind::InvalidInput);
        assert_eq!(issue.code, "A");
    }

    #[test]
    fn halted_instrument_degrades_instead_of_using_stale_closes() {
        let reference = day(2024, 6, 14);
        // Last print two weeks before the reference, at half the old price.
        // Valuing it there would report a live-looking -50% return.
        let series = series_from(&[(day(2024, 5, 30), 100.0), (day(2024, 5, 31), 50.0)]);
        let (records, issues) = compute_returns("HALT", &series, &exact_anchors(reference), reference);

        assert_eq!(records.len(), Period::ALL.len());
        assert!(records.iter().all(|r| r.value == ReturnValue::NotLaunched));
        assert!(records.iter().all(|r| r.current_price.is_none()));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::DataUnavailable);
        assert_eq!(issues[0].period, None);
        assert_eq!(issues[0].code, "HALT");
    }

    #[test]
    fn non_finite_current_price_is_invalid_input() {
        let reference = day(2024, 6, 14);
        let series = series_from(&[(day(2024, 6, 13), 100.0), (reference, f64::NAN)]);
        let (records, issues) = compute_returns("A", &series, &exact_anchors(reference), reference);

        assert!(records.iter().all(|r| r.value == ReturnValue::NotLaunched));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::InvalidInput);
    }

    #[test]
    fn empty_series_degrades_every_period_with_one_issue() {
        let reference = day(2024, 6, 14);
        let series = series_from(&[]);
        let (records, issues) = compute_returns("GHOST", &series, &exact_anchors(reference), reference);

        assert_eq!(records.len(), Period::ALL.len());
        assert!(records.iter().all(|r| r.value == ReturnValue::NotLaunched));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::DataUnavailable);
        assert_eq!(issues[0].period, None);
    }

    #[test]
    fn missing_market_anchor_is_not_launched_without_issue() {
        let reference = day(2024, 6, 14);
        let anchors = AnchorSet::from_fn(|p| {
            if p == Period::Year5 {
                None
            } else {
                reference.checked_sub_days(Days::new(p.lookback_days() as u64))
            }
        });
        let series = series_from(&[(day(2018, 1, 2), 100.0), (reference, 150.0)]);
        let (records, issues) = compute_returns("A", &series, &anchors, reference);

        let five_year = records.iter().find(|r| r.period == Period::Year5).unwrap();
        assert_eq!(five_year.value, ReturnValue::NotLaunched);
        assert_eq!(five_year.anchor, None);
        assert!(issues.is_empty());
    }

    #[test]
    fn one_record_per_period_in_canonical_order() {
        let reference = day(2024, 6, 14);
        let series = series_from(&[(day(2017, 1, 2), 100.0), (reference, 150.0)]);
        let (records, _) = compute_returns("A", &series, &exact_anchors(reference), reference);
        let periods: Vec<Period> = records.iter().map(|r| r.period).collect();
        assert_eq!(periods, Period::ALL.to_vec());
    }
}
