//! Trading-day resolution against observed market data.
//!
//! No holiday table is shipped. A date is a trading day when it is not a
//! weekend and the market produced data on it, so the calendar stays correct
//! across exchanges and ad-hoc closures. Walk-backs are bounded; exhausting
//! the window is reported, never papered over with a guessed date.

use crate::domain::error::EtfRankError;
use crate::domain::period::Period;
use crate::ports::price_port::PricePort;
use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Longest holiday streak the walk-back will cross.
pub const MAX_WALKBACK_DAYS: u32 = 10;

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Whether `date` is a trading day. Weekends are rejected without touching
/// the provider.
pub async fn is_trading_day(
    port: &dyn PricePort,
    date: NaiveDate,
) -> Result<bool, EtfRankError> {
    if is_weekend(date) {
        return Ok(false);
    }
    port.market_has_data(date).await
}

/// Most recent trading day at or before `date`, examining at most
/// `MAX_WALKBACK_DAYS` days behind it. `Ok(None)` means the window holds no
/// trading day, which callers treat as "no market history here".
pub async fn latest_trading_day_on_or_before(
    port: &dyn PricePort,
    date: NaiveDate,
) -> Result<Option<NaiveDate>, EtfRankError> {
    let mut candidate = date;
    for _ in 0..=MAX_WALKBACK_DAYS {
        if is_trading_day(port, candidate).await? {
            return Ok(Some(candidate));
        }
        match candidate.pred_opt() {
            Some(prev) => candidate = prev,
            None => break,
        }
    }
    Ok(None)
}

/// Anchor trading day for one lookback period: the latest trading day at or
/// before `reference - lookback`.
pub async fn resolve_anchor(
    port: &dyn PricePort,
    reference: NaiveDate,
    period: Period,
) -> Result<Option<NaiveDate>, EtfRankError> {
    let Some(target) = reference.checked_sub_days(Days::new(period.lookback_days() as u64))
    else {
        return Ok(None);
    };
    latest_trading_day_on_or_before(port, target).await
}

/// The anchors for every period of one run, resolved once and shared by all
/// instruments. A `None` anchor means market history does not reach back that
/// far; every instrument is not-launched for that period.
#[derive(Debug, Clone)]
pub struct AnchorSet {
    anchors: Vec<(Period, Option<NaiveDate>)>,
}

impl AnchorSet {
    /// Build a set from a per-period mapping. [`resolve_anchors`] is the
    /// normal constructor; this one suits fixed calendars and tests.
    pub fn from_fn(mut anchor_for: impl FnMut(Period) -> Option<NaiveDate>) -> Self {
        AnchorSet {
            anchors: Period::ALL.iter().map(|&p| (p, anchor_for(p))).collect(),
        }
    }

    pub fn get(&self, period: Period) -> Option<NaiveDate> {
        self.anchors
            .iter()
            .find(|(p, _)| *p == period)
            .and_then(|(_, anchor)| *anchor)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Period, Option<NaiveDate>)> + '_ {
        self.anchors.iter().copied()
    }
}

/// Resolve the anchor for every period relative to `reference`.
pub async fn resolve_anchors(
    port: &dyn PricePort,
    reference: NaiveDate,
) -> Result<AnchorSet, EtfRankError> {
    let mut anchors = Vec::with_capacity(Period::ALL.len());
    for period in Period::ALL {
        let anchor = resolve_anchor(port, reference, period).await?;
        anchors.push((period, anchor));
    }
    Ok(AnchorSet { anchors })
}
