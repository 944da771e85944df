//! Price provider port trait.

use crate::domain::error::EtfRankError;
use crate::domain::price_series::DailyClose;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Access to per-instrument daily closes and market-level trading activity.
///
/// Implementations talk to an external provider, so calls may fail
/// transiently; the engine retries [`EtfRankError::ProviderTransient`] and
/// degrades other per-instrument failures to not-launched.
#[async_trait]
pub trait PricePort: Send + Sync {
    /// Daily closes for `code` within `[start, end]` inclusive, trading days
    /// only. Order is not guaranteed; a newly listed instrument returns only
    /// the dates it traded, and an unknown code is a
    /// [`EtfRankError::PriceData`] error.
    async fn fetch_closes(
        &self,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyClose>, EtfRankError>;

    /// Whether the market as a whole produced data on `date`. Weekends are
    /// rejected before this is consulted, so implementations only need to
    /// distinguish holidays from ordinary weekdays.
    async fn market_has_data(&self, date: NaiveDate) -> Result<bool, EtfRankError>;
}
