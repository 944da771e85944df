#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Weekday};
use etfrank::domain::error::EtfRankError;
use etfrank::domain::instrument::UniverseEntry;
pub use etfrank::domain::price_series::DailyClose;
use etfrank::ports::price_port::PricePort;
use etfrank::ports::universe_port::UniversePort;
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

/// In-memory price provider. Closes are keyed by code; the market calendar
/// is an explicit set of open days. Transient failure counts are consumed
/// per fetch, so a code can fail N times and then succeed.
pub struct MockPricePort {
    pub series: HashMap<String, Vec<DailyClose>>,
    pub market_days: BTreeSet<NaiveDate>,
    pub errors: HashMap<String, String>,
    transient_failures: Mutex<HashMap<String, u32>>,
}

impl MockPricePort {
    pub fn new() -> Self {
        Self {
            series: HashMap::new(),
            market_days: BTreeSet::new(),
            errors: HashMap::new(),
            transient_failures: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_series(mut self, code: &str, closes: Vec<DailyClose>) -> Self {
        self.series.insert(code.to_string(), closes);
        self
    }

    pub fn with_market_days(mut self, days: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.market_days.extend(days);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }

    pub fn with_transient_failures(self, code: &str, count: u32) -> Self {
        self.transient_failures
            .lock()
            .unwrap()
            .insert(code.to_string(), count);
        self
    }
}

#[async_trait]
impl PricePort for MockPricePort {
    async fn fetch_closes(
        &self,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyClose>, EtfRankError> {
        {
            let mut transient = self.transient_failures.lock().unwrap();
            if let Some(remaining) = transient.get_mut(code) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(EtfRankError::ProviderTransient {
                        code: code.to_string(),
                        reason: "simulated outage".to_string(),
                    });
                }
            }
        }
        if let Some(reason) = self.errors.get(code) {
            return Err(EtfRankError::PriceData {
                code: code.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self
            .series
            .get(code)
            .map(|rows| {
                rows.iter()
                    .copied()
                    .filter(|row| row.date >= start && row.date <= end)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn market_has_data(&self, date: NaiveDate) -> Result<bool, EtfRankError> {
        Ok(self.market_days.contains(&date))
    }
}

pub struct MockUniversePort {
    pub entries: Vec<UniverseEntry>,
    pub fail_reason: Option<String>,
}

impl MockUniversePort {
    pub fn new(entries: &[(&str, &str, f64)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|&(code, name, aum)| UniverseEntry {
                    code: code.to_string(),
                    name: name.to_string(),
                    aum,
                })
                .collect(),
            fail_reason: None,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            entries: Vec::new(),
            fail_reason: Some(reason.to_string()),
        }
    }
}

#[async_trait]
impl UniversePort for MockUniversePort {
    async fn fetch_entries(&self) -> Result<Vec<UniverseEntry>, EtfRankError> {
        match &self.fail_reason {
            Some(reason) => Err(EtfRankError::UniverseUnavailable {
                reason: reason.clone(),
            }),
            None => Ok(self.entries.clone()),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Every weekday in the inclusive range.
pub fn weekdays(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            days.push(current);
        }
        current = match current.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    days
}

pub fn close_on(date: NaiveDate, close: f64) -> DailyClose {
    DailyClose {
        date,
        close,
        volume: 1_000,
    }
}

/// A flat-price history covering every given day.
pub fn flat_closes(days: &[NaiveDate], price: f64) -> Vec<DailyClose> {
    days.iter().map(|&d| close_on(d, price)).collect()
}
