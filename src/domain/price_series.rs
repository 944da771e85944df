//! Daily close representation and per-instrument price history.

use chrono::NaiveDate;

/// One trading day's close for a single instrument.
#[derive(Debug, Clone, Copy)]
pub struct DailyClose {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: i64,
}

/// A per-instrument price history, sorted ascending by date with unique dates.
///
/// Providers may return rows in any order; construction normalises them so
/// lookups can binary-search. When a provider repeats a date the later row
/// wins.
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    closes: Vec<DailyClose>,
}

impl PriceSeries {
    pub fn new(mut closes: Vec<DailyClose>) -> Self {
        closes.sort_by_key(|c| c.date);
        closes.dedup_by(|later, earlier| {
            if later.date == earlier.date {
                *earlier = *later;
                true
            } else {
                false
            }
        });
        PriceSeries { closes }
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    /// Earliest date in the series, i.e. the observable listing start.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.closes.first().map(|c| c.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.closes.last().map(|c| c.date)
    }

    /// Close on exactly `date`, if the instrument traded that day.
    pub fn close_on(&self, date: NaiveDate) -> Option<f64> {
        self.closes
            .binary_search_by_key(&date, |c| c.date)
            .ok()
            .map(|idx| self.closes[idx].close)
    }

    /// Most recent close at or before `date`. `None` when the series starts
    /// after `date`, which is how a listing gap shows up at a period anchor.
    pub fn latest_at_or_before(&self, date: NaiveDate) -> Option<&DailyClose> {
        let idx = self.closes.partition_point(|c| c.date <= date);
        if idx == 0 {
            None
        } else {
            Some(&self.closes[idx - 1])
        }
    }

    pub fn closes(&self) -> &[DailyClose] {
        &self.closes
    }
}
