//! Lookback periods for return computation.
//!
//! Offsets are calendar days; the trading calendar maps each offset to an
//! actual trading-day anchor at run time.

use std::fmt;

/// The fixed set of lookback periods, shortest to longest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Period {
    Day1,
    Day3,
    Week1,
    Week2,
    Month1,
    Month3,
    Month6,
    Month12,
    Year3,
    Year5,
}

impl Period {
    /// Every period, in ascending lookback order. Result records and report
    /// columns follow this order.
    pub const ALL: [Period; 10] = [
        Period::Day1,
        Period::Day3,
        Period::Week1,
        Period::Week2,
        Period::Month1,
        Period::Month3,
        Period::Month6,
        Period::Month12,
        Period::Year3,
        Period::Year5,
    ];

    /// Calendar-day offset subtracted from the reference date before the
    /// anchor walk-back.
    pub fn lookback_days(self) -> i64 {
        match self {
            Period::Day1 => 1,
            Period::Day3 => 3,
            Period::Week1 => 7,
            Period::Week2 => 14,
            Period::Month1 => 30,
            Period::Month3 => 90,
            Period::Month6 => 180,
            Period::Month12 => 365,
            Period::Year3 => 1095,
            Period::Year5 => 1825,
        }
    }

    /// Position of this period within [`Period::ALL`].
    pub fn index(self) -> usize {
        match self {
            Period::Day1 => 0,
            Period::Day3 => 1,
            Period::Week1 => 2,
            Period::Week2 => 3,
            Period::Month1 => 4,
            Period::Month3 => 5,
            Period::Month6 => 6,
            Period::Month12 => 7,
            Period::Year3 => 8,
            Period::Year5 => 9,
        }
    }

    /// Short label used in config keys, report columns, and snapshots.
    pub fn label(self) -> &'static str {
        match self {
            Period::Day1 => "1d",
            Period::Day3 => "3d",
            Period::Week1 => "1w",
            Period::Week2 => "2w",
            Period::Month1 => "1m",
            Period::Month3 => "3m",
            Period::Month6 => "6m",
            Period::Month12 => "12m",
            Period::Year3 => "3y",
            Period::Year5 => "5y",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_complete_and_ascending() {
        assert_eq!(Period::ALL.len(), 10);
        for pair in Period::ALL.windows(2) {
            assert!(pair[0].lookback_days() < pair[1].lookback_days());
        }
    }

    #[test]
    fn offsets_are_calendar_days() {
        assert_eq!(Period::Day1.lookback_days(), 1);
        assert_eq!(Period::Week2.lookback_days(), 14);
        assert_eq!(Period::Month12.lookback_days(), 365);
        assert_eq!(Period::Year5.lookback_days(), 1825);
    }

    #[test]
    fn index_round_trips_through_all() {
        for (idx, period) in Period::ALL.iter().enumerate() {
            assert_eq!(period.index(), idx);
        }
    }

    #[test]
    fn labels_are_unique() {
        let mut labels: Vec<&str> = Period::ALL.iter().map(|p| p.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), 10);
    }

    #[test]
    fn display_matches_label() {
        assert_eq!(Period::Month12.to_string(), "12m");
        assert_eq!(Period::Day3.to_string(), "3d");
    }
}
