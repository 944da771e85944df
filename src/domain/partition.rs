//! Universe partition into performance tiers.

use crate::domain::returns::ReturnValue;
use std::fmt;

/// Tier membership decided once per run from the 12-month record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    TopPerformers,
    BottomPerformers,
    NotYetListed,
}

impl Tier {
    pub fn label(self) -> &'static str {
        match self {
            Tier::TopPerformers => "top-performers",
            Tier::BottomPerformers => "bottom-performers",
            Tier::NotYetListed => "not-yet-listed",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Assign a tier to every instrument from `(12-month value, AUM rank)` pairs.
///
/// Instruments without a 12-month figure are not-yet-listed regardless of any
/// other period and stay out of the split's denominator. The launched subset
/// sorts by return descending with AUM rank breaking ties; the top ⌈n/2⌉
/// are top-performers, the rest bottom-performers.
pub fn assign_tiers(entries: &[(ReturnValue, u32)]) -> Vec<Tier> {
    let mut launched: Vec<(usize, f64, u32)> = entries
        .iter()
        .enumerate()
        .filter_map(|(idx, &(value, aum_rank))| value.percentage().map(|p| (idx, p, aum_rank)))
        .collect();
    launched.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.2.cmp(&b.2)));

    let top_count = launched.len().div_ceil(2);
    let mut tiers = vec![Tier::NotYetListed; entries.len()];
    for (position, &(idx, _, _)) in launched.iter().enumerate() {
        tiers[idx] = if position < top_count {
            Tier::TopPerformers
        } else {
            Tier::BottomPerformers
        };
    }
    tiers
}
