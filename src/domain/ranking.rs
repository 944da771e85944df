//! Per-period competition ranking.

use crate::domain::returns::ReturnValue;

/// Assign descending competition ranks for one period across the universe.
///
/// Input order is preserved: `result[i]` is the rank of `values[i]`.
/// Launched values receive `Some(rank)` with 1 as the highest return; equal
/// values share the lowest position of their run and consume rank slots, so
/// two instruments tied first are both rank 1 and the next distinct value is
/// rank 3. Not-launched values receive `None` and no slot.
pub fn competition_ranks(values: &[ReturnValue]) -> Vec<Option<u32>> {
    let mut launched: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(idx, v)| v.percentage().map(|p| (idx, p)))
        .collect();
    launched.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut ranks = vec![None; values.len()];
    let mut prev: Option<(f64, u32)> = None;
    for (position, &(idx, value)) in launched.iter().enumerate() {
        let rank = match prev {
            Some((prev_value, prev_rank)) if prev_value == value => prev_rank,
            _ => (position + 1) as u32,
        };
        ranks[idx] = Some(rank);
        prev = Some((value, rank));
    }
    ranks
}
