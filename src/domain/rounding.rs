//! Shared rounding policy.
//!
//! All externally visible figures round half to even so repeated runs over
//! the same inputs produce byte-identical output.

/// Round `value` to `decimals` places, ties to even.
///
/// Non-finite inputs pass through unchanged.
pub fn round_half_even(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round_ties_even() / scale
}

/// Return percentages carry two decimal places.
pub fn round_return(value: f64) -> f64 {
    round_half_even(value, 2)
}

/// Assets-under-management figures carry one decimal place.
pub fn round_aum(value: f64) -> f64 {
    round_half_even(value, 1)
}
