//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Convert a zero-based position into a one-based level index, saturating at `u32::MAX`.
#[must_use]
pub fn level_from_position(position: usize) -> u32 {
    cast::<usize, u32>(position)
        .and_then(|p| p.checked_add(1))
        .unwrap_or(u32::MAX)
}

/// Convert a one-based level index back to a zero-based position.
///
/// Returns `None` for level 0, which is never a valid level.
#[must_use]
pub fn position_from_level(level: u32) -> Option<usize> {
    let level = cast::<u32, usize>(level)?;
    level.checked_sub(1)
}

/// Round a value to `decimals` places, leaving non-finite values untouched.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10_f64.powi(decimals);
    (value * scale).round() / scale
}

/// Compare two values for descending order, treating missing values as zero.
#[must_use]
pub fn cmp_desc_missing_zero(a: Option<f64>, b: Option<f64>) -> std::cmp::Ordering {
    b.unwrap_or(0.0).total_cmp(&a.unwrap_or(0.0))
}
