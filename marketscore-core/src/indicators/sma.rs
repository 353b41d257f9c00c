//! Simple Moving Average (SMA).
//!
//! Mean of the trailing `period` values. With fewer than `period` values the
//! last value is returned unchanged.

use super::last_or_zero;

pub fn sma(values: &[f64], period: usize) -> f64 {
    if period == 0 || values.len() < period {
        return last_or_zero(values);
    }
    let window = &values[values.len() - period..];
    window.iter().sum::<f64>() / period as f64
}
