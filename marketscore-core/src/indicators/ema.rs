//! Exponential Moving Average (EMA).
//!
//! Seed: SMA of the first `period` values.
//! Recurrence: ema = (value - ema) * k + ema, with k = 2 / (period + 1).
//! With fewer than `period` values the last value is returned unchanged.

use super::{last_or_zero, sma};

pub fn ema(values: &[f64], period: usize) -> f64 {
    if period == 0 || values.len() < period {
        return last_or_zero(values);
    }
    let k = smoothing(period);
    let mut ema = sma(&values[..period], period);
    for &value in &values[period..] {
        ema = (value - ema) * k + ema;
    }
    ema
}

/// EMA after every prefix of `values`.
///
/// `result[i]` equals `ema(&values[..=i], period)` bit for bit when
/// `i + 1 >= period`; earlier entries are NaN (no seed yet).
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period {
        return result;
    }

    let k = smoothing(period);
    let mut ema = sma(&values[..period], period);
    result[period - 1] = ema;
    for i in period..n {
        ema = (values[i] - ema) * k + ema;
        result[i] = ema;
    }
    result
}

fn smoothing(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn ema_3_known_values() {
        // k = 0.5; seed = SMA(10,11,12) = 11; then 12.0, 13.0
        assert_approx(ema(&[10.0, 11.0, 12.0, 13.0, 14.0], 3), 13.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_exact_period_is_sma() {
        assert_approx(ema(&[2.0, 4.0, 6.0], 3), 4.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_too_few_values_returns_last() {
        assert_approx(ema(&[5.0, 7.0], 12), 7.0, DEFAULT_EPSILON);
        assert_eq!(ema(&[], 12), 0.0);
    }

    #[test]
    fn ema_series_matches_prefix_ema_bitwise() {
        let values: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.37).sin() * 4.0).collect();
        let series = ema_series(&values, 12);
        for i in 0..values.len() {
            if i + 1 < 12 {
                assert!(series[i].is_nan());
            } else {
                assert_eq!(series[i], ema(&values[..=i], 12), "prefix {i}");
            }
        }
    }
}
