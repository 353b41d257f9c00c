//! Price-series primitives over an ordered closing-price sequence.
//!
//! Every function is total: insufficient history degrades to a documented
//! sentinel (last value, neutral 50, zeros, synthetic bands) instead of
//! failing. Outputs are the value at the *end* of the series.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use bollinger::{bollinger_bands, BollingerValues};
pub use ema::{ema, ema_series};
pub use macd::{macd, MacdValues};
pub use rsi::{rsi, DEFAULT_RSI_PERIOD};
pub use sma::sma;

/// Last value of a series, or 0.0 for an empty one.
pub(crate) fn last_or_zero(values: &[f64]) -> f64 {
    values.last().copied().unwrap_or(0.0)
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
