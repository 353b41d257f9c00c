//! Moving Average Convergence Divergence (MACD).
//!
//! MACD line = EMA12 - EMA26. The signal line is the 9-period EMA of the
//! MACD-line history, one point per prefix of the price series from length 26
//! onward. Histogram = MACD - signal. Fewer than 26 prices → all zeros.
//!
//! The history is built from two full EMA series in one pass. Each entry is
//! bitwise identical to recomputing EMA12/EMA26 from scratch over that prefix,
//! since the seed and recurrence are the same operations in the same order.

use super::{ema, ema_series};
use serde::{Deserialize, Serialize};

pub const FAST_PERIOD: usize = 12;
pub const SLOW_PERIOD: usize = 26;
pub const SIGNAL_PERIOD: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MacdValues {
    #[serde(rename = "MACD")]
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

pub fn macd(prices: &[f64]) -> MacdValues {
    let history = macd_history(prices);
    let Some(&macd) = history.last() else {
        return MacdValues::default();
    };
    let signal = ema(&history, SIGNAL_PERIOD);
    MacdValues {
        macd,
        signal,
        histogram: macd - signal,
    }
}

/// MACD-line value after every prefix of length >= 26.
pub fn macd_history(prices: &[f64]) -> Vec<f64> {
    if prices.len() < SLOW_PERIOD {
        return Vec::new();
    }
    let fast = ema_series(prices, FAST_PERIOD);
    let slow = ema_series(prices, SLOW_PERIOD);
    (SLOW_PERIOD - 1..prices.len())
        .map(|i| fast[i] - slow[i])
        .collect()
}
