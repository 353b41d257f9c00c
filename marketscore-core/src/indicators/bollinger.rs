//! Bollinger Bands: SMA +/- multiplier * population stddev.
//!
//! Fewer than `period` prices → synthetic bands at +/-2% of the last price.

use super::{last_or_zero, sma};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_STD_DEV: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BollingerValues {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

pub fn bollinger_bands(prices: &[f64], period: usize, std_dev: f64) -> BollingerValues {
    if period == 0 || prices.len() < period {
        let last = last_or_zero(prices);
        return BollingerValues {
            upper: last * 1.02,
            middle: last,
            lower: last * 0.98,
        };
    }

    let window = &prices[prices.len() - period..];
    let middle = sma(prices, period);
    let variance = window
        .iter()
        .map(|p| {
            let diff = p - middle;
            diff * diff
        })
        .sum::<f64>()
        / period as f64;
    let offset = std_dev * variance.sqrt();

    BollingerValues {
        upper: middle + offset,
        middle,
        lower: middle - offset,
    }
}
