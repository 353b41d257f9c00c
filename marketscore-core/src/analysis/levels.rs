//! Support/resistance and range levels.

use crate::domain::PriceBar;
use serde::{Deserialize, Serialize};

/// Window used for support/resistance and the 30-day range.
pub const LEVEL_WINDOW: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceLevels {
    /// Lowest close of the trailing window.
    pub support: f64,
    /// Highest close of the trailing window.
    pub resistance: f64,
    pub year_high: f64,
    pub year_low: f64,
    #[serde(rename = "month30High")]
    pub month30_high: f64,
    #[serde(rename = "month30Low")]
    pub month30_low: f64,
}

impl PriceLevels {
    /// With no bars every level collapses onto `price`.
    pub fn compute(bars: &[PriceBar], price: f64) -> Self {
        if bars.is_empty() {
            return Self {
                support: price,
                resistance: price,
                year_high: price,
                year_low: price,
                month30_high: price,
                month30_low: price,
            };
        }

        let trailing = &bars[bars.len().saturating_sub(LEVEL_WINDOW)..];
        Self {
            support: min_of(trailing.iter().map(|b| b.close)),
            resistance: max_of(trailing.iter().map(|b| b.close)),
            year_high: max_of(bars.iter().map(|b| b.high)),
            year_low: min_of(bars.iter().map(|b| b.low)),
            month30_high: max_of(trailing.iter().map(|b| b.high)),
            month30_low: min_of(trailing.iter().map(|b| b.low)),
        }
    }
}

fn min_of(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(f64::INFINITY, f64::min)
}

fn max_of(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(f64::NEG_INFINITY, f64::max)
}
