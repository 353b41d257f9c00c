//! Gap from the previous close to the current quote.

use crate::domain::PriceBar;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapDirection {
    Up,
    Down,
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapAnalysis {
    pub previous_close: f64,
    pub current_price: f64,
    /// Rounded to two decimals.
    pub gap_percent: f64,
    pub direction: GapDirection,
}

impl GapAnalysis {
    /// `None` when there is no previous close to measure from.
    pub fn compute(bars: &[PriceBar], price: f64) -> Option<Self> {
        let previous_close = bars.last()?.close;
        if previous_close <= 0.0 {
            return None;
        }
        let raw = (price - previous_close) / previous_close * 100.0;
        let gap_percent = (raw * 100.0).round() / 100.0;
        let direction = if gap_percent > 0.0 {
            GapDirection::Up
        } else if gap_percent < 0.0 {
            GapDirection::Down
        } else {
            GapDirection::Flat
        };
        Some(Self {
            previous_close,
            current_price: price,
            gap_percent,
            direction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::make_bars;

    #[test]
    fn gap_up() {
        let bars = make_bars(&[170.0, 179.25]);
        let gap = GapAnalysis::compute(&bars, 185.50).unwrap();
        assert_eq!(gap.gap_percent, 3.49);
        assert_eq!(gap.direction, GapDirection::Up);
    }

    #[test]
    fn gap_down_and_flat() {
        let bars = make_bars(&[100.0]);
        assert_eq!(
            GapAnalysis::compute(&bars, 95.0).unwrap().direction,
            GapDirection::Down
        );
        assert_eq!(
            GapAnalysis::compute(&bars, 100.0).unwrap().direction,
            GapDirection::Flat
        );
    }

    #[test]
    fn no_bars_no_gap() {
        assert!(GapAnalysis::compute(&[], 10.0).is_none());
    }
}
