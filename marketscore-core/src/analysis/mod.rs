//! Indicator aggregation: turns a bar series and the latest price into the
//! technical record, price levels, trend judgment and gap consumed by scoring.

pub mod gap;
pub mod levels;
pub mod technical;
pub mod trend;

pub use gap::{GapAnalysis, GapDirection};
pub use levels::PriceLevels;
pub use technical::{BandPosition, MacdTrend, RsiSignal, TechnicalIndicators};
pub use trend::{TrendAnalysis, TrendDirection, TrendStrength};

use crate::domain::{closes, PriceBar};
use serde::{Deserialize, Serialize};

/// Everything derived from price history for one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysis {
    pub technical: TechnicalIndicators,
    pub levels: PriceLevels,
    pub trend: TrendAnalysis,
    pub gap: Option<GapAnalysis>,
}

/// Analyze `bars` (ascending by date) against the current `price`.
///
/// With no bars the price itself is used as a one-element series, so every
/// indicator lands on its insufficient-history sentinel.
pub fn analyze(bars: &[PriceBar], price: f64) -> MarketAnalysis {
    let mut series = closes(bars);
    if series.is_empty() {
        series.push(price);
    }

    let technical = TechnicalIndicators::compute(&series, price);
    let trend = TrendAnalysis::compute(&series, price, &technical);

    MarketAnalysis {
        technical,
        levels: PriceLevels::compute(bars, price),
        trend,
        gap: GapAnalysis::compute(bars, price),
    }
}

/// Create synthetic bars from close prices for testing.
///
/// open = previous close (or close for the first bar),
/// high = max(open, close) + 1.0, low = min(open, close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PriceBar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}
