//! Qualitative trend judgment from moving-average ordering and 30-day change.

use super::technical::TechnicalIndicators;
use serde::{Deserialize, Serialize};
use std::fmt;

const CHANGE_WINDOW: usize = 30;
const STRONG_CHANGE_PCT: f64 = 10.0;
const MODERATE_CHANGE_PCT: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Uptrend,
    Downtrend,
    Sideways,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendStrength {
    Strong,
    Moderate,
    Weak,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Uptrend => "Uptrend",
            Self::Downtrend => "Downtrend",
            Self::Sideways => "Sideways",
        })
    }
}

impl fmt::Display for TrendStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Strong => "Strong",
            Self::Moderate => "Moderate",
            Self::Weak => "Weak",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendAnalysis {
    pub direction: TrendDirection,
    pub strength: TrendStrength,
    /// Percentage change from the start of the 30-bar window to the price.
    pub change_30d_pct: f64,
    pub analysis: String,
}

impl TrendAnalysis {
    pub fn compute(closes: &[f64], price: f64, indicators: &TechnicalIndicators) -> Self {
        let averages = [indicators.ema20, indicators.sma50, indicators.sma200];
        let direction = if averages.iter().all(|&ma| price > ma) {
            TrendDirection::Uptrend
        } else if averages.iter().all(|&ma| price < ma) {
            TrendDirection::Downtrend
        } else {
            TrendDirection::Sideways
        };

        let change_30d_pct = percent_change_30d(closes, price);
        let magnitude = change_30d_pct.abs();
        let strength = if magnitude > STRONG_CHANGE_PCT {
            TrendStrength::Strong
        } else if magnitude > MODERATE_CHANGE_PCT {
            TrendStrength::Moderate
        } else {
            TrendStrength::Weak
        };

        let analysis = format!(
            "{direction} ({strength}): price {price:.2} vs EMA20 {:.2}, SMA50 {:.2}, SMA200 {:.2}; 30-day change {change_30d_pct:+.1}%",
            indicators.ema20, indicators.sma50, indicators.sma200,
        );

        Self {
            direction,
            strength,
            change_30d_pct,
            analysis,
        }
    }
}

fn percent_change_30d(closes: &[f64], price: f64) -> f64 {
    let Some(&reference) = closes.get(closes.len().saturating_sub(CHANGE_WINDOW)) else {
        return 0.0;
    };
    if reference == 0.0 {
        return 0.0;
    }
    (price - reference) / reference * 100.0
}
