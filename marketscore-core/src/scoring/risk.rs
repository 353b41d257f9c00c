//! Stop-loss and take-profit suggestions.

use super::timeframe::Timeframe;
use serde::{Deserialize, Serialize};

/// Stops sit 1% under support when support is closer than the timeframe's stop.
const SUPPORT_BUFFER: f64 = 0.99;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskLevels {
    pub stop_loss: f64,
    pub take_profit: f64,
    pub risk_reward_ratio: String,
}

impl RiskLevels {
    /// Unrounded, so sub-dollar quotes keep their risk distance. Callers
    /// round for display.
    pub fn compute(price: f64, support: f64, timeframe: Timeframe) -> Self {
        let multiplier = timeframe.take_profit_multiplier();
        let stop_loss = (price * (1.0 - timeframe.stop_loss_pct())).min(support * SUPPORT_BUFFER);
        let risk = price - stop_loss;
        let take_profit = price + risk * multiplier;

        Self {
            stop_loss,
            take_profit,
            risk_reward_ratio: format!("{multiplier}:1"),
        }
    }
}
