//! Decision horizons and their fixed weight and risk tables.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Day,
    #[default]
    Swing,
    Position,
    LongTerm,
}

/// Category weights for one timeframe. Each row sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeframeWeights {
    pub technical: f64,
    pub fundamental: f64,
    pub sentiment: f64,
    pub trend: f64,
}

impl TimeframeWeights {
    pub fn sum(&self) -> f64 {
        self.technical + self.fundamental + self.sentiment + self.trend
    }

    /// Weighted composite of four category scores.
    pub fn combine(&self, technical: f64, fundamental: f64, sentiment: f64, trend: f64) -> f64 {
        technical * self.technical
            + fundamental * self.fundamental
            + sentiment * self.sentiment
            + trend * self.trend
    }
}

const fn weights(technical: f64, fundamental: f64, sentiment: f64, trend: f64) -> TimeframeWeights {
    TimeframeWeights {
        technical,
        fundamental,
        sentiment,
        trend,
    }
}

impl Timeframe {
    pub const ALL: [Timeframe; 4] = [Self::Day, Self::Swing, Self::Position, Self::LongTerm];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Swing => "swing",
            Self::Position => "position",
            Self::LongTerm => "longterm",
        }
    }

    pub fn weights(&self) -> TimeframeWeights {
        match self {
            Self::Day => weights(0.45, 0.10, 0.25, 0.20),
            Self::Swing => weights(0.35, 0.20, 0.25, 0.20),
            Self::Position => weights(0.25, 0.35, 0.20, 0.20),
            Self::LongTerm => weights(0.15, 0.45, 0.15, 0.25),
        }
    }

    /// Stop-loss distance below the price, as a fraction.
    pub fn stop_loss_pct(&self) -> f64 {
        match self {
            Self::Day => 0.02,
            Self::Swing => 0.04,
            Self::Position => 0.08,
            Self::LongTerm => 0.15,
        }
    }

    /// Reward-to-risk multiple used for the take-profit target.
    pub fn take_profit_multiplier(&self) -> f64 {
        match self {
            Self::Day => 2.0,
            Self::Swing => 2.5,
            Self::Position => 3.0,
            Self::LongTerm => 5.0,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown timeframe '{0}' (expected day, swing, position or longterm)")]
pub struct UnknownTimeframe(pub String);

impl FromStr for Timeframe {
    type Err = UnknownTimeframe;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "swing" => Ok(Self::Swing),
            "position" => Ok(Self::Position),
            "longterm" => Ok(Self::LongTerm),
            _ => Err(UnknownTimeframe(s.to_string())),
        }
    }
}
