//! Technical indicator record: raw indicator values plus their fixed-threshold
//! classifications against the current price.

use crate::indicators::{
    bollinger::{DEFAULT_PERIOD, DEFAULT_STD_DEV},
    bollinger_bands, ema, macd, rsi, sma, BollingerValues, MacdValues, DEFAULT_RSI_PERIOD,
};
use serde::{Deserialize, Serialize};

pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const RSI_OVERSOLD: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RsiSignal {
    Overbought,
    Oversold,
    Neutral,
}

impl RsiSignal {
    pub fn classify(rsi: f64) -> Self {
        if rsi > RSI_OVERBOUGHT {
            Self::Overbought
        } else if rsi < RSI_OVERSOLD {
            Self::Oversold
        } else {
            Self::Neutral
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MacdTrend {
    Bullish,
    Bearish,
    Neutral,
}

impl MacdTrend {
    pub fn from_histogram(histogram: f64) -> Self {
        if histogram > 0.0 {
            Self::Bullish
        } else if histogram < 0.0 {
            Self::Bearish
        } else {
            Self::Neutral
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BandPosition {
    #[serde(rename = "Above Upper")]
    AboveUpper,
    #[serde(rename = "Below Lower")]
    BelowLower,
    #[serde(rename = "Within Bands")]
    WithinBands,
}

impl BandPosition {
    pub fn classify(price: f64, bands: &BollingerValues) -> Self {
        if price > bands.upper {
            Self::AboveUpper
        } else if price < bands.lower {
            Self::BelowLower
        } else {
            Self::WithinBands
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdIndicator {
    #[serde(flatten)]
    pub values: MacdValues,
    pub trend: MacdTrend,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerIndicator {
    #[serde(flatten)]
    pub bands: BollingerValues,
    pub position: BandPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalIndicators {
    pub rsi: f64,
    pub rsi_signal: RsiSignal,
    pub macd: MacdIndicator,
    pub ema20: f64,
    pub sma50: f64,
    pub sma200: f64,
    pub bollinger_bands: BollingerIndicator,
}

impl TechnicalIndicators {
    /// Compute every indicator over `closes` and classify against `price`.
    pub fn compute(closes: &[f64], price: f64) -> Self {
        let rsi = rsi(closes, DEFAULT_RSI_PERIOD);
        let macd_values = macd(closes);
        let bands = bollinger_bands(closes, DEFAULT_PERIOD, DEFAULT_STD_DEV);

        Self {
            rsi,
            rsi_signal: RsiSignal::classify(rsi),
            macd: MacdIndicator {
                values: macd_values,
                trend: MacdTrend::from_histogram(macd_values.histogram),
            },
            ema20: ema(closes, 20),
            sma50: sma(closes, 50),
            sma200: sma(closes, 200),
            bollinger_bands: BollingerIndicator {
                bands,
                position: BandPosition::classify(price, &bands),
            },
        }
    }
}
