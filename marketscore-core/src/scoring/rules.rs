//! Scoring rules.
//!
//! Each rule is one indicator reading. Evaluating it yields at most one
//! signed contribution in [-1, 1] with the literal factor string that
//! explains it. Aggregation lives in `categories`; nothing here knows about
//! other rules.

use crate::analysis::{BandPosition, MacdTrend, TrendDirection, TrendStrength};
use crate::domain::RecommendationKey;

/// Proximity to a 30-day level that counts as "at" support/resistance.
const RANGE_PROXIMITY: f64 = 0.02;
/// Proximity to a 52-week extreme that counts as "near" it.
const YEAR_PROXIMITY: f64 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub value: f64,
    pub factor: String,
}

impl Contribution {
    fn new(value: f64, factor: impl Into<String>) -> Self {
        Self {
            value,
            factor: factor.into(),
        }
    }

    pub fn is_bullish(&self) -> bool {
        self.value > 0.0
    }

    pub fn is_bearish(&self) -> bool {
        self.value < 0.0
    }
}

fn hit(value: f64, factor: impl Into<String>) -> Contribution {
    Contribution::new(value, factor)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    // technical
    Rsi(f64),
    Macd(MacdTrend),
    Bollinger(BandPosition),
    PriceVsEma20 { price: f64, ema20: f64 },
    MovingAverageRegime { sma50: f64, sma200: f64 },

    // trend
    Trend { direction: TrendDirection, strength: TrendStrength },
    RangePosition { price: f64, support: f64, resistance: f64 },
    YearRangePosition { price: f64, year_high: f64, year_low: f64 },

    // fundamental
    PeRatio(f64),
    ForwardPe { trailing: f64, forward: f64 },
    Peg(f64),
    PriceToBook(f64),
    Eps(f64),
    EpsOutlook { eps: f64, forward_eps: f64 },
    DebtToEquity(f64),
    ReturnOnEquity(f64),
    CurrentRatio(f64),
    DividendYield(f64),

    // sentiment
    SocialScore(f64),
    MentionRatio { ratio: f64, mentions: u64 },
    AnalystConsensus(RecommendationKey),
    TargetUpside { price: f64, target: f64 },
}

impl Rule {
    pub fn evaluate(&self) -> Option<Contribution> {
        match *self {
            Rule::Rsi(rsi) => Some(if rsi < 30.0 {
                hit(1.0, format!("RSI {rsi:.1} (Oversold)"))
            } else if rsi > 70.0 {
                hit(-1.0, format!("RSI {rsi:.1} (Overbought)"))
            } else if (45.0..=55.0).contains(&rsi) {
                hit(0.0, format!("RSI {rsi:.1} (Neutral)"))
            } else if rsi < 45.0 {
                hit(0.3, format!("RSI {rsi:.1} (Slightly low)"))
            } else {
                hit(-0.3, format!("RSI {rsi:.1} (Slightly high)"))
            }),

            Rule::Macd(trend) => Some(match trend {
                MacdTrend::Bullish => hit(0.6, "MACD histogram positive (Bullish)"),
                MacdTrend::Bearish => hit(-0.6, "MACD histogram negative (Bearish)"),
                MacdTrend::Neutral => hit(0.0, "MACD histogram flat (Neutral)"),
            }),

            Rule::Bollinger(position) => match position {
                BandPosition::BelowLower => Some(hit(0.7, "Price below lower Bollinger band")),
                BandPosition::AboveUpper => Some(hit(-0.7, "Price above upper Bollinger band")),
                BandPosition::WithinBands => None,
            },

            Rule::PriceVsEma20 { price, ema20 } => {
                if price > ema20 {
                    Some(hit(0.3, format!("Price above EMA20 ({ema20:.2})")))
                } else if price < ema20 {
                    Some(hit(-0.3, format!("Price below EMA20 ({ema20:.2})")))
                } else {
                    None
                }
            }

            Rule::MovingAverageRegime { sma50, sma200 } => {
                if sma50 > sma200 {
                    Some(hit(0.5, format!("SMA50 {sma50:.2} above SMA200 {sma200:.2}")))
                } else if sma50 < sma200 {
                    Some(hit(-0.5, format!("SMA50 {sma50:.2} below SMA200 {sma200:.2}")))
                } else {
                    None
                }
            }

            Rule::Trend { direction, strength } => {
                let magnitude = match strength {
                    TrendStrength::Strong => 1.0,
                    TrendStrength::Moderate => 0.7,
                    TrendStrength::Weak => 0.4,
                };
                let value = match direction {
                    TrendDirection::Uptrend => magnitude,
                    TrendDirection::Downtrend => -magnitude,
                    TrendDirection::Sideways => 0.0,
                };
                Some(hit(value, format!("{direction} ({strength})")))
            }

            Rule::RangePosition {
                price,
                support,
                resistance,
            } => {
                if price <= 0.0 || resistance <= support {
                    None
                } else if ((price - support) / price).abs() <= RANGE_PROXIMITY {
                    Some(hit(0.3, format!("Near 30-day support ({support:.2})")))
                } else if ((resistance - price) / price).abs() <= RANGE_PROXIMITY {
                    Some(hit(-0.3, format!("Near 30-day resistance ({resistance:.2})")))
                } else {
                    None
                }
            }

            Rule::YearRangePosition {
                price,
                year_high,
                year_low,
            } => {
                if price <= 0.0 || year_high <= year_low {
                    None
                } else if ((year_high - price) / price).abs() <= YEAR_PROXIMITY {
                    Some(hit(0.4, format!("Near 52-week high ({year_high:.2})")))
                } else if ((price - year_low) / price).abs() <= YEAR_PROXIMITY {
                    Some(hit(-0.4, format!("Near 52-week low ({year_low:.2})")))
                } else {
                    None
                }
            }

            Rule::PeRatio(pe) => Some(if pe <= 0.0 {
                hit(-0.8, format!("P/E {pe:.1} (Unprofitable)"))
            } else if pe < 15.0 {
                hit(0.8, format!("P/E {pe:.1} (Undervalued)"))
            } else if pe < 25.0 {
                hit(0.3, format!("P/E {pe:.1} (Fair value)"))
            } else if pe < 40.0 {
                hit(-0.3, format!("P/E {pe:.1} (Elevated)"))
            } else {
                hit(-0.8, format!("P/E {pe:.1} (Overvalued)"))
            }),

            Rule::ForwardPe { trailing, forward } => {
                if trailing <= 0.0 || forward <= 0.0 {
                    None
                } else if forward < trailing {
                    Some(hit(0.4, format!("Forward P/E {forward:.1} below trailing {trailing:.1}")))
                } else if forward > trailing {
                    Some(hit(-0.3, format!("Forward P/E {forward:.1} above trailing {trailing:.1}")))
                } else {
                    None
                }
            }

            // A non-positive PEG has no growth to price against.
            Rule::Peg(peg) => {
                if peg <= 0.0 {
                    None
                } else if peg < 1.0 {
                    Some(hit(0.7, format!("PEG {peg:.2} (Growth at a discount)")))
                } else if peg < 2.0 {
                    Some(hit(0.2, format!("PEG {peg:.2} (Reasonable)")))
                } else {
                    Some(hit(-0.4, format!("PEG {peg:.2} (Expensive growth)")))
                }
            }

            Rule::PriceToBook(pb) => {
                if pb <= 0.0 {
                    None
                } else if pb < 1.0 {
                    Some(hit(0.5, format!("P/B {pb:.2} (Below book value)")))
                } else if pb > 5.0 {
                    Some(hit(-0.3, format!("P/B {pb:.2} (Rich to book)")))
                } else {
                    None
                }
            }

            Rule::Eps(eps) => Some(if eps > 0.0 {
                hit(0.3, format!("EPS {eps:.2} (Profitable)"))
            } else {
                hit(-0.6, format!("EPS {eps:.2} (Losses)"))
            }),

            Rule::EpsOutlook { eps, forward_eps } => {
                if forward_eps > eps {
                    Some(hit(0.4, format!("Forward EPS {forward_eps:.2} above trailing {eps:.2}")))
                } else if forward_eps < eps {
                    Some(hit(-0.4, format!("Forward EPS {forward_eps:.2} below trailing {eps:.2}")))
                } else {
                    None
                }
            }

            Rule::DebtToEquity(de) => {
                if de < 0.0 {
                    Some(hit(-0.5, format!("Debt/Equity {de:.2} (Negative equity)")))
                } else if de < 0.5 {
                    Some(hit(0.4, format!("Debt/Equity {de:.2} (Low leverage)")))
                } else if de > 2.0 {
                    Some(hit(-0.5, format!("Debt/Equity {de:.2} (High leverage)")))
                } else {
                    None
                }
            }

            Rule::ReturnOnEquity(roe) => {
                let pct = roe * 100.0;
                if roe > 0.15 {
                    Some(hit(0.5, format!("ROE {pct:.1}% (Strong)")))
                } else if roe < 0.0 {
                    Some(hit(-0.5, format!("ROE {pct:.1}% (Negative)")))
                } else {
                    None
                }
            }

            Rule::CurrentRatio(ratio) => {
                if ratio < 1.0 {
                    Some(hit(-0.3, format!("Current ratio {ratio:.2} (Liquidity risk)")))
                } else if ratio > 2.0 {
                    Some(hit(0.2, format!("Current ratio {ratio:.2} (Strong liquidity)")))
                } else {
                    None
                }
            }

            Rule::DividendYield(yield_) => {
                if yield_ > 0.02 {
                    Some(hit(0.2, format!("Dividend yield {:.2}%", yield_ * 100.0)))
                } else {
                    None
                }
            }

            Rule::SocialScore(score) => Some(if score > 0.5 {
                hit(1.0, format!("Social sentiment {score:+.2} (Very positive)"))
            } else if score > 0.2 {
                hit(0.5, format!("Social sentiment {score:+.2} (Positive)"))
            } else if score < -0.5 {
                hit(-1.0, format!("Social sentiment {score:+.2} (Very negative)"))
            } else if score < -0.2 {
                hit(-0.5, format!("Social sentiment {score:+.2} (Negative)"))
            } else {
                hit(0.0, format!("Social sentiment {score:+.2} (Neutral)"))
            }),

            Rule::MentionRatio { ratio, mentions } => {
                let pct = ratio * 100.0;
                if mentions == 0 {
                    None
                } else if ratio > 0.7 {
                    Some(hit(0.5, format!("{pct:.0}% of {mentions} mentions positive")))
                } else if ratio < 0.3 {
                    Some(hit(-0.5, format!("{pct:.0}% of {mentions} mentions positive")))
                } else {
                    None
                }
            }

            Rule::AnalystConsensus(key) => {
                let value = match key {
                    RecommendationKey::StrongBuy => 1.0,
                    RecommendationKey::Buy => 0.5,
                    RecommendationKey::Hold => 0.0,
                    RecommendationKey::Underperform => -0.3,
                    RecommendationKey::Sell => -0.5,
                    RecommendationKey::StrongSell => -1.0,
                    RecommendationKey::Unrated => return None,
                };
                Some(hit(value, format!("Analyst consensus: {}", key.as_str())))
            }

            Rule::TargetUpside { price, target } => {
                if price <= 0.0 || target <= 0.0 {
                    return None;
                }
                let upside = (target - price) / price;
                let factor = format!("Analyst target {target:.2} ({:+.1}% vs price)", upside * 100.0);
                if upside > 0.2 {
                    Some(hit(0.8, factor))
                } else if upside > 0.1 {
                    Some(hit(0.4, factor))
                } else if upside < -0.1 {
                    Some(hit(-0.6, factor))
                } else {
                    None
                }
            }
        }
    }
}
