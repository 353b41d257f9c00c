//! The scoring entry point: reconciled snapshot + timeframe → [`TradingScore`].
//!
//! `score` is a pure function. It reads no clock and no global state, so two
//! calls with the same input produce byte-identical output.

use super::categories::{self, CategoryEvaluation};
use super::risk::RiskLevels;
use super::signal::CategoryScore;
use super::timeframe::Timeframe;
use crate::analysis::analyze;
use crate::domain::{InputHash, ReconciledSnapshot};
use crate::fingerprint::{input_hash, InputProjection};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

pub const STRONG_ACTION_THRESHOLD: f64 = 0.6;
pub const ACTION_THRESHOLD: f64 = 0.3;
pub const MAX_CONFIDENCE: f64 = 0.95;

/// Ordered from most bearish to most bullish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    StrongSell,
    Sell,
    Hold,
    Buy,
    StrongBuy,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StrongSell => "STRONG_SELL",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
            Self::Buy => "BUY",
            Self::StrongBuy => "STRONG_BUY",
        }
    }

    /// Thresholds are the same for every timeframe.
    pub fn from_weighted(score: f64) -> Self {
        if score >= STRONG_ACTION_THRESHOLD {
            Self::StrongBuy
        } else if score >= ACTION_THRESHOLD {
            Self::Buy
        } else if score <= -STRONG_ACTION_THRESHOLD {
            Self::StrongSell
        } else if score <= -ACTION_THRESHOLD {
            Self::Sell
        } else {
            Self::Hold
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingScore {
    pub symbol: String,
    /// The snapshot's timestamp, not the time of scoring.
    pub timestamp: DateTime<Utc>,
    pub input_hash: InputHash,
    pub technical: CategoryScore,
    pub fundamental: CategoryScore,
    pub sentiment: CategoryScore,
    pub trend: CategoryScore,
    pub weighted_score: f64,
    pub recommendation: Recommendation,
    pub confidence: f64,
    pub bullish_factors: Vec<String>,
    pub bearish_factors: Vec<String>,
    pub suggested_stop_loss: f64,
    pub suggested_take_profit: f64,
    pub risk_reward_ratio: String,
}

fn sign(x: f64) -> i8 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

pub fn score(snapshot: &ReconciledSnapshot, timeframe: Timeframe) -> TradingScore {
    let price = snapshot.price();
    let analysis = analyze(&snapshot.bars, price);

    let technical = categories::technical(&analysis.technical, price);
    let fundamental = categories::fundamental(&snapshot.fundamentals);
    let sentiment = categories::sentiment(snapshot.sentiment.as_ref(), &snapshot.fundamentals, price);
    let trend = categories::trend(&analysis, price);

    let weighted_score = timeframe
        .weights()
        .combine(technical.value(), fundamental.value(), sentiment.value(), trend.value())
        .clamp(-1.0, 1.0);
    let recommendation = Recommendation::from_weighted(weighted_score);

    let evaluations: [&CategoryEvaluation; 4] = [&technical, &fundamental, &sentiment, &trend];
    let direction = sign(weighted_score);
    let agreeing = evaluations.iter().filter(|e| sign(e.value()) == direction).count();
    let agreement = agreeing as f64 / evaluations.len() as f64;
    let confidence = ((fundamental.confidence() + agreement) / 2.0).min(MAX_CONFIDENCE);

    let mut bullish_factors = Vec::new();
    let mut bearish_factors = Vec::new();
    for contribution in evaluations.into_iter().flat_map(|e| e.contributions.iter()) {
        if contribution.is_bullish() {
            bullish_factors.push(contribution.factor.clone());
        } else if contribution.is_bearish() {
            bearish_factors.push(contribution.factor.clone());
        }
    }

    let risk = RiskLevels::compute(price, analysis.levels.support, timeframe);
    let input_hash = input_hash(&InputProjection {
        symbol: &snapshot.symbol,
        snapshot_timestamp: snapshot.timestamp,
        price,
        rsi: analysis.technical.rsi,
        macd_histogram: analysis.technical.macd.values.histogram,
        trend_direction: analysis.trend.direction,
        timeframe,
    });

    TradingScore {
        symbol: snapshot.symbol.clone(),
        timestamp: snapshot.timestamp,
        input_hash,
        technical: technical.score,
        fundamental: fundamental.score,
        sentiment: sentiment.score,
        trend: trend.score,
        weighted_score,
        recommendation,
        confidence,
        bullish_factors,
        bearish_factors,
        suggested_stop_loss: risk.stop_loss,
        suggested_take_profit: risk.take_profit,
        risk_reward_ratio: risk.risk_reward_ratio,
    }
}

/// Score a batch in parallel. Output order matches input order.
pub fn score_many(snapshots: &[ReconciledSnapshot], timeframe: Timeframe) -> Vec<TradingScore> {
    snapshots.par_iter().map(|s| score(s, timeframe)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::make_bars;
    use crate::domain::{FundamentalData, Provenance, QuoteData};
    use crate::scoring::Signal;
    use chrono::TimeZone;

    fn snapshot(closes: &[f64], price: f64, fundamentals: FundamentalData) -> ReconciledSnapshot {
        let ts = Utc.with_ymd_and_hms(2024, 6, 3, 14, 30, 0).unwrap();
        ReconciledSnapshot {
            symbol: "TEST".into(),
            timestamp: ts,
            quote: QuoteData::at_price(price, ts),
            bars: make_bars(closes),
            fundamentals,
            sentiment: None,
            provenance: Provenance::primary(0.0),
        }
    }

    fn rising(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64).collect()
    }

    #[test]
    fn recommendation_thresholds() {
        assert_eq!(Recommendation::from_weighted(0.65), Recommendation::StrongBuy);
        assert_eq!(Recommendation::from_weighted(0.6), Recommendation::StrongBuy);
        assert_eq!(Recommendation::from_weighted(0.3), Recommendation::Buy);
        assert_eq!(Recommendation::from_weighted(0.29), Recommendation::Hold);
        assert_eq!(Recommendation::from_weighted(-0.3), Recommendation::Sell);
        assert_eq!(Recommendation::from_weighted(-0.6), Recommendation::StrongSell);
        assert!(Recommendation::StrongSell < Recommendation::Sell);
        assert!(Recommendation::Buy < Recommendation::StrongBuy);
        assert_eq!(
            serde_json::to_value(Recommendation::StrongBuy).unwrap(),
            Recommendation::StrongBuy.as_str()
        );
    }

    #[test]
    fn thresholds_do_not_depend_on_timeframe() {
        let (t, f, s, tr) = (1.0, 0.5, 0.2, 0.5);
        let day = Timeframe::Day.weights().combine(t, f, s, tr);
        let longterm = Timeframe::LongTerm.weights().combine(t, f, s, tr);
        assert!((day - 0.65).abs() < 1e-12);
        assert!((longterm - 0.53).abs() < 1e-12);
        assert_eq!(Recommendation::from_weighted(day), Recommendation::StrongBuy);
        assert_eq!(Recommendation::from_weighted(longterm), Recommendation::Buy);
    }

    #[test]
    fn scoring_is_deterministic() {
        let snap = snapshot(&rising(60), 165.0, FundamentalData::default());
        let a = serde_json::to_string(&score(&snap, Timeframe::Swing)).unwrap();
        let b = serde_json::to_string(&score(&snap, Timeframe::Swing)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn timeframe_changes_hash_and_risk() {
        let snap = snapshot(&rising(60), 165.0, FundamentalData::default());
        let day = score(&snap, Timeframe::Day);
        let longterm = score(&snap, Timeframe::LongTerm);
        assert_ne!(day.input_hash, longterm.input_hash);
        assert_eq!(day.risk_reward_ratio, "2:1");
        assert_eq!(longterm.risk_reward_ratio, "5:1");
        assert!(longterm.suggested_take_profit > day.suggested_take_profit);
    }

    #[test]
    fn missing_fundamentals_never_fail() {
        let s = score(&snapshot(&rising(30), 135.0, FundamentalData::default()), Timeframe::Position);
        assert_eq!(s.fundamental.score.signal, Signal::Neutral);
        assert_eq!(s.fundamental.score.confidence, 0.3);
        assert_eq!(s.fundamental.factors, vec!["Fundamental data unavailable".to_string()]);
        assert!(s.confidence <= MAX_CONFIDENCE);
    }

    #[test]
    fn factors_split_by_sign() {
        let fundamentals = FundamentalData {
            pe_ratio: Some(60.0),
            eps: Some(2.0),
            ..Default::default()
        };
        let s = score(&snapshot(&rising(60), 165.0, fundamentals), Timeframe::Swing);
        assert!(s.bearish_factors.iter().any(|f| f.starts_with("P/E 60.0")));
        assert!(s.bullish_factors.iter().any(|f| f.starts_with("EPS 2.00")));
        assert!(s.bullish_factors.iter().any(|f| f.starts_with("Uptrend")));
    }

    #[test]
    fn batch_preserves_order() {
        let snaps: Vec<_> = [110.0, 120.0, 130.0]
            .iter()
            .map(|&p| {
                let mut s = snapshot(&rising(40), p, FundamentalData::default());
                s.symbol = format!("S{p}");
                s
            })
            .collect();
        let scores = score_many(&snaps, Timeframe::Day);
        let symbols: Vec<_> = scores.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["S110", "S120", "S130"]);
        assert_eq!(scores[1], score(&snaps[1], Timeframe::Day));
    }
}
