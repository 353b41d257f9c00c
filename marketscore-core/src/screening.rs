//! Pre-market gap screening.
//!
//! Candidates must gap up by at least `min_gap_percent` on at least
//! `min_volume` shares. Survivors are ranked by a 0–100 composite:
//!
//! - gap magnitude, up to 30 points
//! - volume, up to 20 points
//! - valuation (P/E), up to 15 points
//! - social sentiment, up to 15 points plus a 3-point bonus for a high
//!   positive-mention ratio
//!
//! Like `score`, screening is a pure function of its snapshots.

use crate::analysis::GapAnalysis;
use crate::domain::{ReconciledSnapshot, SentimentData};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

pub const MAX_SCREENING_SCORE: f64 = 100.0;

/// Filter thresholds and result cap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreeningCriteria {
    pub min_gap_percent: f64,
    pub min_volume: u64,
    pub max_results: usize,
}

impl Default for ScreeningCriteria {
    fn default() -> Self {
        Self {
            min_gap_percent: 3.0,
            min_volume: 500_000,
            max_results: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningResult {
    /// 1-based position after ranking.
    pub rank: usize,
    pub symbol: String,
    pub gap: GapAnalysis,
    pub volume: u64,
    pub pe_ratio: Option<f64>,
    pub sentiment_score: Option<f64>,
    /// 0–100, one decimal.
    pub score: f64,
}

/// Points for the absolute gap size.
pub fn gap_points(gap_percent: f64) -> f64 {
    let gap = gap_percent.abs();
    if gap > 10.0 {
        30.0
    } else if gap > 7.0 {
        25.0
    } else if gap > 5.0 {
        20.0
    } else if gap > 3.0 {
        15.0
    } else if gap > 1.0 {
        10.0
    } else {
        0.0
    }
}

pub fn volume_points(volume: u64) -> f64 {
    if volume > 5_000_000 {
        20.0
    } else if volume > 2_000_000 {
        15.0
    } else if volume > 1_000_000 {
        10.0
    } else if volume > 500_000 {
        5.0
    } else {
        0.0
    }
}

/// A positive P/E scores; the cheaper, the more. Missing or loss-making: 0.
pub fn valuation_points(pe_ratio: Option<f64>) -> f64 {
    match pe_ratio {
        Some(pe) if pe > 0.0 && pe < 30.0 => 15.0,
        Some(pe) if pe > 0.0 && pe < 50.0 => 10.0,
        Some(pe) if pe > 0.0 => 5.0,
        _ => 0.0,
    }
}

/// Score -1 → 0, 0 → 7.5, 1 → 15, plus 3 when more than 70% of mentions
/// are positive. No sentiment record: 0.
pub fn sentiment_points(sentiment: Option<&SentimentData>) -> f64 {
    let Some(s) = sentiment else {
        return 0.0;
    };
    let base = (s.score.clamp(-1.0, 1.0) + 1.0) * 7.5;
    let bonus = if s.sentiment_ratio > 0.7 { 3.0 } else { 0.0 };
    base + bonus
}

/// Composite screening score, rounded to one decimal and capped at 100.
pub fn composite_score(
    gap_percent: f64,
    volume: u64,
    pe_ratio: Option<f64>,
    sentiment: Option<&SentimentData>,
) -> f64 {
    let total = gap_points(gap_percent)
        + volume_points(volume)
        + valuation_points(pe_ratio)
        + sentiment_points(sentiment);
    ((total * 10.0).round() / 10.0).min(MAX_SCREENING_SCORE)
}

fn evaluate(snapshot: &ReconciledSnapshot, criteria: &ScreeningCriteria) -> Option<ScreeningResult> {
    let gap = GapAnalysis::compute(&snapshot.bars, snapshot.price())?;
    let volume = snapshot.quote.volume;
    if gap.gap_percent < criteria.min_gap_percent || volume < criteria.min_volume {
        return None;
    }
    let pe_ratio = snapshot.fundamentals.pe_ratio;
    let sentiment = snapshot.sentiment.as_ref();
    Some(ScreeningResult {
        rank: 0,
        symbol: snapshot.symbol.clone(),
        gap,
        volume,
        pe_ratio,
        sentiment_score: sentiment.map(|s| s.score),
        score: composite_score(gap.gap_percent, volume, pe_ratio, sentiment),
    })
}

/// Filter, score and rank. Highest score first; ties break on symbol.
/// Snapshots without a previous close are skipped.
pub fn screen(snapshots: &[ReconciledSnapshot], criteria: &ScreeningCriteria) -> Vec<ScreeningResult> {
    let mut results: Vec<ScreeningResult> = snapshots
        .par_iter()
        .filter_map(|s| evaluate(s, criteria))
        .collect();

    results.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.symbol.cmp(&b.symbol)));
    results.truncate(criteria.max_results);
    for (i, result) in results.iter_mut().enumerate() {
        result.rank = i + 1;
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::make_bars;
    use crate::domain::{FundamentalData, Provenance, QuoteData};
    use chrono::{TimeZone, Utc};

    fn sentiment(score: f64, ratio: f64) -> SentimentData {
        SentimentData {
            score,
            sentiment_ratio: ratio,
            mentions: 100,
            data_available: true,
            ..SentimentData::neutral()
        }
    }

    fn candidate(symbol: &str, previous_close: f64, price: f64, volume: u64, pe: Option<f64>) -> ReconciledSnapshot {
        let ts = Utc.with_ymd_and_hms(2024, 6, 3, 13, 0, 0).unwrap();
        let mut quote = QuoteData::at_price(price, ts);
        quote.volume = volume;
        ReconciledSnapshot {
            symbol: symbol.into(),
            timestamp: ts,
            quote,
            bars: make_bars(&[previous_close * 0.98, previous_close]),
            fundamentals: FundamentalData {
                pe_ratio: pe,
                ..Default::default()
            },
            sentiment: None,
            provenance: Provenance::primary(0.0),
        }
    }

    #[test]
    fn gap_bands() {
        assert_eq!(gap_points(12.0), 30.0);
        assert_eq!(gap_points(10.0), 25.0);
        assert_eq!(gap_points(8.0), 25.0);
        assert_eq!(gap_points(6.0), 20.0);
        assert_eq!(gap_points(4.0), 15.0);
        assert_eq!(gap_points(3.0), 10.0);
        assert_eq!(gap_points(2.0), 10.0);
        assert_eq!(gap_points(1.0), 0.0);
        // Gap downs score on magnitude.
        assert_eq!(gap_points(-8.0), 25.0);
    }

    #[test]
    fn volume_bands() {
        assert_eq!(volume_points(6_000_000), 20.0);
        assert_eq!(volume_points(3_000_000), 15.0);
        assert_eq!(volume_points(1_500_000), 10.0);
        assert_eq!(volume_points(600_000), 5.0);
        assert_eq!(volume_points(500_000), 0.0);
    }

    #[test]
    fn valuation_bands() {
        assert_eq!(valuation_points(Some(18.0)), 15.0);
        assert_eq!(valuation_points(Some(30.0)), 10.0);
        assert_eq!(valuation_points(Some(45.0)), 10.0);
        assert_eq!(valuation_points(Some(80.0)), 5.0);
        assert_eq!(valuation_points(Some(-4.0)), 0.0);
        assert_eq!(valuation_points(None), 0.0);
    }

    #[test]
    fn sentiment_scale_and_bonus() {
        assert_eq!(sentiment_points(None), 0.0);
        assert_eq!(sentiment_points(Some(&sentiment(-1.0, 0.5))), 0.0);
        assert_eq!(sentiment_points(Some(&sentiment(0.0, 0.5))), 7.5);
        assert_eq!(sentiment_points(Some(&sentiment(1.0, 0.5))), 15.0);
        assert_eq!(sentiment_points(Some(&sentiment(1.0, 0.8))), 18.0);
        assert_eq!(sentiment_points(Some(&sentiment(0.0, 0.7))), 7.5);
    }

    #[test]
    fn composite_sums_and_rounds() {
        // 25 + 15 + 15 + (0.75 + 1) * 7.5 + 3 = 71.125 → 71.1
        let s = sentiment(0.75, 0.81);
        assert_eq!(composite_score(8.0, 3_000_000, Some(20.0), Some(&s)), 71.1);
        assert_eq!(composite_score(0.5, 0, None, None), 0.0);
    }

    #[test]
    fn screen_filters_and_ranks() {
        let snapshots = vec![
            // gap 5.0% (15), volume 20, P/E 15 → 50
            candidate("BBB", 100.0, 105.0, 6_000_000, Some(20.0)),
            // gap 12% (30), volume 10, no P/E → 40
            candidate("AAA", 50.0, 56.0, 1_500_000, None),
            // gap too small
            candidate("SMALL", 100.0, 102.0, 9_000_000, Some(10.0)),
            // volume too low
            candidate("THIN", 100.0, 120.0, 100_000, Some(10.0)),
            // gap down
            candidate("DOWN", 100.0, 90.0, 9_000_000, Some(10.0)),
            // same score as AAA, sorts after it
            candidate("CCC", 50.0, 56.0, 1_500_000, None),
        ];
        let results = screen(&snapshots, &ScreeningCriteria::default());

        let symbols: Vec<&str> = results.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, ["BBB", "AAA", "CCC"]);
        assert_eq!(results[0].score, 50.0);
        assert_eq!(results[1].score, 40.0);
        assert_eq!(results.iter().map(|r| r.rank).collect::<Vec<_>>(), [1, 2, 3]);
    }

    #[test]
    fn screen_caps_results_and_skips_barless() {
        let mut barless = candidate("NOBARS", 100.0, 110.0, 9_000_000, None);
        barless.bars.clear();
        let snapshots = vec![
            candidate("AAA", 100.0, 111.0, 9_000_000, None),
            candidate("BBB", 100.0, 108.0, 9_000_000, None),
            barless,
        ];
        let criteria = ScreeningCriteria {
            max_results: 1,
            ..Default::default()
        };
        let results = screen(&snapshots, &criteria);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].symbol, "AAA");
        assert_eq!(results[0].rank, 1);
    }
}
