//! Per-category rule sets and their aggregation into a [`CategoryScore`].

use super::rules::{Contribution, Rule};
use super::signal::{Category, CategoryScore, SignalScore};
use crate::analysis::{MarketAnalysis, TechnicalIndicators};
use crate::domain::{FundamentalData, SentimentData};

/// A category score together with the contributions behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryEvaluation {
    pub score: CategoryScore,
    pub contributions: Vec<Contribution>,
}

impl CategoryEvaluation {
    pub fn value(&self) -> f64 {
        self.score.score.score
    }

    pub fn confidence(&self) -> f64 {
        self.score.score.confidence
    }
}

/// Mean of the fired contributions, clamped to [-1, 1]. No contributions
/// means the category had no usable data.
pub fn aggregate(category: Category, rules: impl IntoIterator<Item = Rule>) -> CategoryEvaluation {
    let contributions: Vec<Contribution> = rules.into_iter().filter_map(|r| r.evaluate()).collect();

    if contributions.is_empty() {
        let factor = category.unavailable_factor();
        return CategoryEvaluation {
            score: CategoryScore {
                category,
                score: SignalScore::unavailable(factor.clone()),
                factors: vec![factor],
            },
            contributions,
        };
    }

    let mean = contributions.iter().map(|c| c.value).sum::<f64>() / contributions.len() as f64;
    let mean = mean.clamp(-1.0, 1.0);
    let bullish = contributions.iter().filter(|c| c.is_bullish()).count();
    let bearish = contributions.iter().filter(|c| c.is_bearish()).count();
    let reasoning = format!(
        "{category}: {} rules, {bullish} bullish, {bearish} bearish, mean {mean:+.2}",
        contributions.len()
    );

    CategoryEvaluation {
        score: CategoryScore {
            category,
            score: SignalScore::from_score(mean, reasoning),
            factors: contributions.iter().map(|c| c.factor.clone()).collect(),
        },
        contributions,
    }
}

pub fn technical(indicators: &TechnicalIndicators, price: f64) -> CategoryEvaluation {
    aggregate(
        Category::Technical,
        [
            Rule::Rsi(indicators.rsi),
            Rule::Macd(indicators.macd.trend),
            Rule::Bollinger(indicators.bollinger_bands.position),
            Rule::PriceVsEma20 {
                price,
                ema20: indicators.ema20,
            },
            Rule::MovingAverageRegime {
                sma50: indicators.sma50,
                sma200: indicators.sma200,
            },
        ],
    )
}

pub fn trend(analysis: &MarketAnalysis, price: f64) -> CategoryEvaluation {
    let levels = &analysis.levels;
    aggregate(
        Category::Trend,
        [
            Rule::Trend {
                direction: analysis.trend.direction,
                strength: analysis.trend.strength,
            },
            Rule::RangePosition {
                price,
                support: levels.support,
                resistance: levels.resistance,
            },
            Rule::YearRangePosition {
                price,
                year_high: levels.year_high,
                year_low: levels.year_low,
            },
        ],
    )
}

pub fn fundamental(data: &FundamentalData) -> CategoryEvaluation {
    let mut rules = Vec::new();
    if let Some(pe) = data.pe_ratio {
        rules.push(Rule::PeRatio(pe));
    }
    if let (Some(trailing), Some(forward)) = (data.pe_ratio, data.forward_pe) {
        rules.push(Rule::ForwardPe { trailing, forward });
    }
    if let Some(peg) = data.peg_ratio {
        rules.push(Rule::Peg(peg));
    }
    if let Some(pb) = data.price_to_book {
        rules.push(Rule::PriceToBook(pb));
    }
    if let Some(eps) = data.eps {
        rules.push(Rule::Eps(eps));
    }
    if let (Some(eps), Some(forward_eps)) = (data.eps, data.forward_eps) {
        rules.push(Rule::EpsOutlook { eps, forward_eps });
    }
    if let Some(de) = data.debt_to_equity {
        rules.push(Rule::DebtToEquity(de));
    }
    if let Some(roe) = data.return_on_equity {
        rules.push(Rule::ReturnOnEquity(roe));
    }
    if let Some(ratio) = data.current_ratio {
        rules.push(Rule::CurrentRatio(ratio));
    }
    if let Some(yield_) = data.dividend_yield {
        rules.push(Rule::DividendYield(yield_));
    }
    aggregate(Category::Fundamental, rules)
}

/// Social sentiment plus analyst opinion from the fundamentals record.
pub fn sentiment(
    sentiment: Option<&SentimentData>,
    data: &FundamentalData,
    price: f64,
) -> CategoryEvaluation {
    let mut rules = Vec::new();
    if let Some(s) = sentiment.filter(|s| s.data_available) {
        rules.push(Rule::SocialScore(s.score));
        rules.push(Rule::MentionRatio {
            ratio: s.sentiment_ratio,
            mentions: s.mentions,
        });
    }
    if let Some(key) = data.recommendation_key {
        rules.push(Rule::AnalystConsensus(key));
    }
    if let Some(target) = data.target_price {
        rules.push(Rule::TargetUpside { price, target });
    }
    aggregate(Category::Sentiment, rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RecommendationKey;
    use crate::scoring::{Signal, Strength};

    #[test]
    fn empty_fundamentals_are_unavailable() {
        let eval = fundamental(&FundamentalData::default());
        let s = &eval.score.score;
        assert_eq!(s.signal, Signal::Neutral);
        assert_eq!(s.strength, Strength::Weak);
        assert_eq!(s.confidence, 0.3);
        assert_eq!(eval.score.factors, vec!["Fundamental data unavailable".to_string()]);
        assert!(eval.contributions.is_empty());
    }

    #[test]
    fn fundamental_mean_of_fired_rules() {
        let data = FundamentalData {
            pe_ratio: Some(12.0),  // +0.8
            eps: Some(3.0),        // +0.3
            beta: Some(1.4),       // no rule
            price_to_book: Some(3.0), // within range, no contribution
            ..Default::default()
        };
        let eval = fundamental(&data);
        assert_eq!(eval.contributions.len(), 2);
        assert!((eval.value() - 0.55).abs() < 1e-12);
        assert_eq!(eval.score.score.signal, Signal::Bullish);
        assert_eq!(eval.score.score.strength, Strength::Moderate);
    }

    #[test]
    fn sentiment_without_any_source_is_unavailable() {
        let eval = sentiment(Some(&SentimentData::neutral()), &FundamentalData::default(), 100.0);
        assert_eq!(eval.score.factors, vec!["Sentiment data unavailable".to_string()]);
        assert_eq!(eval.confidence(), 0.3);
    }

    #[test]
    fn analyst_data_alone_scores_sentiment() {
        let data = FundamentalData {
            recommendation_key: Some(RecommendationKey::StrongBuy),
            target_price: Some(130.0),
            ..Default::default()
        };
        let eval = sentiment(None, &data, 100.0);
        assert!((eval.value() - 0.9).abs() < 1e-12);
        assert_eq!(eval.score.score.signal, Signal::Bullish);
    }

    #[test]
    fn social_rules_need_available_data() {
        let mut s = SentimentData::neutral();
        s.score = 0.6;
        s.mentions = 20;
        s.positive_mentions = 16;
        s.sentiment_ratio = 0.8;
        let off = sentiment(Some(&s), &FundamentalData::default(), 100.0);
        assert!(off.contributions.is_empty());

        s.data_available = true;
        let on = sentiment(Some(&s), &FundamentalData::default(), 100.0);
        assert_eq!(on.contributions.len(), 2);
        assert!((on.value() - 0.75).abs() < 1e-12);
    }
}
