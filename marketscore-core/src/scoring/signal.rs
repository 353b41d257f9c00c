//! Per-category signals.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scores with magnitude above this are STRONG.
pub const STRONG_THRESHOLD: f64 = 0.6;
/// Scores with magnitude at or above this are MODERATE.
pub const MODERATE_THRESHOLD: f64 = 0.3;
/// Scores with magnitude above this are directional at all.
pub const WEAK_THRESHOLD: f64 = 0.1;

/// Confidence reported for a category with no usable data.
pub const UNAVAILABLE_CONFIDENCE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    Bullish,
    Neutral,
    Bearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strength {
    Strong,
    Moderate,
    Weak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Technical,
    Fundamental,
    Sentiment,
    Trend,
}

impl Category {
    pub const ALL: [Category; 4] = [Self::Technical, Self::Fundamental, Self::Sentiment, Self::Trend];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Technical => "Technical",
            Self::Fundamental => "Fundamental",
            Self::Sentiment => "Sentiment",
            Self::Trend => "Trend",
        }
    }

    /// The single factor reported when the category had nothing to score.
    pub fn unavailable_factor(&self) -> String {
        format!("{} data unavailable", self.label())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalScore {
    pub signal: Signal,
    pub strength: Strength,
    /// In [-1, 1].
    pub score: f64,
    /// In [0, 1].
    pub confidence: f64,
    pub reasoning: String,
}

impl SignalScore {
    /// Classify a raw category score. Out-of-range input is clamped and NaN
    /// counts as 0.
    pub fn from_score(score: f64, reasoning: impl Into<String>) -> Self {
        let score = if score.is_nan() { 0.0 } else { score.clamp(-1.0, 1.0) };
        let magnitude = score.abs();
        let direction = if score > 0.0 { Signal::Bullish } else { Signal::Bearish };

        let (signal, strength) = if magnitude > STRONG_THRESHOLD {
            (direction, Strength::Strong)
        } else if magnitude >= MODERATE_THRESHOLD {
            (direction, Strength::Moderate)
        } else if magnitude > WEAK_THRESHOLD {
            (direction, Strength::Weak)
        } else {
            (Signal::Neutral, Strength::Moderate)
        };

        Self {
            signal,
            strength,
            score,
            confidence: magnitude * 0.8 + 0.2,
            reasoning: reasoning.into(),
        }
    }

    pub fn unavailable(reasoning: impl Into<String>) -> Self {
        Self {
            signal: Signal::Neutral,
            strength: Strength::Weak,
            score: 0.0,
            confidence: UNAVAILABLE_CONFIDENCE,
            reasoning: reasoning.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: Category,
    pub score: SignalScore,
    /// Literal rule hits, in rule order.
    pub factors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(score: f64) -> (Signal, Strength) {
        let s = SignalScore::from_score(score, "");
        (s.signal, s.strength)
    }

    #[test]
    fn threshold_table() {
        assert_eq!(classify(0.61), (Signal::Bullish, Strength::Strong));
        assert_eq!(classify(0.6), (Signal::Bullish, Strength::Moderate));
        assert_eq!(classify(0.3), (Signal::Bullish, Strength::Moderate));
        assert_eq!(classify(0.2), (Signal::Bullish, Strength::Weak));
        assert_eq!(classify(0.1), (Signal::Neutral, Strength::Moderate));
        assert_eq!(classify(0.0), (Signal::Neutral, Strength::Moderate));
        assert_eq!(classify(-0.1), (Signal::Neutral, Strength::Moderate));
        assert_eq!(classify(-0.2), (Signal::Bearish, Strength::Weak));
        assert_eq!(classify(-0.45), (Signal::Bearish, Strength::Moderate));
        assert_eq!(classify(-0.9), (Signal::Bearish, Strength::Strong));
    }

    #[test]
    fn confidence_scales_with_magnitude() {
        assert!((SignalScore::from_score(0.5, "").confidence - 0.6).abs() < 1e-12);
        assert!((SignalScore::from_score(-1.0, "").confidence - 1.0).abs() < 1e-12);
        assert!((SignalScore::from_score(0.0, "").confidence - 0.2).abs() < 1e-12);
    }

    #[test]
    fn clamps_and_neutralizes_nan() {
        assert_eq!(SignalScore::from_score(3.0, "").score, 1.0);
        assert_eq!(SignalScore::from_score(f64::NAN, "").score, 0.0);
    }

    #[test]
    fn unavailable_is_neutral_weak() {
        let s = SignalScore::unavailable(Category::Fundamental.unavailable_factor());
        assert_eq!((s.signal, s.strength), (Signal::Neutral, Strength::Weak));
        assert_eq!(s.confidence, 0.3);
        assert_eq!(s.reasoning, "Fundamental data unavailable");
    }

    #[test]
    fn wire_names() {
        assert_eq!(serde_json::to_value(Signal::Bullish).unwrap(), "BULLISH");
        assert_eq!(serde_json::to_value(Strength::Moderate).unwrap(), "MODERATE");
        assert_eq!(serde_json::to_value(Category::Sentiment).unwrap(), "sentiment");
    }
}
