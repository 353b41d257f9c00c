//! Snapshots: the raw market input and its reconciled counterpart.

use super::{FundamentalData, FundamentalField, PriceBar, QuoteData, SentimentData, SocialSentimentPayload};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything fetched for one symbol at one point in time, before
/// fundamentals are reconciled with the secondary source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub quote: QuoteData,
    #[serde(default)]
    pub bars: Vec<PriceBar>,
    #[serde(default)]
    pub fundamentals: FundamentalData,
    #[serde(default)]
    pub sentiment: Option<SentimentData>,
}

impl MarketSnapshot {
    /// Replace the sentiment record with one normalized from a raw social
    /// payload.
    pub fn with_social_payload(mut self, payload: SocialSentimentPayload) -> Self {
        self.sentiment = Some(payload.into_sentiment());
        self
    }
}

/// Which source(s) contributed to the reconciled fundamentals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FundamentalsSource {
    #[serde(rename = "primary")]
    Primary,
    #[serde(rename = "primary+secondary")]
    PrimaryWithSecondary,
    #[serde(rename = "secondary")]
    Secondary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    pub fundamentals: FundamentalsSource,
    pub fallback_used: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    #[serde(default)]
    pub merged_fields: Vec<FundamentalField>,
    pub completeness_before: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completeness_after: Option<f64>,
}

impl Provenance {
    /// Primary data used unchanged, no fallback attempted.
    pub fn primary(completeness: f64) -> Self {
        Self {
            fundamentals: FundamentalsSource::Primary,
            fallback_used: false,
            fallback_reason: None,
            merged_fields: Vec::new(),
            completeness_before: completeness,
            completeness_after: None,
        }
    }

    /// Fallback was wanted but could not contribute anything.
    pub fn primary_with_reason(completeness: f64, reason: impl Into<String>) -> Self {
        Self {
            fallback_reason: Some(reason.into()),
            ..Self::primary(completeness)
        }
    }
}

/// The scoring engine's input: a market snapshot whose fundamentals have
/// been reconciled, plus the provenance of that reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledSnapshot {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub quote: QuoteData,
    #[serde(default)]
    pub bars: Vec<PriceBar>,
    #[serde(default)]
    pub fundamentals: FundamentalData,
    #[serde(default)]
    pub sentiment: Option<SentimentData>,
    pub provenance: Provenance,
}

impl ReconciledSnapshot {
    pub fn from_market(market: MarketSnapshot, fundamentals: FundamentalData, provenance: Provenance) -> Self {
        Self {
            symbol: market.symbol,
            timestamp: market.timestamp,
            quote: market.quote,
            bars: market.bars,
            fundamentals,
            sentiment: market.sentiment,
            provenance,
        }
    }

    pub fn price(&self) -> f64 {
        self.quote.price
    }

    pub fn with_social_payload(mut self, payload: SocialSentimentPayload) -> Self {
        self.sentiment = Some(payload.into_sentiment());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provenance_wire_format() {
        let p = Provenance::primary_with_reason(42.0, "secondary unavailable");
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["fundamentals"], "primary");
        assert_eq!(json["fallbackUsed"], false);
        assert_eq!(json["fallbackReason"], "secondary unavailable");
        assert!(json.get("completenessAfter").is_none());
    }

    #[test]
    fn social_payload_becomes_sentiment() {
        let ts = "2024-06-03T14:30:00Z".parse::<DateTime<Utc>>().unwrap();
        let payload: SocialSentimentPayload = serde_json::from_str(
            r#"{"reddit": {"mention": 40, "positiveMention": 30, "negativeMention": 10, "score": 0.4}}"#,
        )
        .unwrap();
        let snap = MarketSnapshot {
            symbol: "TEST".into(),
            timestamp: ts,
            quote: QuoteData::at_price(10.0, ts),
            bars: Vec::new(),
            fundamentals: FundamentalData::default(),
            sentiment: None,
        }
        .with_social_payload(payload);

        let sentiment = snap.sentiment.unwrap();
        assert_eq!(sentiment.mentions, 40);
        assert_eq!(sentiment.sentiment_ratio, 0.75);
        assert!(sentiment.data_available);
    }

    #[test]
    fn merged_source_renders_with_plus() {
        let json = serde_json::to_value(FundamentalsSource::PrimaryWithSecondary).unwrap();
        assert_eq!(json, "primary+secondary");
    }
}
