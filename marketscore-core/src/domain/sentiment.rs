//! Social sentiment record and the payload it is parsed from.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentData {
    /// -1 (bearish) to 1 (bullish).
    pub score: f64,
    pub mentions: u64,
    pub positive_mentions: u64,
    pub negative_mentions: u64,
    /// positive / total mentions, 0.5 when there are no mentions.
    pub sentiment_ratio: f64,
    pub buzz: f64,
    pub data_available: bool,
}

impl SentimentData {
    /// Record used when the provider has nothing for the symbol.
    pub fn neutral() -> Self {
        Self {
            score: 0.0,
            mentions: 0,
            positive_mentions: 0,
            negative_mentions: 0,
            sentiment_ratio: 0.5,
            buzz: 0.0,
            data_available: false,
        }
    }
}

/// One social channel (reddit, twitter) of a sentiment payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialChannel {
    pub mention: u64,
    pub positive_mention: u64,
    pub negative_mention: u64,
    pub score: f64,
}

/// Raw social-sentiment payload as returned by the sentiment provider.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SocialSentimentPayload {
    pub reddit: Option<SocialChannel>,
    pub twitter: Option<SocialChannel>,
}

impl SocialSentimentPayload {
    /// Normalize into a `SentimentData`. Reddit drives mentions and score;
    /// twitter contributes the buzz score.
    pub fn into_sentiment(self) -> SentimentData {
        let Some(reddit) = self.reddit else {
            return SentimentData::neutral();
        };

        let sentiment_ratio = if reddit.mention > 0 {
            let ratio = reddit.positive_mention as f64 / reddit.mention as f64;
            (ratio * 100.0).round() / 100.0
        } else {
            0.5
        };

        SentimentData {
            score: reddit.score.clamp(-1.0, 1.0),
            mentions: reddit.mention,
            positive_mentions: reddit.positive_mention,
            negative_mentions: reddit.negative_mention,
            sentiment_ratio,
            buzz: self.twitter.map(|t| t.score).unwrap_or(0.0),
            data_available: reddit.mention > 0,
        }
    }
}
