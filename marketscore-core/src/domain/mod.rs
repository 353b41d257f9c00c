//! Domain value objects: bars, quotes, fundamentals, sentiment, snapshots.

pub mod bar;
pub mod fundamentals;
pub mod ids;
pub mod sentiment;
pub mod snapshot;

pub use bar::{closes, PriceBar, QuoteData};
pub use fundamentals::{FundamentalData, FundamentalField, RecommendationKey};
pub use ids::{Cik, InputHash};
pub use sentiment::{SentimentData, SocialChannel, SocialSentimentPayload};
pub use snapshot::{FundamentalsSource, MarketSnapshot, Provenance, ReconciledSnapshot};
