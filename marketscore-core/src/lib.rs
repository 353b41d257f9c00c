//! MarketScore Core — deterministic market analysis and multi-factor scoring.
//!
//! Pipeline, leaves first:
//! - Price-series math (SMA, EMA, RSI, MACD, Bollinger Bands)
//! - Indicator aggregation into technical indicators, price levels and trend
//! - Completeness detection on primary fundamentals
//! - Filing-fact extraction from structured company-facts documents
//! - Reconciliation of sparse fundamentals with the filing source
//! - Timeframe-weighted scoring into a `TradingScore` with an input hash
//! - Pre-market gap screening with a 0–100 composite rank
//!
//! Indicator math, aggregation and scoring are pure and synchronous. The only
//! async boundary is the secondary-source lookup used by the reconciler.

pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod fingerprint;
pub mod fundamentals;
pub mod indicators;
pub mod scoring;
pub mod screening;

pub use config::{AnalyzerConfig, ConfigError};
pub use domain::{MarketSnapshot, ReconciledSnapshot};
pub use fundamentals::DataReconciler;
pub use scoring::{score, score_many, Recommendation, Timeframe, TradingScore};
pub use screening::{screen, ScreeningCriteria, ScreeningResult};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything handed across threads by `score_many`
    /// or shared by the reconciler is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::PriceBar>();
        require_sync::<domain::PriceBar>();
        require_send::<domain::FundamentalData>();
        require_sync::<domain::FundamentalData>();
        require_send::<domain::MarketSnapshot>();
        require_sync::<domain::MarketSnapshot>();
        require_send::<domain::ReconciledSnapshot>();
        require_sync::<domain::ReconciledSnapshot>();

        // Scoring output
        require_send::<scoring::TradingScore>();
        require_sync::<scoring::TradingScore>();
        require_send::<fingerprint::AuditRecord>();
        require_sync::<fingerprint::AuditRecord>();
        require_send::<screening::ScreeningResult>();
        require_sync::<screening::ScreeningResult>();

        // Shared data-layer state
        require_send::<data::IdentifierCache>();
        require_sync::<data::IdentifierCache>();
        require_send::<data::CircuitBreaker>();
        require_sync::<data::CircuitBreaker>();
        require_send::<data::EdgarClient>();
        require_sync::<data::EdgarClient>();
        require_send::<DataReconciler<data::CachedIdentifierResolver<data::EdgarClient>, data::EdgarClient>>();
        require_sync::<DataReconciler<data::CachedIdentifierResolver<data::EdgarClient>, data::EdgarClient>>();
    }

    /// Scoring takes no async context and no I/O handle: the signature is the
    /// contract.
    #[test]
    fn score_is_a_plain_function() {
        fn _check(snapshot: &ReconciledSnapshot, timeframe: Timeframe) -> TradingScore {
            score(snapshot, timeframe)
        }
    }
}
