//! Secondary-source contracts and structured error types.
//!
//! The reconciler only sees these traits, so the EDGAR client can be swapped
//! for an in-memory mock in tests.

use crate::domain::Cik;
use crate::fundamentals::RawFilingDocument;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("data error: {0}")]
    Other(String),
}

/// Ticker → secondary-source identifier mapping.
#[async_trait]
pub trait IdentifierResolver: Send + Sync {
    /// `Ok(None)` when the ticker has no identifier. Idempotent.
    async fn resolve_identifier(&self, ticker: &str) -> Result<Option<Cik>, DataError>;
}

/// Structured filing documents keyed by identifier.
#[async_trait]
pub trait FilingFetcher: Send + Sync {
    /// `Ok(None)` when the source has no document for `cik`.
    async fn fetch_filing_facts(&self, cik: Cik) -> Result<Option<RawFilingDocument>, DataError>;
}

/// Source of the full ticker table used to refresh the identifier cache.
#[async_trait]
pub trait TickerTableSource: Send + Sync {
    async fn fetch_ticker_table(&self) -> Result<HashMap<String, Cik>, DataError>;
}

#[async_trait]
impl<T: IdentifierResolver + ?Sized> IdentifierResolver for Arc<T> {
    async fn resolve_identifier(&self, ticker: &str) -> Result<Option<Cik>, DataError> {
        (**self).resolve_identifier(ticker).await
    }
}

#[async_trait]
impl<T: FilingFetcher + ?Sized> FilingFetcher for Arc<T> {
    async fn fetch_filing_facts(&self, cik: Cik) -> Result<Option<RawFilingDocument>, DataError> {
        (**self).fetch_filing_facts(cik).await
    }
}

#[async_trait]
impl<T: TickerTableSource + ?Sized> TickerTableSource for Arc<T> {
    async fn fetch_ticker_table(&self) -> Result<HashMap<String, Cik>, DataError> {
        (**self).fetch_ticker_table().await
    }
}
