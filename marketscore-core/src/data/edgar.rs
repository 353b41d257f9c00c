//! SEC EDGAR client: the ticker table and company-facts documents.
//!
//! No retries here. A failure is reported once and the reconciler degrades
//! to primary-only data; repeated throttling opens the circuit breaker.

use super::circuit_breaker::CircuitBreaker;
use super::provider::{DataError, FilingFetcher, TickerTableSource};
use crate::config::EdgarConfig;
use crate::domain::Cik;
use crate::fundamentals::RawFilingDocument;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// One row of `company_tickers.json`, which is an object keyed by row index.
#[derive(Debug, Deserialize)]
struct TickerRow {
    cik_str: u64,
    ticker: String,
}

/// Parse the EDGAR ticker table into an uppercase ticker → CIK map.
pub fn parse_ticker_table(body: &str) -> Result<HashMap<String, Cik>, DataError> {
    let rows: HashMap<String, TickerRow> = serde_json::from_str(body)
        .map_err(|e| DataError::ResponseFormatChanged(format!("ticker table: {e}")))?;
    Ok(rows
        .into_values()
        .map(|row| (row.ticker.to_ascii_uppercase(), Cik(row.cik_str)))
        .collect())
}

pub struct EdgarClient {
    client: reqwest::Client,
    circuit_breaker: Arc<CircuitBreaker>,
    tickers_url: String,
    facts_base_url: String,
}

impl EdgarClient {
    pub fn new(config: &EdgarConfig, circuit_breaker: Arc<CircuitBreaker>) -> Result<Self, DataError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            circuit_breaker,
            tickers_url: config.tickers_url.clone(),
            facts_base_url: config.facts_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn facts_url(&self, cik: Cik) -> String {
        format!("{}/{cik}.json", self.facts_base_url)
    }

    pub fn is_available(&self) -> bool {
        self.circuit_breaker.is_allowed()
    }

    /// GET `url` as text. `Ok(None)` on 404.
    async fn get_text(&self, url: &str) -> Result<Option<String>, DataError> {
        if !self.circuit_breaker.is_allowed() {
            return Err(DataError::CircuitBreakerTripped);
        }

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
        let status = resp.status();

        if status == StatusCode::NOT_FOUND {
            debug!(url, "not found");
            return Ok(None);
        }

        if status == StatusCode::FORBIDDEN {
            warn!(url, "EDGAR refused the request; opening circuit breaker");
            self.circuit_breaker.trip();
            return Err(DataError::CircuitBreakerTripped);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            self.circuit_breaker.record_failure();
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(DataError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            self.circuit_breaker.record_failure();
            return Err(DataError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
        self.circuit_breaker.record_success();
        Ok(Some(body))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, DataError> {
        match self.get_text(url).await? {
            Some(body) => serde_json::from_str(&body)
                .map(Some)
                .map_err(|e| DataError::ResponseFormatChanged(format!("{url}: {e}"))),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl TickerTableSource for EdgarClient {
    async fn fetch_ticker_table(&self) -> Result<HashMap<String, Cik>, DataError> {
        let body = self
            .get_text(&self.tickers_url)
            .await?
            .ok_or_else(|| DataError::ResponseFormatChanged("ticker table not found".into()))?;
        parse_ticker_table(&body)
    }
}

#[async_trait]
impl FilingFetcher for EdgarClient {
    async fn fetch_filing_facts(&self, cik: Cik) -> Result<Option<RawFilingDocument>, DataError> {
        let url = self.facts_url(cik);
        self.get_json(&url).await
    }
}
