//! Ticker → CIK cache with TTL expiry and a single-flight table refresh.
//!
//! The cache is an ordinary injectable object. Reads go through a
//! `parking_lot::RwLock`; refreshes serialize on an async mutex so that
//! concurrent misses trigger one table download, not one per caller.

use super::provider::{DataError, IdentifierResolver, TickerTableSource};
use crate::domain::Cik;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    value: Cik,
    expires_at: Instant,
}

#[derive(Debug)]
pub struct IdentifierCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    refreshed_at: RwLock<Option<Instant>>,
    refresh_lock: Mutex<()>,
    ttl: Duration,
    refreshes: AtomicU64,
}

impl IdentifierCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            refreshed_at: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            ttl,
            refreshes: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Unexpired value for `key`. Keys are case-insensitive.
    pub fn get(&self, key: &str) -> Option<Cik> {
        let entries = self.entries.read();
        entries
            .get(&normalize(key))
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value)
    }

    /// Insert one mapping with its own TTL. It survives table refreshes
    /// unless the refreshed table carries the same key.
    pub fn set(&self, key: &str, value: Cik, ttl: Duration) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().insert(normalize(key), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Whether the last full-table refresh is younger than the TTL.
    pub fn is_fresh(&self) -> bool {
        self.refreshed_at
            .read()
            .is_some_and(|at| at.elapsed() < self.ttl)
    }

    /// Number of completed table refreshes.
    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::Relaxed)
    }

    /// Refresh the whole table from `source` unless it is still fresh.
    ///
    /// Concurrent callers wait on the same refresh and re-check freshness
    /// after acquiring the lock, so only the first one downloads.
    pub async fn ensure_fresh<S>(&self, source: &S) -> Result<(), DataError>
    where
        S: TickerTableSource + ?Sized,
    {
        if self.is_fresh() {
            return Ok(());
        }

        let _guard = self.refresh_lock.lock().await;
        if self.is_fresh() {
            debug!("identifier table refreshed by a concurrent caller");
            return Ok(());
        }

        let table = source.fetch_ticker_table().await?;
        let now = Instant::now();
        let expires_at = now + self.ttl;
        let fresh: HashMap<String, CacheEntry> = table
            .into_iter()
            .map(|(ticker, value)| (normalize(&ticker), CacheEntry { value, expires_at }))
            .collect();

        info!(entries = fresh.len(), "identifier table refreshed");
        {
            let mut entries = self.entries.write();
            entries.retain(|_, entry| entry.expires_at > now);
            entries.extend(fresh);
        }
        *self.refreshed_at.write() = Some(now);
        self.refreshes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

impl Default for IdentifierCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

fn normalize(key: &str) -> String {
    key.trim().to_ascii_uppercase()
}

/// [`IdentifierResolver`] backed by an [`IdentifierCache`] over a ticker table.
pub struct CachedIdentifierResolver<S> {
    cache: IdentifierCache,
    source: S,
}

impl<S: TickerTableSource> CachedIdentifierResolver<S> {
    pub fn new(source: S, ttl: Duration) -> Self {
        Self {
            cache: IdentifierCache::new(ttl),
            source,
        }
    }

    pub fn cache(&self) -> &IdentifierCache {
        &self.cache
    }
}

#[async_trait]
impl<S: TickerTableSource> IdentifierResolver for CachedIdentifierResolver<S> {
    async fn resolve_identifier(&self, ticker: &str) -> Result<Option<Cik>, DataError> {
        if let Some(cik) = self.cache.get(ticker) {
            debug!(ticker, %cik, "identifier cache hit");
            return Ok(Some(cik));
        }
        self.cache.ensure_fresh(&self.source).await?;
        Ok(self.cache.get(ticker))
    }
}
