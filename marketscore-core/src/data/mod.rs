//! Data access: secondary-source contracts, the EDGAR adapter, the
//! identifier cache, CSV import and synthetic bars.

pub mod circuit_breaker;
pub mod csv_bars;
pub mod edgar;
pub mod identifier_cache;
pub mod provider;
pub mod synthetic;

pub use circuit_breaker::{BreakerState, CircuitBreaker};
pub use csv_bars::{load_bars_csv, read_bars};
pub use edgar::{parse_ticker_table, EdgarClient};
pub use identifier_cache::{CachedIdentifierResolver, IdentifierCache, DEFAULT_TTL};
pub use provider::{DataError, FilingFetcher, IdentifierResolver, TickerTableSource};
pub use synthetic::RandomWalk;
