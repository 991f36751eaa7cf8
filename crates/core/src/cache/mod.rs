//! Cache tier for the externally-sourced portion of a stock record.
//!
//! The cache is fail-open by contract: callers treat any [`CacheError`] as a
//! miss on reads and a no-op on writes. A cache outage must never surface to
//! the caller of the merge orchestrator.

mod redis_cache;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::stocks::CachedMarketData;

pub use redis_cache::RedisCache;

/// Errors raised by the cache tier. All of them are recoverable.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Connection, protocol, or timeout failure talking to the cache.
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    /// The cached value could not be encoded or decoded.
    #[error("Cache serialization failed: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, CacheError>;

/// Key-value store with TTL for the market-data subset of a record.
///
/// Implementations hold a long-lived pooled connection handle and must never
/// panic on connectivity failures.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<CachedMarketData>>;
    async fn set(&self, key: &str, value: &CachedMarketData, ttl: Option<Duration>) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Cache key for a symbol's market data, e.g. `stock:AAPL`.
pub fn cache_key(symbol: &str) -> String {
    format!("stock:{}", symbol.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_is_uppercase() {
        assert_eq!(cache_key("aapl"), "stock:AAPL");
        assert_eq!(cache_key("MSFT"), "stock:MSFT");
    }
}
