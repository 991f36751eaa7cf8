//! Redis-backed cache store.
//!
//! The connection is established lazily on first use and reused afterwards;
//! a failed connection attempt surfaces as [`CacheError::Unavailable`] and is
//! retried on the next call. Values are stored as JSON.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tokio::sync::OnceCell;
use tokio::time::timeout;

use super::{CacheError, CacheStore, Result};
use crate::stocks::CachedMarketData;

const OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

pub struct RedisCache {
    client: redis::Client,
    connection: OnceCell<ConnectionManager>,
}

impl RedisCache {
    pub fn new(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| CacheError::Unavailable(format!("Invalid Redis URL: {}", e)))?;
        Ok(Self {
            client,
            connection: OnceCell::new(),
        })
    }

    async fn connection(&self) -> Result<ConnectionManager> {
        let manager = self
            .connection
            .get_or_try_init(|| async {
                debug!("Establishing Redis connection");
                timeout(OPERATION_TIMEOUT, ConnectionManager::new(self.client.clone()))
                    .await
                    .map_err(|_| CacheError::Unavailable("Redis connect timed out".to_string()))?
                    .map_err(|e| {
                        CacheError::Unavailable(format!("Redis connection failed: {}", e))
                    })
            })
            .await?;
        Ok(manager.clone())
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<CachedMarketData>> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = timeout(OPERATION_TIMEOUT, conn.get(key))
            .await
            .map_err(|_| CacheError::Unavailable(format!("GET {} timed out", key)))?
            .map_err(|e| CacheError::Unavailable(format!("GET {} failed: {}", key, e)))?;

        match raw {
            Some(payload) => {
                // A malformed cached value counts as unavailable for this key
                // only; the caller falls back to a full fetch.
                let value = serde_json::from_str(&payload).map_err(|e| {
                    CacheError::Serialization(format!("Bad cached payload for {}: {}", key, e))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &CachedMarketData, ttl: Option<Duration>) -> Result<()> {
        let payload = serde_json::to_string(value)
            .map_err(|e| CacheError::Serialization(format!("Encoding {} failed: {}", key, e)))?;

        let mut conn = self.connection().await?;
        let write = async {
            match ttl {
                Some(ttl) => conn.set_ex::<_, _, ()>(key, payload, ttl.as_secs()).await,
                None => conn.set::<_, _, ()>(key, payload).await,
            }
        };
        timeout(OPERATION_TIMEOUT, write)
            .await
            .map_err(|_| CacheError::Unavailable(format!("SET {} timed out", key)))?
            .map_err(|e| CacheError::Unavailable(format!("SET {} failed: {}", key, e)))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.connection().await?;
        timeout(OPERATION_TIMEOUT, conn.del::<_, ()>(key))
            .await
            .map_err(|_| CacheError::Unavailable(format!("DEL {} timed out", key)))?
            .map_err(|e| CacheError::Unavailable(format!("DEL {} failed: {}", key, e)))?;
        Ok(())
    }
}
