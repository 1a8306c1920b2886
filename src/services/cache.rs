use moka::future::Cache;
use redis::aio::ConnectionManager;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Keys examined per SCAN round trip during invalidation
const SCAN_BATCH: usize = 500;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// Two-level store for ranked recommendations
///
/// Reads try the in-process map first and fall back to Redis, copying Redis
/// hits into the local map. Writes go to both levels with the same TTL.
pub struct CacheManager {
    local: Cache<String, String>,
    redis: ConnectionManager,
    ttl: Duration,
}

impl CacheManager {
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let ttl = Duration::from_secs(ttl_secs);
        let redis = ConnectionManager::new(redis::Client::open(redis_url)?).await?;
        let local = Cache::builder().max_capacity(l1_size).time_to_live(ttl).build();

        Ok(Self { local, redis, ttl })
    }

    /// Decode the entry stored under `key`, or `CacheMiss` when neither level has it
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, CacheError> {
        if let Some(json) = self.local.get(key).await {
            return Ok(serde_json::from_str(&json)?);
        }

        let mut conn = self.redis.clone();
        let stored: Option<String> = redis::cmd("GET").arg(key).query_async(&mut conn).await?;

        let Some(json) = stored else {
            tracing::trace!("Cache miss: {}", key);
            return Err(CacheError::CacheMiss(key.to_string()));
        };

        let value = serde_json::from_str(&json)?;
        self.local.insert(key.to_string(), json).await;

        Ok(value)
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let json = serde_json::to_string(value)?;

        let mut conn = self.redis.clone();
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(&json)
            .arg("EX")
            .arg(self.ttl.as_secs())
            .query_async(&mut conn)
            .await?;

        self.local.insert(key.to_string(), json).await;
        Ok(())
    }

    /// Drop every Redis key matching a glob, and the whole local level
    pub async fn invalidate_pattern(&self, pattern: &str) -> Result<(), CacheError> {
        self.local.invalidate_all();

        let mut conn = self.redis.clone();
        let mut cursor: u64 = 0;
        let mut removed = 0usize;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;

            if !keys.is_empty() {
                removed += keys.len();
                let _: () = redis::cmd("DEL").arg(&keys).query_async(&mut conn).await?;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        tracing::debug!("Removed {} cached entries matching {}", removed, pattern);
        Ok(())
    }
}

/// Cache key layout
pub struct CacheKey;

impl CacheKey {
    /// Glob covering every ranked-recommendation entry
    pub const RECOMMENDATIONS_PATTERN: &'static str = "recs:*";

    /// Ranked providers for one founder at one page size
    pub fn recommendations(founder_id: &str, limit: usize) -> String {
        format!("recs:{}:{}", founder_id, limit)
    }
}
