//! Redis-based tag cache for resolved site metadata.
//!
//! A tag names a coherent bucket of cached derived data; invalidating a tag
//! removes the bucket so subsequent resolutions re-fetch fresh data from the
//! content store. Invalidation is an idempotent broadcast: redundant or
//! concurrent invalidations of the same tag are safe without coordination.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `REDIS_ENABLED`: Set to "false" to disable caching (default: true)
//! - `REDIS_URL`: Redis connection URL (default: redis://localhost:6379)
//! - `REDIS_CACHE_TTL`: Cache TTL in seconds (default: 300)

use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use async_trait::async_trait;
use sitemeta_core::{CacheInvalidator, Error, Result};

/// Tag cache backed by Redis.
#[derive(Clone)]
pub struct TagCache {
    inner: Arc<TagCacheInner>,
}

struct TagCacheInner {
    /// Redis connection manager (None if disabled).
    connection: RwLock<Option<ConnectionManager>>,
    /// Cache TTL in seconds.
    ttl_seconds: u64,
    /// Whether caching is enabled.
    enabled: bool,
    /// Cache key prefix.
    prefix: String,
}

impl TagCache {
    /// Create a new tag cache from environment configuration.
    ///
    /// Reads:
    /// - `REDIS_ENABLED` (default: true)
    /// - `REDIS_URL` (default: redis://localhost:6379)
    /// - `REDIS_CACHE_TTL` (default: 300 seconds)
    pub async fn from_env() -> Self {
        let enabled = std::env::var("REDIS_ENABLED")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

        let ttl_seconds: u64 = std::env::var("REDIS_CACHE_TTL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(sitemeta_core::defaults::CACHE_TTL_SECS);

        let connection = if enabled {
            match redis::Client::open(redis_url.as_str()) {
                Ok(client) => match ConnectionManager::new(client).await {
                    Ok(conn) => {
                        info!("Redis tag cache enabled (TTL: {}s)", ttl_seconds);
                        Some(conn)
                    }
                    Err(e) => {
                        warn!("Failed to connect to Redis, cache disabled: {}", e);
                        None
                    }
                },
                Err(e) => {
                    warn!("Invalid Redis URL, cache disabled: {}", e);
                    None
                }
            }
        } else {
            info!("Redis tag cache disabled via REDIS_ENABLED=false");
            None
        };

        Self {
            inner: Arc::new(TagCacheInner {
                connection: RwLock::new(connection),
                ttl_seconds,
                enabled,
                prefix: "sm:tag:".to_string(),
            }),
        }
    }

    /// Create a disabled cache (for testing or when Redis is unavailable).
    pub fn disabled() -> Self {
        Self {
            inner: Arc::new(TagCacheInner {
                connection: RwLock::new(None),
                ttl_seconds: sitemeta_core::defaults::CACHE_TTL_SECS,
                enabled: false,
                prefix: "sm:tag:".to_string(),
            }),
        }
    }

    /// Check if caching is enabled and connected.
    pub async fn is_connected(&self) -> bool {
        self.inner.enabled && self.inner.connection.read().await.is_some()
    }

    fn key(&self, tag: &str) -> String {
        format!("{}{}", self.inner.prefix, tag)
    }

    /// Get the cached value stored under a tag.
    pub async fn get<T: DeserializeOwned>(&self, tag: &str) -> Option<T> {
        let mut conn_guard = self.inner.connection.write().await;
        let conn = conn_guard.as_mut()?;
        let key = self.key(tag);

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(data)) => match serde_json::from_str(&data) {
                Ok(result) => {
                    debug!(tag = %tag, "Cache HIT");
                    Some(result)
                }
                Err(e) => {
                    warn!(tag = %tag, "Cache deserialization error: {}", e);
                    None
                }
            },
            Ok(None) => {
                debug!(tag = %tag, "Cache MISS");
                None
            }
            Err(e) => {
                error!(tag = %tag, "Redis GET error: {}", e);
                None
            }
        }
    }

    /// Store a value under a tag.
    pub async fn set<T: Serialize>(&self, tag: &str, value: &T) -> bool {
        let mut conn_guard = self.inner.connection.write().await;
        let conn = match conn_guard.as_mut() {
            Some(c) => c,
            None => return false,
        };

        let serialized = match serde_json::to_string(value) {
            Ok(s) => s,
            Err(e) => {
                error!(tag = %tag, "Cache serialization error: {}", e);
                return false;
            }
        };

        match conn
            .set_ex::<_, _, ()>(self.key(tag), serialized, self.inner.ttl_seconds)
            .await
        {
            Ok(_) => {
                debug!(tag = %tag, ttl_secs = self.inner.ttl_seconds, "Cache SET");
                true
            }
            Err(e) => {
                error!(tag = %tag, "Redis SET error: {}", e);
                false
            }
        }
    }

    /// Get cache TTL setting.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.inner.ttl_seconds)
    }
}

#[async_trait]
impl CacheInvalidator for TagCache {
    /// Invalidate the cached bucket under a tag.
    ///
    /// A disabled or unconnected cache has nothing cached, so invalidation
    /// is vacuously successful. Only a Redis transport failure surfaces as
    /// an error.
    async fn invalidate(&self, tag: &str) -> Result<()> {
        let mut conn_guard = self.inner.connection.write().await;
        let conn = match conn_guard.as_mut() {
            Some(c) => c,
            None => {
                debug!(tag = %tag, "Cache INVALIDATE (no-op, cache disabled)");
                return Ok(());
            }
        };

        match conn.del::<_, ()>(self.key(tag)).await {
            Ok(_) => {
                info!(tag = %tag, op = "invalidate", "Cache INVALIDATE");
                Ok(())
            }
            Err(e) => {
                error!(tag = %tag, "Redis DEL error: {}", e);
                Err(Error::Cache(format!("Failed to invalidate '{}': {}", tag, e)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_uses_tag_prefix() {
        let cache = TagCache::disabled();
        assert_eq!(cache.key("metadata"), "sm:tag:metadata");
        assert_eq!(cache.key("posts"), "sm:tag:posts");
    }

    #[tokio::test]
    async fn disabled_cache_is_not_connected() {
        let cache = TagCache::disabled();
        assert!(!cache.is_connected().await);
    }

    #[tokio::test]
    async fn disabled_cache_get_and_set_are_noops() {
        let cache = TagCache::disabled();
        assert!(!cache.set("metadata", &serde_json::json!({"a": 1})).await);
        let got: Option<serde_json::Value> = cache.get("metadata").await;
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn disabled_cache_invalidate_is_vacuously_ok() {
        let cache = TagCache::disabled();
        assert!(cache.invalidate("metadata").await.is_ok());
        // Idempotent: repeated invalidation stays Ok.
        assert!(cache.invalidate("metadata").await.is_ok());
    }
}
