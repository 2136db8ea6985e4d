//! Redis cache manager.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::CacheService;
use voyager_config::CacheSettings;
use voyager_errors::{ResearchError, ResearchResult};

/// Redis-backed cache. Connection management and reconnects are delegated to
/// the driver's `ConnectionManager`; command failures are logged and treated
/// as misses.
pub struct RedisCacheManager {
    conn: ConnectionManager,
}

impl RedisCacheManager {
    /// Connect and verify the server with a PING. Callers that cannot connect
    /// should fall back to [`super::NoopCache`].
    pub async fn connect(settings: &CacheSettings) -> ResearchResult<Self> {
        let client = redis::Client::open(settings.redis_url.as_str())
            .map_err(|e| ResearchError::cache_error(e.to_string()))?;

        let mut conn = client
            .get_connection_manager()
            .await
            .map_err(|e| ResearchError::cache_error(e.to_string()))?;

        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| ResearchError::cache_error(e.to_string()))?;

        info!(redis_url = %settings.redis_url, "connected to redis cache");
        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheService for RedisCacheManager {
    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.conn.clone();
        match redis::cmd("GET")
            .arg(key)
            .query_async::<Option<String>>(&mut conn)
            .await
        {
            Ok(Some(value)) => {
                debug!(key, "cache hit");
                Some(value)
            }
            Ok(None) => {
                debug!(key, "cache miss");
                None
            }
            Err(e) => {
                warn!(key, error = %e, "cache get failed, treating as miss");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) {
        let mut conn = self.conn.clone();
        let result = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async::<()>(&mut conn)
            .await;
        if let Err(e) = result {
            warn!(key, error = %e, "cache set failed, dropping write");
        }
    }

    async fn delete(&self, key: &str) -> bool {
        let mut conn = self.conn.clone();
        match redis::cmd("DEL")
            .arg(key)
            .query_async::<i64>(&mut conn)
            .await
        {
            Ok(n) => n > 0,
            Err(e) => {
                warn!(key, error = %e, "cache delete failed");
                false
            }
        }
    }

    async fn exists(&self, key: &str) -> bool {
        let mut conn = self.conn.clone();
        match redis::cmd("EXISTS")
            .arg(key)
            .query_async::<i64>(&mut conn)
            .await
        {
            Ok(n) => n > 0,
            Err(e) => {
                warn!(key, error = %e, "cache exists failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voyager_config::CacheSettings;

    #[tokio::test]
    async fn unreachable_server_fails_connect_cleanly() {
        let settings = CacheSettings {
            enabled: true,
            // Reserved port, nothing listens here.
            redis_url: "redis://127.0.0.1:1/".to_string(),
            ..Default::default()
        };
        assert!(RedisCacheManager::connect(&settings).await.is_err());
    }
}
