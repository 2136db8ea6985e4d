//! Redis-backed caching layer for adapter lookups.
//!
//! The cache is a pure latency optimization: when the backing store is
//! disabled or unreachable every operation degrades to a logged no-op or
//! miss, and callers proceed to the upstream source.

pub mod manager;

use async_trait::async_trait;
use std::time::Duration;

pub use manager::RedisCacheManager;

use voyager_config::CacheTtlSettings;

/// Key/value cache contract. Implementations never surface backend errors;
/// a failed read is a miss and a failed write is dropped.
#[async_trait]
pub trait CacheService: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: &str, ttl: Duration);
    async fn delete(&self, key: &str) -> bool;
    async fn exists(&self, key: &str) -> bool;
}

/// Cache used when Redis is not configured.
pub struct NoopCache;

#[async_trait]
impl CacheService for NoopCache {
    async fn get(&self, _key: &str) -> Option<String> {
        None
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) {}

    async fn delete(&self, _key: &str) -> bool {
        false
    }

    async fn exists(&self, _key: &str) -> bool {
        false
    }
}

/// Per-category TTLs, graded by how quickly each data source goes stale.
#[derive(Debug, Clone)]
pub struct CacheTtl {
    pub visa: Duration,
    pub affordability: Duration,
    pub attractions: Duration,
    pub hotels: Duration,
    pub events: Duration,
    pub flights: Duration,
    pub weather: Duration,
    pub guides: Duration,
}

impl CacheTtl {
    pub fn from_settings(settings: &CacheTtlSettings) -> Self {
        Self {
            visa: Duration::from_secs(settings.visa_seconds),
            affordability: Duration::from_secs(settings.affordability_seconds),
            attractions: Duration::from_secs(settings.attractions_seconds),
            hotels: Duration::from_secs(settings.hotels_seconds),
            events: Duration::from_secs(settings.events_seconds),
            flights: Duration::from_secs(settings.flights_seconds),
            weather: Duration::from_secs(settings.weather_seconds),
            guides: Duration::from_secs(settings.guides_seconds),
        }
    }
}

impl Default for CacheTtl {
    fn default() -> Self {
        Self::from_settings(&CacheTtlSettings::default())
    }
}

/// Builds a namespaced cache key: `{prefix}:{category}:{param}:{param}...`.
///
/// Every parameter that affects the lookup result must be included so that
/// distinct queries never collide. Parameters are lowercased and spaces are
/// collapsed to keep keys readable in redis-cli.
pub fn cache_key(prefix: &str, category: &str, params: &[&str]) -> String {
    let mut key = String::with_capacity(64);
    key.push_str(prefix);
    key.push(':');
    key.push_str(category);
    for param in params {
        key.push(':');
        for ch in param.trim().chars() {
            match ch {
                ' ' => key.push('_'),
                c => key.extend(c.to_lowercase()),
            }
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced_and_normalized() {
        let key = cache_key("voyager", "visa", &["US", "Bali, Indonesia"]);
        assert_eq!(key, "voyager:visa:us:bali,_indonesia");
    }

    #[test]
    fn distinct_parameters_never_collide() {
        let a = cache_key("voyager", "events", &["Tokyo", "2026-06-01", "2026-06-08"]);
        let b = cache_key("voyager", "events", &["Tokyo", "2026-06-01", "2026-06-09"]);
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn noop_cache_always_misses() {
        let cache = NoopCache;
        cache.set("k", "v", Duration::from_secs(60)).await;
        assert_eq!(cache.get("k").await, None);
        assert!(!cache.exists("k").await);
        assert!(!cache.delete("k").await);
    }
}
