//! Read-through caching decorator for [`DataAdapters`].
//!
//! Values are stored as JSON strings under namespaced keys. Cache failures
//! never surface: a decode error or backend hiccup falls through to the
//! wrapped adapter.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use super::DataAdapters;
use voyager_domain::{
    AdapterResult, AffordabilityReport, Attraction, BudgetLevel, DiningGuide, EventEntry,
    FlightOption, HotelOption, NightlifeGuide, TransportGuide, VisaRequirements, WeatherReport,
};
use voyager_infrastructure::{cache_key, CacheService, CacheTtl};

pub struct CachedAdapters<A> {
    inner: A,
    cache: Arc<dyn CacheService>,
    ttl: CacheTtl,
    prefix: String,
}

impl<A: DataAdapters> CachedAdapters<A> {
    pub fn new(inner: A, cache: Arc<dyn CacheService>, ttl: CacheTtl, prefix: &str) -> Self {
        Self {
            inner,
            cache,
            ttl,
            prefix: prefix.to_string(),
        }
    }

    async fn read_through<T, F>(
        &self,
        category: &str,
        params: &[&str],
        ttl: Duration,
        fetch: F,
    ) -> AdapterResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: std::future::Future<Output = AdapterResult<T>>,
    {
        let key = cache_key(&self.prefix, category, params);
        if let Some(raw) = self.cache.get(&key).await {
            match serde_json::from_str(&raw) {
                Ok(value) => return Ok(value),
                Err(e) => debug!(key, error = %e, "stale cache entry, refetching"),
            }
        }

        let value = fetch.await?;
        if let Ok(raw) = serde_json::to_string(&value) {
            self.cache.set(&key, &raw, ttl).await;
        }
        Ok(value)
    }
}

#[async_trait]
impl<A: DataAdapters> DataAdapters for CachedAdapters<A> {
    async fn weather(
        &self,
        destination: &str,
        month: Option<u32>,
    ) -> AdapterResult<WeatherReport> {
        let month_key = month.map_or_else(|| "current".to_string(), |m| m.to_string());
        self.read_through(
            "weather",
            &[destination, &month_key],
            self.ttl.weather,
            self.inner.weather(destination, month),
        )
        .await
    }

    async fn visa(&self, passport: &str, country: &str) -> AdapterResult<VisaRequirements> {
        self.read_through(
            "visa",
            &[passport, country],
            self.ttl.visa,
            self.inner.visa(passport, country),
        )
        .await
    }

    async fn attractions(
        &self,
        destination: &str,
        interests: &[String],
    ) -> AdapterResult<Vec<Attraction>> {
        let interests_key = interests.join("+");
        self.read_through(
            "attractions",
            &[destination, &interests_key],
            self.ttl.attractions,
            self.inner.attractions(destination, interests),
        )
        .await
    }

    async fn events(
        &self,
        destination: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> AdapterResult<Vec<EventEntry>> {
        let start_key = date_key(start);
        let end_key = date_key(end);
        self.read_through(
            "events",
            &[destination, &start_key, &end_key],
            self.ttl.events,
            self.inner.events(destination, start, end),
        )
        .await
    }

    async fn affordability(
        &self,
        country: &str,
        budget_level: BudgetLevel,
    ) -> AdapterResult<AffordabilityReport> {
        self.read_through(
            "affordability",
            &[country, budget_level.as_str()],
            self.ttl.affordability,
            self.inner.affordability(country, budget_level),
        )
        .await
    }

    async fn flights(
        &self,
        origin: &str,
        destination: &str,
        depart: Option<NaiveDate>,
    ) -> AdapterResult<Vec<FlightOption>> {
        let depart_key = date_key(depart);
        self.read_through(
            "flights",
            &[origin, destination, &depart_key],
            self.ttl.flights,
            self.inner.flights(origin, destination, depart),
        )
        .await
    }

    async fn hotels(
        &self,
        destination: &str,
        check_in: Option<NaiveDate>,
        check_out: Option<NaiveDate>,
    ) -> AdapterResult<Vec<HotelOption>> {
        let in_key = date_key(check_in);
        let out_key = date_key(check_out);
        self.read_through(
            "hotels",
            &[destination, &in_key, &out_key],
            self.ttl.hotels,
            self.inner.hotels(destination, check_in, check_out),
        )
        .await
    }

    async fn dining(&self, destination: &str, dietary: &[String]) -> AdapterResult<DiningGuide> {
        let dietary_key = dietary.join("+");
        self.read_through(
            "dining",
            &[destination, &dietary_key],
            self.ttl.guides,
            self.inner.dining(destination, dietary),
        )
        .await
    }

    async fn transport(&self, destination: &str) -> AdapterResult<TransportGuide> {
        self.read_through(
            "transport",
            &[destination],
            self.ttl.guides,
            self.inner.transport(destination),
        )
        .await
    }

    async fn nightlife(&self, destination: &str) -> AdapterResult<NightlifeGuide> {
        self.read_through(
            "nightlife",
            &[destination],
            self.ttl.guides,
            self.inner.nightlife(destination),
        )
        .await
    }
}

fn date_key(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "any".to_string(), |d| d.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::StaticDataAdapters;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingCache {
        entries: Mutex<HashMap<String, String>>,
        hits: Mutex<u32>,
    }

    #[async_trait]
    impl CacheService for RecordingCache {
        async fn get(&self, key: &str) -> Option<String> {
            let value = self.entries.lock().unwrap().get(key).cloned();
            if value.is_some() {
                *self.hits.lock().unwrap() += 1;
            }
            value
        }

        async fn set(&self, key: &str, value: &str, _ttl: Duration) {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
        }

        async fn delete(&self, key: &str) -> bool {
            self.entries.lock().unwrap().remove(key).is_some()
        }

        async fn exists(&self, key: &str) -> bool {
            self.entries.lock().unwrap().contains_key(key)
        }
    }

    #[tokio::test]
    async fn second_lookup_is_served_from_cache() {
        let cache = Arc::new(RecordingCache::default());
        let adapters = CachedAdapters::new(
            StaticDataAdapters::new(),
            cache.clone(),
            CacheTtl::default(),
            "voyager",
        );

        let first = adapters.visa("US", "Indonesia").await.unwrap();
        let second = adapters.visa("US", "Indonesia").await.unwrap();
        assert_eq!(first.cost_usd, second.cost_usd);
        assert_eq!(*cache.hits.lock().unwrap(), 1);
        assert!(cache
            .entries
            .lock()
            .unwrap()
            .contains_key("voyager:visa:us:indonesia"));
    }

    #[tokio::test]
    async fn cache_hit_skips_the_upstream_adapter() {
        let mut mock = crate::adapters::MockDataAdapters::new();
        mock.expect_nightlife().times(1).returning(|_| {
            Ok(NightlifeGuide {
                famous_for: "jazz cellars".to_string(),
                venues: vec!["Old Town".to_string()],
                typical_night_out: "Dinner then live music".to_string(),
                safety_tips: Vec::new(),
            })
        });

        let adapters = CachedAdapters::new(
            mock,
            Arc::new(RecordingCache::default()),
            CacheTtl::default(),
            "voyager",
        );
        let first = adapters.nightlife("Oslo, Norway").await.unwrap();
        let second = adapters.nightlife("Oslo, Norway").await.unwrap();
        assert_eq!(first.famous_for, second.famous_for);
    }

    #[tokio::test]
    async fn undecodable_entry_falls_through_to_source() {
        let cache = Arc::new(RecordingCache::default());
        cache
            .entries
            .lock()
            .unwrap()
            .insert("voyager:visa:us:japan".to_string(), "not json".to_string());

        let adapters = CachedAdapters::new(
            StaticDataAdapters::new(),
            cache.clone(),
            CacheTtl::default(),
            "voyager",
        );
        let visa = adapters.visa("US", "Japan").await.unwrap();
        assert!(!visa.required);
    }
}
