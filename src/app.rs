use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePoolOptions;
use tokio::net::TcpListener;
use tracing::{info, warn};

use voyager_api::create_app;
use voyager_application::{
    CachedAdapters, ResearchOptions, ResearchOrchestrator, ResearchRunner, StaticDataAdapters,
};
use voyager_config::AppConfig;
use voyager_domain::JobRepository;
use voyager_infrastructure::{
    CacheService, CacheTtl, ConnectionRegistry, NoopCache, RedisCacheManager, SqliteJobRepository,
};

/// Fully wired service: job store, cache, adapters, orchestrator and router.
pub struct Application {
    config: AppConfig,
    router: axum::Router,
}

impl Application {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(&config.database.url)
            .await
            .with_context(|| format!("failed to open database {}", config.database.url))?;

        let repository = SqliteJobRepository::new(pool);
        repository
            .migrate()
            .await
            .context("failed to run database migrations")?;
        let repository: Arc<dyn JobRepository> = Arc::new(repository);

        let cache = build_cache(&config).await;
        let adapters = CachedAdapters::new(
            StaticDataAdapters::new(),
            cache,
            CacheTtl::from_settings(&config.cache.ttl),
            &config.cache.key_prefix,
        );

        let registry = Arc::new(ConnectionRegistry::new());
        let orchestrator = ResearchOrchestrator::new(
            Arc::new(adapters),
            ResearchOptions::from_config(&config.research),
        );
        let runner = Arc::new(ResearchRunner::new(
            orchestrator,
            repository.clone(),
            registry.clone(),
        ));

        let router = create_app(repository, registry, runner, config.server.cors_enabled);

        Ok(Self { config, router })
    }

    /// Serves HTTP until the shutdown future resolves, then drains in-flight
    /// requests.
    pub async fn run(self, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
        let address = format!("{}:{}", self.config.server.host, self.config.server.port);
        let listener = TcpListener::bind(&address)
            .await
            .with_context(|| format!("failed to bind {address}"))?;
        info!(%address, "http server listening");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await
            .context("http server failed")?;

        info!("http server stopped");
        Ok(())
    }
}

async fn build_cache(config: &AppConfig) -> Arc<dyn CacheService> {
    if !config.cache.enabled {
        info!("cache disabled, every lookup goes to the adapters");
        return Arc::new(NoopCache);
    }

    match RedisCacheManager::connect(&config.cache).await {
        Ok(cache) => {
            info!(url = %config.cache.redis_url, "redis cache connected");
            Arc::new(cache)
        }
        Err(e) => {
            warn!(error = %e, "redis unavailable, continuing without cache");
            Arc::new(NoopCache)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn application_wires_up_from_defaults() {
        let mut config = AppConfig::default();
        config.database.url = "sqlite::memory:".to_string();
        let app = Application::new(config).await;
        assert!(app.is_ok());
    }

    #[tokio::test]
    async fn disabled_cache_still_builds() {
        let mut config = AppConfig::default();
        config.cache.enabled = false;
        let cache = build_cache(&config).await;
        assert!(cache.get("anything").await.is_none());
    }
}
