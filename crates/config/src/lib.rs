//! Application configuration: TOML file + environment overrides + defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use voyager_errors::{ResearchError, ResearchResult};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cache: CacheSettings,
    pub research: ResearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://voyager.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

/// Redis cache settings. Disabled or unreachable caching degrades every
/// lookup to a miss; it is never a correctness dependency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    pub redis_url: String,
    pub key_prefix: String,
    pub ttl: CacheTtlSettings,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            redis_url: "redis://localhost:6379".to_string(),
            key_prefix: "voyager".to_string(),
            ttl: CacheTtlSettings::default(),
        }
    }
}

/// Per-category TTLs, graded by data volatility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheTtlSettings {
    pub visa_seconds: u64,
    pub affordability_seconds: u64,
    pub attractions_seconds: u64,
    pub hotels_seconds: u64,
    pub events_seconds: u64,
    pub flights_seconds: u64,
    pub weather_seconds: u64,
    pub guides_seconds: u64,
}

impl Default for CacheTtlSettings {
    fn default() -> Self {
        Self {
            visa_seconds: 86_400,
            affordability_seconds: 86_400,
            attractions_seconds: 21_600,
            hotels_seconds: 21_600,
            events_seconds: 1_800,
            flights_seconds: 1_800,
            weather_seconds: 3_600,
            guides_seconds: 21_600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchConfig {
    /// Destination fan-out cap per job.
    pub max_destinations: usize,
    /// Upper bound on the derived destination shortlist.
    pub shortlist_limit: usize,
    /// Per-adapter-call timeout.
    pub adapter_timeout_seconds: u64,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            max_destinations: 3,
            shortlist_limit: 8,
            adapter_timeout_seconds: 20,
        }
    }
}

impl AppConfig {
    /// Load configuration. A missing path falls back to defaults; environment
    /// variables override the file in either case.
    pub fn load(path: Option<&str>) -> ResearchResult<Self> {
        let mut config = match path {
            Some(path) => {
                if !Path::new(path).exists() {
                    return Err(ResearchError::Configuration(format!(
                        "config file not found: {path}"
                    )));
                }
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    ResearchError::Configuration(format!("failed to read {path}: {e}"))
                })?;
                toml::from_str(&raw).map_err(|e| {
                    ResearchError::Configuration(format!("failed to parse {path}: {e}"))
                })?
            }
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("VOYAGER_DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(url) = std::env::var("VOYAGER_REDIS_URL") {
            self.cache.redis_url = url;
            self.cache.enabled = true;
        }
        if let Ok(port) = std::env::var("VOYAGER_HTTP_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
    }

    pub fn validate(&self) -> ResearchResult<()> {
        if self.database.url.is_empty() {
            return Err(ResearchError::Configuration(
                "database.url must not be empty".to_string(),
            ));
        }
        if self.research.max_destinations == 0 {
            return Err(ResearchError::Configuration(
                "research.max_destinations must be at least 1".to_string(),
            ));
        }
        if self.research.adapter_timeout_seconds == 0 {
            return Err(ResearchError::Configuration(
                "research.adapter_timeout_seconds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
