pub mod cache;
pub mod database;
pub mod events;

pub use cache::{cache_key, CacheService, CacheTtl, NoopCache, RedisCacheManager};
pub use database::{MemoryJobRepository, SqliteJobRepository};
pub use events::{ConnectionId, ConnectionRegistry, EventSender};
