pub mod memory;
pub mod postgres;
pub mod redis;
pub mod store;

pub use memory::MemoryHistoryStore;
pub use postgres::{create_pool, PgHistoryStore};
pub use self::redis::{create_redis_client, Cache, CacheKey, CacheWriterHandle};
pub use store::{HistoryStore, WATCH_HISTORY_LIMIT};

#[cfg(test)]
pub use store::MockHistoryStore;
