//! Cache store adapters.

mod in_memory;
mod redis;

pub use in_memory::InMemoryCacheStore;
pub use redis::RedisCacheStore;
