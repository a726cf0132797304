//! Cache store port.
//!
//! Small string cache with per-key TTL. Backs the visibility gate so
//! repeated search-side checks skip the database. Implementations can
//! use in-memory storage for testing or Redis for production.

use async_trait::async_trait;

use crate::domain::foundation::ProviderId;

/// Port for TTL-based caching.
///
/// Implementations should be thread-safe and support concurrent access.
/// The cache is best-effort: callers must tolerate misses and fall back
/// to the source of truth.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get a cached value.
    ///
    /// Returns `None` on a miss or after expiry.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Set a value with a time-to-live in seconds.
    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CacheError>;

    /// Remove a key. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// Cache key for a provider's visibility snapshot.
pub fn visibility_key(provider_id: ProviderId) -> String {
    format!("visibility:{}", provider_id)
}

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Cache backend is unavailable.
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    /// Stored value could not be decoded.
    #[error("corrupt cache entry for key {key}: {detail}")]
    Corrupt { key: String, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn cache_store_is_object_safe() {
        fn _accepts_dyn(_cache: &dyn CacheStore) {}
    }

    #[test]
    fn visibility_key_is_namespaced() {
        let id = ProviderId::new();
        assert_eq!(visibility_key(id), format!("visibility:{}", id));
    }
}
