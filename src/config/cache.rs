//! Cache configuration for visibility snapshots.

use serde::Deserialize;

use super::error::ValidationError;

/// Cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// TTL for cached visibility snapshots, in seconds.
    #[serde(default = "default_visibility_ttl")]
    pub visibility_ttl_secs: u64,
}

impl CacheConfig {
    /// Validate cache configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.visibility_ttl_secs == 0 {
            return Err(ValidationError::InvalidCacheTtl);
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            visibility_ttl_secs: default_visibility_ttl(),
        }
    }
}

fn default_visibility_ttl() -> u64 {
    // Writes invalidate eagerly, so the TTL only bounds staleness after
    // a missed invalidation.
    300
}
