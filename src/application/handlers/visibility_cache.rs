//! Visibility cache invalidation shared by the command handlers.

use crate::domain::provider::Provider;
use crate::ports::{cache_store::visibility_key, CacheStore};

/// Best-effort cache invalidation after a visibility gate changed.
///
/// The cache is not the source of truth, so a failed invalidation is
/// logged and tolerated; the entry falls out when its TTL elapses.
pub(crate) async fn invalidate_visibility(cache: &dyn CacheStore, provider: &Provider) {
    if let Err(err) = cache.delete(&visibility_key(provider.id)).await {
        tracing::warn!(
            provider_id = %provider.id,
            error = %err,
            "failed to invalidate visibility cache"
        );
    }
}
