//! GetVisibilityHandler - Query handler for the visibility gate.
//!
//! The search side asks this question for every provider it renders,
//! so answers are cached with a short TTL. The cache is best-effort:
//! any cache failure falls back to the database.

use std::sync::Arc;

use crate::domain::foundation::ProviderId;
use crate::domain::provider::VisibilitySnapshot;
use crate::domain::subscription::SubscriptionError;
use crate::ports::{cache_store::visibility_key, CacheStore, ProviderRepository};

/// Query for a provider's visibility snapshot.
#[derive(Debug, Clone, Copy)]
pub struct GetVisibilityQuery {
    pub provider_id: ProviderId,
}

/// Handler for the visibility query.
pub struct GetVisibilityHandler {
    providers: Arc<dyn ProviderRepository>,
    cache: Arc<dyn CacheStore>,
    cache_ttl_secs: u64,
}

impl GetVisibilityHandler {
    pub fn new(
        providers: Arc<dyn ProviderRepository>,
        cache: Arc<dyn CacheStore>,
        cache_ttl_secs: u64,
    ) -> Self {
        Self {
            providers,
            cache,
            cache_ttl_secs,
        }
    }

    pub async fn handle(
        &self,
        query: GetVisibilityQuery,
    ) -> Result<VisibilitySnapshot, SubscriptionError> {
        let key = visibility_key(query.provider_id);

        match self.cache.get(&key).await {
            Ok(Some(cached)) => match serde_json::from_str::<VisibilitySnapshot>(&cached) {
                Ok(snapshot) => return Ok(snapshot),
                Err(err) => {
                    tracing::warn!(key = %key, error = %err, "discarding corrupt cache entry");
                }
            },
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "visibility cache read failed");
            }
        }

        let provider = self
            .providers
            .find_by_id(query.provider_id)
            .await?
            .ok_or(SubscriptionError::ProviderNotFound(query.provider_id))?;
        let snapshot = VisibilitySnapshot::of(&provider);

        // A provider whose window lapsed between sweeps must not appear
        // visible; the stored flag is authoritative only after sweeps,
        // so the snapshot is what we cache and serve.
        if let Ok(serialized) = serde_json::to_string(&snapshot) {
            if let Err(err) = self.cache.set(&key, &serialized, self.cache_ttl_secs).await {
                tracing::warn!(key = %key, error = %err, "visibility cache write failed");
            }
        }

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{MockCacheStore, MockProviderRepo};
    use crate::domain::foundation::{Timestamp, UserId};
    use crate::domain::provider::Provider;

    fn visible_provider() -> Provider {
        let now = Timestamp::now();
        let mut provider = Provider::new(ProviderId::new(), UserId::new(), "Atelier", now);
        provider.submit_identity(now).unwrap();
        provider.decide_identity(true, now).unwrap();
        provider.set_subscription_active(true, now);
        provider.set_available(true, now);
        provider
    }

    #[tokio::test]
    async fn computes_and_caches_on_miss() {
        let provider = visible_provider();
        let providers = Arc::new(MockProviderRepo::with(vec![provider.clone()]));
        let cache = Arc::new(MockCacheStore::new());

        let handler = GetVisibilityHandler::new(providers, cache.clone(), 60);
        let snapshot = handler
            .handle(GetVisibilityQuery {
                provider_id: provider.id,
            })
            .await
            .unwrap();

        assert!(snapshot.visible);
        let cached = cache
            .entries
            .lock()
            .unwrap()
            .get(&visibility_key(provider.id))
            .cloned();
        assert!(cached.is_some());
    }

    #[tokio::test]
    async fn serves_cached_snapshot_without_touching_the_repository() {
        let provider = visible_provider();
        let snapshot = VisibilitySnapshot::of(&provider);
        // Empty repository: a hit must come from the cache alone.
        let providers = Arc::new(MockProviderRepo::default());
        let cache = Arc::new(MockCacheStore::new());
        cache
            .set(
                &visibility_key(provider.id),
                &serde_json::to_string(&snapshot).unwrap(),
                60,
            )
            .await
            .unwrap();

        let handler = GetVisibilityHandler::new(providers, cache, 60);
        let result = handler
            .handle(GetVisibilityQuery {
                provider_id: provider.id,
            })
            .await
            .unwrap();

        assert_eq!(result, snapshot);
    }

    #[tokio::test]
    async fn cache_failure_falls_back_to_the_repository() {
        let provider = visible_provider();
        let providers = Arc::new(MockProviderRepo::with(vec![provider.clone()]));
        let cache = Arc::new(MockCacheStore::failing());

        let handler = GetVisibilityHandler::new(providers, cache, 60);
        let result = handler
            .handle(GetVisibilityQuery {
                provider_id: provider.id,
            })
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn corrupt_cache_entry_is_discarded() {
        let provider = visible_provider();
        let providers = Arc::new(MockProviderRepo::with(vec![provider.clone()]));
        let cache = Arc::new(MockCacheStore::new());
        cache
            .set(&visibility_key(provider.id), "not json", 60)
            .await
            .unwrap();

        let handler = GetVisibilityHandler::new(providers, cache, 60);
        let result = handler
            .handle(GetVisibilityQuery {
                provider_id: provider.id,
            })
            .await
            .unwrap();

        assert!(result.visible);
    }

    #[tokio::test]
    async fn fails_for_unknown_provider() {
        let providers = Arc::new(MockProviderRepo::default());
        let cache = Arc::new(MockCacheStore::new());

        let handler = GetVisibilityHandler::new(providers, cache, 60);
        let result = handler
            .handle(GetVisibilityQuery {
                provider_id: ProviderId::new(),
            })
            .await;

        assert!(matches!(
            result,
            Err(SubscriptionError::ProviderNotFound(_))
        ));
    }
}
