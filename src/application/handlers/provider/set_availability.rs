//! SetAvailabilityHandler - Command handler for the provider's
//! availability toggle.

use std::sync::Arc;

use crate::application::handlers::visibility_cache::invalidate_visibility;
use crate::domain::foundation::{ProviderId, Timestamp};
use crate::domain::provider::Provider;
use crate::domain::subscription::SubscriptionError;
use crate::ports::{CacheStore, ProviderRepository};

/// Command to set the provider's availability.
#[derive(Debug, Clone, Copy)]
pub struct SetAvailabilityCommand {
    pub provider_id: ProviderId,
    pub available: bool,
}

/// Handler for the availability toggle.
///
/// Availability is one of the four visibility gates; flipping it only
/// affects search exposure, never the subscription itself.
pub struct SetAvailabilityHandler {
    providers: Arc<dyn ProviderRepository>,
    cache: Arc<dyn CacheStore>,
}

impl SetAvailabilityHandler {
    pub fn new(providers: Arc<dyn ProviderRepository>, cache: Arc<dyn CacheStore>) -> Self {
        Self { providers, cache }
    }

    pub async fn handle(&self, cmd: SetAvailabilityCommand) -> Result<Provider, SubscriptionError> {
        let mut provider = self
            .providers
            .find_by_id(cmd.provider_id)
            .await?
            .ok_or(SubscriptionError::ProviderNotFound(cmd.provider_id))?;

        if provider.available == cmd.available {
            return Ok(provider);
        }

        provider.set_available(cmd.available, Timestamp::now());
        self.providers.update(&provider).await?;

        invalidate_visibility(self.cache.as_ref(), &provider).await;

        Ok(provider)
    }
}
