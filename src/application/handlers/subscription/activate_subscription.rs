//! ActivateSubscriptionHandler - Command handler for direct
//! administrator activation without a payment.

use std::sync::Arc;

use crate::application::handlers::visibility_cache::invalidate_visibility;
use crate::domain::audit::{AuditAction, AuditEntry};
use crate::domain::foundation::{AdminId, SubscriptionId, Timestamp};
use crate::domain::subscription::{Subscription, SubscriptionError, SubscriptionStatus};
use crate::ports::{CacheStore, DecisionStore, ProviderRepository, SubscriptionRepository};

/// Command to activate a pending subscription by administrator fiat.
#[derive(Debug, Clone)]
pub struct ActivateSubscriptionCommand {
    pub admin_id: AdminId,
    pub subscription_id: SubscriptionId,
    pub reason: Option<String>,
}

/// Handler for direct activation.
///
/// Used for goodwill gestures and payment-channel outages. The decision
/// is audited like any payment approval.
pub struct ActivateSubscriptionHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    providers: Arc<dyn ProviderRepository>,
    decisions: Arc<dyn DecisionStore>,
    cache: Arc<dyn CacheStore>,
}

impl ActivateSubscriptionHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        providers: Arc<dyn ProviderRepository>,
        decisions: Arc<dyn DecisionStore>,
        cache: Arc<dyn CacheStore>,
    ) -> Self {
        Self {
            subscriptions,
            providers,
            decisions,
            cache,
        }
    }

    pub async fn handle(
        &self,
        cmd: ActivateSubscriptionCommand,
    ) -> Result<Subscription, SubscriptionError> {
        let now = Timestamp::now();

        let mut subscription = self
            .subscriptions
            .find_by_id(cmd.subscription_id)
            .await?
            .ok_or(SubscriptionError::SubscriptionNotFound(cmd.subscription_id))?;

        // Re-running an activation is a no-op, not an error.
        if subscription.status == SubscriptionStatus::Active {
            return Ok(subscription);
        }

        let mut provider = self
            .providers
            .find_by_id(subscription.provider_id)
            .await?
            .ok_or(SubscriptionError::ProviderNotFound(subscription.provider_id))?;

        subscription.activate(now)?;
        provider.set_subscription_active(true, now);
        // Same convenience default as a payment approval: activation
        // re-enables self-declared availability.
        provider.set_available(true, now);

        let entry = AuditEntry::record(
            cmd.admin_id,
            AuditAction::SubscriptionActivated {
                subscription_id: subscription.id,
            },
            cmd.reason,
            now,
        );

        self.decisions
            .commit_direct_activation(&subscription, &provider, &entry)
            .await?;

        invalidate_visibility(self.cache.as_ref(), &provider).await;

        Ok(subscription)
    }
}
