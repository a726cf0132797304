//! Subscription reader port (read side / CQRS queries).
//!
//! Read-optimized view of a provider's current subscription with its
//! payments, for dashboard display.

use crate::domain::foundation::{DomainError, PaymentId, ProviderId, SubscriptionId, Timestamp};
use crate::domain::payment::{PaymentMethod, PaymentStatus};
use crate::domain::subscription::{SubscriptionKind, SubscriptionStatus};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Reader port for subscription queries.
#[async_trait]
pub trait SubscriptionReader: Send + Sync {
    /// Get the provider's subscription whose window contains `now`,
    /// with its payments attached. Prefers active over pending.
    ///
    /// Returns `None` if the provider has no current subscription.
    async fn current_for_provider(
        &self,
        provider_id: ProviderId,
        now: Timestamp,
    ) -> Result<Option<SubscriptionView>, DomainError>;
}

/// Detailed view of a subscription for UI display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionView {
    /// Subscription ID.
    pub id: SubscriptionId,

    /// Billing cadence.
    pub kind: SubscriptionKind,

    /// Current status.
    pub status: SubscriptionStatus,

    /// First covered instant.
    pub window_start: Timestamp,

    /// Last covered instant.
    pub window_end: Timestamp,

    /// Price in cents.
    pub price_cents: i64,

    /// Payments declared against this subscription, newest first.
    pub payments: Vec<PaymentView>,
}

/// Summary view of a payment for lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentView {
    /// Payment ID.
    pub id: PaymentId,

    /// Declared method.
    pub method: PaymentMethod,

    /// Declared amount in cents.
    pub amount_cents: i64,

    /// Resolution status.
    pub status: PaymentStatus,

    /// When the provider declared the payment.
    pub declared_at: Timestamp,

    /// When an administrator resolved it, if resolved.
    pub validated_at: Option<Timestamp>,
}
