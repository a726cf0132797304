//! Subscription repository port (write side).
//!
//! # Design
//!
//! - **Admission in the store**: the overlap check and the insert are a
//!   single operation so two concurrent requests cannot both pass the
//!   check before either inserts
//! - **Sweep queries**: the expiration sweep reads candidates through
//!   this port, decisions are committed through the decision store

use crate::domain::foundation::{DomainError, ProviderId, SubscriptionId, Timestamp};
use crate::domain::subscription::Subscription;
use async_trait::async_trait;

/// Outcome of an admission-controlled insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// No overlapping pending or active subscription existed, the row
    /// was inserted.
    Inserted,

    /// An overlapping pending or active subscription of the same kind
    /// already occupies the window.
    Conflict,
}

/// Repository port for Subscription aggregate persistence.
///
/// Implementations must make `insert_unless_overlapping` atomic with
/// respect to concurrent calls for the same provider.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Insert a new subscription unless the provider already holds a
    /// pending or active subscription of the same kind whose window
    /// overlaps the new one.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn insert_unless_overlapping(
        &self,
        subscription: &Subscription,
    ) -> Result<InsertOutcome, DomainError>;

    /// Update an existing subscription.
    ///
    /// # Errors
    ///
    /// - `SubscriptionNotFound` if the subscription doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError>;

    /// Find a subscription by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: SubscriptionId) -> Result<Option<Subscription>, DomainError>;

    /// Find the provider's subscription whose window contains `now`,
    /// preferring active over pending.
    async fn find_current_for_provider(
        &self,
        provider_id: ProviderId,
        now: Timestamp,
    ) -> Result<Option<Subscription>, DomainError>;

    /// List active subscriptions whose window ended before `now`.
    ///
    /// Sweep input. Ordered by window end so the oldest lapse first.
    async fn find_expired_active(&self, now: Timestamp) -> Result<Vec<Subscription>, DomainError>;

    /// List pending subscriptions created before `cutoff`.
    ///
    /// Abandonment-cleanup input.
    async fn find_stale_pending(&self, cutoff: Timestamp)
        -> Result<Vec<Subscription>, DomainError>;
}
