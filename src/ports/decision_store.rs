//! Decision store port: multi-aggregate transactional commits.
//!
//! Administrator and sweep decisions touch several rows at once: the
//! payment, the subscription, the provider's visibility flag, and the
//! audit trail. Each method on this port commits one decision in one
//! transaction, so a crash can never leave a validated payment without
//! an activated subscription.

use crate::domain::audit::AuditEntry;
use crate::domain::foundation::DomainError;
use crate::domain::payment::Payment;
use crate::domain::provider::Provider;
use crate::domain::subscription::Subscription;
use async_trait::async_trait;

/// Transactional writer for cross-aggregate decisions.
///
/// Callers mutate the aggregates in memory first, then hand the final
/// states to one commit method. Implementations write all rows in a
/// single transaction.
#[async_trait]
pub trait DecisionStore: Send + Sync {
    /// Commit a payment approval: payment marked valid, subscription
    /// activated, provider's subscription flag raised, audit entry
    /// appended.
    async fn commit_payment_approval(
        &self,
        payment: &Payment,
        subscription: &Subscription,
        provider: &Provider,
        entry: &AuditEntry,
    ) -> Result<(), DomainError>;

    /// Commit a payment rejection: payment marked rejected, audit entry
    /// appended. The subscription stays pending.
    async fn commit_payment_rejection(
        &self,
        payment: &Payment,
        entry: &AuditEntry,
    ) -> Result<(), DomainError>;

    /// Commit an identity review decision: provider's verification
    /// status updated, audit entry appended.
    async fn commit_identity_decision(
        &self,
        provider: &Provider,
        entry: &AuditEntry,
    ) -> Result<(), DomainError>;

    /// Commit one sweep expiry: subscription marked expired, provider's
    /// subscription flag lowered.
    async fn commit_expiry(
        &self,
        subscription: &Subscription,
        provider: &Provider,
    ) -> Result<(), DomainError>;

    /// Commit a direct administrator activation with no payment:
    /// subscription activated, provider flag raised, audit entry
    /// appended.
    async fn commit_direct_activation(
        &self,
        subscription: &Subscription,
        provider: &Provider,
        entry: &AuditEntry,
    ) -> Result<(), DomainError>;
}
