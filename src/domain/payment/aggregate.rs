//! Payment aggregate entity.
//!
//! A payment records a provider's claim that money was sent for a
//! pending subscription. Administrators resolve each claim exactly once.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PaymentId, ProviderId, StateMachine, SubscriptionId, Timestamp};
use crate::domain::subscription::SubscriptionError;

use super::{PaymentMethod, PaymentStatus};

/// A declared payment awaiting or past manual validation.
///
/// # Invariants
///
/// - `amount_cents > 0`
/// - `validated_at` is set iff the status is resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier for this payment.
    pub id: PaymentId,

    /// Subscription this payment is declared against.
    pub subscription_id: SubscriptionId,

    /// Owning provider, denormalized for ownership checks and listings.
    pub provider_id: ProviderId,

    /// Declared payment method.
    pub method: PaymentMethod,

    /// Declared amount in cents.
    pub amount_cents: i64,

    /// Current resolution status.
    pub status: PaymentStatus,

    /// External transaction reference, when the method carries one.
    pub external_reference: Option<String>,

    /// Pointer to an uploaded proof document, if any.
    pub proof_reference: Option<String>,

    /// When the provider declared the payment.
    pub declared_at: Timestamp,

    /// When an administrator resolved the payment.
    pub validated_at: Option<Timestamp>,
}

impl Payment {
    /// Record a new declared payment in the pending state.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the amount is not positive.
    pub fn declare(
        id: PaymentId,
        subscription_id: SubscriptionId,
        provider_id: ProviderId,
        method: PaymentMethod,
        amount_cents: i64,
        external_reference: Option<String>,
        proof_reference: Option<String>,
        declared_at: Timestamp,
    ) -> Result<Self, SubscriptionError> {
        if amount_cents <= 0 {
            return Err(SubscriptionError::validation(
                "amount_cents",
                "amount must be positive",
            ));
        }
        Ok(Self {
            id,
            subscription_id,
            provider_id,
            method,
            amount_cents,
            status: PaymentStatus::Pending,
            external_reference,
            proof_reference,
            declared_at,
            validated_at: None,
        })
    }

    /// Approve this payment.
    ///
    /// # Errors
    ///
    /// Returns an error when the payment was already resolved.
    pub fn approve(&mut self, now: Timestamp) -> Result<(), SubscriptionError> {
        self.resolve(PaymentStatus::Valid, "approve", now)
    }

    /// Reject this payment.
    ///
    /// # Errors
    ///
    /// Returns an error when the payment was already resolved.
    pub fn reject(&mut self, now: Timestamp) -> Result<(), SubscriptionError> {
        self.resolve(PaymentStatus::Rejected, "reject", now)
    }

    /// Returns true if this payment belongs to the given provider.
    pub fn is_owned_by(&self, provider_id: ProviderId) -> bool {
        self.provider_id == provider_id
    }

    fn resolve(
        &mut self,
        target: PaymentStatus,
        attempted: &str,
        now: Timestamp,
    ) -> Result<(), SubscriptionError> {
        self.status = self.status.transition_to(target).map_err(|_| {
            SubscriptionError::invalid_state(format!("{:?}", self.status), attempted)
        })?;
        self.validated_at = Some(now);
        Ok(())
    }
}
