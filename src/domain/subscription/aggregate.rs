//! Subscription aggregate entity.
//!
//! One subscription is one paid-visibility window for one provider.
//!
//! # Design Decisions
//!
//! - **Calendar windows**: a subscription spans the full calendar month
//!   or year containing the request instant, so two requests inside the
//!   same period always collide under admission control
//! - **Money in cents**: all monetary values stored as i64 cents
//! - **Validated transitions**: state changes go through the status
//!   state machine; illegal transitions are errors, not silent writes

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PlanId, ProviderId, StateMachine, SubscriptionId, Timestamp};

use super::{BillingWindow, SubscriptionError, SubscriptionKind, SubscriptionStatus};

/// Subscription aggregate - a provider's paid-visibility window.
///
/// # Invariants
///
/// - `window.start <= window.end`
/// - Per (provider, kind), at most one subscription in
///   {Pending, Active} overlaps any other such subscription's window
///   (enforced by admission control at insert time)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Unique identifier for this subscription.
    pub id: SubscriptionId,

    /// Provider who owns this subscription.
    pub provider_id: ProviderId,

    /// Plan the price was taken from, if any.
    pub plan_id: Option<PlanId>,

    /// Billing cadence.
    pub kind: SubscriptionKind,

    /// Calendar window this subscription covers.
    pub window: BillingWindow,

    /// Current lifecycle status.
    pub status: SubscriptionStatus,

    /// Price in cents (from the plan or an explicit override).
    pub price_cents: i64,

    /// When the subscription was requested.
    pub created_at: Timestamp,

    /// When the subscription was last updated.
    pub updated_at: Timestamp,
}

impl Subscription {
    /// Create a new pending subscription for the calendar window
    /// containing `requested_at`.
    pub fn request(
        id: SubscriptionId,
        provider_id: ProviderId,
        kind: SubscriptionKind,
        plan_id: Option<PlanId>,
        price_cents: i64,
        requested_at: Timestamp,
    ) -> Self {
        Self {
            id,
            provider_id,
            plan_id,
            kind,
            window: BillingWindow::for_kind(kind, requested_at),
            status: SubscriptionStatus::Pending,
            price_cents,
            created_at: requested_at,
            updated_at: requested_at,
        }
    }

    /// Activate this subscription after a validated payment or a direct
    /// administrator decision.
    ///
    /// Idempotent: activating an already-active subscription is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error when the subscription is expired.
    pub fn activate(&mut self, now: Timestamp) -> Result<(), SubscriptionError> {
        if self.status == SubscriptionStatus::Active {
            return Ok(());
        }
        self.transition_to(SubscriptionStatus::Active, "activate")?;
        self.updated_at = now;
        Ok(())
    }

    /// Mark this subscription as expired once its window has elapsed.
    ///
    /// No-op when already expired or still pending: a pending
    /// subscription that never got paid stays pending until abandonment
    /// cleanup handles it (see [`Subscription::abandon`]).
    pub fn expire(&mut self, now: Timestamp) -> Result<(), SubscriptionError> {
        if self.status != SubscriptionStatus::Active {
            return Ok(());
        }
        self.transition_to(SubscriptionStatus::Expired, "expire")?;
        self.updated_at = now;
        Ok(())
    }

    /// Expire a pending subscription that was never paid.
    ///
    /// Used by the optional abandonment cleanup; no-op unless pending.
    pub fn abandon(&mut self, now: Timestamp) -> Result<(), SubscriptionError> {
        if self.status != SubscriptionStatus::Pending {
            return Ok(());
        }
        self.transition_to(SubscriptionStatus::Expired, "abandon")?;
        self.updated_at = now;
        Ok(())
    }

    /// Returns true if the validity window has elapsed at `now`.
    pub fn window_elapsed(&self, now: Timestamp) -> bool {
        self.window.end < now
    }

    fn transition_to(
        &mut self,
        target: SubscriptionStatus,
        attempted: &str,
    ) -> Result<(), SubscriptionError> {
        self.status = self.status.transition_to(target).map_err(|_| {
            SubscriptionError::invalid_state(format!("{:?}", self.status), attempted)
        })?;
        Ok(())
    }
}
