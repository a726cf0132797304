//! Provider aggregate entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ProviderId, StateMachine, Timestamp, UserId};
use crate::domain::subscription::SubscriptionError;

use super::VerificationStatus;

/// Provider aggregate - a marketplace service provider.
///
/// The four visibility flags are all maintained here so the visibility
/// predicate reads one row. `subscription_active` mirrors whether the
/// provider currently holds an active subscription and is updated inside
/// the same transaction as the subscription itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    /// Unique identifier for this provider.
    pub id: ProviderId,

    /// Account the provider profile belongs to.
    pub user_id: UserId,

    /// Public display name.
    pub display_name: String,

    /// Identity verification status.
    pub verification_status: VerificationStatus,

    /// Mirror flag: the provider holds an active subscription.
    pub subscription_active: bool,

    /// Provider-controlled availability toggle.
    pub available: bool,

    /// Account enabled flag, controlled by administrators.
    pub account_active: bool,

    /// When the provider profile was created.
    pub created_at: Timestamp,

    /// When the provider profile was last updated.
    pub updated_at: Timestamp,
}

impl Provider {
    /// Create a new provider profile. Starts unverified, unsubscribed,
    /// unavailable, with an enabled account.
    pub fn new(
        id: ProviderId,
        user_id: UserId,
        display_name: impl Into<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            user_id,
            display_name: display_name.into(),
            verification_status: VerificationStatus::Unverified,
            subscription_active: false,
            available: false,
            account_active: true,
            created_at,
            updated_at: created_at,
        }
    }

    /// The public-visibility predicate. A provider appears in search
    /// results only when every gate is open.
    pub fn is_visible(&self) -> bool {
        self.verification_status.is_verified()
            && self.subscription_active
            && self.available
            && self.account_active
    }

    /// Submit identity documents for review.
    pub fn submit_identity(&mut self, now: Timestamp) -> Result<(), SubscriptionError> {
        self.transition_verification(VerificationStatus::Pending, "submit identity for", now)
    }

    /// Administrator decision on a pending identity review.
    pub fn decide_identity(
        &mut self,
        approved: bool,
        now: Timestamp,
    ) -> Result<(), SubscriptionError> {
        let target = if approved {
            VerificationStatus::Verified
        } else {
            VerificationStatus::Rejected
        };
        self.transition_verification(target, "decide identity for", now)
    }

    /// Flip the subscription mirror flag. Called inside the same
    /// transaction that changes the subscription row.
    pub fn set_subscription_active(&mut self, active: bool, now: Timestamp) {
        self.subscription_active = active;
        self.updated_at = now;
    }

    /// Provider-controlled availability toggle.
    pub fn set_available(&mut self, available: bool, now: Timestamp) {
        self.available = available;
        self.updated_at = now;
    }

    fn transition_verification(
        &mut self,
        target: VerificationStatus,
        attempted: &str,
        now: Timestamp,
    ) -> Result<(), SubscriptionError> {
        self.verification_status =
            self.verification_status.transition_to(target).map_err(|_| {
                SubscriptionError::invalid_state(
                    format!("{:?}", self.verification_status),
                    attempted,
                )
            })?;
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse_rfc3339(s).unwrap()
    }

    fn provider() -> Provider {
        Provider::new(
            ProviderId::new(),
            UserId::new(),
            "Atelier Dubois",
            ts("2024-01-01T00:00:00Z"),
        )
    }

    #[test]
    fn new_provider_is_not_visible() {
        let p = provider();
        assert!(!p.is_visible());
        assert_eq!(p.verification_status, VerificationStatus::Unverified);
        assert!(p.account_active);
    }

    #[test]
    fn visibility_requires_all_four_gates() {
        let now = ts("2024-03-01T00:00:00Z");
        let mut p = provider();
        p.submit_identity(now).unwrap();
        p.decide_identity(true, now).unwrap();
        p.set_subscription_active(true, now);
        p.set_available(true, now);
        assert!(p.is_visible());

        for gate in 0..4 {
            let mut broken = p.clone();
            match gate {
                0 => broken.verification_status = VerificationStatus::Pending,
                1 => broken.subscription_active = false,
                2 => broken.available = false,
                _ => broken.account_active = false,
            }
            assert!(!broken.is_visible(), "gate {} should block visibility", gate);
        }
    }

    #[test]
    fn identity_review_follows_the_state_machine() {
        let now = ts("2024-03-01T00:00:00Z");
        let mut p = provider();
        assert!(p.decide_identity(true, now).is_err());

        p.submit_identity(now).unwrap();
        p.decide_identity(false, now).unwrap();
        assert_eq!(p.verification_status, VerificationStatus::Rejected);

        p.submit_identity(now).unwrap();
        p.decide_identity(true, now).unwrap();
        assert!(p.verification_status.is_verified());
    }

    #[test]
    fn subscription_flag_toggles_with_timestamp() {
        let mut p = provider();
        p.set_subscription_active(true, ts("2024-03-02T00:00:00Z"));
        assert!(p.subscription_active);
        assert_eq!(p.updated_at, ts("2024-03-02T00:00:00Z"));
    }
}
