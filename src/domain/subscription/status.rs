//! Subscription status state machine.
//!
//! Defines all possible subscription states and valid transitions
//! according to the paid-visibility lifecycle.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Subscription status.
///
/// Represents the current state of a provider's paid-visibility window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Created on provider request, awaiting a validated payment.
    /// The provider is not visible in search.
    Pending,

    /// A payment was validated (or an administrator activated directly).
    /// The provider is visible while the window lasts.
    Active,

    /// The validity window elapsed, or an abandoned pending request was
    /// cleaned up. Terminal: a lapsed provider must request a new
    /// subscription.
    Expired,
}

impl SubscriptionStatus {
    /// Returns true if this subscription still occupies its billing
    /// window for admission-control purposes.
    pub fn occupies_window(&self) -> bool {
        matches!(
            self,
            SubscriptionStatus::Pending | SubscriptionStatus::Active
        )
    }
}

impl StateMachine for SubscriptionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SubscriptionStatus::*;
        matches!(
            (self, target),
            (Pending, Active)
                // Abandonment cleanup only; the expiration sweep itself
                // never expires a pending subscription.
                | (Pending, Expired)
                | (Active, Expired)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SubscriptionStatus::*;
        match self {
            Pending => vec![Active, Expired],
            Active => vec![Expired],
            Expired => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_activate() {
        let status = SubscriptionStatus::Pending;
        assert_eq!(
            status.transition_to(SubscriptionStatus::Active),
            Ok(SubscriptionStatus::Active)
        );
    }

    #[test]
    fn active_can_expire() {
        let status = SubscriptionStatus::Active;
        assert_eq!(
            status.transition_to(SubscriptionStatus::Expired),
            Ok(SubscriptionStatus::Expired)
        );
    }

    #[test]
    fn pending_can_expire_for_abandonment_cleanup() {
        let status = SubscriptionStatus::Pending;
        assert!(status.can_transition_to(&SubscriptionStatus::Expired));
    }

    #[test]
    fn expired_is_terminal() {
        let status = SubscriptionStatus::Expired;
        assert!(status.is_terminal());
        assert!(status.transition_to(SubscriptionStatus::Active).is_err());
        assert!(status.transition_to(SubscriptionStatus::Pending).is_err());
    }

    #[test]
    fn active_cannot_go_back_to_pending() {
        assert!(!SubscriptionStatus::Active.can_transition_to(&SubscriptionStatus::Pending));
    }

    #[test]
    fn occupies_window_for_pending_and_active_only() {
        assert!(SubscriptionStatus::Pending.occupies_window());
        assert!(SubscriptionStatus::Active.occupies_window());
        assert!(!SubscriptionStatus::Expired.occupies_window());
    }

    #[test]
    fn valid_transitions_are_consistent_with_can_transition_to() {
        for status in [
            SubscriptionStatus::Pending,
            SubscriptionStatus::Active,
            SubscriptionStatus::Expired,
        ] {
            for valid_target in status.valid_transitions() {
                assert!(
                    status.can_transition_to(&valid_target),
                    "can_transition_to should return true for {:?} -> {:?}",
                    status,
                    valid_target
                );
            }
        }
    }
}
