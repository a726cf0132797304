//! Identity verification state machine.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Identity verification status of a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// No identity documents submitted yet.
    Unverified,

    /// Documents submitted, awaiting an administrator decision.
    Pending,

    /// Identity confirmed by an administrator. Terminal.
    Verified,

    /// Documents rejected. The provider may resubmit.
    Rejected,
}

impl VerificationStatus {
    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationStatus::Verified)
    }
}

impl StateMachine for VerificationStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use VerificationStatus::*;
        matches!(
            (self, target),
            (Unverified, Pending)
                | (Pending, Verified)
                | (Pending, Rejected)
                // Resubmission after rejection.
                | (Rejected, Pending)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use VerificationStatus::*;
        match self {
            Unverified => vec![Pending],
            Pending => vec![Verified, Rejected],
            Verified => vec![],
            Rejected => vec![Pending],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_resolves_either_way() {
        let status = VerificationStatus::Pending;
        assert!(status.can_transition_to(&VerificationStatus::Verified));
        assert!(status.can_transition_to(&VerificationStatus::Rejected));
    }

    #[test]
    fn rejected_can_resubmit() {
        assert_eq!(
            VerificationStatus::Rejected.transition_to(VerificationStatus::Pending),
            Ok(VerificationStatus::Pending)
        );
    }

    #[test]
    fn verified_is_terminal() {
        assert!(VerificationStatus::Verified.is_terminal());
        assert!(VerificationStatus::Verified
            .transition_to(VerificationStatus::Pending)
            .is_err());
    }

    #[test]
    fn cannot_skip_review() {
        assert!(!VerificationStatus::Unverified.can_transition_to(&VerificationStatus::Verified));
        assert!(!VerificationStatus::Rejected.can_transition_to(&VerificationStatus::Verified));
    }
}
