//! Payment status state machine.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Payment status.
///
/// Every declared payment starts pending and is resolved exactly once
/// by an administrator decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Declared by the provider, awaiting manual validation.
    Pending,

    /// Approved by an administrator. Terminal.
    Valid,

    /// Rejected by an administrator. Terminal.
    Rejected,
}

impl PaymentStatus {
    /// Returns true once an administrator has decided this payment.
    pub fn is_resolved(&self) -> bool {
        matches!(self, PaymentStatus::Valid | PaymentStatus::Rejected)
    }
}

impl StateMachine for PaymentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PaymentStatus::*;
        matches!((self, target), (Pending, Valid) | (Pending, Rejected))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PaymentStatus::*;
        match self {
            Pending => vec![Valid, Rejected],
            Valid | Rejected => vec![],
        }
    }
}
