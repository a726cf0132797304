//! Audit entries recording administrator decisions.
//!
//! Every manual decision that changes a payment, an identity review, or
//! a subscription is written to the audit trail inside the same
//! transaction as the change itself.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    AdminId, AuditEntryId, PaymentId, ProviderId, SubscriptionId, Timestamp,
};

/// The decision being recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditAction {
    PaymentApproved {
        payment_id: PaymentId,
        subscription_id: SubscriptionId,
        amount_cents: i64,
    },
    PaymentRejected {
        payment_id: PaymentId,
    },
    IdentityVerified {
        provider_id: ProviderId,
    },
    IdentityRejected {
        provider_id: ProviderId,
    },
    /// Administrator activated a subscription without a payment.
    SubscriptionActivated {
        subscription_id: SubscriptionId,
    },
}

impl AuditAction {
    /// Short machine-readable name, used as the indexed column.
    pub fn name(&self) -> &'static str {
        match self {
            AuditAction::PaymentApproved { .. } => "payment_approved",
            AuditAction::PaymentRejected { .. } => "payment_rejected",
            AuditAction::IdentityVerified { .. } => "identity_verified",
            AuditAction::IdentityRejected { .. } => "identity_rejected",
            AuditAction::SubscriptionActivated { .. } => "subscription_activated",
        }
    }
}

/// One immutable line in the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: AuditEntryId,
    pub admin_id: AdminId,
    pub action: AuditAction,
    /// Free-text justification, mandatory for rejections.
    pub reason: Option<String>,
    pub occurred_at: Timestamp,
}

impl AuditEntry {
    pub fn record(
        admin_id: AdminId,
        action: AuditAction,
        reason: Option<String>,
        occurred_at: Timestamp,
    ) -> Self {
        Self {
            id: AuditEntryId::new(),
            admin_id,
            action,
            reason,
            occurred_at,
        }
    }
}
