//! HTTP DTOs for the admin back-office endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::subscription::SweepOutcome;
use crate::domain::audit::{AuditAction, AuditEntry};
use crate::domain::payment::{Payment, PaymentMethod, PaymentStatus};
use crate::domain::provider::{Provider, VerificationStatus};
use crate::domain::subscription::{Subscription, SubscriptionKind, SubscriptionStatus};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Decision on a declared payment.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidatePaymentRequest {
    /// True to approve, false to reject.
    pub approve: bool,
    /// Justification for the audit trail. A fallback text is recorded
    /// when absent.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Decision on a provider's identity documents.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyIdentityRequest {
    /// True to verify, false to reject.
    pub approve: bool,
    /// Justification for the audit trail. A fallback text is recorded
    /// when absent.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Direct activation of a subscription without a validated payment.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivateSubscriptionRequest {
    /// Why the subscription is activated out of band.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Query parameters for the audit trail listing.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditQuery {
    /// Maximum number of entries to return, newest first.
    #[serde(default)]
    pub limit: Option<u32>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// A payment after an admin decision.
#[derive(Debug, Clone, Serialize)]
pub struct ValidatedPaymentResponse {
    pub id: String,
    pub subscription_id: String,
    pub method: PaymentMethod,
    pub amount_cents: i64,
    pub status: PaymentStatus,
    pub validated_at: Option<String>,
}

impl From<Payment> for ValidatedPaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id.to_string(),
            subscription_id: payment.subscription_id.to_string(),
            method: payment.method,
            amount_cents: payment.amount_cents,
            status: payment.status,
            validated_at: payment.validated_at.map(|t| t.as_datetime().to_rfc3339()),
        }
    }
}

/// A provider after an identity decision.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderDecisionResponse {
    pub id: String,
    pub display_name: String,
    pub verification_status: VerificationStatus,
    pub subscription_active: bool,
    pub available: bool,
    pub account_active: bool,
}

impl From<Provider> for ProviderDecisionResponse {
    fn from(provider: Provider) -> Self {
        Self {
            id: provider.id.to_string(),
            display_name: provider.display_name.clone(),
            verification_status: provider.verification_status,
            subscription_active: provider.subscription_active,
            available: provider.available,
            account_active: provider.account_active,
        }
    }
}

/// A subscription after a direct activation.
#[derive(Debug, Clone, Serialize)]
pub struct ActivatedSubscriptionResponse {
    pub id: String,
    pub provider_id: String,
    pub kind: SubscriptionKind,
    pub status: SubscriptionStatus,
    pub window_start: String,
    pub window_end: String,
}

impl From<Subscription> for ActivatedSubscriptionResponse {
    fn from(subscription: Subscription) -> Self {
        Self {
            id: subscription.id.to_string(),
            provider_id: subscription.provider_id.to_string(),
            kind: subscription.kind,
            status: subscription.status,
            window_start: subscription.window.start.as_datetime().to_rfc3339(),
            window_end: subscription.window.end.as_datetime().to_rfc3339(),
        }
    }
}

/// One recorded admin decision.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntryResponse {
    pub id: String,
    pub admin_id: String,
    /// The decision payload, tagged by kind.
    pub action: AuditAction,
    pub reason: Option<String>,
    pub occurred_at: String,
}

impl From<AuditEntry> for AuditEntryResponse {
    fn from(entry: AuditEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            admin_id: entry.admin_id.to_string(),
            action: entry.action,
            reason: entry.reason,
            occurred_at: entry.occurred_at.as_datetime().to_rfc3339(),
        }
    }
}

/// Audit trail listing, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct AuditTrailResponse {
    pub entries: Vec<AuditEntryResponse>,
}

/// Counts from a manually triggered expiration sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweepResponse {
    pub expired: usize,
    pub abandoned: usize,
    pub skipped: usize,
}

impl From<SweepOutcome> for SweepResponse {
    fn from(outcome: SweepOutcome) -> Self {
        Self {
            expired: outcome.expired,
            abandoned: outcome.abandoned,
            skipped: outcome.skipped,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error DTO
// ════════════════════════════════════════════════════════════════════════════════

/// Standard error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{AdminId, PaymentId, SubscriptionId, Timestamp};

    #[test]
    fn audit_entry_serializes_action_with_kind_tag() {
        let entry = AuditEntry::record(
            AdminId::new(),
            AuditAction::PaymentApproved {
                payment_id: PaymentId::new(),
                subscription_id: SubscriptionId::new(),
                amount_cents: 2500,
            },
            None,
            Timestamp::now(),
        );

        let response = AuditEntryResponse::from(entry);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["action"]["kind"], "payment_approved");
        assert_eq!(json["action"]["amount_cents"], 2500);
    }

    #[test]
    fn validate_payment_request_defaults_reason_to_none() {
        let request: ValidatePaymentRequest = serde_json::from_str(r#"{"approve": true}"#).unwrap();
        assert!(request.approve);
        assert!(request.reason.is_none());
    }
}
