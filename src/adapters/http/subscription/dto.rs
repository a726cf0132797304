//! HTTP DTOs (Data Transfer Objects) for provider-facing endpoints.
//!
//! These types define the JSON request/response structure for the
//! subscription API. They serve as the boundary between HTTP and the
//! application layer.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::PlanId;
use crate::domain::payment::{Payment, PaymentMethod, PaymentStatus};
use crate::domain::provider::{Provider, VisibilitySnapshot};
use crate::domain::subscription::{
    Subscription, SubscriptionKind, SubscriptionPlan, SubscriptionStatus,
};
use crate::ports::{PaymentView, SubscriptionView};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to open a subscription for the current billing period.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestSubscriptionRequest {
    /// Billing cadence (monthly or annual).
    pub kind: SubscriptionKind,
    /// Specific plan to subscribe to. Takes precedence over the ad-hoc
    /// price when both are given.
    #[serde(default)]
    pub plan_id: Option<PlanId>,
    /// Ad-hoc price in cents for plan-less subscriptions.
    #[serde(default)]
    pub price_cents: Option<i64>,
}

/// Request to declare an out-of-band payment for a subscription.
#[derive(Debug, Clone, Deserialize)]
pub struct DeclarePaymentRequest {
    /// How the money was sent.
    pub method: PaymentMethod,
    /// Declared amount in cents.
    pub amount_cents: i64,
    /// Bank or transfer reference, when the method produces one.
    #[serde(default)]
    pub external_reference: Option<String>,
    /// Pointer to an uploaded proof document.
    #[serde(default)]
    pub proof_reference: Option<String>,
}

/// Request to flip the provider's availability flag.
#[derive(Debug, Clone, Deserialize)]
pub struct SetAvailabilityRequest {
    pub available: bool,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// A subscription as returned after a state-changing call.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionResponse {
    pub id: String,
    pub kind: SubscriptionKind,
    pub status: SubscriptionStatus,
    /// Start of the billing window (ISO 8601).
    pub window_start: String,
    /// End of the billing window (ISO 8601).
    pub window_end: String,
    pub price_cents: i64,
    pub created_at: String,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(subscription: Subscription) -> Self {
        Self {
            id: subscription.id.to_string(),
            kind: subscription.kind,
            status: subscription.status,
            window_start: subscription.window.start.as_datetime().to_rfc3339(),
            window_end: subscription.window.end.as_datetime().to_rfc3339(),
            price_cents: subscription.price_cents,
            created_at: subscription.created_at.as_datetime().to_rfc3339(),
        }
    }
}

/// Wrapper for the current-subscription query, null when the provider
/// has no live subscription for the period.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentSubscriptionResponse {
    pub subscription: Option<SubscriptionViewResponse>,
}

/// Detailed subscription view including its payment history.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionViewResponse {
    pub id: String,
    pub kind: SubscriptionKind,
    pub status: SubscriptionStatus,
    pub window_start: String,
    pub window_end: String,
    pub price_cents: i64,
    pub payments: Vec<PaymentViewResponse>,
}

impl From<SubscriptionView> for SubscriptionViewResponse {
    fn from(view: SubscriptionView) -> Self {
        Self {
            id: view.id.to_string(),
            kind: view.kind,
            status: view.status,
            window_start: view.window_start.as_datetime().to_rfc3339(),
            window_end: view.window_end.as_datetime().to_rfc3339(),
            price_cents: view.price_cents,
            payments: view
                .payments
                .into_iter()
                .map(PaymentViewResponse::from)
                .collect(),
        }
    }
}

/// A declared payment within a subscription view.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentViewResponse {
    pub id: String,
    pub method: PaymentMethod,
    pub amount_cents: i64,
    pub status: PaymentStatus,
    pub declared_at: String,
    pub validated_at: Option<String>,
}

impl From<PaymentView> for PaymentViewResponse {
    fn from(view: PaymentView) -> Self {
        Self {
            id: view.id.to_string(),
            method: view.method,
            amount_cents: view.amount_cents,
            status: view.status,
            declared_at: view.declared_at.as_datetime().to_rfc3339(),
            validated_at: view.validated_at.map(|t| t.as_datetime().to_rfc3339()),
        }
    }
}

/// A payment as returned after declaration.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentResponse {
    pub id: String,
    pub subscription_id: String,
    pub method: PaymentMethod,
    pub amount_cents: i64,
    pub status: PaymentStatus,
    pub declared_at: String,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id.to_string(),
            subscription_id: payment.subscription_id.to_string(),
            method: payment.method,
            amount_cents: payment.amount_cents,
            status: payment.status,
            declared_at: payment.declared_at.as_datetime().to_rfc3339(),
        }
    }
}

/// A plan available for subscription.
#[derive(Debug, Clone, Serialize)]
pub struct PlanResponse {
    pub id: String,
    pub name: String,
    pub kind: SubscriptionKind,
    pub price_cents: i64,
}

impl From<SubscriptionPlan> for PlanResponse {
    fn from(plan: SubscriptionPlan) -> Self {
        Self {
            id: plan.id.to_string(),
            name: plan.name,
            kind: plan.kind,
            price_cents: plan.price_cents,
        }
    }
}

/// List of plans currently offered.
#[derive(Debug, Clone, Serialize)]
pub struct PlansResponse {
    pub plans: Vec<PlanResponse>,
}

/// Result of an availability change.
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityResponse {
    pub provider_id: String,
    pub available: bool,
}

impl From<Provider> for AvailabilityResponse {
    fn from(provider: Provider) -> Self {
        Self {
            provider_id: provider.id.to_string(),
            available: provider.available,
        }
    }
}

/// Search-visibility snapshot with the individual gates spelled out.
#[derive(Debug, Clone, Serialize)]
pub struct VisibilityResponse {
    pub provider_id: String,
    pub visible: bool,
    pub identity_verified: bool,
    pub subscription_active: bool,
    pub available: bool,
    pub account_active: bool,
}

impl From<VisibilitySnapshot> for VisibilityResponse {
    fn from(snapshot: VisibilitySnapshot) -> Self {
        Self {
            provider_id: snapshot.provider_id.to_string(),
            visible: snapshot.visible,
            identity_verified: snapshot.identity_verified,
            subscription_active: snapshot.subscription_active,
            available: snapshot.available,
            account_active: snapshot.account_active,
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
    use crate::domain::foundation::{PlanId, ProviderId, SubscriptionId, Timestamp};

    #[test]
    fn subscription_response_serializes_window_as_rfc3339() {
        let now = Timestamp::parse_rfc3339("2026-03-10T12:00:00Z").unwrap();
        let subscription = Subscription::request(
            SubscriptionId::new(),
            ProviderId::new(),
            SubscriptionKind::Monthly,
            Some(PlanId::new()),
            2500,
            now,
        );

        let response = SubscriptionResponse::from(subscription);
        assert_eq!(response.window_start, "2026-03-01T00:00:00+00:00");
        assert_eq!(response.window_end, "2026-03-31T23:59:59+00:00");
        assert_eq!(response.price_cents, 2500);
    }

    #[test]
    fn request_deserializes_without_plan_id() {
        let request: RequestSubscriptionRequest =
            serde_json::from_str(r#"{"kind": "monthly"}"#).unwrap();
        assert_eq!(request.kind, SubscriptionKind::Monthly);
        assert!(request.plan_id.is_none());
        assert!(request.price_cents.is_none());
    }

    #[test]
    fn request_deserializes_ad_hoc_price() {
        let request: RequestSubscriptionRequest =
            serde_json::from_str(r#"{"kind": "annual", "price_cents": 20000}"#).unwrap();
        assert_eq!(request.kind, SubscriptionKind::Annual);
        assert_eq!(request.price_cents, Some(20_000));
    }

    #[test]
    fn declare_payment_request_accepts_optional_references() {
        let request: DeclarePaymentRequest = serde_json::from_str(
            r#"{"method": "bank_transfer", "amount_cents": 2500, "external_reference": "TRX-1"}"#,
        )
        .unwrap();
        assert_eq!(request.method, PaymentMethod::BankTransfer);
        assert_eq!(request.external_reference.as_deref(), Some("TRX-1"));
        assert!(request.proof_reference.is_none());
    }
}
