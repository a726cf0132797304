//! ValidatePaymentHandler - Command handler for the administrator's
//! payment decision.
//!
//! Approval and rejection share one handler because they share the
//! lookup, the idempotence rule, and the audit plumbing. The two
//! branches diverge only at commit time.

use std::sync::Arc;

use crate::domain::audit::{AuditAction, AuditEntry};
use crate::domain::foundation::{AdminId, PaymentId, Timestamp};
use crate::domain::payment::{Payment, PaymentStatus};
use crate::domain::subscription::SubscriptionError;
use crate::ports::{
    CacheStore, DecisionStore, PaymentRepository, ProviderRepository, SubscriptionRepository,
};

use crate::application::handlers::visibility_cache::invalidate_visibility;

/// Recorded in the audit entry when the administrator gives no reason.
const FALLBACK_REASON: &str = "no reason provided";

/// Command to resolve a pending payment.
#[derive(Debug, Clone)]
pub struct ValidatePaymentCommand {
    pub admin_id: AdminId,
    pub payment_id: PaymentId,
    pub approve: bool,
    /// Audit justification. A fallback text is recorded when absent.
    pub reason: Option<String>,
}

/// Handler for payment validation.
///
/// On approval the payment, the subscription activation, the provider's
/// visibility flag, and the audit entry are committed in one
/// transaction through the decision store.
pub struct ValidatePaymentHandler {
    payments: Arc<dyn PaymentRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    providers: Arc<dyn ProviderRepository>,
    decisions: Arc<dyn DecisionStore>,
    cache: Arc<dyn CacheStore>,
}

impl ValidatePaymentHandler {
    pub fn new(
        payments: Arc<dyn PaymentRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        providers: Arc<dyn ProviderRepository>,
        decisions: Arc<dyn DecisionStore>,
        cache: Arc<dyn CacheStore>,
    ) -> Self {
        Self {
            payments,
            subscriptions,
            providers,
            decisions,
            cache,
        }
    }

    pub async fn handle(&self, cmd: ValidatePaymentCommand) -> Result<Payment, SubscriptionError> {
        let now = Timestamp::now();

        let mut payment = self
            .payments
            .find_by_id(cmd.payment_id)
            .await?
            .ok_or(SubscriptionError::PaymentNotFound(cmd.payment_id))?;

        // Replaying the same decision is a no-op; reversing a decision
        // is an error.
        if payment.status.is_resolved() {
            let same_decision = (cmd.approve && payment.status == PaymentStatus::Valid)
                || (!cmd.approve && payment.status == PaymentStatus::Rejected);
            if same_decision {
                return Ok(payment);
            }
            return Err(SubscriptionError::invalid_state(
                format!("{:?}", payment.status),
                "re-resolve",
            ));
        }

        let reason = cmd
            .reason
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_REASON.to_string());

        if cmd.approve {
            let mut subscription = self
                .subscriptions
                .find_by_id(payment.subscription_id)
                .await?
                .ok_or(SubscriptionError::SubscriptionNotFound(payment.subscription_id))?;
            let mut provider = self
                .providers
                .find_by_id(subscription.provider_id)
                .await?
                .ok_or(SubscriptionError::ProviderNotFound(subscription.provider_id))?;

            payment.approve(now)?;
            subscription.activate(now)?;
            provider.set_subscription_active(true, now);
            // Activation re-enables self-declared availability as a
            // convenience default; the provider can turn it back off.
            provider.set_available(true, now);

            let entry = AuditEntry::record(
                cmd.admin_id,
                AuditAction::PaymentApproved {
                    payment_id: payment.id,
                    subscription_id: subscription.id,
                    amount_cents: payment.amount_cents,
                },
                Some(reason),
                now,
            );

            self.decisions
                .commit_payment_approval(&payment, &subscription, &provider, &entry)
                .await?;

            invalidate_visibility(self.cache.as_ref(), &provider).await;
        } else {
            payment.reject(now)?;

            let entry = AuditEntry::record(
                cmd.admin_id,
                AuditAction::PaymentRejected {
                    payment_id: payment.id,
                },
                Some(reason),
                now,
            );

            self.decisions
                .commit_payment_rejection(&payment, &entry)
                .await?;
        }

        Ok(payment)
    }
}
