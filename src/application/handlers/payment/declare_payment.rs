//! DeclarePaymentHandler - Command handler for recording a declared
//! payment against a pending subscription.

use std::sync::Arc;

use crate::domain::foundation::{PaymentId, ProviderId, SubscriptionId, Timestamp};
use crate::domain::payment::{Payment, PaymentMethod};
use crate::domain::subscription::{SubscriptionError, SubscriptionStatus};
use crate::ports::{PaymentRepository, SubscriptionRepository};

/// Command to declare a payment.
#[derive(Debug, Clone)]
pub struct DeclarePaymentCommand {
    /// The authenticated provider declaring the payment.
    pub provider_id: ProviderId,
    pub subscription_id: SubscriptionId,
    pub method: PaymentMethod,
    pub amount_cents: i64,
    pub external_reference: Option<String>,
    pub proof_reference: Option<String>,
}

/// Handler for payment declarations.
///
/// A declaration is a claim, not a settlement. It lands in the pending
/// queue for manual validation; several declarations against one
/// subscription are allowed (a rejected claim can be followed by a
/// corrected one).
pub struct DeclarePaymentHandler {
    payments: Arc<dyn PaymentRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl DeclarePaymentHandler {
    pub fn new(
        payments: Arc<dyn PaymentRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
    ) -> Self {
        Self {
            payments,
            subscriptions,
        }
    }

    pub async fn handle(&self, cmd: DeclarePaymentCommand) -> Result<Payment, SubscriptionError> {
        let subscription = self
            .subscriptions
            .find_by_id(cmd.subscription_id)
            .await?
            .ok_or(SubscriptionError::SubscriptionNotFound(cmd.subscription_id))?;

        if subscription.provider_id != cmd.provider_id {
            return Err(SubscriptionError::forbidden(
                "subscription belongs to another provider",
            ));
        }

        if subscription.status != SubscriptionStatus::Pending {
            return Err(SubscriptionError::invalid_state(
                format!("{:?}", subscription.status),
                "declare a payment against",
            ));
        }

        let payment = Payment::declare(
            PaymentId::new(),
            subscription.id,
            cmd.provider_id,
            cmd.method,
            cmd.amount_cents,
            cmd.external_reference,
            cmd.proof_reference,
            Timestamp::now(),
        )?;

        self.payments.insert(&payment).await?;
        Ok(payment)
    }
}
