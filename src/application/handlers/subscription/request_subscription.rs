//! RequestSubscriptionHandler - Command handler for subscription admission.

use std::sync::Arc;

use crate::domain::foundation::{PlanId, ProviderId, SubscriptionId, Timestamp};
use crate::domain::subscription::{Subscription, SubscriptionError, SubscriptionKind};
use crate::ports::{InsertOutcome, PlanRepository, ProviderRepository, SubscriptionRepository};

/// Command to request a new subscription for the current period.
#[derive(Debug, Clone)]
pub struct RequestSubscriptionCommand {
    pub provider_id: ProviderId,
    pub kind: SubscriptionKind,
    /// Plan to take the price from. Takes precedence over the ad-hoc
    /// price when both are given.
    pub plan_id: Option<PlanId>,
    /// Ad-hoc price in cents for plan-less subscriptions.
    pub price_cents: Option<i64>,
    /// Reference time that selects the billing window.
    pub requested_at: Timestamp,
}

/// Handler for subscription requests.
///
/// Admission control lives in the repository: the overlap check and the
/// insert are one atomic operation, so two concurrent requests for the
/// same window cannot both be admitted.
pub struct RequestSubscriptionHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    providers: Arc<dyn ProviderRepository>,
    plans: Arc<dyn PlanRepository>,
}

impl RequestSubscriptionHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        providers: Arc<dyn ProviderRepository>,
        plans: Arc<dyn PlanRepository>,
    ) -> Self {
        Self {
            subscriptions,
            providers,
            plans,
        }
    }

    pub async fn handle(
        &self,
        cmd: RequestSubscriptionCommand,
    ) -> Result<Subscription, SubscriptionError> {
        // 1. The provider must exist and have an enabled account
        let provider = self
            .providers
            .find_by_id(cmd.provider_id)
            .await?
            .ok_or(SubscriptionError::ProviderNotFound(cmd.provider_id))?;
        if !provider.account_active {
            return Err(SubscriptionError::forbidden("account is disabled"));
        }

        // 2. Resolve the price: from the plan when one is named, else
        //    from the explicit override
        let (plan_id, price_cents) = match cmd.plan_id {
            Some(plan_id) => {
                let plan = self
                    .plans
                    .find_by_id(plan_id)
                    .await?
                    .filter(|p| p.active)
                    .ok_or(SubscriptionError::PlanNotFound(plan_id))?;
                if plan.kind != cmd.kind {
                    return Err(SubscriptionError::validation(
                        "plan_id",
                        "plan cadence does not match the requested kind",
                    ));
                }
                (Some(plan.id), plan.price_cents)
            }
            None => match cmd.price_cents {
                Some(price) if price > 0 => (None, price),
                Some(_) => {
                    return Err(SubscriptionError::validation(
                        "price_cents",
                        "price must be positive",
                    ))
                }
                None => {
                    return Err(SubscriptionError::validation(
                        "price_cents",
                        "either plan_id or price_cents is required",
                    ))
                }
            },
        };

        // 3. Build the pending subscription for the current window
        let subscription = Subscription::request(
            SubscriptionId::new(),
            cmd.provider_id,
            cmd.kind,
            plan_id,
            price_cents,
            cmd.requested_at,
        );

        // 4. Admit atomically
        match self
            .subscriptions
            .insert_unless_overlapping(&subscription)
            .await?
        {
            InsertOutcome::Inserted => Ok(subscription),
            InsertOutcome::Conflict => Err(SubscriptionError::duplicate_for_period(cmd.kind)),
        }
    }
}
