//! Subscription plan repository port.
//!
//! Plans are reference data. Reads only; plan administration happens
//! through migrations or back-office tooling.

use crate::domain::foundation::{DomainError, PlanId};
use crate::domain::subscription::SubscriptionPlan;
use async_trait::async_trait;

/// Repository port for subscription plans.
#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// List plans currently offered to providers, cheapest first.
    async fn list_active(&self) -> Result<Vec<SubscriptionPlan>, DomainError>;

    /// Find a plan by its ID, active or not.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: PlanId) -> Result<Option<SubscriptionPlan>, DomainError>;
}
