//! ListPlansHandler - Query handler for active subscription plans.

use std::sync::Arc;

use crate::domain::subscription::{SubscriptionError, SubscriptionPlan};
use crate::ports::PlanRepository;

/// Handler returning the plans currently offered to providers.
pub struct ListPlansHandler {
    plans: Arc<dyn PlanRepository>,
}

impl ListPlansHandler {
    pub fn new(plans: Arc<dyn PlanRepository>) -> Self {
        Self { plans }
    }

    pub async fn handle(&self) -> Result<Vec<SubscriptionPlan>, SubscriptionError> {
        Ok(self.plans.list_active().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::MockPlanRepo;
    use crate::domain::foundation::PlanId;
    use crate::domain::subscription::SubscriptionKind;

    #[tokio::test]
    async fn lists_only_active_plans() {
        let active = SubscriptionPlan::new(PlanId::new(), "Monthly", SubscriptionKind::Monthly, 2_500);
        let mut retired =
            SubscriptionPlan::new(PlanId::new(), "Legacy", SubscriptionKind::Monthly, 1_000);
        retired.active = false;
        let plans = Arc::new(MockPlanRepo::with(vec![active.clone(), retired]));

        let handler = ListPlansHandler::new(plans);
        let result = handler.handle().await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, active.id);
    }
}
