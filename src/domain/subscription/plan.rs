//! Subscription plans: priced offerings providers can subscribe to.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::PlanId;

use super::SubscriptionKind;

/// A priced subscription offering.
///
/// Immutable reference data. A subscription may reference a plan for its
/// price or carry an ad-hoc price set by an administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    pub id: PlanId,
    pub name: String,
    pub kind: SubscriptionKind,
    /// Price in cents. Monetary values are never floats.
    pub price_cents: i64,
    /// Inactive plans are kept for historical subscriptions but are not
    /// offered to providers.
    pub active: bool,
}

impl SubscriptionPlan {
    pub fn new(
        id: PlanId,
        name: impl Into<String>,
        kind: SubscriptionKind,
        price_cents: i64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            price_cents,
            active: true,
        }
    }
}
