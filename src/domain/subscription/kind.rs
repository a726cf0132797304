//! Subscription kind: the cadence of the visibility grant.

use serde::{Deserialize, Serialize};

/// Billing cadence of a subscription.
///
/// The kind determines the calendar window a subscription covers:
/// monthly subscriptions span a calendar month, annual ones a calendar
/// year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionKind {
    Monthly,
    Annual,
}

impl SubscriptionKind {
    /// Human-readable name, used in conflict messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            SubscriptionKind::Monthly => "monthly",
            SubscriptionKind::Annual => "annual",
        }
    }
}

impl std::fmt::Display for SubscriptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
