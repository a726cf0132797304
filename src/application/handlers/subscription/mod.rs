//! Subscription lifecycle handlers.

mod activate_subscription;
mod expire_subscriptions;
mod get_current_subscription;
mod list_plans;
mod request_subscription;

pub use activate_subscription::{ActivateSubscriptionCommand, ActivateSubscriptionHandler};
pub use expire_subscriptions::{
    ExpireSubscriptionsCommand, ExpireSubscriptionsHandler, SweepOutcome,
};
pub use get_current_subscription::{GetCurrentSubscriptionHandler, GetCurrentSubscriptionQuery};
pub use list_plans::ListPlansHandler;
pub use request_subscription::{RequestSubscriptionCommand, RequestSubscriptionHandler};
