//! Subscription lifecycle and billing periods.
//!
//! A subscription is a priced, time-boxed grant of search visibility for
//! a provider. Admission control guarantees at most one pending-or-active
//! subscription per provider and kind for any billing window.

mod aggregate;
mod errors;
mod kind;
mod period;
mod plan;
mod status;

pub use aggregate::Subscription;
pub use errors::SubscriptionError;
pub use kind::SubscriptionKind;
pub use period::BillingWindow;
pub use plan::SubscriptionPlan;
pub use status::SubscriptionStatus;
