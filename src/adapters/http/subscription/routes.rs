//! Axum router configuration for provider-facing endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    declare_payment, get_current_subscription, get_visibility, list_plans, request_subscription,
    set_availability, SubscriptionAppState,
};

/// Create the provider-facing API router.
///
/// # Routes
///
/// - `GET /plans` - List plans open for subscription
/// - `POST /subscriptions` - Request a subscription for the current period
/// - `GET /subscriptions/current` - Get the current subscription with payments
/// - `POST /subscriptions/:id/payments` - Declare an out-of-band payment
/// - `PUT /availability` - Set the availability flag
/// - `GET /visibility` - Get the search-visibility snapshot
///
/// All routes except `GET /plans` require an authenticated provider.
pub fn subscription_router() -> Router<SubscriptionAppState> {
    Router::new()
        .route("/plans", get(list_plans))
        .route("/subscriptions", post(request_subscription))
        .route("/subscriptions/current", get(get_current_subscription))
        .route("/subscriptions/:id/payments", post(declare_payment))
        .route("/availability", put(set_availability))
        .route("/visibility", get(get_visibility))
}
