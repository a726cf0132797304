//! Axum router configuration for the admin back-office.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    activate_subscription, list_audit_trail, run_expiration_sweep, validate_payment,
    verify_identity, AdminAppState,
};

/// Create the admin API router.
///
/// # Routes
///
/// - `POST /payments/:id/validate` - Approve or reject a declared payment
/// - `POST /providers/:id/verify` - Decide on identity documents
/// - `POST /subscriptions/:id/activate` - Activate without a validated payment
/// - `POST /subscriptions/sweep` - Run the expiration sweep out of schedule
/// - `GET /audit` - List recent admin decisions
///
/// All routes require an authenticated administrator.
pub fn admin_router() -> Router<AdminAppState> {
    Router::new()
        .route("/payments/:id/validate", post(validate_payment))
        .route("/providers/:id/verify", post(verify_identity))
        .route("/subscriptions/:id/activate", post(activate_subscription))
        .route("/subscriptions/sweep", post(run_expiration_sweep))
        .route("/audit", get(list_audit_trail))
}
