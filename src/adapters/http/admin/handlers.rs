//! HTTP handlers for the admin back-office.
//!
//! These handlers connect Axum routes to application layer command handlers.
//! All endpoints require an authenticated administrator.

use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::payment::{ValidatePaymentCommand, ValidatePaymentHandler};
use crate::application::handlers::provider::{VerifyIdentityCommand, VerifyIdentityHandler};
use crate::application::handlers::subscription::{
    ActivateSubscriptionCommand, ActivateSubscriptionHandler, ExpireSubscriptionsCommand,
    ExpireSubscriptionsHandler,
};
use crate::domain::foundation::{AdminId, PaymentId, ProviderId, SubscriptionId, Timestamp};
use crate::domain::subscription::SubscriptionError;
use crate::ports::{
    AuditLog, CacheStore, DecisionStore, PaymentRepository, ProviderRepository,
    SubscriptionRepository,
};

use super::dto::{
    ActivateSubscriptionRequest, ActivatedSubscriptionResponse, AuditEntryResponse, AuditQuery,
    AuditTrailResponse, ErrorResponse, ProviderDecisionResponse, SweepResponse,
    ValidatePaymentRequest, ValidatedPaymentResponse, VerifyIdentityRequest,
};

/// Default page size for the audit trail listing.
const DEFAULT_AUDIT_LIMIT: u32 = 50;

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the admin API.
#[derive(Clone)]
pub struct AdminAppState {
    pub subscription_repository: Arc<dyn SubscriptionRepository>,
    pub provider_repository: Arc<dyn ProviderRepository>,
    pub payment_repository: Arc<dyn PaymentRepository>,
    pub decision_store: Arc<dyn DecisionStore>,
    pub cache_store: Arc<dyn CacheStore>,
    pub audit_log: Arc<dyn AuditLog>,
    /// TTL for abandoning stale pending subscriptions in manual sweeps.
    pub pending_ttl_days: Option<u32>,
}

impl AdminAppState {
    /// Create handlers on demand from the shared state.
    pub fn validate_payment_handler(&self) -> ValidatePaymentHandler {
        ValidatePaymentHandler::new(
            self.payment_repository.clone(),
            self.subscription_repository.clone(),
            self.provider_repository.clone(),
            self.decision_store.clone(),
            self.cache_store.clone(),
        )
    }

    pub fn verify_identity_handler(&self) -> VerifyIdentityHandler {
        VerifyIdentityHandler::new(
            self.provider_repository.clone(),
            self.decision_store.clone(),
            self.cache_store.clone(),
        )
    }

    pub fn activate_subscription_handler(&self) -> ActivateSubscriptionHandler {
        ActivateSubscriptionHandler::new(
            self.subscription_repository.clone(),
            self.provider_repository.clone(),
            self.decision_store.clone(),
            self.cache_store.clone(),
        )
    }

    pub fn expire_subscriptions_handler(&self) -> ExpireSubscriptionsHandler {
        ExpireSubscriptionsHandler::new(
            self.subscription_repository.clone(),
            self.provider_repository.clone(),
            self.decision_store.clone(),
            self.cache_store.clone(),
            self.pending_ttl_days,
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Admin Context (would come from auth middleware in production)
// ════════════════════════════════════════════════════════════════════════════════

/// Authenticated administrator context extracted from the request.
///
/// In production, this would be extracted from JWT/session by auth
/// middleware with a role check. For now, uses a header-based extraction
/// for development/testing.
#[derive(Debug, Clone)]
pub struct AuthenticatedAdmin {
    pub admin_id: AdminId,
}

/// Rejection type for AuthenticatedAdmin extraction.
pub struct AdminAuthenticationRequired;

impl IntoResponse for AdminAuthenticationRequired {
    fn into_response(self) -> axum::response::Response {
        let error = ErrorResponse::new(
            "AUTHENTICATION_REQUIRED",
            "Administrator authentication is required",
        );
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

impl<S> axum::extract::FromRequestParts<S> for AuthenticatedAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminAuthenticationRequired;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            // In production, this would validate a JWT token and check the
            // admin role. For development, we accept an X-Admin-Id header.
            let admin_id = parts
                .headers
                .get("X-Admin-Id")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<AdminId>().ok())
                .ok_or(AdminAuthenticationRequired)?;

            Ok(AuthenticatedAdmin { admin_id })
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/admin/payments/:id/validate - Approve or reject a payment
pub async fn validate_payment(
    State(state): State<AdminAppState>,
    admin: AuthenticatedAdmin,
    Path(payment_id): Path<String>,
    Json(request): Json<ValidatePaymentRequest>,
) -> Result<impl IntoResponse, AdminApiError> {
    let payment_id = payment_id
        .parse::<PaymentId>()
        .map_err(|_| SubscriptionError::validation("payment_id", "Malformed identifier"))?;

    let handler = state.validate_payment_handler();
    let cmd = ValidatePaymentCommand {
        admin_id: admin.admin_id,
        payment_id,
        approve: request.approve,
        reason: request.reason,
    };

    let payment = handler.handle(cmd).await?;

    Ok(Json(ValidatedPaymentResponse::from(payment)))
}

/// POST /api/admin/providers/:id/verify - Decide on identity documents
pub async fn verify_identity(
    State(state): State<AdminAppState>,
    admin: AuthenticatedAdmin,
    Path(provider_id): Path<String>,
    Json(request): Json<VerifyIdentityRequest>,
) -> Result<impl IntoResponse, AdminApiError> {
    let provider_id = provider_id
        .parse::<ProviderId>()
        .map_err(|_| SubscriptionError::validation("provider_id", "Malformed identifier"))?;

    let handler = state.verify_identity_handler();
    let cmd = VerifyIdentityCommand {
        admin_id: admin.admin_id,
        provider_id,
        approve: request.approve,
        reason: request.reason,
    };

    let provider = handler.handle(cmd).await?;

    Ok(Json(ProviderDecisionResponse::from(provider)))
}

/// POST /api/admin/subscriptions/:id/activate - Activate without payment
pub async fn activate_subscription(
    State(state): State<AdminAppState>,
    admin: AuthenticatedAdmin,
    Path(subscription_id): Path<String>,
    Json(request): Json<ActivateSubscriptionRequest>,
) -> Result<impl IntoResponse, AdminApiError> {
    let subscription_id = subscription_id
        .parse::<SubscriptionId>()
        .map_err(|_| SubscriptionError::validation("subscription_id", "Malformed identifier"))?;

    let handler = state.activate_subscription_handler();
    let cmd = ActivateSubscriptionCommand {
        admin_id: admin.admin_id,
        subscription_id,
        reason: request.reason,
    };

    let subscription = handler.handle(cmd).await?;

    Ok(Json(ActivatedSubscriptionResponse::from(subscription)))
}

/// POST /api/admin/subscriptions/sweep - Run the expiration sweep now
///
/// Same operation the scheduler runs on its timer. Safe to trigger while
/// a scheduled run is in flight; already-expired rows are no-ops.
pub async fn run_expiration_sweep(
    State(state): State<AdminAppState>,
    _admin: AuthenticatedAdmin,
) -> Result<impl IntoResponse, AdminApiError> {
    let handler = state.expire_subscriptions_handler();
    let outcome = handler
        .handle(ExpireSubscriptionsCommand {
            now: Timestamp::now(),
        })
        .await?;

    Ok(Json(SweepResponse::from(outcome)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/admin/audit - List recent admin decisions
pub async fn list_audit_trail(
    State(state): State<AdminAppState>,
    _admin: AuthenticatedAdmin,
    Query(query): Query<AuditQuery>,
) -> Result<impl IntoResponse, AdminApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_AUDIT_LIMIT);
    let entries = state.audit_log.list_recent(limit).await?;

    let response = AuditTrailResponse {
        entries: entries.into_iter().map(AuditEntryResponse::from).collect(),
    };

    Ok(Json(response))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts domain errors to HTTP responses.
#[derive(Debug)]
pub struct AdminApiError(SubscriptionError);

impl From<SubscriptionError> for AdminApiError {
    fn from(err: SubscriptionError) -> Self {
        Self(err)
    }
}

impl From<crate::domain::foundation::DomainError> for AdminApiError {
    fn from(err: crate::domain::foundation::DomainError) -> Self {
        Self(SubscriptionError::from(err))
    }
}

impl IntoResponse for AdminApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = match &self.0 {
            SubscriptionError::SubscriptionNotFound(_) => {
                (StatusCode::NOT_FOUND, "SUBSCRIPTION_NOT_FOUND")
            }
            SubscriptionError::PaymentNotFound(_) => (StatusCode::NOT_FOUND, "PAYMENT_NOT_FOUND"),
            SubscriptionError::ProviderNotFound(_) => (StatusCode::NOT_FOUND, "PROVIDER_NOT_FOUND"),
            SubscriptionError::PlanNotFound(_) => (StatusCode::NOT_FOUND, "PLAN_NOT_FOUND"),
            SubscriptionError::DuplicateForPeriod { .. } => {
                (StatusCode::CONFLICT, "DUPLICATE_SUBSCRIPTION")
            }
            SubscriptionError::InvalidState { .. } => {
                (StatusCode::CONFLICT, "INVALID_STATE_TRANSITION")
            }
            SubscriptionError::Forbidden { .. } => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            SubscriptionError::ValidationFailed { .. } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_FAILED")
            }
            SubscriptionError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let message = self.0.message();
        let body = ErrorResponse::new(error_code, message);
        (status, Json(body)).into_response()
    }
}
