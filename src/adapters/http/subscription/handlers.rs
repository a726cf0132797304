//! HTTP handlers for provider-facing endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::payment::{DeclarePaymentCommand, DeclarePaymentHandler};
use crate::application::handlers::provider::{
    GetVisibilityHandler, GetVisibilityQuery, SetAvailabilityCommand, SetAvailabilityHandler,
};
use crate::application::handlers::subscription::{
    GetCurrentSubscriptionHandler, GetCurrentSubscriptionQuery, ListPlansHandler,
    RequestSubscriptionCommand, RequestSubscriptionHandler,
};
use crate::domain::foundation::{ProviderId, SubscriptionId, Timestamp};
use crate::domain::subscription::SubscriptionError;
use crate::ports::{
    CacheStore, PaymentRepository, PlanRepository, ProviderRepository, SubscriptionReader,
    SubscriptionRepository,
};

use super::dto::{
    AvailabilityResponse, CurrentSubscriptionResponse, DeclarePaymentRequest, ErrorResponse,
    PaymentResponse, PlanResponse, PlansResponse, RequestSubscriptionRequest,
    SetAvailabilityRequest, SubscriptionResponse, SubscriptionViewResponse, VisibilityResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// This struct is cloned for each request and contains Arc-wrapped dependencies
/// for efficient sharing across handlers.
#[derive(Clone)]
pub struct SubscriptionAppState {
    pub subscription_repository: Arc<dyn SubscriptionRepository>,
    pub provider_repository: Arc<dyn ProviderRepository>,
    pub plan_repository: Arc<dyn PlanRepository>,
    pub payment_repository: Arc<dyn PaymentRepository>,
    pub subscription_reader: Arc<dyn SubscriptionReader>,
    pub cache_store: Arc<dyn CacheStore>,
    /// TTL for cached visibility snapshots, in seconds.
    pub visibility_cache_ttl_secs: u64,
}

impl SubscriptionAppState {
    /// Create handlers on demand from the shared state.
    pub fn request_subscription_handler(&self) -> RequestSubscriptionHandler {
        RequestSubscriptionHandler::new(
            self.subscription_repository.clone(),
            self.provider_repository.clone(),
            self.plan_repository.clone(),
        )
    }

    pub fn declare_payment_handler(&self) -> DeclarePaymentHandler {
        DeclarePaymentHandler::new(
            self.payment_repository.clone(),
            self.subscription_repository.clone(),
        )
    }

    pub fn current_subscription_handler(&self) -> GetCurrentSubscriptionHandler {
        GetCurrentSubscriptionHandler::new(self.subscription_reader.clone())
    }

    pub fn list_plans_handler(&self) -> ListPlansHandler {
        ListPlansHandler::new(self.plan_repository.clone())
    }

    pub fn set_availability_handler(&self) -> SetAvailabilityHandler {
        SetAvailabilityHandler::new(self.provider_repository.clone(), self.cache_store.clone())
    }

    pub fn get_visibility_handler(&self) -> GetVisibilityHandler {
        GetVisibilityHandler::new(
            self.provider_repository.clone(),
            self.cache_store.clone(),
            self.visibility_cache_ttl_secs,
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Provider Context (would come from auth middleware in production)
// ════════════════════════════════════════════════════════════════════════════════

/// Authenticated provider context extracted from the request.
///
/// In production, this would be extracted from JWT/session by auth middleware.
/// For now, uses a header-based extraction for development/testing.
#[derive(Debug, Clone)]
pub struct AuthenticatedProvider {
    pub provider_id: ProviderId,
}

/// Rejection type for AuthenticatedProvider extraction.
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> axum::response::Response {
        let error = ErrorResponse::new("AUTHENTICATION_REQUIRED", "Authentication is required");
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

impl<S> axum::extract::FromRequestParts<S> for AuthenticatedProvider
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

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
            // In production, this would validate a JWT token from the
            // Authorization header. For development, we accept an
            // X-Provider-Id header.
            let provider_id = parts
                .headers
                .get("X-Provider-Id")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<ProviderId>().ok())
                .ok_or(AuthenticationRequired)?;

            Ok(AuthenticatedProvider { provider_id })
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/plans - List plans open for subscription
pub async fn list_plans(
    State(state): State<SubscriptionAppState>,
) -> Result<impl IntoResponse, SubscriptionApiError> {
    let handler = state.list_plans_handler();
    let plans = handler.handle().await?;

    let response = PlansResponse {
        plans: plans.into_iter().map(PlanResponse::from).collect(),
    };

    Ok(Json(response))
}

/// GET /api/subscriptions/current - Get the provider's subscription for
/// the current billing period
pub async fn get_current_subscription(
    State(state): State<SubscriptionAppState>,
    provider: AuthenticatedProvider,
) -> Result<impl IntoResponse, SubscriptionApiError> {
    let handler = state.current_subscription_handler();
    let query = GetCurrentSubscriptionQuery {
        provider_id: provider.provider_id,
    };

    let result = handler.handle(query).await?;

    let response = CurrentSubscriptionResponse {
        subscription: result.map(SubscriptionViewResponse::from),
    };

    Ok(Json(response))
}

/// GET /api/visibility - Get the provider's search-visibility snapshot
pub async fn get_visibility(
    State(state): State<SubscriptionAppState>,
    provider: AuthenticatedProvider,
) -> Result<impl IntoResponse, SubscriptionApiError> {
    let handler = state.get_visibility_handler();
    let query = GetVisibilityQuery {
        provider_id: provider.provider_id,
    };

    let snapshot = handler.handle(query).await?;

    Ok(Json(VisibilityResponse::from(snapshot)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST/PUT endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/subscriptions - Request a subscription for the current period
pub async fn request_subscription(
    State(state): State<SubscriptionAppState>,
    provider: AuthenticatedProvider,
    Json(request): Json<RequestSubscriptionRequest>,
) -> Result<impl IntoResponse, SubscriptionApiError> {
    let handler = state.request_subscription_handler();
    let cmd = RequestSubscriptionCommand {
        provider_id: provider.provider_id,
        kind: request.kind,
        plan_id: request.plan_id,
        price_cents: request.price_cents,
        requested_at: Timestamp::now(),
    };

    let subscription = handler.handle(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubscriptionResponse::from(subscription)),
    ))
}

/// POST /api/subscriptions/:id/payments - Declare an out-of-band payment
pub async fn declare_payment(
    State(state): State<SubscriptionAppState>,
    provider: AuthenticatedProvider,
    Path(subscription_id): Path<String>,
    Json(request): Json<DeclarePaymentRequest>,
) -> Result<impl IntoResponse, SubscriptionApiError> {
    let subscription_id = subscription_id
        .parse::<SubscriptionId>()
        .map_err(|_| SubscriptionError::validation("subscription_id", "Malformed identifier"))?;

    let handler = state.declare_payment_handler();
    let cmd = DeclarePaymentCommand {
        provider_id: provider.provider_id,
        subscription_id,
        method: request.method,
        amount_cents: request.amount_cents,
        external_reference: request.external_reference,
        proof_reference: request.proof_reference,
    };

    let payment = handler.handle(cmd).await?;

    Ok((StatusCode::CREATED, Json(PaymentResponse::from(payment))))
}

/// PUT /api/availability - Set the provider's availability flag
pub async fn set_availability(
    State(state): State<SubscriptionAppState>,
    provider: AuthenticatedProvider,
    Json(request): Json<SetAvailabilityRequest>,
) -> Result<impl IntoResponse, SubscriptionApiError> {
    let handler = state.set_availability_handler();
    let cmd = SetAvailabilityCommand {
        provider_id: provider.provider_id,
        available: request.available,
    };

    let updated = handler.handle(cmd).await?;

    Ok(Json(AvailabilityResponse::from(updated)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts domain errors to HTTP responses.
#[derive(Debug)]
pub struct SubscriptionApiError(SubscriptionError);

impl From<SubscriptionError> for SubscriptionApiError {
    fn from(err: SubscriptionError) -> Self {
        Self(err)
    }
}

impl From<crate::domain::foundation::DomainError> for SubscriptionApiError {
    fn from(err: crate::domain::foundation::DomainError) -> Self {
        Self(SubscriptionError::from(err))
    }
}

impl IntoResponse for SubscriptionApiError {
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

        // Use the error's built-in message() method for consistent messaging
        let message = self.0.message();
        let body = ErrorResponse::new(error_code, message);
        (status, Json(body)).into_response()
    }
}
