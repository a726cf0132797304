//! Subscription-engine error types.
//!
//! Errors surfaced by subscription, payment, and verification
//! operations.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | SubscriptionNotFound | 404 |
//! | PaymentNotFound | 404 |
//! | ProviderNotFound | 404 |
//! | PlanNotFound | 404 |
//! | DuplicateForPeriod | 409 |
//! | InvalidState | 409 |
//! | Forbidden | 403 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{
    ErrorCode, PaymentId, PlanId, ProviderId, SubscriptionId,
};

use super::SubscriptionKind;

/// Errors raised by the subscription engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// Subscription was not found.
    SubscriptionNotFound(SubscriptionId),

    /// Payment was not found.
    PaymentNotFound(PaymentId),

    /// Provider was not found.
    ProviderNotFound(ProviderId),

    /// Plan was not found or is inactive.
    PlanNotFound(PlanId),

    /// Admission control rejected the request: the provider already
    /// holds a pending or active subscription of this kind whose window
    /// overlaps the requested period.
    DuplicateForPeriod { kind: SubscriptionKind },

    /// Invalid state for the requested operation.
    InvalidState { current: String, attempted: String },

    /// Actor attempted to act on an entity it does not own.
    Forbidden { reason: String },

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl SubscriptionError {
    // Constructor functions for cleaner error creation

    pub fn subscription_not_found(id: SubscriptionId) -> Self {
        SubscriptionError::SubscriptionNotFound(id)
    }

    pub fn payment_not_found(id: PaymentId) -> Self {
        SubscriptionError::PaymentNotFound(id)
    }

    pub fn provider_not_found(id: ProviderId) -> Self {
        SubscriptionError::ProviderNotFound(id)
    }

    pub fn plan_not_found(id: PlanId) -> Self {
        SubscriptionError::PlanNotFound(id)
    }

    pub fn duplicate_for_period(kind: SubscriptionKind) -> Self {
        SubscriptionError::DuplicateForPeriod { kind }
    }

    pub fn invalid_state(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        SubscriptionError::InvalidState {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        SubscriptionError::Forbidden {
            reason: reason.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SubscriptionError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        SubscriptionError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            SubscriptionError::SubscriptionNotFound(_) => ErrorCode::SubscriptionNotFound,
            SubscriptionError::PaymentNotFound(_) => ErrorCode::PaymentNotFound,
            SubscriptionError::ProviderNotFound(_) => ErrorCode::ProviderNotFound,
            SubscriptionError::PlanNotFound(_) => ErrorCode::PlanNotFound,
            SubscriptionError::DuplicateForPeriod { .. } => ErrorCode::DuplicateSubscription,
            SubscriptionError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            SubscriptionError::Forbidden { .. } => ErrorCode::Forbidden,
            SubscriptionError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            SubscriptionError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            SubscriptionError::SubscriptionNotFound(id) => {
                format!("Subscription not found: {}", id)
            }
            SubscriptionError::PaymentNotFound(id) => format!("Payment not found: {}", id),
            SubscriptionError::ProviderNotFound(id) => format!("Provider not found: {}", id),
            SubscriptionError::PlanNotFound(id) => format!("Plan not found or inactive: {}", id),
            SubscriptionError::DuplicateForPeriod { kind } => format!(
                "You already have a pending or active {} subscription for the current period",
                kind.display_name()
            ),
            SubscriptionError::InvalidState { current, attempted } => {
                format!("Cannot {} subscription in {} state", attempted, current)
            }
            SubscriptionError::Forbidden { reason } => format!("Forbidden: {}", reason),
            SubscriptionError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            SubscriptionError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for SubscriptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SubscriptionError {}

impl From<crate::domain::foundation::DomainError> for SubscriptionError {
    fn from(err: crate::domain::foundation::DomainError) -> Self {
        match err.code {
            ErrorCode::SubscriptionNotFound
            | ErrorCode::PaymentNotFound
            | ErrorCode::ProviderNotFound
            | ErrorCode::PlanNotFound => SubscriptionError::Infrastructure(err.message),
            ErrorCode::ValidationFailed => SubscriptionError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => SubscriptionError::Infrastructure(err.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_message_names_the_kind() {
        let monthly = SubscriptionError::duplicate_for_period(SubscriptionKind::Monthly);
        assert!(monthly.message().contains("monthly"));

        let annual = SubscriptionError::duplicate_for_period(SubscriptionKind::Annual);
        assert!(annual.message().contains("annual"));
    }

    #[test]
    fn codes_are_distinct_per_category() {
        assert_eq!(
            SubscriptionError::duplicate_for_period(SubscriptionKind::Monthly).code(),
            ErrorCode::DuplicateSubscription
        );
        assert_eq!(
            SubscriptionError::forbidden("not yours").code(),
            ErrorCode::Forbidden
        );
        assert_eq!(
            SubscriptionError::subscription_not_found(SubscriptionId::new()).code(),
            ErrorCode::SubscriptionNotFound
        );
    }

    #[test]
    fn invalid_state_message_mentions_both_sides() {
        let err = SubscriptionError::invalid_state("Expired", "activate");
        assert_eq!(err.message(), "Cannot activate subscription in Expired state");
    }
}
