//! String codecs between domain enums and their database columns.

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::payment::{PaymentMethod, PaymentStatus};
use crate::domain::provider::VerificationStatus;
use crate::domain::subscription::{SubscriptionKind, SubscriptionStatus};

fn invalid(column: &str, value: &str) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid {} value: {}", column, value),
    )
}

pub(crate) fn kind_to_string(kind: &SubscriptionKind) -> &'static str {
    match kind {
        SubscriptionKind::Monthly => "monthly",
        SubscriptionKind::Annual => "annual",
    }
}

pub(crate) fn parse_kind(s: &str) -> Result<SubscriptionKind, DomainError> {
    match s {
        "monthly" => Ok(SubscriptionKind::Monthly),
        "annual" => Ok(SubscriptionKind::Annual),
        _ => Err(invalid("kind", s)),
    }
}

pub(crate) fn subscription_status_to_string(status: &SubscriptionStatus) -> &'static str {
    match status {
        SubscriptionStatus::Pending => "pending",
        SubscriptionStatus::Active => "active",
        SubscriptionStatus::Expired => "expired",
    }
}

pub(crate) fn parse_subscription_status(s: &str) -> Result<SubscriptionStatus, DomainError> {
    match s {
        "pending" => Ok(SubscriptionStatus::Pending),
        "active" => Ok(SubscriptionStatus::Active),
        "expired" => Ok(SubscriptionStatus::Expired),
        _ => Err(invalid("status", s)),
    }
}

pub(crate) fn payment_status_to_string(status: &PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Pending => "pending",
        PaymentStatus::Valid => "valid",
        PaymentStatus::Rejected => "rejected",
    }
}

pub(crate) fn parse_payment_status(s: &str) -> Result<PaymentStatus, DomainError> {
    match s {
        "pending" => Ok(PaymentStatus::Pending),
        "valid" => Ok(PaymentStatus::Valid),
        "rejected" => Ok(PaymentStatus::Rejected),
        _ => Err(invalid("status", s)),
    }
}

pub(crate) fn payment_method_to_string(method: &PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::InstantTransfer => "instant_transfer",
        PaymentMethod::BankTransfer => "bank_transfer",
        PaymentMethod::Cash => "cash",
        PaymentMethod::Cheque => "cheque",
    }
}

pub(crate) fn parse_payment_method(s: &str) -> Result<PaymentMethod, DomainError> {
    match s {
        "instant_transfer" => Ok(PaymentMethod::InstantTransfer),
        "bank_transfer" => Ok(PaymentMethod::BankTransfer),
        "cash" => Ok(PaymentMethod::Cash),
        "cheque" => Ok(PaymentMethod::Cheque),
        _ => Err(invalid("method", s)),
    }
}

pub(crate) fn verification_to_string(status: &VerificationStatus) -> &'static str {
    match status {
        VerificationStatus::Unverified => "unverified",
        VerificationStatus::Pending => "pending",
        VerificationStatus::Verified => "verified",
        VerificationStatus::Rejected => "rejected",
    }
}

pub(crate) fn parse_verification(s: &str) -> Result<VerificationStatus, DomainError> {
    match s {
        "unverified" => Ok(VerificationStatus::Unverified),
        "pending" => Ok(VerificationStatus::Pending),
        "verified" => Ok(VerificationStatus::Verified),
        "rejected" => Ok(VerificationStatus::Rejected),
        _ => Err(invalid("verification_status", s)),
    }
}
