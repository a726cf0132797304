//! Payment ledger and validation handlers.

mod declare_payment;
mod validate_payment;

pub use declare_payment::{DeclarePaymentCommand, DeclarePaymentHandler};
pub use validate_payment::{ValidatePaymentCommand, ValidatePaymentHandler};
