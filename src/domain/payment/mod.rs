//! Payment domain module.
//!
//! Declared payments attached to subscriptions, awaiting manual
//! validation by an administrator.

mod aggregate;
mod method;
mod status;

pub use aggregate::Payment;
pub use method::PaymentMethod;
pub use status::PaymentStatus;
