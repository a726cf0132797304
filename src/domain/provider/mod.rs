//! Provider domain module.
//!
//! Providers offer services in the marketplace. Their public visibility
//! is gated on identity verification, an active subscription, declared
//! availability, and an enabled account.

mod aggregate;
mod verification;
mod visibility;

pub use aggregate::Provider;
pub use verification::VerificationStatus;
pub use visibility::VisibilitySnapshot;
