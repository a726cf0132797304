//! Shared domain primitives.
//!
//! Value objects, strongly-typed identifiers, and the error/state-machine
//! plumbing used by every other domain module.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AdminId, AuditEntryId, PaymentId, PlanId, ProviderId, SubscriptionId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
