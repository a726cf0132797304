//! Provider verification, availability, and visibility handlers.

mod get_visibility;
mod set_availability;
mod verify_identity;

pub use get_visibility::{GetVisibilityHandler, GetVisibilityQuery};
pub use set_availability::{SetAvailabilityCommand, SetAvailabilityHandler};
pub use verify_identity::{VerifyIdentityCommand, VerifyIdentityHandler};
