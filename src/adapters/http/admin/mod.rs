//! Admin back-office HTTP endpoints.
//!
//! Payment validation, identity verification, direct activation, and the
//! audit trail. Every state-changing decision here is recorded.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::AdminAppState;
pub use routes::admin_router;
