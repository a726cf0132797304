//! Provider-facing HTTP endpoints.
//!
//! Covers plan discovery, subscription requests, payment declarations,
//! availability, and the visibility snapshot.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::SubscriptionAppState;
pub use routes::subscription_router;
