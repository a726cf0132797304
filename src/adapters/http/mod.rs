//! HTTP adapters - REST API implementations.
//!
//! Provider-facing endpoints and the admin back-office live in separate
//! modules with their own state, DTOs, and routers.

pub mod admin;
pub mod subscription;

// Re-export key types for convenience
pub use admin::admin_router;
pub use admin::AdminAppState;
pub use subscription::subscription_router;
pub use subscription::SubscriptionAppState;
