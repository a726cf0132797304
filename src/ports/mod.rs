//! Ports (interfaces) for the hexagonal architecture.
//!
//! Ports define the contracts between the application core and the
//! outside world. Adapters implement these ports.

pub mod audit_log;
pub mod cache_store;
pub mod decision_store;
pub mod payment_repository;
pub mod plan_repository;
pub mod provider_repository;
pub mod subscription_reader;
pub mod subscription_repository;

pub use audit_log::AuditLog;
pub use cache_store::{CacheError, CacheStore};
pub use decision_store::DecisionStore;
pub use payment_repository::PaymentRepository;
pub use plan_repository::PlanRepository;
pub use provider_repository::ProviderRepository;
pub use subscription_reader::{PaymentView, SubscriptionReader, SubscriptionView};
pub use subscription_repository::{InsertOutcome, SubscriptionRepository};
