//! PostgreSQL adapters.

mod audit_log;
mod codec;
mod decision_store;
mod payment_repository;
mod plan_repository;
mod provider_repository;
mod subscription_reader;
mod subscription_repository;

pub use audit_log::PostgresAuditLog;
pub use decision_store::PostgresDecisionStore;
pub use payment_repository::PostgresPaymentRepository;
pub use plan_repository::PostgresPlanRepository;
pub use provider_repository::PostgresProviderRepository;
pub use subscription_reader::PostgresSubscriptionReader;
pub use subscription_repository::PostgresSubscriptionRepository;
