//! Payment repository port (write side).

use crate::domain::foundation::{DomainError, PaymentId, SubscriptionId};
use crate::domain::payment::Payment;
use async_trait::async_trait;

/// Repository port for Payment aggregate persistence.
///
/// Payment resolution (approve / reject) is not written through this
/// port. Those writes happen inside decision-store transactions so the
/// payment, the subscription, the provider flag, and the audit entry
/// change together.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Insert a newly declared payment.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, payment: &Payment) -> Result<(), DomainError>;

    /// Find a payment by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, DomainError>;

    /// List payments declared against a subscription, newest first.
    async fn list_for_subscription(
        &self,
        subscription_id: SubscriptionId,
    ) -> Result<Vec<Payment>, DomainError>;
}
