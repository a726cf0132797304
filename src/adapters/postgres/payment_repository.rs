//! PostgreSQL implementation of PaymentRepository.

use crate::domain::foundation::{DomainError, ErrorCode, PaymentId, ProviderId, SubscriptionId, Timestamp};
use crate::domain::payment::Payment;
use crate::ports::PaymentRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::codec::{parse_payment_method, parse_payment_status, payment_method_to_string, payment_status_to_string};

/// PostgreSQL implementation of the PaymentRepository port.
pub struct PostgresPaymentRepository {
    pool: PgPool,
}

impl PostgresPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a payment.
#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    subscription_id: Uuid,
    provider_id: Uuid,
    method: String,
    amount_cents: i64,
    status: String,
    external_reference: Option<String>,
    proof_reference: Option<String>,
    declared_at: DateTime<Utc>,
    validated_at: Option<DateTime<Utc>>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Payment {
            id: PaymentId::from_uuid(row.id),
            subscription_id: SubscriptionId::from_uuid(row.subscription_id),
            provider_id: ProviderId::from_uuid(row.provider_id),
            method: parse_payment_method(&row.method)?,
            amount_cents: row.amount_cents,
            status: parse_payment_status(&row.status)?,
            external_reference: row.external_reference,
            proof_reference: row.proof_reference,
            declared_at: Timestamp::from_datetime(row.declared_at),
            validated_at: row.validated_at.map(Timestamp::from_datetime),
        })
    }
}

const PAYMENT_COLUMNS: &str = "id, subscription_id, provider_id, method, amount_cents, \
                                          status, external_reference, proof_reference, \
                                          declared_at, validated_at";

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
    async fn insert(&self, payment: &Payment) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                id, subscription_id, provider_id, method, amount_cents,
                status, external_reference, proof_reference, declared_at, validated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(payment.id.as_uuid())
        .bind(payment.subscription_id.as_uuid())
        .bind(payment.provider_id.as_uuid())
        .bind(payment_method_to_string(&payment.method))
        .bind(payment.amount_cents)
        .bind(payment_status_to_string(&payment.status))
        .bind(&payment.external_reference)
        .bind(&payment.proof_reference)
        .bind(payment.declared_at.as_datetime())
        .bind(payment.validated_at.map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert payment: {}", e),
            )
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, DomainError> {
        let row: Option<PaymentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM payments WHERE id = $1",
            PAYMENT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find payment: {}", e),
            )
        })?;

        row.map(Payment::try_from).transpose()
    }

    async fn list_for_subscription(
        &self,
        subscription_id: SubscriptionId,
    ) -> Result<Vec<Payment>, DomainError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM payments
            WHERE subscription_id = $1
            ORDER BY declared_at DESC
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(subscription_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list payments: {}", e),
            )
        })?;

        rows.into_iter().map(Payment::try_from).collect()
    }
}
