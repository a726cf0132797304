//! PostgreSQL implementation of SubscriptionReader.

use crate::domain::foundation::{DomainError, ErrorCode, PaymentId, ProviderId, SubscriptionId, Timestamp};
use crate::ports::{PaymentView, SubscriptionReader, SubscriptionView};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::codec::{parse_kind, parse_payment_method, parse_payment_status, parse_subscription_status};

/// PostgreSQL implementation of the SubscriptionReader port.
///
/// Two queries per view: the subscription row, then its payments. The
/// dashboard is low-traffic, a join buys nothing here.
pub struct PostgresSubscriptionReader {
    pool: PgPool,
}

impl PostgresSubscriptionReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ViewRow {
    id: Uuid,
    kind: String,
    status: String,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    price_cents: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentViewRow {
    id: Uuid,
    method: String,
    amount_cents: i64,
    status: String,
    declared_at: DateTime<Utc>,
    validated_at: Option<DateTime<Utc>>,
}

impl TryFrom<PaymentViewRow> for PaymentView {
    type Error = DomainError;

    fn try_from(row: PaymentViewRow) -> Result<Self, Self::Error> {
        Ok(PaymentView {
            id: PaymentId::from_uuid(row.id),
            method: parse_payment_method(&row.method)?,
            amount_cents: row.amount_cents,
            status: parse_payment_status(&row.status)?,
            declared_at: Timestamp::from_datetime(row.declared_at),
            validated_at: row.validated_at.map(Timestamp::from_datetime),
        })
    }
}

#[async_trait]
impl SubscriptionReader for PostgresSubscriptionReader {
    async fn current_for_provider(
        &self,
        provider_id: ProviderId,
        now: Timestamp,
    ) -> Result<Option<SubscriptionView>, DomainError> {
        let row: Option<ViewRow> = sqlx::query_as(
            r#"
            SELECT id, kind, status, window_start, window_end, price_cents
            FROM subscriptions
            WHERE provider_id = $1
              AND status IN ('pending', 'active')
              AND window_start <= $2
              AND window_end >= $2
            ORDER BY CASE status WHEN 'active' THEN 0 ELSE 1 END, window_end DESC
            LIMIT 1
            "#,
        )
        .bind(provider_id.as_uuid())
        .bind(now.as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to read current subscription: {}", e),
            )
        })?;

        let Some(row) = row else {
            return Ok(None);
        };

        let payment_rows: Vec<PaymentViewRow> = sqlx::query_as(
            r#"
            SELECT id, method, amount_cents, status, declared_at, validated_at
            FROM payments
            WHERE subscription_id = $1
            ORDER BY declared_at DESC
            "#,
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to read payments: {}", e),
            )
        })?;

        let payments = payment_rows
            .into_iter()
            .map(PaymentView::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(SubscriptionView {
            id: SubscriptionId::from_uuid(row.id),
            kind: parse_kind(&row.kind)?,
            status: parse_subscription_status(&row.status)?,
            window_start: Timestamp::from_datetime(row.window_start),
            window_end: Timestamp::from_datetime(row.window_end),
            price_cents: row.price_cents,
            payments,
        }))
    }
}
