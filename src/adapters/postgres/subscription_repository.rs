//! PostgreSQL implementation of SubscriptionRepository.
//!
//! Admission control happens in SQL: the overlap check and the insert
//! run as one statement, and a partial unique index on
//! (provider_id, kind, window_start) for pending/active rows backstops
//! the race two connections can still lose at serialization level
//! "read committed".

use crate::domain::foundation::{DomainError, ErrorCode, PlanId, ProviderId, SubscriptionId, Timestamp};
use crate::domain::subscription::{BillingWindow, Subscription};
use crate::ports::{InsertOutcome, SubscriptionRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::codec::{
    kind_to_string, parse_kind, parse_subscription_status, subscription_status_to_string,
};

/// PostgreSQL implementation of the SubscriptionRepository port.
pub struct PostgresSubscriptionRepository {
    pool: PgPool,
}

impl PostgresSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a subscription.
#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: Uuid,
    provider_id: Uuid,
    plan_id: Option<Uuid>,
    kind: String,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    status: String,
    price_cents: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = DomainError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        Ok(Subscription {
            id: SubscriptionId::from_uuid(row.id),
            provider_id: ProviderId::from_uuid(row.provider_id),
            plan_id: row.plan_id.map(PlanId::from_uuid),
            kind: parse_kind(&row.kind)?,
            window: BillingWindow {
                start: Timestamp::from_datetime(row.window_start),
                end: Timestamp::from_datetime(row.window_end),
            },
            status: parse_subscription_status(&row.status)?,
            price_cents: row.price_cents,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

const SELECT_COLUMNS: &str = "id, provider_id, plan_id, kind, window_start, window_end, status, \
                              price_cents, created_at, updated_at";

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn insert_unless_overlapping(
        &self,
        subscription: &Subscription,
    ) -> Result<InsertOutcome, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO subscriptions (
                id, provider_id, plan_id, kind, window_start, window_end,
                status, price_cents, created_at, updated_at
            )
            SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10
            WHERE NOT EXISTS (
                SELECT 1 FROM subscriptions
                WHERE provider_id = $2
                  AND kind = $4
                  AND status IN ('pending', 'active')
                  AND window_start <= $6
                  AND window_end >= $5
            )
            "#,
        )
        .bind(subscription.id.as_uuid())
        .bind(subscription.provider_id.as_uuid())
        .bind(subscription.plan_id.map(|p| *p.as_uuid()))
        .bind(kind_to_string(&subscription.kind))
        .bind(subscription.window.start.as_datetime())
        .bind(subscription.window.end.as_datetime())
        .bind(subscription_status_to_string(&subscription.status))
        .bind(subscription.price_cents)
        .bind(subscription.created_at.as_datetime())
        .bind(subscription.updated_at.as_datetime())
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Ok(InsertOutcome::Conflict),
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(e) => {
                if let sqlx::Error::Database(db_err) = &e {
                    // The partial unique index catches the race where two
                    // connections pass the NOT EXISTS check together.
                    if db_err.constraint() == Some("subscriptions_provider_kind_window_live_idx") {
                        return Ok(InsertOutcome::Conflict);
                    }
                }
                Err(DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to insert subscription: {}", e),
                ))
            }
        }
    }

    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE subscriptions SET
                status = $2,
                updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(subscription.id.as_uuid())
        .bind(subscription_status_to_string(&subscription.status))
        .bind(subscription.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update subscription: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SubscriptionNotFound,
                "Subscription not found",
            ));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: SubscriptionId) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM subscriptions WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find subscription: {}", e),
            )
        })?;

        row.map(Subscription::try_from).transpose()
    }

    async fn find_current_for_provider(
        &self,
        provider_id: ProviderId,
        now: Timestamp,
    ) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM subscriptions
            WHERE provider_id = $1
              AND status IN ('pending', 'active')
              AND window_start <= $2
              AND window_end >= $2
            ORDER BY CASE status WHEN 'active' THEN 0 ELSE 1 END, window_end DESC
            LIMIT 1
            "#,
            SELECT_COLUMNS
        ))
        .bind(provider_id.as_uuid())
        .bind(now.as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find current subscription: {}", e),
            )
        })?;

        row.map(Subscription::try_from).transpose()
    }

    async fn find_expired_active(&self, now: Timestamp) -> Result<Vec<Subscription>, DomainError> {
        let rows: Vec<SubscriptionRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM subscriptions
            WHERE status = 'active' AND window_end < $1
            ORDER BY window_end ASC
            "#,
            SELECT_COLUMNS
        ))
        .bind(now.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list lapsed subscriptions: {}", e),
            )
        })?;

        rows.into_iter().map(Subscription::try_from).collect()
    }

    async fn find_stale_pending(
        &self,
        cutoff: Timestamp,
    ) -> Result<Vec<Subscription>, DomainError> {
        let rows: Vec<SubscriptionRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM subscriptions
            WHERE status = 'pending' AND created_at < $1
            ORDER BY created_at ASC
            "#,
            SELECT_COLUMNS
        ))
        .bind(cutoff.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list stale pending subscriptions: {}", e),
            )
        })?;

        rows.into_iter().map(Subscription::try_from).collect()
    }
}
