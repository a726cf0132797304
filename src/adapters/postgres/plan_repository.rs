//! PostgreSQL implementation of PlanRepository.

use crate::domain::foundation::{DomainError, ErrorCode, PlanId};
use crate::domain::subscription::SubscriptionPlan;
use crate::ports::PlanRepository;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::codec::parse_kind;

/// PostgreSQL implementation of the PlanRepository port.
pub struct PostgresPlanRepository {
    pool: PgPool,
}

impl PostgresPlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a plan.
#[derive(Debug, sqlx::FromRow)]
struct PlanRow {
    id: Uuid,
    name: String,
    kind: String,
    price_cents: i64,
    active: bool,
}

impl TryFrom<PlanRow> for SubscriptionPlan {
    type Error = DomainError;

    fn try_from(row: PlanRow) -> Result<Self, Self::Error> {
        Ok(SubscriptionPlan {
            id: PlanId::from_uuid(row.id),
            name: row.name,
            kind: parse_kind(&row.kind)?,
            price_cents: row.price_cents,
            active: row.active,
        })
    }
}

#[async_trait]
impl PlanRepository for PostgresPlanRepository {
    async fn list_active(&self) -> Result<Vec<SubscriptionPlan>, DomainError> {
        let rows: Vec<PlanRow> = sqlx::query_as(
            r#"
            SELECT id, name, kind, price_cents, active
            FROM plans
            WHERE active = TRUE
            ORDER BY price_cents ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list plans: {}", e),
            )
        })?;

        rows.into_iter().map(SubscriptionPlan::try_from).collect()
    }

    async fn find_by_id(&self, id: PlanId) -> Result<Option<SubscriptionPlan>, DomainError> {
        let row: Option<PlanRow> = sqlx::query_as(
            "SELECT id, name, kind, price_cents, active FROM plans WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find plan: {}", e),
            )
        })?;

        row.map(SubscriptionPlan::try_from).transpose()
    }
}
