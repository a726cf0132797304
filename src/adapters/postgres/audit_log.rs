//! PostgreSQL implementation of AuditLog.
//!
//! The action payload is stored twice: a short indexed `action` column
//! for filtering, and the full enum as JSONB for faithful replay.

use crate::domain::audit::{AuditAction, AuditEntry};
use crate::domain::foundation::{AdminId, AuditEntryId, DomainError, ErrorCode, Timestamp};
use crate::ports::AuditLog;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the AuditLog port.
pub struct PostgresAuditLog {
    pool: PgPool,
}

impl PostgresAuditLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an audit entry.
#[derive(Debug, sqlx::FromRow)]
struct AuditRow {
    id: Uuid,
    admin_id: Uuid,
    details: serde_json::Value,
    reason: Option<String>,
    occurred_at: DateTime<Utc>,
}

impl TryFrom<AuditRow> for AuditEntry {
    type Error = DomainError;

    fn try_from(row: AuditRow) -> Result<Self, Self::Error> {
        let action: AuditAction = serde_json::from_value(row.details).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid audit details: {}", e),
            )
        })?;
        Ok(AuditEntry {
            id: AuditEntryId::from_uuid(row.id),
            admin_id: AdminId::from_uuid(row.admin_id),
            action,
            reason: row.reason,
            occurred_at: Timestamp::from_datetime(row.occurred_at),
        })
    }
}

#[async_trait]
impl AuditLog for PostgresAuditLog {
    async fn append(&self, entry: &AuditEntry) -> Result<(), DomainError> {
        let details = serde_json::to_value(&entry.action).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to serialize audit action: {}", e),
            )
        })?;

        sqlx::query(
            r#"
            INSERT INTO audit_entries (id, admin_id, action, details, reason, occurred_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(entry.id.as_uuid())
        .bind(entry.admin_id.as_uuid())
        .bind(entry.action.name())
        .bind(details)
        .bind(&entry.reason)
        .bind(entry.occurred_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to append audit entry: {}", e),
            )
        })?;

        Ok(())
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<AuditEntry>, DomainError> {
        let rows: Vec<AuditRow> = sqlx::query_as(
            r#"
            SELECT id, admin_id, details, reason, occurred_at
            FROM audit_entries
            ORDER BY occurred_at DESC
            LIMIT $1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list audit entries: {}", e),
            )
        })?;

        rows.into_iter().map(AuditEntry::try_from).collect()
    }
}
