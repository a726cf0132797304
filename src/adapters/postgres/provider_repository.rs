//! PostgreSQL implementation of ProviderRepository.

use crate::domain::foundation::{DomainError, ErrorCode, ProviderId, Timestamp, UserId};
use crate::domain::provider::Provider;
use crate::ports::ProviderRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::codec::{parse_verification, verification_to_string};

/// PostgreSQL implementation of the ProviderRepository port.
pub struct PostgresProviderRepository {
    pool: PgPool,
}

impl PostgresProviderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a provider.
#[derive(Debug, sqlx::FromRow)]
struct ProviderRow {
    id: Uuid,
    user_id: Uuid,
    display_name: String,
    verification_status: String,
    subscription_active: bool,
    available: bool,
    account_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProviderRow> for Provider {
    type Error = DomainError;

    fn try_from(row: ProviderRow) -> Result<Self, Self::Error> {
        Ok(Provider {
            id: ProviderId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            display_name: row.display_name,
            verification_status: parse_verification(&row.verification_status)?,
            subscription_active: row.subscription_active,
            available: row.available,
            account_active: row.account_active,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

const SELECT_COLUMNS: &str = "id, user_id, display_name, verification_status, \
                              subscription_active, available, account_active, \
                              created_at, updated_at";

#[async_trait]
impl ProviderRepository for PostgresProviderRepository {
    async fn insert(&self, provider: &Provider) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO providers (
                id, user_id, display_name, verification_status,
                subscription_active, available, account_active,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(provider.id.as_uuid())
        .bind(provider.user_id.as_uuid())
        .bind(&provider.display_name)
        .bind(verification_to_string(&provider.verification_status))
        .bind(provider.subscription_active)
        .bind(provider.available)
        .bind(provider.account_active)
        .bind(provider.created_at.as_datetime())
        .bind(provider.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("providers_user_id_key") {
                    return DomainError::new(
                        ErrorCode::ValidationFailed,
                        "User already has a provider profile",
                    );
                }
            }
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert provider: {}", e),
            )
        })?;

        Ok(())
    }

    async fn update(&self, provider: &Provider) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE providers SET
                display_name = $2,
                verification_status = $3,
                subscription_active = $4,
                available = $5,
                account_active = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(provider.id.as_uuid())
        .bind(&provider.display_name)
        .bind(verification_to_string(&provider.verification_status))
        .bind(provider.subscription_active)
        .bind(provider.available)
        .bind(provider.account_active)
        .bind(provider.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update provider: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ProviderNotFound,
                "Provider not found",
            ));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: ProviderId) -> Result<Option<Provider>, DomainError> {
        let row: Option<ProviderRow> = sqlx::query_as(&format!(
            "SELECT {} FROM providers WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find provider: {}", e),
            )
        })?;

        row.map(Provider::try_from).transpose()
    }

    async fn find_by_user_id(&self, user_id: UserId) -> Result<Option<Provider>, DomainError> {
        let row: Option<ProviderRow> = sqlx::query_as(&format!(
            "SELECT {} FROM providers WHERE user_id = $1",
            SELECT_COLUMNS
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find provider: {}", e),
            )
        })?;

        row.map(Provider::try_from).transpose()
    }
}
