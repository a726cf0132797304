//! PostgreSQL implementation of DecisionStore.
//!
//! Each commit method opens one transaction and writes every row the
//! decision touches. A failure anywhere rolls the whole decision back,
//! so a validated payment can never exist without its activated
//! subscription.

use crate::domain::audit::AuditEntry;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::payment::Payment;
use crate::domain::provider::Provider;
use crate::domain::subscription::Subscription;
use crate::ports::DecisionStore;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use super::codec::{
    payment_status_to_string, subscription_status_to_string, verification_to_string,
};

/// PostgreSQL implementation of the DecisionStore port.
pub struct PostgresDecisionStore {
    pool: PgPool,
}

impl PostgresDecisionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> Result<Transaction<'_, Postgres>, DomainError> {
        self.pool.begin().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to begin transaction: {}", e),
            )
        })
    }
}

fn tx_error(what: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("Failed to {}: {}", what, e))
}

async fn write_subscription(
    tx: &mut Transaction<'_, Postgres>,
    subscription: &Subscription,
) -> Result<(), DomainError> {
    let result = sqlx::query(
        "UPDATE subscriptions SET status = $2, updated_at = $3 WHERE id = $1",
    )
    .bind(subscription.id.as_uuid())
    .bind(subscription_status_to_string(&subscription.status))
    .bind(subscription.updated_at.as_datetime())
    .execute(&mut **tx)
    .await
    .map_err(|e| tx_error("update subscription", e))?;

    if result.rows_affected() == 0 {
        return Err(DomainError::new(
            ErrorCode::SubscriptionNotFound,
            "Subscription not found",
        ));
    }
    Ok(())
}

async fn write_payment(
    tx: &mut Transaction<'_, Postgres>,
    payment: &Payment,
) -> Result<(), DomainError> {
    let result = sqlx::query(
        "UPDATE payments SET status = $2, validated_at = $3 WHERE id = $1",
    )
    .bind(payment.id.as_uuid())
    .bind(payment_status_to_string(&payment.status))
    .bind(payment.validated_at.map(|t| *t.as_datetime()))
    .execute(&mut **tx)
    .await
    .map_err(|e| tx_error("update payment", e))?;

    if result.rows_affected() == 0 {
        return Err(DomainError::new(
            ErrorCode::PaymentNotFound,
            "Payment not found",
        ));
    }
    Ok(())
}

async fn write_provider(
    tx: &mut Transaction<'_, Postgres>,
    provider: &Provider,
) -> Result<(), DomainError> {
    let result = sqlx::query(
        r#"
        UPDATE providers SET
            verification_status = $2,
            subscription_active = $3,
            available = $4,
            account_active = $5,
            updated_at = $6
        WHERE id = $1
        "#,
    )
    .bind(provider.id.as_uuid())
    .bind(verification_to_string(&provider.verification_status))
    .bind(provider.subscription_active)
    .bind(provider.available)
    .bind(provider.account_active)
    .bind(provider.updated_at.as_datetime())
    .execute(&mut **tx)
    .await
    .map_err(|e| tx_error("update provider", e))?;

    if result.rows_affected() == 0 {
        return Err(DomainError::new(
            ErrorCode::ProviderNotFound,
            "Provider not found",
        ));
    }
    Ok(())
}

async fn write_audit(
    tx: &mut Transaction<'_, Postgres>,
    entry: &AuditEntry,
) -> Result<(), DomainError> {
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
    .execute(&mut **tx)
    .await
    .map_err(|e| tx_error("append audit entry", e))?;

    Ok(())
}

async fn commit(tx: Transaction<'_, Postgres>) -> Result<(), DomainError> {
    tx.commit().await.map_err(|e| tx_error("commit decision", e))
}

#[async_trait]
impl DecisionStore for PostgresDecisionStore {
    async fn commit_payment_approval(
        &self,
        payment: &Payment,
        subscription: &Subscription,
        provider: &Provider,
        entry: &AuditEntry,
    ) -> Result<(), DomainError> {
        let mut tx = self.begin().await?;
        write_payment(&mut tx, payment).await?;
        write_subscription(&mut tx, subscription).await?;
        write_provider(&mut tx, provider).await?;
        write_audit(&mut tx, entry).await?;
        commit(tx).await
    }

    async fn commit_payment_rejection(
        &self,
        payment: &Payment,
        entry: &AuditEntry,
    ) -> Result<(), DomainError> {
        let mut tx = self.begin().await?;
        write_payment(&mut tx, payment).await?;
        write_audit(&mut tx, entry).await?;
        commit(tx).await
    }

    async fn commit_identity_decision(
        &self,
        provider: &Provider,
        entry: &AuditEntry,
    ) -> Result<(), DomainError> {
        let mut tx = self.begin().await?;
        write_provider(&mut tx, provider).await?;
        write_audit(&mut tx, entry).await?;
        commit(tx).await
    }

    async fn commit_expiry(
        &self,
        subscription: &Subscription,
        provider: &Provider,
    ) -> Result<(), DomainError> {
        let mut tx = self.begin().await?;
        write_subscription(&mut tx, subscription).await?;
        write_provider(&mut tx, provider).await?;
        commit(tx).await
    }

    async fn commit_direct_activation(
        &self,
        subscription: &Subscription,
        provider: &Provider,
        entry: &AuditEntry,
    ) -> Result<(), DomainError> {
        let mut tx = self.begin().await?;
        write_subscription(&mut tx, subscription).await?;
        write_provider(&mut tx, provider).await?;
        write_audit(&mut tx, entry).await?;
        commit(tx).await
    }
}
