//! Audit log port.

use crate::domain::audit::AuditEntry;
use crate::domain::foundation::DomainError;
use async_trait::async_trait;

/// Append-only audit trail for administrator decisions.
///
/// Most entries are written inside decision-store transactions; this
/// port covers direct appends and reads.
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Append an entry to the trail.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn append(&self, entry: &AuditEntry) -> Result<(), DomainError>;

    /// List the most recent entries, newest first.
    async fn list_recent(&self, limit: u32) -> Result<Vec<AuditEntry>, DomainError>;
}
