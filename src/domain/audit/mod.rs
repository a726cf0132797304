//! Audit trail for administrator decisions.

mod entry;

pub use entry::{AuditAction, AuditEntry};
