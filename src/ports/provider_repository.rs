//! Provider repository port (write side).

use crate::domain::foundation::{DomainError, ProviderId, UserId};
use crate::domain::provider::Provider;
use async_trait::async_trait;

/// Repository port for Provider aggregate persistence.
#[async_trait]
pub trait ProviderRepository: Send + Sync {
    /// Insert a new provider profile.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the user already has a provider profile
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, provider: &Provider) -> Result<(), DomainError>;

    /// Update an existing provider.
    ///
    /// # Errors
    ///
    /// - `ProviderNotFound` if the provider doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, provider: &Provider) -> Result<(), DomainError>;

    /// Find a provider by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: ProviderId) -> Result<Option<Provider>, DomainError>;

    /// Find the provider profile owned by a user.
    ///
    /// Returns `None` if the user has no provider profile.
    async fn find_by_user_id(&self, user_id: UserId) -> Result<Option<Provider>, DomainError>;
}
