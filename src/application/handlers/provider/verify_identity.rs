//! VerifyIdentityHandler - Command handler for the administrator's
//! identity review decision.

use std::sync::Arc;

use crate::application::handlers::visibility_cache::invalidate_visibility;
use crate::domain::audit::{AuditAction, AuditEntry};
use crate::domain::foundation::{AdminId, ProviderId, Timestamp};
use crate::domain::provider::Provider;
use crate::domain::subscription::SubscriptionError;
use crate::ports::{CacheStore, DecisionStore, ProviderRepository};

/// Recorded in the audit entry when the administrator gives no reason.
const FALLBACK_REASON: &str = "no reason provided";

/// Command to resolve a pending identity review.
#[derive(Debug, Clone)]
pub struct VerifyIdentityCommand {
    pub admin_id: AdminId,
    pub provider_id: ProviderId,
    pub approve: bool,
    /// Audit justification. A fallback text is recorded when absent.
    pub reason: Option<String>,
}

/// Handler for identity review decisions.
pub struct VerifyIdentityHandler {
    providers: Arc<dyn ProviderRepository>,
    decisions: Arc<dyn DecisionStore>,
    cache: Arc<dyn CacheStore>,
}

impl VerifyIdentityHandler {
    pub fn new(
        providers: Arc<dyn ProviderRepository>,
        decisions: Arc<dyn DecisionStore>,
        cache: Arc<dyn CacheStore>,
    ) -> Self {
        Self {
            providers,
            decisions,
            cache,
        }
    }

    pub async fn handle(&self, cmd: VerifyIdentityCommand) -> Result<Provider, SubscriptionError> {
        let now = Timestamp::now();

        let reason = cmd
            .reason
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_REASON.to_string());

        let mut provider = self
            .providers
            .find_by_id(cmd.provider_id)
            .await?
            .ok_or(SubscriptionError::ProviderNotFound(cmd.provider_id))?;

        provider.decide_identity(cmd.approve, now)?;

        let action = if cmd.approve {
            AuditAction::IdentityVerified {
                provider_id: provider.id,
            }
        } else {
            AuditAction::IdentityRejected {
                provider_id: provider.id,
            }
        };
        let entry = AuditEntry::record(cmd.admin_id, action, Some(reason), now);

        self.decisions
            .commit_identity_decision(&provider, &entry)
            .await?;

        invalidate_visibility(self.cache.as_ref(), &provider).await;

        Ok(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{
        MockCacheStore, MockDecisionStore, MockProviderRepo,
    };
    use crate::domain::foundation::UserId;
    use crate::domain::provider::VerificationStatus;

    fn provider_under_review() -> Provider {
        let mut provider = Provider::new(
            ProviderId::new(),
            UserId::new(),
            "Atelier Dubois",
            Timestamp::now(),
        );
        provider.submit_identity(Timestamp::now()).unwrap();
        provider
    }

    #[tokio::test]
    async fn approval_verifies_and_audits() {
        let provider = provider_under_review();
        let providers = Arc::new(MockProviderRepo::with(vec![provider.clone()]));
        let decisions = Arc::new(MockDecisionStore::new());
        let cache = Arc::new(MockCacheStore::new());

        let handler = VerifyIdentityHandler::new(providers, decisions.clone(), cache.clone());
        let result = handler
            .handle(VerifyIdentityCommand {
                admin_id: AdminId::new(),
                provider_id: provider.id,
                approve: true,
                reason: None,
            })
            .await
            .unwrap();

        assert_eq!(result.verification_status, VerificationStatus::Verified);
        let commits = decisions.identity_decisions.lock().unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].1.action.name(), "identity_verified");
        assert_eq!(cache.deleted().len(), 1);
    }

    #[tokio::test]
    async fn rejection_without_reason_records_fallback_text() {
        let provider = provider_under_review();
        let providers = Arc::new(MockProviderRepo::with(vec![provider.clone()]));
        let decisions = Arc::new(MockDecisionStore::new());
        let cache = Arc::new(MockCacheStore::new());

        let handler = VerifyIdentityHandler::new(providers, decisions.clone(), cache);
        let result = handler
            .handle(VerifyIdentityCommand {
                admin_id: AdminId::new(),
                provider_id: provider.id,
                approve: false,
                reason: None,
            })
            .await
            .unwrap();

        assert_eq!(result.verification_status, VerificationStatus::Rejected);
        let commits = decisions.identity_decisions.lock().unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].1.reason.as_deref(), Some("no reason provided"));
    }

    #[tokio::test]
    async fn rejection_with_reason_is_recorded() {
        let provider = provider_under_review();
        let providers = Arc::new(MockProviderRepo::with(vec![provider.clone()]));
        let decisions = Arc::new(MockDecisionStore::new());
        let cache = Arc::new(MockCacheStore::new());

        let handler = VerifyIdentityHandler::new(providers, decisions.clone(), cache);
        let result = handler
            .handle(VerifyIdentityCommand {
                admin_id: AdminId::new(),
                provider_id: provider.id,
                approve: false,
                reason: Some("document unreadable".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(result.verification_status, VerificationStatus::Rejected);
        let commits = decisions.identity_decisions.lock().unwrap();
        assert_eq!(commits[0].1.reason.as_deref(), Some("document unreadable"));
    }

    #[tokio::test]
    async fn deciding_without_submission_fails() {
        let provider = Provider::new(
            ProviderId::new(),
            UserId::new(),
            "Atelier Dubois",
            Timestamp::now(),
        );
        let providers = Arc::new(MockProviderRepo::with(vec![provider.clone()]));
        let decisions = Arc::new(MockDecisionStore::new());
        let cache = Arc::new(MockCacheStore::new());

        let handler = VerifyIdentityHandler::new(providers, decisions, cache);
        let result = handler
            .handle(VerifyIdentityCommand {
                admin_id: AdminId::new(),
                provider_id: provider.id,
                approve: true,
                reason: None,
            })
            .await;

        assert!(matches!(
            result,
            Err(SubscriptionError::InvalidState { .. })
        ));
    }

    #[tokio::test]
    async fn fails_for_unknown_provider() {
        let providers = Arc::new(MockProviderRepo::default());
        let decisions = Arc::new(MockDecisionStore::new());
        let cache = Arc::new(MockCacheStore::new());

        let handler = VerifyIdentityHandler::new(providers, decisions, cache);
        let result = handler
            .handle(VerifyIdentityCommand {
                admin_id: AdminId::new(),
                provider_id: ProviderId::new(),
                approve: true,
                reason: None,
            })
            .await;

        assert!(matches!(
            result,
            Err(SubscriptionError::ProviderNotFound(_))
        ));
    }
}
