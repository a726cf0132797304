//! GetCurrentSubscriptionHandler - Query handler for the provider
//! dashboard.

use std::sync::Arc;

use crate::domain::foundation::{ProviderId, Timestamp};
use crate::domain::subscription::SubscriptionError;
use crate::ports::{SubscriptionReader, SubscriptionView};

/// Query for the provider's subscription covering the current instant.
#[derive(Debug, Clone, Copy)]
pub struct GetCurrentSubscriptionQuery {
    pub provider_id: ProviderId,
}

/// Handler for the current-subscription query.
pub struct GetCurrentSubscriptionHandler {
    reader: Arc<dyn SubscriptionReader>,
}

impl GetCurrentSubscriptionHandler {
    pub fn new(reader: Arc<dyn SubscriptionReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(
        &self,
        query: GetCurrentSubscriptionQuery,
    ) -> Result<Option<SubscriptionView>, SubscriptionError> {
        let view = self
            .reader
            .current_for_provider(query.provider_id, Timestamp::now())
            .await?;
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::MockSubscriptionReader;
    use crate::domain::foundation::SubscriptionId;
    use crate::domain::subscription::{SubscriptionKind, SubscriptionStatus};

    #[tokio::test]
    async fn returns_the_readers_view() {
        let view = SubscriptionView {
            id: SubscriptionId::new(),
            kind: SubscriptionKind::Monthly,
            status: SubscriptionStatus::Active,
            window_start: Timestamp::parse_rfc3339("2024-03-01T00:00:00Z").unwrap(),
            window_end: Timestamp::parse_rfc3339("2024-03-31T23:59:59Z").unwrap(),
            price_cents: 2_500,
            payments: vec![],
        };
        let reader = Arc::new(MockSubscriptionReader::with(view.clone()));

        let handler = GetCurrentSubscriptionHandler::new(reader);
        let result = handler
            .handle(GetCurrentSubscriptionQuery {
                provider_id: ProviderId::new(),
            })
            .await
            .unwrap();

        assert_eq!(result.unwrap().id, view.id);
    }

    #[tokio::test]
    async fn returns_none_without_current_subscription() {
        let reader = Arc::new(MockSubscriptionReader::default());

        let handler = GetCurrentSubscriptionHandler::new(reader);
        let result = handler
            .handle(GetCurrentSubscriptionQuery {
                provider_id: ProviderId::new(),
            })
            .await
            .unwrap();

        assert!(result.is_none());
    }
}
