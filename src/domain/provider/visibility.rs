//! Cacheable visibility snapshot.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ProviderId;

use super::Provider;

/// Point-in-time answer to "is this provider visible, and why not".
///
/// Serialized into the cache so repeated visibility checks skip the
/// database. Invalidated whenever any gate changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilitySnapshot {
    pub provider_id: ProviderId,
    pub visible: bool,
    pub identity_verified: bool,
    pub subscription_active: bool,
    pub available: bool,
    pub account_active: bool,
}

impl VisibilitySnapshot {
    pub fn of(provider: &Provider) -> Self {
        Self {
            provider_id: provider.id,
            visible: provider.is_visible(),
            identity_verified: provider.verification_status.is_verified(),
            subscription_active: provider.subscription_active,
            available: provider.available,
            account_active: provider.account_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Timestamp, UserId};

    #[test]
    fn snapshot_mirrors_the_predicate() {
        let now = Timestamp::parse_rfc3339("2024-03-01T00:00:00Z").unwrap();
        let mut provider = Provider::new(ProviderId::new(), UserId::new(), "Atelier", now);
        provider.submit_identity(now).unwrap();
        provider.decide_identity(true, now).unwrap();
        provider.set_subscription_active(true, now);
        provider.set_available(true, now);

        let snapshot = VisibilitySnapshot::of(&provider);
        assert!(snapshot.visible);
        assert_eq!(snapshot.visible, provider.is_visible());

        provider.set_available(false, now);
        let snapshot = VisibilitySnapshot::of(&provider);
        assert!(!snapshot.visible);
        assert!(!snapshot.available);
        assert!(snapshot.identity_verified);
    }
}
