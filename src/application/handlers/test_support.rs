//! Shared mock port implementations for handler tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::audit::AuditEntry;
use crate::domain::foundation::{
    DomainError, ErrorCode, PaymentId, PlanId, ProviderId, SubscriptionId, Timestamp, UserId,
};
use crate::domain::payment::Payment;
use crate::domain::provider::Provider;
use crate::domain::subscription::{
    Subscription, SubscriptionPlan, SubscriptionStatus,
};
use crate::ports::{
    AuditLog, CacheError, CacheStore, DecisionStore, InsertOutcome, PaymentRepository,
    PlanRepository, ProviderRepository, SubscriptionReader, SubscriptionRepository,
    SubscriptionView,
};

fn db_error() -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, "Simulated database failure")
}

// ─── Subscription repository ───

#[derive(Default)]
pub struct MockSubscriptionRepo {
    pub subscriptions: Mutex<Vec<Subscription>>,
    pub fail: bool,
}

impl MockSubscriptionRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(subscriptions: Vec<Subscription>) -> Self {
        Self {
            subscriptions: Mutex::new(subscriptions),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            subscriptions: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn stored(&self) -> Vec<Subscription> {
        self.subscriptions.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubscriptionRepository for MockSubscriptionRepo {
    async fn insert_unless_overlapping(
        &self,
        subscription: &Subscription,
    ) -> Result<InsertOutcome, DomainError> {
        if self.fail {
            return Err(db_error());
        }
        let mut store = self.subscriptions.lock().unwrap();
        let conflict = store.iter().any(|existing| {
            existing.provider_id == subscription.provider_id
                && existing.kind == subscription.kind
                && existing.status.occupies_window()
                && existing.window.overlaps(&subscription.window)
        });
        if conflict {
            return Ok(InsertOutcome::Conflict);
        }
        store.push(subscription.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError> {
        if self.fail {
            return Err(db_error());
        }
        let mut store = self.subscriptions.lock().unwrap();
        match store.iter_mut().find(|s| s.id == subscription.id) {
            Some(slot) => {
                *slot = subscription.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::SubscriptionNotFound,
                "Subscription not found",
            )),
        }
    }

    async fn find_by_id(&self, id: SubscriptionId) -> Result<Option<Subscription>, DomainError> {
        if self.fail {
            return Err(db_error());
        }
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn find_current_for_provider(
        &self,
        provider_id: ProviderId,
        now: Timestamp,
    ) -> Result<Option<Subscription>, DomainError> {
        if self.fail {
            return Err(db_error());
        }
        let store = self.subscriptions.lock().unwrap();
        let mut current: Option<Subscription> = None;
        for sub in store.iter() {
            if sub.provider_id != provider_id
                || !sub.status.occupies_window()
                || !sub.window.contains(now)
            {
                continue;
            }
            let preferred = match (&current, sub.status) {
                (None, _) => true,
                (Some(c), SubscriptionStatus::Active) => {
                    c.status != SubscriptionStatus::Active
                }
                _ => false,
            };
            if preferred {
                current = Some(sub.clone());
            }
        }
        Ok(current)
    }

    async fn find_expired_active(&self, now: Timestamp) -> Result<Vec<Subscription>, DomainError> {
        if self.fail {
            return Err(db_error());
        }
        let mut hits: Vec<Subscription> = self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.status == SubscriptionStatus::Active && s.window.end < now)
            .cloned()
            .collect();
        hits.sort_by_key(|s| s.window.end);
        Ok(hits)
    }

    async fn find_stale_pending(
        &self,
        cutoff: Timestamp,
    ) -> Result<Vec<Subscription>, DomainError> {
        if self.fail {
            return Err(db_error());
        }
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.status == SubscriptionStatus::Pending && s.created_at < cutoff)
            .cloned()
            .collect())
    }
}

// ─── Provider repository ───

#[derive(Default)]
pub struct MockProviderRepo {
    pub providers: Mutex<Vec<Provider>>,
    pub fail: bool,
}

impl MockProviderRepo {
    pub fn with(providers: Vec<Provider>) -> Self {
        Self {
            providers: Mutex::new(providers),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            providers: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn stored(&self) -> Vec<Provider> {
        self.providers.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProviderRepository for MockProviderRepo {
    async fn insert(&self, provider: &Provider) -> Result<(), DomainError> {
        if self.fail {
            return Err(db_error());
        }
        self.providers.lock().unwrap().push(provider.clone());
        Ok(())
    }

    async fn update(&self, provider: &Provider) -> Result<(), DomainError> {
        if self.fail {
            return Err(db_error());
        }
        let mut store = self.providers.lock().unwrap();
        match store.iter_mut().find(|p| p.id == provider.id) {
            Some(slot) => {
                *slot = provider.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::ProviderNotFound,
                "Provider not found",
            )),
        }
    }

    async fn find_by_id(&self, id: ProviderId) -> Result<Option<Provider>, DomainError> {
        if self.fail {
            return Err(db_error());
        }
        Ok(self
            .providers
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn find_by_user_id(&self, user_id: UserId) -> Result<Option<Provider>, DomainError> {
        if self.fail {
            return Err(db_error());
        }
        Ok(self
            .providers
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned())
    }
}

// ─── Payment repository ───

#[derive(Default)]
pub struct MockPaymentRepo {
    pub payments: Mutex<Vec<Payment>>,
    pub fail: bool,
}

impl MockPaymentRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(payments: Vec<Payment>) -> Self {
        Self {
            payments: Mutex::new(payments),
            fail: false,
        }
    }

    pub fn stored(&self) -> Vec<Payment> {
        self.payments.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentRepository for MockPaymentRepo {
    async fn insert(&self, payment: &Payment) -> Result<(), DomainError> {
        if self.fail {
            return Err(db_error());
        }
        self.payments.lock().unwrap().push(payment.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, DomainError> {
        if self.fail {
            return Err(db_error());
        }
        Ok(self
            .payments
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn list_for_subscription(
        &self,
        subscription_id: SubscriptionId,
    ) -> Result<Vec<Payment>, DomainError> {
        if self.fail {
            return Err(db_error());
        }
        let mut hits: Vec<Payment> = self
            .payments
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.subscription_id == subscription_id)
            .cloned()
            .collect();
        hits.sort_by(|a, b| b.declared_at.cmp(&a.declared_at));
        Ok(hits)
    }
}

// ─── Plan repository ───

#[derive(Default)]
pub struct MockPlanRepo {
    pub plans: Mutex<Vec<SubscriptionPlan>>,
}

impl MockPlanRepo {
    pub fn with(plans: Vec<SubscriptionPlan>) -> Self {
        Self {
            plans: Mutex::new(plans),
        }
    }
}

#[async_trait]
impl PlanRepository for MockPlanRepo {
    async fn list_active(&self) -> Result<Vec<SubscriptionPlan>, DomainError> {
        let mut active: Vec<SubscriptionPlan> = self
            .plans
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.active)
            .cloned()
            .collect();
        active.sort_by_key(|p| p.price_cents);
        Ok(active)
    }

    async fn find_by_id(&self, id: PlanId) -> Result<Option<SubscriptionPlan>, DomainError> {
        Ok(self
            .plans
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }
}

// ─── Decision store ───

/// Records committed decisions without touching the other mocks.
/// Tests assert against the recorded aggregate states.
#[derive(Default)]
pub struct MockDecisionStore {
    pub approvals: Mutex<Vec<(Payment, Subscription, Provider, AuditEntry)>>,
    pub rejections: Mutex<Vec<(Payment, AuditEntry)>>,
    pub identity_decisions: Mutex<Vec<(Provider, AuditEntry)>>,
    pub expiries: Mutex<Vec<(Subscription, Provider)>>,
    pub direct_activations: Mutex<Vec<(Subscription, Provider, AuditEntry)>>,
    pub fail: bool,
}

impl MockDecisionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl DecisionStore for MockDecisionStore {
    async fn commit_payment_approval(
        &self,
        payment: &Payment,
        subscription: &Subscription,
        provider: &Provider,
        entry: &AuditEntry,
    ) -> Result<(), DomainError> {
        if self.fail {
            return Err(db_error());
        }
        self.approvals.lock().unwrap().push((
            payment.clone(),
            subscription.clone(),
            provider.clone(),
            entry.clone(),
        ));
        Ok(())
    }

    async fn commit_payment_rejection(
        &self,
        payment: &Payment,
        entry: &AuditEntry,
    ) -> Result<(), DomainError> {
        if self.fail {
            return Err(db_error());
        }
        self.rejections
            .lock()
            .unwrap()
            .push((payment.clone(), entry.clone()));
        Ok(())
    }

    async fn commit_identity_decision(
        &self,
        provider: &Provider,
        entry: &AuditEntry,
    ) -> Result<(), DomainError> {
        if self.fail {
            return Err(db_error());
        }
        self.identity_decisions
            .lock()
            .unwrap()
            .push((provider.clone(), entry.clone()));
        Ok(())
    }

    async fn commit_expiry(
        &self,
        subscription: &Subscription,
        provider: &Provider,
    ) -> Result<(), DomainError> {
        if self.fail {
            return Err(db_error());
        }
        self.expiries
            .lock()
            .unwrap()
            .push((subscription.clone(), provider.clone()));
        Ok(())
    }

    async fn commit_direct_activation(
        &self,
        subscription: &Subscription,
        provider: &Provider,
        entry: &AuditEntry,
    ) -> Result<(), DomainError> {
        if self.fail {
            return Err(db_error());
        }
        self.direct_activations.lock().unwrap().push((
            subscription.clone(),
            provider.clone(),
            entry.clone(),
        ));
        Ok(())
    }
}

// ─── Cache store ───

#[derive(Default)]
pub struct MockCacheStore {
    pub entries: Mutex<HashMap<String, String>>,
    pub deleted_keys: Mutex<Vec<String>>,
    pub fail: bool,
}

impl MockCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted_keys.lock().unwrap().clone()
    }
}

#[async_trait]
impl CacheStore for MockCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        if self.fail {
            return Err(CacheError::Unavailable("simulated".to_string()));
        }
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str, _ttl_secs: u64) -> Result<(), CacheError> {
        if self.fail {
            return Err(CacheError::Unavailable("simulated".to_string()));
        }
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        if self.fail {
            return Err(CacheError::Unavailable("simulated".to_string()));
        }
        self.entries.lock().unwrap().remove(key);
        self.deleted_keys.lock().unwrap().push(key.to_string());
        Ok(())
    }
}

// ─── Audit log ───

#[derive(Default)]
pub struct MockAuditLog {
    pub entries: Mutex<Vec<AuditEntry>>,
}

#[async_trait]
impl AuditLog for MockAuditLog {
    async fn append(&self, entry: &AuditEntry) -> Result<(), DomainError> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<AuditEntry>, DomainError> {
        let entries = self.entries.lock().unwrap();
        Ok(entries.iter().rev().take(limit as usize).cloned().collect())
    }
}

// ─── Subscription reader ───

#[derive(Default)]
pub struct MockSubscriptionReader {
    pub view: Mutex<Option<SubscriptionView>>,
}

impl MockSubscriptionReader {
    pub fn with(view: SubscriptionView) -> Self {
        Self {
            view: Mutex::new(Some(view)),
        }
    }
}

#[async_trait]
impl SubscriptionReader for MockSubscriptionReader {
    async fn current_for_provider(
        &self,
        _provider_id: ProviderId,
        _now: Timestamp,
    ) -> Result<Option<SubscriptionView>, DomainError> {
        Ok(self.view.lock().unwrap().clone())
    }
}
