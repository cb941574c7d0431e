//! Integration tests for the real-time guard.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use prospekt_core::{
    InMemoryLeadStore, LeadFields, LeadId, LeadRecord, LeadStore, MergePlan,
    Result as StoreResult, StoreError,
};
use prospekt_dedup::{GuardConfig, GuardStatus, RealTimeGuard};

fn fields(name: &str, company: &str, email: &str) -> LeadFields {
    LeadFields {
        full_name: name.to_string(),
        company: (!company.is_empty()).then(|| company.to_string()),
        email: (!email.is_empty()).then(|| email.to_string()),
        ..Default::default()
    }
}

/// Store whose `list_recent` can be made to fail, for refresh-failure
/// scenarios. Every other operation delegates to the in-memory store.
struct FlakyStore {
    inner: InMemoryLeadStore,
    fail_refresh: AtomicBool,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: InMemoryLeadStore::new(),
            fail_refresh: AtomicBool::new(false),
        }
    }

    fn fail_refreshes(&self, fail: bool) {
        self.fail_refresh.store(fail, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl LeadStore for FlakyStore {
    async fn add_lead(&self, fields: LeadFields) -> StoreResult<LeadRecord> {
        self.inner.add_lead(fields).await
    }

    async fn get_lead(&self, id: LeadId) -> StoreResult<Option<LeadRecord>> {
        self.inner.get_lead(id).await
    }

    async fn update_lead(&self, id: LeadId, fields: LeadFields) -> StoreResult<LeadRecord> {
        self.inner.update_lead(id, fields).await
    }

    async fn delete_lead(&self, id: LeadId) -> StoreResult<()> {
        self.inner.delete_lead(id).await
    }

    async fn list_recent(&self, limit: usize) -> StoreResult<Vec<LeadRecord>> {
        if self.fail_refresh.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("simulated outage".to_string()));
        }
        self.inner.list_recent(limit).await
    }

    async fn list_all(&self) -> StoreResult<Vec<LeadRecord>> {
        self.inner.list_all().await
    }

    async fn apply_merge(&self, plan: &MergePlan) -> StoreResult<LeadRecord> {
        self.inner.apply_merge(plan).await
    }
}

/// Store whose `list_recent` hangs long enough to trip the check timeout.
struct SlowStore {
    inner: InMemoryLeadStore,
    delay: Duration,
}

#[async_trait::async_trait]
impl LeadStore for SlowStore {
    async fn add_lead(&self, fields: LeadFields) -> StoreResult<LeadRecord> {
        self.inner.add_lead(fields).await
    }

    async fn get_lead(&self, id: LeadId) -> StoreResult<Option<LeadRecord>> {
        self.inner.get_lead(id).await
    }

    async fn update_lead(&self, id: LeadId, fields: LeadFields) -> StoreResult<LeadRecord> {
        self.inner.update_lead(id, fields).await
    }

    async fn delete_lead(&self, id: LeadId) -> StoreResult<()> {
        self.inner.delete_lead(id).await
    }

    async fn list_recent(&self, limit: usize) -> StoreResult<Vec<LeadRecord>> {
        tokio::time::sleep(self.delay).await;
        self.inner.list_recent(limit).await
    }

    async fn list_all(&self) -> StoreResult<Vec<LeadRecord>> {
        self.inner.list_all().await
    }

    async fn apply_merge(&self, plan: &MergePlan) -> StoreResult<LeadRecord> {
        self.inner.apply_merge(plan).await
    }
}

#[tokio::test]
async fn identical_candidate_is_rejected() {
    let store = Arc::new(InMemoryLeadStore::new());
    let existing = store
        .add_lead(fields("John Smith", "TechCorp Inc", "john@techcorp.com"))
        .await
        .unwrap();

    let guard = RealTimeGuard::new(store.clone(), GuardConfig::default()).unwrap();
    guard.refresh_cache().await.unwrap();

    let decision = guard
        .check(&fields("John Smith", "TechCorp Inc", "john@techcorp.com"))
        .await;

    assert_eq!(decision.status, GuardStatus::Rejected);
    assert_eq!(decision.confidence, 1.0);
    assert_eq!(decision.matched_lead, Some(existing.id));
    assert!(decision.latency < GuardConfig::default().check_timeout);
    assert!(!decision.degraded);
    assert_eq!(store.count().await, 1);
}

#[tokio::test]
async fn unmatched_candidate_is_allowed_and_immediately_visible() {
    let store = Arc::new(InMemoryLeadStore::new());
    let guard = RealTimeGuard::new(store.clone(), GuardConfig::default()).unwrap();

    let first = guard
        .check(&fields("Jane Doe", "Acme LLC", "jane@acme.com"))
        .await;
    assert_eq!(first.status, GuardStatus::Allowed);
    assert!(!first.degraded);
    assert_eq!(store.count().await, 1);

    // The snapshot was updated in place: no TTL refresh has happened, yet
    // the very next check sees the inserted lead.
    let second = guard
        .check(&fields("Jane Doe", "Acme LLC", "jane@acme.com"))
        .await;
    assert_eq!(second.status, GuardStatus::Rejected);
    assert_eq!(store.count().await, 1);
}

#[tokio::test]
async fn near_duplicate_is_merged_into_the_existing_lead() {
    let store = Arc::new(InMemoryLeadStore::new());
    let existing = store
        .add_lead(fields("Katherine Johnson", "Northpoint", ""))
        .await
        .unwrap();

    let guard = RealTimeGuard::new(store.clone(), GuardConfig::default()).unwrap();
    guard.refresh_cache().await.unwrap();

    // Name and company ratios are both ~0.91, so the fuzzy-name confidence
    // lands in the merge band below the 0.95 reject line.
    let candidate = LeadFields {
        phone: Some("+1 555 0100".to_string()),
        ..fields("Catherine Jonson", "North Pointe", "")
    };
    let decision = guard.check(&candidate).await;

    assert_eq!(decision.status, GuardStatus::MergeRecommended);
    assert_eq!(decision.matched_lead, Some(existing.id));
    assert!(decision.confidence >= 0.90 && decision.confidence < 0.95);

    // The candidate was folded into the existing record, not inserted.
    assert_eq!(store.count().await, 1);
    let merged = store.get_lead(existing.id).await.unwrap().unwrap();
    assert_eq!(merged.fields.full_name, "Katherine Johnson");
    assert_eq!(merged.fields.phone(), "+1 555 0100");

    // The merged record is what subsequent checks compare against.
    let repeat = guard.check(&candidate).await;
    assert_ne!(repeat.status, GuardStatus::Allowed);
    assert_eq!(store.count().await, 1);
}

#[tokio::test]
async fn borderline_match_is_held_for_review() {
    let store = Arc::new(InMemoryLeadStore::new());
    store
        .add_lead(fields("Katherine Johnson", "Crystal Springs", ""))
        .await
        .unwrap();

    let guard = RealTimeGuard::new(store.clone(), GuardConfig::default()).unwrap();
    guard.refresh_cache().await.unwrap();

    // Both thresholds clear (name ~0.91, company ~0.87) but the averaged
    // confidence stays under the 0.90 merge band.
    let decision = guard
        .check(&fields("Catherine Jonson", "Cristal Springz", ""))
        .await;

    assert_eq!(decision.status, GuardStatus::ReviewRequired);
    assert!(decision.confidence < 0.90);
    assert!(decision.matched_lead.is_some());
    // Held, not persisted.
    assert_eq!(store.count().await, 1);
}

#[tokio::test]
async fn refresh_failure_degrades_but_still_decides() {
    let store = Arc::new(FlakyStore::new());
    store
        .add_lead(fields("John Smith", "TechCorp Inc", "john@techcorp.com"))
        .await
        .unwrap();

    let config = GuardConfig {
        cache_ttl: Duration::from_millis(50),
        ..GuardConfig::default()
    };
    let guard = RealTimeGuard::new(store.clone(), config).unwrap();
    guard.refresh_cache().await.unwrap();

    store.fail_refreshes(true);
    tokio::time::sleep(Duration::from_millis(80)).await;

    // The stale snapshot still catches the duplicate.
    let duplicate = guard
        .check(&fields("John Smith", "TechCorp Inc", "john@techcorp.com"))
        .await;
    assert_eq!(duplicate.status, GuardStatus::Rejected);
    assert!(duplicate.degraded);

    // A fresh candidate is still allowed and persisted.
    let fresh = guard
        .check(&fields("Bob Lee", "Zenith Labs", "bob@zenithlabs.com"))
        .await;
    assert_eq!(fresh.status, GuardStatus::Allowed);
    assert!(fresh.degraded);
    assert_eq!(store.inner.count().await, 2);
}

#[tokio::test]
async fn slow_refresh_times_out_to_allow() {
    let store = Arc::new(SlowStore {
        inner: InMemoryLeadStore::new(),
        delay: Duration::from_millis(500),
    });
    let config = GuardConfig {
        check_timeout: Duration::from_millis(50),
        ..GuardConfig::default()
    };
    let guard = RealTimeGuard::new(store.clone(), config).unwrap();

    let decision = guard
        .check(&fields("Jane Doe", "Acme LLC", "jane@acme.com"))
        .await;

    assert_eq!(decision.status, GuardStatus::Allowed);
    assert!(decision.degraded);
    // Ingestion proceeded despite the hung refresh.
    assert_eq!(store.inner.count().await, 1);
}

#[tokio::test]
async fn invalid_configuration_is_fatal_at_construction() {
    let store: Arc<dyn LeadStore> = Arc::new(InMemoryLeadStore::new());
    let config = GuardConfig {
        reject_confidence: 1.5,
        ..GuardConfig::default()
    };
    assert!(RealTimeGuard::new(store, config).is_err());
}
