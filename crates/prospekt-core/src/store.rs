//! Pluggable lead storage backends.
//!
//! The persistence layer owns record identity and atomicity. Every write is
//! a single short transaction supplied by the backend; the engine never
//! holds a long-lived lock on it.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{Result, StoreError};
use crate::lead::{LeadFields, LeadId, LeadRecord};
use crate::merge::MergePlan;

/// Trait for lead storage backends.
#[async_trait::async_trait]
pub trait LeadStore: Send + Sync {
    /// Insert a new lead, minting its identifier and timestamps.
    async fn add_lead(&self, fields: LeadFields) -> Result<LeadRecord>;

    /// Fetch a lead by id.
    async fn get_lead(&self, id: LeadId) -> Result<Option<LeadRecord>>;

    /// Replace a lead's field set.
    async fn update_lead(&self, id: LeadId, fields: LeadFields) -> Result<LeadRecord>;

    /// Delete a lead.
    async fn delete_lead(&self, id: LeadId) -> Result<()>;

    /// The `limit` most recently persisted leads, newest first.
    async fn list_recent(&self, limit: usize) -> Result<Vec<LeadRecord>>;

    /// Every persisted lead, oldest first.
    async fn list_all(&self) -> Result<Vec<LeadRecord>>;

    /// Apply a merge plan atomically: update the survivor with the merged
    /// fields and delete the removed record in one transaction. Returns the
    /// updated survivor.
    async fn apply_merge(&self, plan: &MergePlan) -> Result<LeadRecord>;
}

/// In-memory lead store for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemoryLeadStore {
    leads: Arc<RwLock<HashMap<LeadId, LeadRecord>>>,
}

impl InMemoryLeadStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            leads: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of leads currently stored.
    pub async fn count(&self) -> usize {
        self.leads.read().await.len()
    }

    /// Remove every lead (for testing).
    pub async fn clear(&self) {
        self.leads.write().await.clear();
    }
}

#[async_trait::async_trait]
impl LeadStore for InMemoryLeadStore {
    async fn add_lead(&self, fields: LeadFields) -> Result<LeadRecord> {
        let now = Utc::now();
        let record = LeadRecord {
            id: LeadId::new(),
            fields,
            created_at: now,
            updated_at: now,
        };
        self.leads.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_lead(&self, id: LeadId) -> Result<Option<LeadRecord>> {
        Ok(self.leads.read().await.get(&id).cloned())
    }

    async fn update_lead(&self, id: LeadId, fields: LeadFields) -> Result<LeadRecord> {
        let mut leads = self.leads.write().await;
        let record = leads.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        record.fields = fields;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete_lead(&self, id: LeadId) -> Result<()> {
        self.leads
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<LeadRecord>> {
        let leads = self.leads.read().await;
        let mut records: Vec<_> = leads.values().cloned().collect();
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        records.truncate(limit);
        Ok(records)
    }

    async fn list_all(&self) -> Result<Vec<LeadRecord>> {
        let leads = self.leads.read().await;
        let mut records: Vec<_> = leads.values().cloned().collect();
        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(records)
    }

    async fn apply_merge(&self, plan: &MergePlan) -> Result<LeadRecord> {
        // Single critical section: both mutations or neither.
        let mut leads = self.leads.write().await;
        if !leads.contains_key(&plan.removed_id) {
            return Err(StoreError::NotFound(plan.removed_id));
        }
        let Some(survivor) = leads.get_mut(&plan.surviving_id) else {
            return Err(StoreError::NotFound(plan.surviving_id));
        };
        survivor.fields = plan.merged_fields.clone();
        survivor.updated_at = Utc::now();
        let updated = survivor.clone();

        leads.remove(&plan.removed_id);
        Ok(updated)
    }
}
