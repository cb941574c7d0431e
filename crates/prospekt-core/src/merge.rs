//! Merge plans: the atomic unit of change produced by identity resolution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lead::{LeadFields, LeadId};

/// Evidence recorded alongside a merge so the decision is reconstructible
/// after the removed record is gone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeAudit {
    /// Quality score of the surviving record at decision time.
    pub surviving_quality: u8,
    /// Quality score of the removed record at decision time.
    pub removed_quality: u8,
    /// Kind of duplicate match that triggered the merge (wire form).
    pub match_kind: String,
    /// Confidence of the match in `[0, 1]`.
    pub confidence: f64,
    /// When the resolver made the decision.
    pub decided_at: DateTime<Utc>,
}

/// A planned merge of two duplicate leads.
///
/// Inert until applied by the persistence layer: the store updates
/// `surviving_id` with `merged_fields` and deletes `removed_id` in one
/// transaction ([`LeadStore::apply_merge`](crate::store::LeadStore::apply_merge)).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergePlan {
    pub surviving_id: LeadId,
    pub removed_id: LeadId,
    pub merged_fields: LeadFields,
    pub audit: MergeAudit,
}
