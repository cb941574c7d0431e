//! Real-time duplicate prevention in front of every lead insert.
//!
//! The guard keeps a bounded, TTL-refreshed snapshot of the most recently
//! persisted leads and classifies every candidate against it with the
//! strict threshold profile before a write is allowed. The snapshot is
//! immutable: refresh builds a new one off the hot path and swaps the
//! `Arc` under a narrow write section, so concurrent checks never block on
//! a refresh and never observe a half-built cache.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, warn};

use prospekt_core::{LeadFields, LeadId, LeadRecord, LeadStore};

use crate::classify::{Classifier, MatchKind};
use crate::config::GuardConfig;
use crate::error::{ConfigError, Result};
use crate::merge::merge_fields;

/// Terminal outcome of a real-time duplicate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardStatus {
    /// No duplicate found; the candidate was persisted.
    Allowed,
    /// A confident duplicate exists; nothing was persisted.
    Rejected,
    /// The candidate was folded into an existing lead.
    MergeRecommended,
    /// A borderline match; the candidate is held for manual action.
    ReviewRequired,
}

/// Decision produced for every checked candidate.
#[derive(Debug, Clone, Serialize)]
pub struct GuardDecision {
    pub status: GuardStatus,
    /// The cached lead the decision matched against, if any.
    pub matched_lead: Option<LeadId>,
    /// Confidence of the best match, 0.0 when none.
    pub confidence: f64,
    /// Wall-clock latency of the check.
    pub latency: Duration,
    /// Set when the check timed out, served a stale snapshot, or could not
    /// persist; callers can alert on it.
    pub degraded: bool,
}

/// Immutable snapshot of recently persisted leads.
///
/// A read-optimized candidate set, never the source of truth.
struct CacheSnapshot {
    leads: Vec<LeadRecord>,
    /// `None` until the first successful refresh.
    refreshed_at: Option<Instant>,
}

impl CacheSnapshot {
    fn is_stale(&self, ttl: Duration) -> bool {
        self.refreshed_at.is_none_or(|at| at.elapsed() > ttl)
    }
}

/// Gate in front of every lead-insertion path.
pub struct RealTimeGuard {
    store: Arc<dyn LeadStore>,
    classifier: Classifier,
    config: GuardConfig,
    snapshot: tokio::sync::RwLock<Arc<CacheSnapshot>>,
}

impl RealTimeGuard {
    /// Create a guard over a store. Configuration is validated here;
    /// nothing later can fail fatally.
    pub fn new(store: Arc<dyn LeadStore>, config: GuardConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let classifier = Classifier::new(config.thresholds)?;
        Ok(Self {
            store,
            classifier,
            config,
            snapshot: tokio::sync::RwLock::new(Arc::new(CacheSnapshot {
                leads: Vec::new(),
                refreshed_at: None,
            })),
        })
    }

    /// Check a candidate before insertion.
    ///
    /// Never returns an error: persistence failures degrade the decision
    /// instead of failing the ingestion path, and the whole evaluation runs
    /// under the configured timeout, after which the candidate is allowed
    /// with `degraded` set.
    pub async fn check(&self, candidate: &LeadFields) -> GuardDecision {
        let started = Instant::now();

        let evaluated =
            tokio::time::timeout(self.config.check_timeout, self.evaluate(candidate)).await;

        let (mut decision, matched) = match evaluated {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(
                    timeout_ms = self.config.check_timeout.as_millis() as u64,
                    "Duplicate check timed out; allowing candidate"
                );
                (
                    GuardDecision {
                        status: GuardStatus::Allowed,
                        matched_lead: None,
                        confidence: 0.0,
                        latency: Duration::ZERO,
                        degraded: true,
                    },
                    None,
                )
            }
        };

        match decision.status {
            GuardStatus::Allowed => match self.store.add_lead(candidate.clone()).await {
                Ok(record) => self.publish(record).await,
                Err(e) => {
                    warn!(error = %e, "Failed to persist allowed lead");
                    decision.degraded = true;
                }
            },
            GuardStatus::MergeRecommended => {
                if let Some(existing) = matched {
                    let merged = merge_fields(&existing.fields, candidate);
                    match self.store.update_lead(existing.id, merged).await {
                        Ok(record) => self.replace(record).await,
                        Err(e) => {
                            warn!(
                                lead_id = %existing.id,
                                error = %e,
                                "Failed to merge candidate into existing lead"
                            );
                            decision.degraded = true;
                        }
                    }
                }
            }
            GuardStatus::Rejected | GuardStatus::ReviewRequired => {}
        }

        decision.latency = started.elapsed();
        debug!(
            status = ?decision.status,
            matched_lead = ?decision.matched_lead,
            confidence = decision.confidence,
            latency_us = decision.latency.as_micros() as u64,
            degraded = decision.degraded,
            "Guard decision"
        );
        decision
    }

    /// Rebuild the snapshot from the store. Also callable on a timer.
    pub async fn refresh_cache(&self) -> Result<()> {
        let leads = self.store.list_recent(self.config.cache_size).await?;
        let count = leads.len();
        let fresh = Arc::new(CacheSnapshot {
            leads,
            refreshed_at: Some(Instant::now()),
        });

        *self.snapshot.write().await = fresh;
        debug!(cached = count, "Recent-lead cache refreshed");
        Ok(())
    }

    /// Classify the candidate against the (possibly refreshed) snapshot.
    async fn evaluate(&self, candidate: &LeadFields) -> (GuardDecision, Option<LeadRecord>) {
        let mut degraded = false;

        if self.snapshot.read().await.is_stale(self.config.cache_ttl) {
            if let Err(e) = self.refresh_cache().await {
                // Stale but available beats unavailable.
                warn!(error = %e, "Cache refresh failed; serving previous snapshot");
                degraded = true;
            }
        }

        let snapshot = Arc::clone(&*self.snapshot.read().await);

        let mut best: Option<(&LeadRecord, MatchKind, f64)> = None;
        for lead in &snapshot.leads {
            if let Some(found) = self.classifier.classify_fields(&lead.fields, candidate) {
                let better = best
                    .as_ref()
                    .is_none_or(|(_, _, confidence)| found.confidence > *confidence);
                if better {
                    best = Some((lead, found.kind, found.confidence));
                }
            }
        }

        match best {
            None => (
                GuardDecision {
                    status: GuardStatus::Allowed,
                    matched_lead: None,
                    confidence: 0.0,
                    latency: Duration::ZERO,
                    degraded,
                },
                None,
            ),
            Some((lead, kind, confidence)) => {
                let status = if kind == MatchKind::Exact
                    || confidence >= self.config.reject_confidence
                {
                    GuardStatus::Rejected
                } else if confidence >= self.config.merge_confidence {
                    GuardStatus::MergeRecommended
                } else {
                    GuardStatus::ReviewRequired
                };
                (
                    GuardDecision {
                        status,
                        matched_lead: Some(lead.id),
                        confidence,
                        latency: Duration::ZERO,
                        degraded,
                    },
                    Some(lead.clone()),
                )
            }
        }
    }

    /// Make a just-inserted lead visible to the very next check without
    /// waiting for the TTL refresh.
    async fn publish(&self, lead: LeadRecord) {
        let mut slot = self.snapshot.write().await;
        let mut leads = slot.leads.clone();
        leads.insert(0, lead);
        leads.truncate(self.config.cache_size);
        let refreshed_at = slot.refreshed_at;
        *slot = Arc::new(CacheSnapshot {
            leads,
            refreshed_at,
        });
    }

    /// Swap an updated record into the snapshot after an in-place merge.
    async fn replace(&self, lead: LeadRecord) {
        let mut slot = self.snapshot.write().await;
        let mut leads = slot.leads.clone();
        if let Some(existing) = leads.iter_mut().find(|l| l.id == lead.id) {
            *existing = lead;
        } else {
            leads.insert(0, lead);
            leads.truncate(self.config.cache_size);
        }
        let refreshed_at = slot.refreshed_at;
        *slot = Arc::new(CacheSnapshot {
            leads,
            refreshed_at,
        });
    }
}
