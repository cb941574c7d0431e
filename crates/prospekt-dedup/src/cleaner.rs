//! Offline batch cleanup of an entire lead set.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use prospekt_core::{LeadId, LeadRecord, LeadStore};

use crate::classify::{Classifier, MatchKind};
use crate::config::ThresholdProfile;
use crate::error::{ConfigError, Result};
use crate::merge::resolve;

/// Aggregate statistics for one cleaning run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleaningReport {
    /// Leads read at the start of the run.
    pub examined: usize,
    /// Pairs classified as exact duplicates.
    pub exact_duplicates: usize,
    /// Pairs classified as fuzzy duplicates.
    pub fuzzy_duplicates: usize,
    /// Merges applied.
    pub merged: usize,
    /// Records deleted (always one per merge).
    pub deleted: usize,
    /// Leads remaining after the run.
    pub final_count: usize,
    /// Wall-clock duration of the run.
    pub duration_ms: u64,
    /// Whether the run stopped early on the cancellation signal.
    pub cancelled: bool,
}

/// Offline duplicate cleaner.
///
/// Runs the classifier pairwise over the full lead set with the batch
/// threshold profile and applies a merge for every match. O(n^2)
/// comparisons, acceptable offline; the real-time path uses
/// [`RealTimeGuard`](crate::guard::RealTimeGuard) instead. The cleaner
/// works from a caller-supplied consistent read of the lead set and never
/// shares the guard's cache.
pub struct BatchCleaner {
    store: Arc<dyn LeadStore>,
    classifier: Classifier,
}

impl BatchCleaner {
    /// Create a cleaner over a store with the given threshold profile.
    pub fn new(
        store: Arc<dyn LeadStore>,
        profile: ThresholdProfile,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            store,
            classifier: Classifier::new(profile)?,
        })
    }

    /// Classify every pair, merge every duplicate, and report aggregate
    /// counts.
    ///
    /// The caller supplies the lead set as its own consistent read, e.g.
    /// `list_all` inside one transaction; merges are written back through
    /// the store. The cancellation token is checked between pairwise
    /// comparisons; a cancelled run returns the partial report with
    /// `cancelled` set. Re-running on the cleaner's own output is a fixed
    /// point: a clean set produces zero additional merges.
    pub async fn clean_all(
        &self,
        mut leads: Vec<LeadRecord>,
        cancel: &CancellationToken,
    ) -> Result<CleaningReport> {
        let started = Instant::now();

        let mut report = CleaningReport {
            examined: leads.len(),
            ..Default::default()
        };
        let mut removed: HashSet<LeadId> = HashSet::new();

        'outer: for i in 0..leads.len() {
            if removed.contains(&leads[i].id) {
                continue;
            }
            for j in (i + 1)..leads.len() {
                if cancel.is_cancelled() {
                    report.cancelled = true;
                    break 'outer;
                }
                if removed.contains(&leads[j].id) {
                    continue;
                }

                let Some(found) = self.classifier.classify(&leads[i], &leads[j]) else {
                    continue;
                };
                match found.kind {
                    MatchKind::Exact => report.exact_duplicates += 1,
                    MatchKind::FuzzyName | MatchKind::FuzzyEmail => {
                        report.fuzzy_duplicates += 1;
                    }
                }

                let plan = resolve(&found, &leads[i], &leads[j]);
                let survivor = self.store.apply_merge(&plan).await?;
                removed.insert(plan.removed_id);
                report.merged += 1;
                report.deleted += 1;

                // Later comparisons must see the merged field values.
                if plan.surviving_id == leads[i].id {
                    leads[i] = survivor;
                } else {
                    leads[j] = survivor;
                    // Row `i` was consumed by the merge.
                    continue 'outer;
                }
            }
        }

        report.final_count = report.examined - report.deleted;
        report.duration_ms = started.elapsed().as_millis() as u64;

        info!(
            examined = report.examined,
            exact = report.exact_duplicates,
            fuzzy = report.fuzzy_duplicates,
            merged = report.merged,
            final_count = report.final_count,
            duration_ms = report.duration_ms,
            cancelled = report.cancelled,
            "Lead cleaning pass finished"
        );

        Ok(report)
    }
}
