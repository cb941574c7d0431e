//! Merge resolution: turning a classified duplicate into a merge plan.

use chrono::Utc;

use prospekt_core::{LeadFields, LeadRecord, MergeAudit, MergePlan};

use crate::classify::DuplicateMatch;
use crate::quality::quality_score;

/// Resolve a classified duplicate into an inert [`MergePlan`].
///
/// The survivor is the record with the higher quality score; ties fall to
/// the earlier `created_at`, then to the smaller id so resolution is fully
/// deterministic. The merged field set starts from the survivor and
/// backfills every field the survivor is missing from the loser, which
/// guarantees the merged record scores at least as high as either input.
///
/// The plan performs no I/O; the persistence layer applies it atomically.
#[must_use]
pub fn resolve(found: &DuplicateMatch, a: &LeadRecord, b: &LeadRecord) -> MergePlan {
    let quality_a = quality_score(a);
    let quality_b = quality_score(b);

    let a_survives = match quality_a.cmp(&quality_b) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => match a.created_at.cmp(&b.created_at) {
            std::cmp::Ordering::Less => true,
            std::cmp::Ordering::Greater => false,
            std::cmp::Ordering::Equal => a.id <= b.id,
        },
    };

    let (survivor, loser, surviving_quality, removed_quality) = if a_survives {
        (a, b, quality_a, quality_b)
    } else {
        (b, a, quality_b, quality_a)
    };

    MergePlan {
        surviving_id: survivor.id,
        removed_id: loser.id,
        merged_fields: merge_fields(&survivor.fields, &loser.fields),
        audit: MergeAudit {
            surviving_quality,
            removed_quality,
            match_kind: found.kind.to_string(),
            confidence: found.confidence,
            decided_at: Utc::now(),
        },
    }
}

/// Combine two field sets, keeping the survivor's values and backfilling
/// the rest. Notes are concatenated with duplicate lines dropped rather
/// than overwritten. Also used by the real-time guard when it folds an
/// unpersisted candidate into an existing lead.
pub(crate) fn merge_fields(survivor: &LeadFields, other: &LeadFields) -> LeadFields {
    let mut merged = survivor.clone();

    if merged.full_name.trim().is_empty() && !other.full_name.trim().is_empty() {
        merged.full_name = other.full_name.clone();
    }

    // The confidence tag travels with the email it describes.
    if survivor.email().trim().is_empty() && !other.email().trim().is_empty() {
        merged.email = other.email.clone();
        merged.email_confidence = other.email_confidence;
    }

    backfill(&mut merged.company, &other.company);
    backfill(&mut merged.phone, &other.phone);
    backfill(&mut merged.linkedin_url, &other.linkedin_url);
    backfill(&mut merged.title, &other.title);
    backfill(&mut merged.website, &other.website);
    backfill(&mut merged.business_type, &other.business_type);

    merged.notes = merge_notes(survivor.notes(), other.notes());

    merged
}

fn backfill(target: &mut Option<String>, source: &Option<String>) {
    let target_empty = target.as_deref().is_none_or(|s| s.trim().is_empty());
    if !target_empty {
        return;
    }
    if let Some(value) = source {
        if !value.trim().is_empty() {
            *target = Some(value.clone());
        }
    }
}

fn merge_notes(first: &str, second: &str) -> Option<String> {
    let mut lines: Vec<&str> = Vec::new();
    for line in first.lines().chain(second.lines()) {
        let line = line.trim();
        if !line.is_empty() && !lines.contains(&line) {
            lines.push(line);
        }
    }
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}
