//! Exact and fuzzy duplicate classification.
//!
//! Classification is evidence-in, decision-out: no exceptions for control
//! flow, no persistence. A pair either yields a [`DuplicateMatch`] or
//! `None`.

use std::fmt;

use serde::{Deserialize, Serialize};

use prospekt_core::{LeadFields, LeadId, LeadRecord};

use crate::config::ThresholdProfile;
use crate::error::ConfigError;
use crate::normalize::NormalizedIdentity;
use crate::signature::Signature;
use crate::similarity::similarity;

/// Kind of duplicate relationship between two leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Identical normalized identity (signature equality).
    Exact,
    /// Name and company both cleared their similarity thresholds.
    FuzzyName,
    /// Both emails present and similar above the email threshold.
    FuzzyEmail,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::FuzzyName => write!(f, "fuzzy_name"),
            Self::FuzzyEmail => write!(f, "fuzzy_email"),
        }
    }
}

/// What the caller should do with a classified pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    /// Safe to merge or delete automatically.
    MergeOrDelete,
    /// Merge after human review.
    ReviewAndMerge,
}

/// Per-field similarity scores backing a classification.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MatchEvidence {
    pub name_similarity: f64,
    pub company_similarity: f64,
    /// Present only when both records carry an email.
    pub email_similarity: Option<f64>,
    pub signatures_equal: bool,
}

/// A classified duplicate relationship between two field sets, before ids
/// are attached.
#[derive(Debug, Clone)]
pub struct FieldMatch {
    pub kind: MatchKind,
    pub confidence: f64,
    pub evidence: MatchEvidence,
    pub action: RecommendedAction,
}

/// A classified duplicate relationship between two persisted leads.
/// Transient evidence for a merge decision, never persisted directly.
#[derive(Debug, Clone)]
pub struct DuplicateMatch {
    pub lead_a: LeadId,
    pub lead_b: LeadId,
    pub kind: MatchKind,
    pub confidence: f64,
    pub evidence: MatchEvidence,
    pub action: RecommendedAction,
}

/// Duplicate classifier with an injected threshold profile.
#[derive(Debug, Clone)]
pub struct Classifier {
    profile: ThresholdProfile,
}

impl Classifier {
    /// Create a classifier. Invalid thresholds are fatal here, at
    /// construction, never at classification time.
    pub fn new(profile: ThresholdProfile) -> Result<Self, ConfigError> {
        profile.validate()?;
        Ok(Self { profile })
    }

    /// The active threshold profile.
    #[must_use]
    pub fn profile(&self) -> &ThresholdProfile {
        &self.profile
    }

    /// Classify two persisted leads.
    #[must_use]
    pub fn classify(&self, a: &LeadRecord, b: &LeadRecord) -> Option<DuplicateMatch> {
        self.classify_fields(&a.fields, &b.fields)
            .map(|m| DuplicateMatch {
                lead_a: a.id,
                lead_b: b.id,
                kind: m.kind,
                confidence: m.confidence,
                evidence: m.evidence,
                action: m.action,
            })
    }

    /// Classify two field sets. Used by the real-time guard, where the
    /// candidate has no identifier yet.
    #[must_use]
    pub fn classify_fields(&self, a: &LeadFields, b: &LeadFields) -> Option<FieldMatch> {
        let ia = NormalizedIdentity::of(&a.full_name, a.company(), a.email());
        let ib = NormalizedIdentity::of(&b.full_name, b.company(), b.email());

        let signatures_equal = Signature::compute(&ia) == Signature::compute(&ib);
        let name_similarity = similarity(&ia.name, &ib.name);
        let company_similarity = similarity(&ia.company, &ib.company);
        let email_similarity = (!ia.email.is_empty() && !ib.email.is_empty())
            .then(|| similarity(&ia.email, &ib.email));

        let evidence = MatchEvidence {
            name_similarity,
            company_similarity,
            email_similarity,
            signatures_equal,
        };

        if signatures_equal {
            return Some(FieldMatch {
                kind: MatchKind::Exact,
                confidence: 1.0,
                evidence,
                action: RecommendedAction::MergeOrDelete,
            });
        }

        if name_similarity >= self.profile.name && company_similarity >= self.profile.company {
            return Some(FieldMatch {
                kind: MatchKind::FuzzyName,
                confidence: (name_similarity + company_similarity) / 2.0,
                evidence,
                action: RecommendedAction::ReviewAndMerge,
            });
        }

        if let Some(email_similarity) = email_similarity {
            if email_similarity >= self.profile.email {
                return Some(FieldMatch {
                    kind: MatchKind::FuzzyEmail,
                    confidence: email_similarity,
                    evidence,
                    action: RecommendedAction::ReviewAndMerge,
                });
            }
        }

        None
    }
}
