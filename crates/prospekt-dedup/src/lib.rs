//! Identity resolution and deduplication for Prospekt lead records.
//!
//! Guarantees that no two records describing the same person/company pair
//! are persisted as separate canonical entries. The engine is pure domain
//! logic: it reads and writes lead field values through the
//! [`LeadStore`](prospekt_core::LeadStore) boundary and never owns storage.
//!
//! # Pipeline
//!
//! - [`normalize`] - canonical comparable forms for names, companies, and
//!   email addresses.
//! - [`similarity`] - gestalt (Ratcliff-Obershelp) string ratio in `[0, 1]`.
//! - [`signature`] - 128-bit digest of the normalized identity for O(1)
//!   exact-duplicate lookup.
//! - [`classify`] - exact and fuzzy duplicate classification with
//!   configurable threshold profiles.
//! - [`quality`] - completeness score used to pick a merge survivor.
//! - [`merge`] - resolves a classified duplicate into an inert
//!   [`MergePlan`](prospekt_core::MergePlan) applied by the store.
//! - [`cleaner`] - offline O(n^2) cleanup pass over the full lead set.
//! - [`guard`] - real-time duplicate prevention in front of every insert,
//!   backed by a TTL-refreshed snapshot of recent leads.
//!
//! # Configuration
//!
//! Thresholds, cache sizing, and the real-time timeout are injected through
//! [`ThresholdProfile`] and [`GuardConfig`]; invalid configuration is
//! rejected at construction time and nothing is read from globals.

pub mod classify;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod guard;
pub mod merge;
pub mod normalize;
pub mod quality;
pub mod signature;
pub mod similarity;

pub use classify::{
    Classifier, DuplicateMatch, FieldMatch, MatchEvidence, MatchKind, RecommendedAction,
};
pub use cleaner::{BatchCleaner, CleaningReport};
pub use config::{GuardConfig, ThresholdProfile};
pub use error::{ConfigError, DedupError, Result};
pub use guard::{GuardDecision, GuardStatus, RealTimeGuard};
pub use merge::resolve;
pub use normalize::{
    normalize_company, normalize_email, normalize_person, NormalizedIdentity,
};
pub use quality::quality_score;
pub use signature::Signature;
pub use similarity::similarity;
