//! Core data model and persistence boundary for Prospekt.
//!
//! This crate defines the lead record types shared across the platform and
//! the [`LeadStore`] trait that abstracts the persistence layer. The
//! identity-resolution engine (`prospekt-dedup`) consumes these types and
//! never talks to a database directly: all writes go through short,
//! store-supplied transactions such as [`LeadStore::apply_merge`].
//!
//! # Types
//!
//! - [`LeadRecord`] / [`LeadFields`] - a persisted lead and its mutable
//!   field set. Identifiers and timestamps are minted by the store only.
//! - [`MergePlan`] / [`MergeAudit`] - the atomic unit of change produced by
//!   the merge resolver and applied by the store.
//! - [`LeadStore`] - pluggable storage backend trait, with
//!   [`InMemoryLeadStore`] as the reference implementation for tests and
//!   embedding.

pub mod error;
pub mod lead;
pub mod merge;
pub mod store;

pub use error::{Result, StoreError};
pub use lead::{EmailConfidence, LeadFields, LeadId, LeadRecord};
pub use merge::{MergeAudit, MergePlan};
pub use store::{InMemoryLeadStore, LeadStore};
