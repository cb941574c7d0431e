//! Lead records and their identity fields.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a lead. Assigned by the persistence layer on
/// insert; the engine never invents identifiers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LeadId(pub Uuid);

impl LeadId {
    /// Create a new random `LeadId`.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID.
    #[must_use]
    pub fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for LeadId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for LeadId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<LeadId> for Uuid {
    fn from(id: LeadId) -> Self {
        id.0
    }
}

/// Confidence tag attached to a discovered email address by upstream
/// enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailConfidence {
    /// Verified against the mail server.
    Real,
    /// Derived from an observed address pattern.
    Pattern,
    /// Guessed with little supporting evidence.
    LowConfidence,
}

impl fmt::Display for EmailConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real => write!(f, "real"),
            Self::Pattern => write!(f, "pattern"),
            Self::LowConfidence => write!(f, "low_confidence"),
        }
    }
}

/// The mutable field set of a lead.
///
/// This is what callers hand to [`LeadStore::add_lead`] and
/// [`LeadStore::update_lead`], and what a [`MergePlan`] carries as the
/// merged result. Empty strings and `None` are treated identically by every
/// consumer.
///
/// [`LeadStore::add_lead`]: crate::store::LeadStore::add_lead
/// [`LeadStore::update_lead`]: crate::store::LeadStore::update_lead
/// [`MergePlan`]: crate::merge::MergePlan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadFields {
    pub full_name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    pub title: Option<String>,
    pub website: Option<String>,
    pub business_type: Option<String>,
    pub notes: Option<String>,
    pub email_confidence: Option<EmailConfidence>,
}

impl LeadFields {
    /// The company name, with `None` collapsed to the empty string.
    #[must_use]
    pub fn company(&self) -> &str {
        self.company.as_deref().unwrap_or("")
    }

    /// The email address, with `None` collapsed to the empty string.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_deref().unwrap_or("")
    }

    /// The phone number, with `None` collapsed to the empty string.
    #[must_use]
    pub fn phone(&self) -> &str {
        self.phone.as_deref().unwrap_or("")
    }

    /// The LinkedIn profile URL, with `None` collapsed to the empty string.
    #[must_use]
    pub fn linkedin_url(&self) -> &str {
        self.linkedin_url.as_deref().unwrap_or("")
    }

    /// Free-form notes, with `None` collapsed to the empty string.
    #[must_use]
    pub fn notes(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }
}

/// A persisted lead record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub id: LeadId,
    pub fields: LeadFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
