//! Identity-field normalization.
//!
//! All three normalizers are total and idempotent: they never fail, empty
//! input yields an empty string, and re-normalizing a normalized value is a
//! no-op. The comparison layer depends on both properties.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use prospekt_core::LeadRecord;

/// Legal-entity suffixes stripped from company names as whole tokens.
const COMPANY_SUFFIXES: &[&str] = &[
    "inc",
    "llc",
    "corp",
    "ltd",
    "co",
    "group",
    "holding",
    "international",
    "global",
    "solutions",
    "services",
    "systems",
    "technologies",
];

/// Honorifics and generational suffixes stripped from person names.
const PERSON_TOKENS: &[&str] = &["jr", "sr", "dr", "mr", "mrs", "ms", "ii", "iii", "iv"];

/// Mail providers known to support `local+tag@domain` addressing.
const TAG_ADDRESSING_PROVIDERS: &[&str] = &[
    "gmail.com",
    "googlemail.com",
    "outlook.com",
    "hotmail.com",
    "live.com",
    "fastmail.com",
    "protonmail.com",
    "proton.me",
    "icloud.com",
];

/// Lowercase, replace non-word characters with spaces, collapse whitespace.
fn squash_non_word(s: &str) -> String {
    let spaced: String = s
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    spaced
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drop whole tokens found in `stop_list`.
fn strip_tokens(s: &str, stop_list: &[&str]) -> String {
    s.split_whitespace()
        .filter(|token| !stop_list.contains(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Canonical comparable form of a company name.
///
/// ```
/// use prospekt_dedup::normalize_company;
///
/// assert_eq!(normalize_company("TechCorp, Inc."), "techcorp");
/// assert_eq!(normalize_company("Acme Global Solutions LLC"), "acme");
/// ```
#[must_use]
pub fn normalize_company(raw: &str) -> String {
    strip_tokens(&squash_non_word(raw), COMPANY_SUFFIXES)
}

/// Canonical comparable form of a person name. Diacritics are folded so
/// "García" and "Garcia" compare equal.
///
/// ```
/// use prospekt_dedup::normalize_person;
///
/// assert_eq!(normalize_person("Dr. José García Jr."), "jose garcia");
/// ```
#[must_use]
pub fn normalize_person(raw: &str) -> String {
    let folded: String = raw.nfd().filter(|c| !is_combining_mark(*c)).collect();
    strip_tokens(&squash_non_word(&folded), PERSON_TOKENS)
}

/// Canonical comparable form of an email address. For providers that
/// support tag-addressing the `+tag` suffix of the local part is dropped.
#[must_use]
pub fn normalize_email(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    match lowered.split_once('@') {
        Some((local, domain)) if TAG_ADDRESSING_PROVIDERS.contains(&domain) => {
            let local = local.split('+').next().unwrap_or(local);
            format!("{local}@{domain}")
        }
        _ => lowered,
    }
}

/// The normalized identity fields of a lead. Derived on demand for a single
/// comparison, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedIdentity {
    pub name: String,
    pub company: String,
    pub email: String,
}

impl NormalizedIdentity {
    /// Normalize raw identity fields.
    #[must_use]
    pub fn of(name: &str, company: &str, email: &str) -> Self {
        Self {
            name: normalize_person(name),
            company: normalize_company(company),
            email: normalize_email(email),
        }
    }

    /// Normalize the identity fields of a persisted lead.
    #[must_use]
    pub fn for_lead(lead: &LeadRecord) -> Self {
        Self::of(
            &lead.fields.full_name,
            lead.fields.company(),
            lead.fields.email(),
        )
    }
}
