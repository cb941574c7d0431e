//! Lead quality scoring.
//!
//! A completeness/trust heuristic used to pick the survivor during merges.
//! Not a business-value metric.

use prospekt_core::{EmailConfidence, LeadRecord};

use crate::normalize::normalize_email;

/// Free-mail providers. A corporate email domain earns a bonus because it
/// ties the lead to its company.
const FREE_MAIL_DOMAINS: &[&str] = &[
    "gmail.com",
    "googlemail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "aol.com",
    "icloud.com",
    "mail.com",
    "gmx.com",
    "gmx.net",
    "proton.me",
    "protonmail.com",
    "yandex.com",
    "zoho.com",
    "live.com",
    "msn.com",
];

/// Score a lead's field completeness on a 0-100 scale.
///
/// Weighted sum, capped at 100: +30 for an email (+10 more when its domain
/// is not a free-mail provider), +20 for a phone number, +25 for a LinkedIn
/// URL, +15 for a company, and +10/+7/+3 for a
/// `real`/`pattern`/`low_confidence` email tag. Deterministic and pure.
#[must_use]
pub fn quality_score(lead: &LeadRecord) -> u8 {
    let fields = &lead.fields;
    let mut score: u32 = 0;

    let email = normalize_email(fields.email());
    if !email.is_empty() {
        score += 30;
        if let Some((_, domain)) = email.rsplit_once('@') {
            if !FREE_MAIL_DOMAINS.contains(&domain) {
                score += 10;
            }
        }
    }

    if !fields.phone().trim().is_empty() {
        score += 20;
    }
    if !fields.linkedin_url().trim().is_empty() {
        score += 25;
    }
    if !fields.company().trim().is_empty() {
        score += 15;
    }

    score += match fields.email_confidence {
        Some(EmailConfidence::Real) => 10,
        Some(EmailConfidence::Pattern) => 7,
        Some(EmailConfidence::LowConfidence) => 3,
        None => 0,
    };

    score.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use prospekt_core::{LeadFields, LeadId};

    fn lead(fields: LeadFields) -> LeadRecord {
        LeadRecord {
            id: LeadId::new(),
            fields,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn empty_lead_scores_zero() {
        assert_eq!(quality_score(&lead(LeadFields::default())), 0);
    }

    #[test]
    fn corporate_email_outscores_free_mail() {
        let corporate = lead(LeadFields {
            email: Some("jane@acme.com".to_string()),
            ..Default::default()
        });
        let free = lead(LeadFields {
            email: Some("jane@gmail.com".to_string()),
            ..Default::default()
        });
        assert_eq!(quality_score(&corporate), 40);
        assert_eq!(quality_score(&free), 30);
    }

    #[test]
    fn all_weights_accumulate() {
        let record = lead(LeadFields {
            full_name: "Jane Doe".to_string(),
            company: Some("Acme".to_string()),
            email: Some("jane@acme.com".to_string()),
            phone: Some("+1 555 0100".to_string()),
            linkedin_url: Some("https://linkedin.com/in/janedoe".to_string()),
            email_confidence: Some(EmailConfidence::Pattern),
            ..Default::default()
        });
        // 30 + 10 + 20 + 25 + 15 + 7, capped at 100.
        assert_eq!(quality_score(&record), 100);
    }

    #[test]
    fn confidence_tag_grades_the_score() {
        let with_tag = |tag| {
            lead(LeadFields {
                email: Some("jane@acme.com".to_string()),
                email_confidence: Some(tag),
                ..Default::default()
            })
        };
        assert_eq!(quality_score(&with_tag(EmailConfidence::Real)), 50);
        assert_eq!(quality_score(&with_tag(EmailConfidence::Pattern)), 47);
        assert_eq!(quality_score(&with_tag(EmailConfidence::LowConfidence)), 43);
    }

    #[test]
    fn score_is_capped_at_one_hundred() {
        let record = lead(LeadFields {
            company: Some("Acme".to_string()),
            email: Some("jane@acme.com".to_string()),
            phone: Some("+1 555 0100".to_string()),
            linkedin_url: Some("https://linkedin.com/in/janedoe".to_string()),
            email_confidence: Some(EmailConfidence::Real),
            ..Default::default()
        });
        // Uncapped sum would be 110.
        assert_eq!(quality_score(&record), 100);
    }
}
