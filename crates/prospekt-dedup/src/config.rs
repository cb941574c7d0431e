//! Injected configuration for classification and the real-time guard.
//!
//! The shipped defaults were inherited from the previous cleaner, not from
//! any documented calibration; treat them as tunable starting points.

use std::time::Duration;

use crate::error::ConfigError;

/// Similarity thresholds for duplicate classification.
///
/// Two profiles ship by default. The [`batch`](Self::batch) profile favors
/// recall for offline cleanup where a human reviews the result; the
/// [`strict`](Self::strict) profile favors precision in the real-time path,
/// where rejecting a legitimate new lead is more costly than leaving a
/// borderline duplicate for the next batch pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdProfile {
    /// Minimum person-name similarity for a fuzzy-name match.
    pub name: f64,
    /// Minimum company similarity for a fuzzy-name match.
    pub company: f64,
    /// Minimum email similarity for a fuzzy-email match.
    pub email: f64,
}

impl ThresholdProfile {
    /// Profile used by the offline batch cleaner.
    #[must_use]
    pub fn batch() -> Self {
        Self {
            name: 0.85,
            company: 0.80,
            email: 0.90,
        }
    }

    /// Profile used by the real-time guard.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            name: 0.90,
            company: 0.85,
            email: 0.95,
        }
    }

    /// Reject thresholds outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("name", self.name),
            ("company", self.company),
            ("email", self.email),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }
        Ok(())
    }
}

/// Configuration for the real-time guard.
#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Threshold profile for classification against the cache.
    pub thresholds: ThresholdProfile,
    /// Maximum number of recent leads held in the cache.
    pub cache_size: usize,
    /// Snapshot age after which a refresh is attempted.
    pub cache_ttl: Duration,
    /// Hard ceiling on a single `check` call, after which it degrades to
    /// an allow decision rather than blocking ingestion.
    pub check_timeout: Duration,
    /// Confidence at or above which a candidate is rejected outright.
    pub reject_confidence: f64,
    /// Confidence at or above which an immediate merge is performed.
    pub merge_confidence: f64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdProfile::strict(),
            cache_size: 1000,
            cache_ttl: Duration::from_secs(300),
            check_timeout: Duration::from_millis(200),
            reject_confidence: 0.95,
            merge_confidence: 0.90,
        }
    }
}

impl GuardConfig {
    /// Validate every injected value; called by the guard constructor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds.validate()?;
        for (name, value) in [
            ("reject_confidence", self.reject_confidence),
            ("merge_confidence", self.merge_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }
        if self.merge_confidence > self.reject_confidence {
            return Err(ConfigError::InvertedConfidenceBands {
                merge: self.merge_confidence,
                reject: self.reject_confidence,
            });
        }
        if self.cache_size == 0 {
            return Err(ConfigError::ZeroCacheSize);
        }
        if self.cache_ttl.is_zero() {
            return Err(ConfigError::ZeroDuration { name: "cache_ttl" });
        }
        if self.check_timeout.is_zero() {
            return Err(ConfigError::ZeroDuration {
                name: "check_timeout",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_profiles_are_valid() {
        assert!(ThresholdProfile::batch().validate().is_ok());
        assert!(ThresholdProfile::strict().validate().is_ok());
        assert!(GuardConfig::default().validate().is_ok());
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let profile = ThresholdProfile {
            name: 1.2,
            ..ThresholdProfile::batch()
        };
        assert_eq!(
            profile.validate(),
            Err(ConfigError::ThresholdOutOfRange {
                name: "name",
                value: 1.2
            })
        );
    }

    #[test]
    fn inverted_confidence_bands_are_rejected() {
        let config = GuardConfig {
            reject_confidence: 0.80,
            merge_confidence: 0.90,
            ..GuardConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedConfidenceBands { .. })
        ));
    }

    #[test]
    fn zero_cache_and_durations_are_rejected() {
        let config = GuardConfig {
            cache_size: 0,
            ..GuardConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroCacheSize));

        let config = GuardConfig {
            cache_ttl: Duration::ZERO,
            ..GuardConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroDuration { name: "cache_ttl" })
        ));
    }
}
