//! Identity signatures for O(1) exact-duplicate lookup.

use std::fmt;

use crate::normalize::NormalizedIdentity;

/// 128-bit digest of a lead's normalized identity fields.
///
/// Deterministic: equal normalized fields always produce the same
/// signature, and computation is total (empty fields are valid input). The
/// fields are joined with `|`, which never survives normalization, so
/// distinct field sets cannot collide by concatenation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; 16]);

impl Signature {
    /// Compute the signature of a normalized identity.
    #[must_use]
    pub fn compute(identity: &NormalizedIdentity) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(identity.name.as_bytes());
        hasher.update(b"|");
        hasher.update(identity.company.as_bytes());
        hasher.update(b"|");
        hasher.update(identity.email.as_bytes());

        let digest = hasher.finalize();
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest.as_bytes()[..16]);
        Self(bytes)
    }

    /// The raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_identities_produce_equal_signatures() {
        let a = NormalizedIdentity::of("John Smith", "TechCorp Inc", "john@techcorp.com");
        let b = NormalizedIdentity::of("john  SMITH", "Techcorp, LLC", "John@Techcorp.COM");
        assert_eq!(a, b);
        assert_eq!(Signature::compute(&a), Signature::compute(&b));
    }

    #[test]
    fn distinct_identities_produce_distinct_signatures() {
        let a = NormalizedIdentity::of("John Smith", "TechCorp", "john@techcorp.com");
        let b = NormalizedIdentity::of("Jane Doe", "TechCorp", "jane@techcorp.com");
        assert_ne!(Signature::compute(&a), Signature::compute(&b));
    }

    #[test]
    fn empty_fields_are_valid_input() {
        let empty = NormalizedIdentity::of("", "", "");
        let sig = Signature::compute(&empty);
        assert_eq!(sig, Signature::compute(&empty));
        assert_eq!(sig.to_string().len(), 32);
    }

    #[test]
    fn field_boundaries_do_not_collide() {
        // "ab" + "" must differ from "a" + "b" across the separator.
        let a = Signature::compute(&NormalizedIdentity::of("ab", "", "x@y.com"));
        let b = Signature::compute(&NormalizedIdentity::of("a", "b", "x@y.com"));
        assert_ne!(a, b);
    }
}
