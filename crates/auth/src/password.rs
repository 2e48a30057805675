//! Salted password hashing with a configurable work factor.

use thiserror::Error;

pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("hash cost {0} outside {MIN_COST}..={MAX_COST}")]
    InvalidCost(u32),

    /// The stored hash is not a well-formed bcrypt string.
    #[error("malformed credential hash: {0}")]
    MalformedHash(String),

    #[error("hashing failed: {0}")]
    Hashing(String),
}

/// One-way credential hashing.
///
/// Both operations are CPU-bound; async callers should run them on a blocking
/// thread.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, CredentialError>;

    /// `Ok(false)` on a mismatch; `Err` only when `hash` itself is unusable.
    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, CredentialError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Result<Self, CredentialError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(CredentialError::InvalidCost(cost));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl CredentialHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> Result<String, CredentialError> {
        bcrypt::hash(plaintext, self.cost).map_err(|e| CredentialError::Hashing(e.to_string()))
    }

    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, CredentialError> {
        bcrypt::verify(plaintext, hash).map_err(|e| {
            tracing::debug!(error = %e, "credential hash rejected");
            CredentialError::MalformedHash(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> BcryptHasher {
        BcryptHasher::new(MIN_COST).unwrap()
    }

    #[test]
    fn hash_then_verify_matches_only_the_same_secret() {
        let h = hasher();
        let stored = h.hash("correct horse").unwrap();

        assert_ne!(stored, "correct horse");
        assert!(h.verify("correct horse", &stored).unwrap());
        assert!(!h.verify("battery staple", &stored).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let h = hasher();
        assert_ne!(h.hash("same").unwrap(), h.hash("same").unwrap());
    }

    #[test]
    fn cost_is_embedded_in_the_hash() {
        let stored = BcryptHasher::new(5).unwrap().hash("pw").unwrap();
        assert!(stored.starts_with("$2b$05$"));
    }

    #[test]
    fn verifying_against_garbage_is_an_error() {
        let err = hasher().verify("pw", "not-a-hash").unwrap_err();
        assert!(matches!(err, CredentialError::MalformedHash(_)));
    }

    #[test]
    fn out_of_range_cost_is_rejected() {
        assert!(matches!(BcryptHasher::new(3), Err(CredentialError::InvalidCost(3))));
        assert!(matches!(BcryptHasher::new(32), Err(CredentialError::InvalidCost(32))));
        assert_eq!(BcryptHasher::new(10).unwrap().cost(), 10);
    }
}
