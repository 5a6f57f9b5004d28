//! bcrypt password hashing.

use crate::record::HashRecord;
use crate::MAX_PASSWORD_BYTES;
use piiguard_common::{Error, Result};
use tracing::{debug, trace};

/// Lowest cost bcrypt accepts.
pub const MIN_COST: u32 = 4;

/// Highest cost bcrypt accepts.
pub const MAX_COST: u32 = 31;

/// Hashes and verifies passwords at a fixed cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A hasher using `cost` rounds (2^cost iterations).
    pub fn with_cost(cost: u32) -> Result<Self> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(Error::Config(format!(
                "bcrypt cost must be between {} and {}, got {}",
                MIN_COST, MAX_COST, cost
            )));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash `plaintext` with a freshly generated salt.
    ///
    /// Hashing the same password twice gives two different records.
    pub fn hash(&self, plaintext: &str) -> Result<HashRecord> {
        check_plaintext(plaintext)?;

        debug!(cost = self.cost, "Hashing password");
        let encoded =
            bcrypt::hash(plaintext, self.cost).map_err(|e| Error::Hashing(e.to_string()))?;

        Ok(HashRecord::from_encoded(encoded))
    }

    /// Check `plaintext` against a stored record.
    ///
    /// A mismatch is `Ok(false)`. Only a record bcrypt cannot decode is an
    /// error. The cost is taken from the record, not from `self`.
    pub fn verify(&self, record: &HashRecord, plaintext: &str) -> Result<bool> {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            // Such a password could never have been hashed here.
            trace!("Rejecting over-long password");
            return Ok(false);
        }

        bcrypt::verify(plaintext, record.as_str()).map_err(|e| Error::InvalidRecord(e.to_string()))
    }
}

fn check_plaintext(plaintext: &str) -> Result<()> {
    if plaintext.is_empty() {
        return Err(Error::InvalidArgument("password must not be empty".into()));
    }
    if plaintext.len() > MAX_PASSWORD_BYTES {
        return Err(Error::InvalidArgument(format!(
            "password is {} bytes, bcrypt only uses the first {}",
            plaintext.len(),
            MAX_PASSWORD_BYTES
        )));
    }
    Ok(())
}

/// Hash a password at the default cost.
pub fn hash_password(plaintext: &str) -> Result<HashRecord> {
    PasswordHasher::default().hash(plaintext)
}

/// Check a password against a stored hash record.
///
/// Returns `Err(Error::InvalidRecord)` if `hash_record` is not a bcrypt
/// hash; otherwise whether the password matches.
pub fn is_valid(hash_record: impl AsRef<str>, plaintext: &str) -> Result<bool> {
    let record: HashRecord = hash_record.as_ref().parse()?;
    PasswordHasher::default().verify(&record, plaintext)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> PasswordHasher {
        PasswordHasher::with_cost(MIN_COST).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = fast();
        let record = hasher.hash("secure_password_123").unwrap();

        assert!(hasher.verify(&record, "secure_password_123").unwrap());
        assert!(!hasher.verify(&record, "wrong_password").unwrap());
        assert!(!hasher.verify(&record, "").unwrap());
    }

    #[test]
    fn test_concrete_case_at_default_cost() {
        let record = hash_password("Secr3t!").unwrap();
        assert_eq!(record.cost(), bcrypt::DEFAULT_COST);
        assert!(is_valid(&record, "Secr3t!").unwrap());
        assert!(!is_valid(&record, "wrong").unwrap());
    }

    #[test]
    fn test_same_password_gets_fresh_salt() {
        let hasher = fast();
        let first = hasher.hash("Secr3t!").unwrap();
        let second = hasher.hash("Secr3t!").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify(&first, "Secr3t!").unwrap());
        assert!(hasher.verify(&second, "Secr3t!").unwrap());
    }

    #[test]
    fn test_distinct_passwords_do_not_cross_verify() {
        let hasher = fast();
        let passwords = ["a", "A", "a ", "pässwörd", "hunter2", "hunter3"];
        let records: Vec<_> = passwords.iter().map(|p| hasher.hash(p).unwrap()).collect();

        for (i, record) in records.iter().enumerate() {
            for (j, candidate) in passwords.iter().enumerate() {
                assert_eq!(hasher.verify(record, candidate).unwrap(), i == j);
            }
        }
    }

    #[test]
    fn test_record_layout() {
        let record = fast().hash("hunter2").unwrap();
        assert_eq!(record.as_str().len(), 60);
        assert!(record.as_str().starts_with("$2b$04$"));
        assert_eq!(record.cost(), 4);

        let reparsed: HashRecord = record.as_str().parse().unwrap();
        assert_eq!(reparsed, record);
    }

    #[test]
    fn test_verify_uses_cost_from_record() {
        let record = fast().hash("hunter2").unwrap();
        let other = PasswordHasher::with_cost(5).unwrap();
        assert!(other.verify(&record, "hunter2").unwrap());
    }

    #[test]
    fn test_empty_password_rejected() {
        let err = fast().hash("").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_overlong_password_rejected() {
        let long = "x".repeat(MAX_PASSWORD_BYTES + 1);
        let err = fast().hash(&long).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let exact = "x".repeat(MAX_PASSWORD_BYTES);
        let record = fast().hash(&exact).unwrap();
        assert!(fast().verify(&record, &exact).unwrap());
        assert!(!fast().verify(&record, &long).unwrap());
    }

    #[test]
    fn test_malformed_record_is_an_error() {
        let err = is_valid("not-a-hash", "hunter2").unwrap_err();
        assert!(matches!(err, Error::InvalidRecord(_)));
    }

    #[test]
    fn test_cost_bounds() {
        assert!(PasswordHasher::with_cost(MIN_COST - 1).is_err());
        assert!(PasswordHasher::with_cost(MAX_COST + 1).is_err());
        assert_eq!(PasswordHasher::with_cost(10).unwrap().cost(), 10);
        assert_eq!(PasswordHasher::new().cost(), bcrypt::DEFAULT_COST);
    }
}
