//! Salted password hashing for stored user credentials.
//!
//! Passwords are hashed with bcrypt. A [`HashRecord`] is the encoded
//! output (algorithm tag, cost, salt and digest) and is meant to be stored
//! as-is and handed back to [`is_valid`] on login.

pub mod hasher;
pub mod record;

pub use bcrypt::DEFAULT_COST;
pub use hasher::{hash_password, is_valid, PasswordHasher, MAX_COST, MIN_COST};
pub use record::HashRecord;

/// bcrypt ignores everything past this many bytes of input.
pub const MAX_PASSWORD_BYTES: usize = 72;
