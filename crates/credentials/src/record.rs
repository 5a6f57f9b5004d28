//! Encoded password hash records.

use piiguard_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const VERSIONS: [&str; 4] = ["2a", "2b", "2x", "2y"];

/// Length of the salt plus digest in bcrypt's base64 alphabet.
const PAYLOAD_LEN: usize = 53;

/// An encoded bcrypt hash: `$2b$<cost>$<salt><digest>`.
///
/// The contents are opaque; only bcrypt interprets them. Parsing checks
/// the layout so that a corrupt stored value is reported as such instead
/// of as a failed login.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HashRecord(String);

impl HashRecord {
    /// Wrap a record produced by bcrypt itself.
    pub(crate) fn from_encoded(encoded: String) -> Self {
        HashRecord(encoded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// The cost factor the record was hashed with.
    pub fn cost(&self) -> u32 {
        // Layout was checked on construction.
        parse_layout(&self.0).map(|(_, cost)| cost).unwrap_or_default()
    }

    /// The bcrypt version tag, e.g. `2b`.
    pub fn version(&self) -> &str {
        parse_layout(&self.0)
            .map(|(version, _)| version)
            .unwrap_or_default()
    }
}

/// Split a record into its version tag and cost, checking the payload.
fn parse_layout(s: &str) -> Result<(&str, u32)> {
    let invalid = |reason: &str| Error::InvalidRecord(reason.to_string());

    let rest = s
        .strip_prefix('$')
        .ok_or_else(|| invalid("missing leading '$'"))?;
    let mut parts = rest.splitn(3, '$');
    let version = parts.next().unwrap_or_default();
    let cost = parts.next().ok_or_else(|| invalid("missing cost"))?;
    let payload = parts.next().ok_or_else(|| invalid("missing salt and digest"))?;

    if !VERSIONS.contains(&version) {
        return Err(Error::InvalidRecord(format!(
            "unsupported version {:?}",
            version
        )));
    }

    if cost.len() != 2 || !cost.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidRecord(format!("malformed cost {:?}", cost)));
    }
    let cost: u32 = cost
        .parse()
        .map_err(|_| invalid("malformed cost"))?;
    if !(crate::MIN_COST..=crate::MAX_COST).contains(&cost) {
        return Err(Error::InvalidRecord(format!("cost {} out of range", cost)));
    }

    if payload.len() != PAYLOAD_LEN {
        return Err(Error::InvalidRecord(format!(
            "expected {} characters of salt and digest, found {}",
            PAYLOAD_LEN,
            payload.len()
        )));
    }
    if !payload
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'/')
    {
        return Err(invalid("salt or digest outside the bcrypt alphabet"));
    }

    Ok((version, cost))
}

impl FromStr for HashRecord {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_layout(s)?;
        Ok(HashRecord(s.to_string()))
    }
}

impl TryFrom<String> for HashRecord {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        parse_layout(&s)?;
        Ok(HashRecord(s))
    }
}

impl From<HashRecord> for String {
    fn from(record: HashRecord) -> Self {
        record.0
    }
}

impl AsRef<str> for HashRecord {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HashRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
