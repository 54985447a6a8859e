use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};

/// Domain tag mixed into every derived identifier.
const ID_DOMAIN: &str = "rds-record-v1";

/// Number of digest bytes kept for a derived identifier (128 bits).
pub const DERIVED_ID_BYTES: usize = 16;

/// Longest identifier accepted, matching common filename limits.
pub const MAX_ID_LEN: usize = 255;

/// Opaque identifier naming one stored record within a destination.
///
/// Identifiers assigned by `insert` come from [`RecordId::derive`]: the
/// domain-separated BLAKE3 hash of the serialized payload, truncated to 128
/// bits and rendered as 32 lowercase hex characters. Caller-supplied
/// identifiers go through [`RecordId::new`], which only accepts strings that
/// are a single legal path component, so a destination may use the
/// identifier verbatim as a file or object name.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Validate and wrap a caller-supplied identifier.
    pub fn new(id: impl Into<String>) -> TypeResult<Self> {
        let id = id.into();
        validate(&id)?;
        Ok(Self(id))
    }

    /// Derive the identifier for a serialized payload.
    ///
    /// Identical payloads always produce the same identifier.
    pub fn derive(payload: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(ID_DOMAIN.as_bytes());
        hasher.update(b":");
        hasher.update(payload);
        let digest = hasher.finalize();
        Self(hex::encode(&digest.as_bytes()[..DERIVED_ID_BYTES]))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form for log lines (first 8 characters).
    pub fn short_id(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

fn validate(id: &str) -> TypeResult<()> {
    let reason = if id.is_empty() {
        "must not be empty"
    } else if id.len() > MAX_ID_LEN {
        "longer than 255 bytes"
    } else if id == "." || id == ".." {
        "reserved path component"
    } else if id.contains(['/', '\\', '\0']) {
        "contains a path separator or NUL"
    } else {
        return Ok(());
    };
    Err(TypeError::InvalidRecordId {
        id: id.to_string(),
        reason,
    })
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RecordId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RecordId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_is_deterministic() {
        let id1 = RecordId::derive(br#"{"a":1}"#);
        let id2 = RecordId::derive(br#"{"a":1}"#);
        assert_eq!(id1, id2);
    }

    #[test]
    fn different_payloads_produce_different_ids() {
        assert_ne!(RecordId::derive(b"one"), RecordId::derive(b"two"));
    }

    #[test]
    fn derived_id_is_32_lowercase_hex() {
        let id = RecordId::derive(b"payload");
        assert_eq!(id.as_str().len(), 2 * DERIVED_ID_BYTES);
        assert!(id
            .as_str()
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn derive_is_domain_separated() {
        let raw = blake3::hash(b"payload");
        let id = RecordId::derive(b"payload");
        assert_ne!(id.as_str(), &hex::encode(raw.as_bytes())[..32]);
    }

    #[test]
    fn derived_ids_pass_validation() {
        let id = RecordId::derive(b"anything");
        assert_eq!(RecordId::new(id.as_str()).unwrap(), id);
    }

    #[test]
    fn caller_ids_are_accepted() {
        assert!(RecordId::new("123").is_ok());
        assert!(RecordId::new("user-42.json").is_ok());
    }

    #[test]
    fn invalid_ids_are_rejected() {
        for bad in ["", ".", "..", "a/b", "a\\b", "nul\0byte"] {
            assert!(
                matches!(RecordId::new(bad), Err(TypeError::InvalidRecordId { .. })),
                "{bad:?} should be rejected"
            );
        }
        assert!(RecordId::new("x".repeat(MAX_ID_LEN + 1)).is_err());
        assert!(RecordId::new("x".repeat(MAX_ID_LEN)).is_ok());
    }

    #[test]
    fn short_id_handles_short_input() {
        assert_eq!(RecordId::new("abc").unwrap().short_id(), "abc");
        assert_eq!(RecordId::derive(b"x").short_id().len(), 8);
    }

    #[test]
    fn serde_roundtrip_validates() {
        let id = RecordId::derive(b"serde");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let parsed: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
        assert!(serde_json::from_str::<RecordId>("\"../etc\"").is_err());
    }
}
