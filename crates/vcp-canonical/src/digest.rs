use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest as Sha2Digest, Sha256};
use std::fmt;
use std::sync::OnceLock;

use crate::validation::ValidationError;

/// Length in bytes of a SHA-256 output.
pub const SHA256_LEN: usize = 32;

fn digest_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9a-f]{64}$").expect("invalid regex"))
}

/// SHA-256 over `bytes`.
pub fn sha256(bytes: &[u8]) -> [u8; SHA256_LEN] {
    Sha256::digest(bytes).into()
}

/// SHA-256 over the concatenation of `parts`, without an intermediate buffer.
pub fn sha256_concat(parts: &[&[u8]]) -> [u8; SHA256_LEN] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Decodes a hex string, attributing failures to `field`.
pub fn decode_hex(field: &'static str, value: &str) -> Result<Vec<u8>, ValidationError> {
    hex::decode(value).map_err(|source| ValidationError::InvalidHex {
        field,
        value: value.to_string(),
        source,
    })
}

/// SHA-256 digest rendered as 64 lowercase hex characters.
///
/// This is the only digest form that appears in evidence packs (`EventHash`,
/// `PrevHash`, `MerkleRoot`, audit-path hashes).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HexDigest(String);

impl HexDigest {
    /// Wraps raw digest bytes.
    pub fn from_bytes(bytes: &[u8; SHA256_LEN]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Hashes `bytes` with SHA-256.
    pub fn sha256(bytes: &[u8]) -> Self {
        Self::from_bytes(&sha256(bytes))
    }

    /// Parses a validated digest (exactly 64 lowercase hex characters).
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if !digest_pattern().is_match(&value) {
            return Err(ValidationError::PatternMismatch {
                field: "digest",
                value,
            });
        }
        Ok(Self(value))
    }

    /// Returns the hex rendering.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the digest, returning the hex rendering.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for HexDigest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for HexDigest {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for HexDigest {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for HexDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
