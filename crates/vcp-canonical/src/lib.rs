//! Canonical encoding and digest primitives for VCP evidence packs.
//!
//! Every byte string that is hashed during verification is produced by
//! [`Canonicalizer`]; every digest that is compared is a lowercase hex
//! SHA-256 rendering ([`HexDigest`]).
//!
#![deny(missing_docs)]

/// Canonicalization helpers for deterministic hashing.
pub mod canonicalizer;
/// Digest primitives and SHA-256 helpers.
pub mod digest;
/// Validation helpers used by canonical types.
pub mod validation;

pub use canonicalizer::{CanonicalizationError, Canonicalizer};
pub use digest::{decode_hex, sha256, sha256_concat, HexDigest, SHA256_LEN};
pub use validation::ValidationError;
