//! Verification engine for VCP evidence packs.
//!
//! This crate provides:
//! - Typed views of pack documents (events, batches, anchors, policy metadata)
//! - Event hash recomputation over canonical bytes
//! - Hash-chain, Merkle root, inclusion proof and anchor checks
//! - A linear verification pipeline producing an accumulated report
//!
//! Core invariants:
//! - Verification is deterministic and offline
//! - Only a structurally unloadable pack aborts; every other problem is
//!   recorded and the remaining stages still run
//! - The verdict is true iff no required check failed; warnings never
//!   change it
//!
#![deny(missing_docs)]

/// Anchor comparison against the recomputed root.
pub mod anchor;
/// Optional `PrevHash` chain validation.
pub mod chain;
/// Policy and architecture presence checks.
pub mod compliance;
/// Error types for core operations.
pub mod errors;
/// Event content hashing.
pub mod event_hash;
/// Event, batch and anchor record types.
pub mod events;
/// RFC 6962 style Merkle tree and inclusion proofs.
pub mod merkle;
/// Verification tunables.
pub mod options;
/// Evidence pack loading from parsed documents.
pub mod pack;
/// Findings, failures and the accumulated report.
pub mod report;
/// Metadata blocks shared across documents.
pub mod shared;
/// Timestamp monotonicity check.
pub mod timeline;
/// The verification pipeline.
pub mod verification;

pub use anchor::{verify_anchors, AnchorCheck, AnchorVerdict};
pub use chain::{validate_chain, ChainBreak, ChainStatus};
pub use compliance::{ComplianceCheck, ComplianceChecker, ComplianceItem};
pub use errors::{EventHashError, LoadError, MerkleError, VerificationFailure};
pub use event_hash::{compute_event_hash, compute_event_hash_value};
pub use events::{Anchor, AuditStep, Batch, Event, EventHeader, InclusionProof, Position};
pub use merkle::{build_root, verify_inclusion, MerkleTree};
pub use options::VerifyOptions;
pub use pack::EvidencePack;
pub use report::{CheckStatus, Finding, Stage, VerificationReport};
pub use shared::{display_value, is_populated, PackMetadata, PolicyIdentification};
pub use timeline::{find_regressions, TimelineRegression};
pub use verification::Verifier;
