use thiserror::Error;

use crate::compliance::ComplianceItem;

/// Structural failure while loading an evidence pack.
///
/// This is the only fatal error class: when it occurs no verification stage
/// runs and no partial report is produced.
#[derive(Error, Debug)]
pub enum LoadError {
    /// A top-level document is not a JSON object.
    #[error("{document} is not a JSON object")]
    NotAnObject {
        /// Document name (`events`, `batches`, `anchors`).
        document: &'static str,
    },
    /// A document does not match the expected record shapes.
    #[error("malformed {document}: {source}")]
    Malformed {
        /// Document name (`events`, `batches`, `anchors`).
        document: &'static str,
        /// Underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },
    /// An event record is structurally invalid.
    #[error("invalid event at index {index}: {reason}")]
    InvalidEvent {
        /// Position of the event in the pack.
        index: usize,
        /// What is wrong with it.
        reason: String,
    },
}

/// Event hash computation failed.
#[derive(Error, Debug)]
pub enum EventHashError {
    /// The record has no `Header` object.
    #[error("event has no Header object")]
    MissingHeader,
    /// The record is not a JSON object.
    #[error("event is not a JSON object")]
    NotAnObject,
    /// Canonicalization failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] vcp_canonical::CanonicalizationError),
}

/// Merkle tree construction failed.
#[derive(Error, Debug)]
pub enum MerkleError {
    /// A leaf hash is not decodable hex.
    #[error("leaf {index}: {source}")]
    InvalidLeaf {
        /// Leaf position.
        index: usize,
        /// Decoding error.
        #[source]
        source: vcp_canonical::ValidationError,
    },
}

/// A recorded, non-fatal verification failure.
///
/// Failures accumulate in the report; any entry makes the overall verdict
/// false. None of these abort the pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationFailure {
    /// A required compliance field is missing.
    #[error("compliance: {item} missing")]
    Compliance {
        /// The failing compliance item.
        item: ComplianceItem,
    },
    /// Stored `EventHash` differs from the recomputed hash.
    #[error("event {event_id}: stored hash '{stored}' does not match recomputed {computed}")]
    HashMismatch {
        /// Offending event.
        event_id: String,
        /// Stored hash (empty when absent).
        stored: String,
        /// Recomputed hash.
        computed: String,
    },
    /// The event hash could not be recomputed at all.
    #[error("event {event_id}: hash could not be recomputed: {reason}")]
    HashUncomputable {
        /// Offending event.
        event_id: String,
        /// Why recomputation failed.
        reason: String,
    },
    /// `PrevHash` does not reference the predecessor's `EventHash`.
    #[error("hash chain broken at event {index} ({event_id})")]
    ChainBreak {
        /// Position of the event carrying the bad link.
        index: usize,
        /// Event carrying the bad link.
        event_id: String,
    },
    /// A batch's `MerkleRoot` differs from the recomputed root.
    #[error("batch {batch}: Merkle root '{stored}' does not match recomputed {computed}")]
    MerkleRootMismatch {
        /// Batch position.
        batch: usize,
        /// Stored root.
        stored: String,
        /// Recomputed root.
        computed: String,
    },
    /// The root could not be recomputed from the stored event hashes.
    #[error("Merkle root could not be recomputed: {reason}")]
    MerkleRootUnavailable {
        /// Why reconstruction failed.
        reason: String,
    },
    /// An inclusion proof does not reach its stated root.
    #[error("batch {batch}: inclusion proof for event {event_id} does not reach root '{root}'")]
    InclusionProof {
        /// Batch position.
        batch: usize,
        /// Event the proof is for.
        event_id: String,
        /// Root named by the proof.
        root: String,
    },
    /// An anchor's `MerkleRoot` differs from the recomputed root.
    #[error("anchor {anchor_id}: Merkle root '{stated}' does not match recomputed {computed}")]
    AnchorMismatch {
        /// Anchor identifier.
        anchor_id: String,
        /// Root claimed by the anchor.
        stated: String,
        /// Recomputed root (`unavailable` when it could not be built).
        computed: String,
    },
    /// The pack carries no anchor records.
    #[error("no anchor records present")]
    AnchorMissing,
}
