//! Merkle tree over event hashes with RFC 6962 domain separation.
//!
//! Leaves are `sha256(0x00 || bytes(event_hash))` and internal nodes are
//! `sha256(0x01 || left || right)`. Levels are paired in order; an unpaired
//! last node is carried up unchanged (it is never duplicated). Roots produced
//! by other verifiers of the same pack format depend on that carry rule.

use tracing::debug;
use vcp_canonical::{decode_hex, sha256, sha256_concat, HexDigest, SHA256_LEN};

use crate::errors::MerkleError;
use crate::events::{AuditStep, Position};

const LEAF_PREFIX: &[u8] = &[0x00];
const NODE_PREFIX: &[u8] = &[0x01];

type Node = [u8; SHA256_LEN];

/// Leaf-node transform of a hex event hash.
pub fn leaf_node(event_hash: &str) -> Result<Node, vcp_canonical::ValidationError> {
    let bytes = decode_hex("EventHash", event_hash)?;
    Ok(sha256_concat(&[LEAF_PREFIX, &bytes]))
}

fn internal_node(left: &[u8], right: &[u8]) -> Node {
    sha256_concat(&[NODE_PREFIX, left, right])
}

fn next_level(level: &[Node]) -> Vec<Node> {
    level
        .chunks(2)
        .map(|pair| match pair {
            [left, right] => internal_node(left, right),
            _ => pair[0],
        })
        .collect()
}

/// A fully materialized tree; `levels[0]` holds the leaf nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    levels: Vec<Vec<Node>>,
}

impl MerkleTree {
    /// Builds the tree over hex event hashes, in order.
    ///
    /// # Errors
    ///
    /// Returns [`MerkleError::InvalidLeaf`] if a hash is not decodable hex.
    pub fn from_leaf_hashes<S: AsRef<str>>(event_hashes: &[S]) -> Result<Self, MerkleError> {
        let leaves = event_hashes
            .iter()
            .enumerate()
            .map(|(index, hash)| {
                leaf_node(hash.as_ref()).map_err(|source| MerkleError::InvalidLeaf { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut levels = vec![leaves];
        while levels.last().map_or(false, |level| level.len() > 1) {
            let parent = next_level(&levels[levels.len() - 1]);
            levels.push(parent);
        }

        debug!(leaves = event_hashes.len(), height = levels.len(), "built merkle tree");
        Ok(Self { levels })
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.levels.first().map_or(0, Vec::len)
    }

    /// Root of the tree; `sha256("")` for an empty tree.
    pub fn root(&self) -> HexDigest {
        match self.levels.last().and_then(|level| level.first()) {
            Some(root) => HexDigest::from_bytes(root),
            None => HexDigest::from_bytes(&sha256(b"")),
        }
    }

    /// Audit path for leaf `index`, bottom-up.
    ///
    /// Levels where the node is the carried orphan contribute no step.
    /// Returns `None` if `index` is out of range.
    pub fn audit_path(&self, index: usize) -> Option<Vec<AuditStep>> {
        if index >= self.leaf_count() {
            return None;
        }

        let mut path = Vec::new();
        let mut pos = index;
        for level in &self.levels[..self.levels.len() - 1] {
            if pos % 2 == 1 {
                path.push(AuditStep {
                    hash: hex_node(&level[pos - 1]),
                    position: Position::Left,
                });
            } else if pos + 1 < level.len() {
                path.push(AuditStep {
                    hash: hex_node(&level[pos + 1]),
                    position: Position::Right,
                });
            }
            pos /= 2;
        }
        Some(path)
    }
}

fn hex_node(node: &Node) -> String {
    HexDigest::from_bytes(node).into_string()
}

/// Recomputes the root over hex event hashes.
pub fn build_root<S: AsRef<str>>(event_hashes: &[S]) -> Result<HexDigest, MerkleError> {
    Ok(MerkleTree::from_leaf_hashes(event_hashes)?.root())
}

/// Checks that `audit_path` leads from `leaf_event_hash` to `expected_root`.
///
/// Never errors: undecodable hex anywhere in the proof simply fails it.
pub fn verify_inclusion(leaf_event_hash: &str, audit_path: &[AuditStep], expected_root: &str) -> bool {
    let Ok(mut current) = leaf_node(leaf_event_hash) else {
        return false;
    };

    for step in audit_path {
        let Ok(sibling) = decode_hex("AuditPath.hash", &step.hash) else {
            return false;
        };
        current = match step.position {
            Position::Left => internal_node(&sibling, &current),
            Position::Right => internal_node(&current, &sibling),
        };
    }

    HexDigest::from_bytes(&current) == expected_root
}
