use serde::Serialize;
use vcp_canonical::HexDigest;

use crate::events::Anchor;

/// Result of comparing one anchor against the recomputed root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnchorCheck {
    /// Anchor identifier (`unknown` when absent).
    pub anchor_id: String,
    /// Anchor destination (`unknown` when absent).
    pub target: String,
    /// Root the anchor claims.
    pub stated_root: String,
    /// Whether it equals the recomputed root.
    pub matched: bool,
}

/// Outcome of anchor verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "checks", rename_all = "snake_case")]
pub enum AnchorVerdict {
    /// The pack has no anchor records; anchors are mandatory.
    Missing,
    /// One check per anchor, in pack order.
    Checked(Vec<AnchorCheck>),
}

impl AnchorVerdict {
    /// True when anchors exist and all of them match.
    pub fn is_valid(&self) -> bool {
        match self {
            AnchorVerdict::Missing => false,
            AnchorVerdict::Checked(checks) => checks.iter().all(|c| c.matched),
        }
    }
}

/// Compares every anchor's `MerkleRoot` with `computed_root`.
///
/// When the root could not be recomputed (`None`), no anchor can match.
pub fn verify_anchors(anchors: &[Anchor], computed_root: Option<&HexDigest>) -> AnchorVerdict {
    if anchors.is_empty() {
        return AnchorVerdict::Missing;
    }

    let checks = anchors
        .iter()
        .map(|anchor| AnchorCheck {
            anchor_id: anchor.display_id().to_string(),
            target: anchor.display_target().to_string(),
            stated_root: anchor.merkle_root.clone(),
            matched: computed_root.map_or(false, |root| *root == anchor.merkle_root.as_str()),
        })
        .collect();
    AnchorVerdict::Checked(checks)
}
