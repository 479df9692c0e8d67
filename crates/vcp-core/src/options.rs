use serde::{Deserialize, Serialize};

/// Event type marking batch-summary events.
pub const DEFAULT_BATCH_EVENT_TYPE: &str = "VCP_BATCH";
/// Event type marking external-anchor events.
pub const DEFAULT_ANCHOR_EVENT_TYPE: &str = "VCP_ANCHOR";
/// Specification version the packs are expected to declare.
pub const DEFAULT_SPEC_VERSION: &str = "1.1";

/// Tunables for a verification run.
///
/// Deserializes from JSON with every field optional; missing fields take the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyOptions {
    /// Event type of batch-summary events (excluded from Merkle leaves).
    pub batch_event_type: String,
    /// Event type of anchor events (excluded from Merkle leaves, required
    /// to be present at least once).
    pub anchor_event_type: String,
    /// Version the pack metadata should declare (advisory).
    pub expected_spec_version: String,
    /// Treat events without their own `PolicyIdentification` as a failure
    /// instead of a warning.
    pub require_event_policy: bool,
    /// Treat a broken hash chain as a failure instead of a warning.
    pub chain_breaks_fatal: bool,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            batch_event_type: DEFAULT_BATCH_EVENT_TYPE.to_string(),
            anchor_event_type: DEFAULT_ANCHOR_EVENT_TYPE.to_string(),
            expected_spec_version: DEFAULT_SPEC_VERSION.to_string(),
            require_event_policy: false,
            chain_breaks_fatal: true,
        }
    }
}

impl VerifyOptions {
    /// Event types excluded from the Merkle leaf set.
    pub fn admin_event_types(&self) -> Vec<String> {
        vec![self.batch_event_type.clone(), self.anchor_event_type.clone()]
    }
}
