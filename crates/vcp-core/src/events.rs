use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Typed view of an event's `Header` block.
///
/// Only the fields the verifier reads are named; the raw header (with any
/// additional fields) stays in the owning [`Event`] and is what gets hashed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventHeader {
    /// Event identifier.
    #[serde(rename = "EventID")]
    pub event_id: String,
    /// Event type tag (e.g. `ORD`, `EXE`, `VCP_BATCH`, `VCP_ANCHOR`).
    #[serde(rename = "EventType")]
    pub event_type: String,
    /// ISO-8601 timestamp.
    #[serde(rename = "TimestampISO", default, skip_serializing_if = "Option::is_none")]
    pub timestamp_iso: Option<String>,
    /// Stored content hash (lowercase hex).
    #[serde(rename = "EventHash", default, skip_serializing_if = "Option::is_none")]
    pub event_hash: Option<String>,
    /// Optional link to the predecessor's `EventHash`.
    #[serde(rename = "PrevHash", default, skip_serializing_if = "Option::is_none")]
    pub prev_hash: Option<String>,
}

/// One event record.
///
/// The full JSON object is retained verbatim so that hashing covers every
/// top-level field (`Payload`, `PolicyIdentification`, `Governance`, ...),
/// including fields this crate does not model.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    header: EventHeader,
    record: Map<String, Value>,
}

impl Event {
    /// Returns the typed header view.
    pub fn header(&self) -> &EventHeader {
        &self.header
    }

    /// Returns the raw event object.
    pub fn record(&self) -> &Map<String, Value> {
        &self.record
    }

    /// Event identifier.
    pub fn event_id(&self) -> &str {
        &self.header.event_id
    }

    /// Event type tag.
    pub fn event_type(&self) -> &str {
        &self.header.event_type
    }

    /// Stored `EventHash`, if present.
    pub fn stored_hash(&self) -> Option<&str> {
        self.header.event_hash.as_deref()
    }

    /// `PrevHash`, if present and non-empty.
    pub fn prev_hash(&self) -> Option<&str> {
        self.header.prev_hash.as_deref().filter(|h| !h.is_empty())
    }

    /// `TimestampISO`, if present and non-empty.
    pub fn timestamp(&self) -> Option<&str> {
        self.header.timestamp_iso.as_deref().filter(|t| !t.is_empty())
    }

    /// Whether the event carries its own `PolicyIdentification` block.
    pub fn has_policy_identification(&self) -> bool {
        self.record.contains_key("PolicyIdentification")
    }

    /// The `Governance` block, if it is an object.
    pub fn governance(&self) -> Option<&Map<String, Value>> {
        self.record.get("Governance").and_then(Value::as_object)
    }
}

impl TryFrom<Value> for Event {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(record) = value else {
            return Err("event is not a JSON object".to_string());
        };
        let raw_header = record
            .get("Header")
            .ok_or_else(|| "missing Header".to_string())?;
        if !raw_header.is_object() {
            return Err("Header is not an object".to_string());
        }
        let header: EventHeader = serde_json::from_value(raw_header.clone())
            .map_err(|e| format!("malformed Header: {}", e))?;
        Ok(Self { header, record })
    }
}

impl Serialize for Event {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.record.serialize(serializer)
    }
}

/// Side of the sibling in one audit-path step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Sibling is the left operand.
    Left,
    /// Sibling is the right operand.
    Right,
}

/// One step of an audit path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// Sibling node hash (hex).
    pub hash: String,
    /// Which side the sibling sits on.
    pub position: Position,
}

/// Inclusion proof for one event under a batch root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionProof {
    /// Event the proof is for.
    #[serde(rename = "EventID")]
    pub event_id: String,
    /// Leaf event hash (hex).
    #[serde(rename = "EventHash")]
    pub event_hash: String,
    /// Sibling path from leaf to root.
    #[serde(rename = "AuditPath")]
    pub audit_path: Vec<AuditStep>,
    /// Root the proof claims to reach.
    #[serde(rename = "MerkleRoot")]
    pub merkle_root: String,
}

/// Batch summary record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    /// Batch identifier.
    #[serde(rename = "BatchID", default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
    /// Root over the batch's event hashes (hex).
    #[serde(rename = "MerkleRoot", default)]
    pub merkle_root: String,
    /// Inclusion proofs for member events.
    #[serde(rename = "InclusionProofs", default)]
    pub inclusion_proofs: Vec<InclusionProof>,
}

/// External anchor record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    /// Anchor identifier.
    #[serde(rename = "AnchorID", default, skip_serializing_if = "Option::is_none")]
    pub anchor_id: Option<String>,
    /// Root the external system is claimed to have recorded (hex).
    #[serde(rename = "MerkleRoot", default)]
    pub merkle_root: String,
    /// Destination identifier (chain, TSA, ...).
    #[serde(rename = "AnchorTarget", default, skip_serializing_if = "Option::is_none")]
    pub anchor_target: Option<String>,
    /// Anchoring cadence, as declared.
    #[serde(rename = "AnchorFrequency", default, skip_serializing_if = "Option::is_none")]
    pub anchor_frequency: Option<Value>,
}

impl Anchor {
    /// Anchor identifier or `unknown`.
    pub fn display_id(&self) -> &str {
        self.anchor_id.as_deref().unwrap_or("unknown")
    }

    /// Anchor target or `unknown`.
    pub fn display_target(&self) -> &str {
        self.anchor_target.as_deref().unwrap_or("unknown")
    }
}
