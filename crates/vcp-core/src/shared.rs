//! Loosely typed metadata blocks.
//!
//! Producers put strings, numbers, booleans or whole objects in these
//! fields, so every value is kept as raw JSON. Compliance only asks whether
//! a value is populated (see [`is_populated`]); it never rejects a type.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Policy identification block (pack-level or per event).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyIdentification {
    /// Policy identifier.
    #[serde(rename = "PolicyID", default, skip_serializing_if = "Option::is_none")]
    pub policy_id: Option<Value>,
    /// Conformance tier (e.g. `SILVER`).
    #[serde(rename = "ConformanceTier", default, skip_serializing_if = "Option::is_none")]
    pub conformance_tier: Option<Value>,
    /// Registration policy; `Issuer` is read from it when it is an object.
    #[serde(rename = "RegistrationPolicy", default, skip_serializing_if = "Option::is_none")]
    pub registration_policy: Option<Value>,
    /// Verification depth flags (`HashChainValidation`, `MerkleProofRequired`,
    /// `ExternalAnchorRequired`).
    #[serde(rename = "VerificationDepth", default, skip_serializing_if = "Option::is_none")]
    pub verification_depth: Option<Value>,
}

impl PolicyIdentification {
    /// `RegistrationPolicy.Issuer`, if populated.
    pub fn issuer(&self) -> Option<&Value> {
        self.registration_policy
            .as_ref()
            .and_then(|p| p.get("Issuer"))
            .filter(|v| is_populated(v))
    }

    /// One `VerificationDepth` flag, whatever its type.
    pub fn depth_flag(&self, name: &str) -> Option<&Value> {
        self.verification_depth.as_ref().and_then(|d| d.get(name))
    }
}

/// Pack-level `metadata` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackMetadata {
    /// Specification name and version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specification: Option<Value>,
    /// Specification version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Value>,
    /// Generator that produced the pack.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<Value>,
    /// Declared conformance tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conformance_tier: Option<Value>,
    /// Declared policy identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_id: Option<Value>,
    /// Transport/protocol label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Value>,
    /// Three-layer architecture declaration, usually an object with
    /// `layer1_event_integrity`, `layer2_collection_integrity` and
    /// `layer3_external_verifiability` descriptions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub three_layer_architecture: Option<Value>,
}

impl PackMetadata {
    /// The three-layer block, if it is a non-empty object. Keys are not
    /// checked.
    pub fn three_layer_architecture(&self) -> Option<&serde_json::Map<String, Value>> {
        self.three_layer_architecture
            .as_ref()
            .and_then(Value::as_object)
            .filter(|layers| !layers.is_empty())
    }
}

/// Whether a metadata value counts as supplied.
///
/// `null`, `false`, zero, `""`, `[]` and `{}` are treated as absent.
pub fn is_populated(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(members) => !members.is_empty(),
    }
}

/// Renders a metadata value for a report line: strings verbatim, anything
/// else as compact JSON, `fallback` when absent.
pub fn display_value(value: Option<&Value>, fallback: &str) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => fallback.to_string(),
    }
}
