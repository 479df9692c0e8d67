use serde_json::{Map, Value};
use vcp_canonical::{sha256_concat, Canonicalizer, HexDigest};

use crate::errors::EventHashError;
use crate::events::Event;

/// Computes the content hash of an event.
///
/// Formula: `sha256(canonical(Header - EventHash) || canonical(event - Header))`
///
/// The second operand holds every top-level field except `Header`
/// (`Payload`, `PolicyIdentification`, ...). Key order in the input never
/// affects the result.
pub fn compute_event_hash(
    event: &Event,
    canonicalizer: &Canonicalizer,
) -> Result<HexDigest, EventHashError> {
    hash_record(event.record(), canonicalizer)
}

/// Computes the content hash of a raw event object.
pub fn compute_event_hash_value(
    event: &Value,
    canonicalizer: &Canonicalizer,
) -> Result<HexDigest, EventHashError> {
    let record = event.as_object().ok_or(EventHashError::NotAnObject)?;
    hash_record(record, canonicalizer)
}

fn hash_record(
    record: &Map<String, Value>,
    canonicalizer: &Canonicalizer,
) -> Result<HexDigest, EventHashError> {
    let mut header = record
        .get("Header")
        .and_then(Value::as_object)
        .cloned()
        .ok_or(EventHashError::MissingHeader)?;
    // Remove EventHash to avoid self-referential hashing
    header.remove("EventHash");

    let mut body = record.clone();
    body.remove("Header");

    let header_bytes = canonicalizer.canonicalize(&Value::Object(header))?;
    let body_bytes = canonicalizer.canonicalize(&Value::Object(body))?;

    Ok(HexDigest::from_bytes(&sha256_concat(&[
        &header_bytes,
        &body_bytes,
    ])))
}
