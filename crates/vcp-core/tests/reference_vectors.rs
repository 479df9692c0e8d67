//! Vectors produced by an independent producer of VCP v1.1 packs.
//!
//! `fixtures/reference_events.json` and every digest below were generated
//! outside this crate; they pin the canonical form and hashing byte for byte.

use serde_json::{json, Value};
use vcp_canonical::Canonicalizer;
use vcp_core::{build_root, compute_event_hash_value, ChainStatus, MerkleTree, Verifier};

const EVENTS: &str = include_str!("fixtures/reference_events.json");

const EVENT_HASHES: [(&str, &str); 4] = [
    ("evt-001", "766c5f08ce18dd18a349651a6975dc261b88e5aa06aa39a858e7b53d5faf3aa8"),
    ("evt-002", "3b87d80428db4fc32d13e565a7e5dbdfbc6e183319b78c44d81d461538295694"),
    ("evt-003", "992c0794280ae092421cb25a8b1190f1eaeffc70a4106c230199ca08e6cb74a7"),
    ("evt-004", "d6f65194b741bd3ab4bb54f4458d63be0f84c6f6c621ea90279983ab974e3ca8"),
];

/// Root over the three trading events; the anchor event is not a leaf.
const MERKLE_ROOT: &str = "dc0d6eecfde1fc6de6e1aefc3a0e494e174a747a3b8e758dfa31b37fdce3a196";

fn load_events_document() -> Value {
    serde_json::from_str(EVENTS).unwrap()
}

fn events() -> Vec<Value> {
    load_events_document()["events"].as_array().unwrap().clone()
}

fn hash_preimage(event: &Value) -> String {
    let mut header = event["Header"].clone();
    header.as_object_mut().unwrap().remove("EventHash");
    let mut body = event.clone();
    body.as_object_mut().unwrap().remove("Header");

    let canonicalizer = Canonicalizer::new();
    format!(
        "{}{}",
        canonicalizer.canonicalize_to_string(&header).unwrap(),
        canonicalizer.canonicalize_to_string(&body).unwrap()
    )
}

#[test]
fn test_event_hashes_match_reference() {
    let canonicalizer = Canonicalizer::new();
    let events = events();
    assert_eq!(events.len(), EVENT_HASHES.len());

    for (event, (id, expected)) in events.iter().zip(EVENT_HASHES) {
        assert_eq!(event["Header"]["EventID"], id);
        assert_eq!(event["Header"]["EventHash"], expected);
        let computed = compute_event_hash_value(event, &canonicalizer).unwrap();
        assert_eq!(computed.as_str(), expected, "event {}", id);
    }
}

#[test]
fn test_preimage_with_floats_and_unicode_matches_reference() {
    let events = events();
    assert_eq!(
        hash_preimage(&events[0]),
        r##"{"EventID":"evt-001","EventType":"SIG","TimestampISO":"2025-03-01T09:00:00.125Z"}{"Payload":{"Label":"ドル円","Model":{"name":"café-α","params":{"decay":1.5e-07,"window":20}},"Score":0.30000000000000004,"Symbol":"USD/JPY","Volume":1e+16},"PolicyIdentification":{"ConformanceTier":"SILVER","PolicyID":"urn:vcp:policy:fx-desk"}}"##
    );
    assert_eq!(
        hash_preimage(&events[1]),
        r##"{"EventID":"evt-002","EventType":"ORD","PrevHash":"766c5f08ce18dd18a349651a6975dc261b88e5aa06aa39a858e7b53d5faf3aa8","TimestampISO":"2025-03-01T09:00:01Z"}{"Payload":{"Legs":[{"venue":"TKY","weight":0.5},{"venue":"LDN","weight":0.5}],"Note":"tab\there \u0001 \"quoted\" 📈","Offset":-0.0,"Price":150.25,"Qty":1000000,"Side":"BUY"},"PolicyIdentification":{"ConformanceTier":"SILVER","PolicyID":"urn:vcp:policy:fx-desk"}}"##
    );
    assert_eq!(
        hash_preimage(&events[2]),
        r##"{"EventID":"evt-003","EventType":"EXE","PrevHash":"3b87d80428db4fc32d13e565a7e5dbdfbc6e183319b78c44d81d461538295694","TimestampISO":"2025-03-01T09:00:02Z"}{"Payload":{"Fees":{"items":[],"total":12.0},"FillPrice":150.2500001,"Nonce":123456789012345678901234567890,"Tiny":5e-324},"PolicyIdentification":{"ConformanceTier":"SILVER","PolicyID":"urn:vcp:policy:fx-desk"}}"##
    );
}

#[test]
fn test_merkle_root_matches_reference() {
    let leaves: Vec<&str> = EVENT_HASHES[..3].iter().map(|(_, h)| *h).collect();
    let root = build_root(&leaves).unwrap();
    assert_eq!(root.as_str(), MERKLE_ROOT);

    let tree = MerkleTree::from_leaf_hashes(&leaves).unwrap();
    for (index, leaf) in leaves.iter().enumerate() {
        let path = tree.audit_path(index).unwrap();
        assert!(vcp_core::verify_inclusion(leaf, &path, MERKLE_ROOT));
    }
}

#[test]
fn test_reference_pack_verifies() {
    let batches = json!({
        "batches": [{ "BatchID": "b1", "MerkleRoot": MERKLE_ROOT, "InclusionProofs": [] }]
    });
    let anchors = json!({
        "anchors": [{ "AnchorID": "a1", "MerkleRoot": MERKLE_ROOT, "AnchorTarget": "tsa" }]
    });

    let report = Verifier::default()
        .verify_documents(load_events_document(), batches, anchors)
        .unwrap();
    assert!(report.verified(), "unexpected failures: {:?}", report.failures());
    assert_eq!(report.computed_root().map(|r| r.as_str()), Some(MERKLE_ROOT));
    assert_eq!(report.chain(), &ChainStatus::Intact { links: 3 });
}
