use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use vcp_canonical::Canonicalizer;
use vcp_core::{build_root, compute_event_hash_value, LoadError, Verifier, VerifyOptions};
use vcp_pack::{load_pack, PackError, PackReader, ANCHORS_FILE, BATCHES_FILE, EVENTS_FILE};

fn make_test_event(id: &str, event_type: &str) -> Value {
    let mut event = json!({
        "Header": {
            "EventID": id,
            "EventType": event_type,
            "TimestampISO": "2025-01-01T00:00:00Z"
        },
        "Payload": { "id": id }
    });
    let hash = compute_event_hash_value(&event, &Canonicalizer::new()).unwrap();
    event["Header"]["EventHash"] = json!(hash.as_str());
    event
}

fn write_json(dir: &Path, name: &str, value: &Value) {
    fs::write(dir.join(name), serde_json::to_vec_pretty(value).unwrap()).unwrap();
}

fn write_pack(dir: &Path) {
    let events = vec![make_test_event("e1", "ORD"), make_test_event("e2", "VCP_ANCHOR")];
    let root = build_root(&[events[0]["Header"]["EventHash"].as_str().unwrap()]).unwrap();
    write_json(
        dir,
        EVENTS_FILE,
        &json!({
            "metadata": { "specification": "VCP v1.1" },
            "policy_identification": {
                "PolicyID": "p",
                "ConformanceTier": "SILVER",
                "RegistrationPolicy": { "Issuer": "i" },
                "VerificationDepth": { "MerkleProofRequired": true }
            },
            "events": events
        }),
    );
    write_json(dir, BATCHES_FILE, &json!({ "batches": [{ "MerkleRoot": root }] }));
    write_json(dir, ANCHORS_FILE, &json!({ "anchors": [{ "AnchorID": "a1", "MerkleRoot": root }] }));
}

#[test]
fn test_load_and_verify_pack() {
    let temp_dir = TempDir::new().unwrap();
    write_pack(temp_dir.path());

    let pack = load_pack(temp_dir.path()).unwrap();
    assert_eq!(pack.events.len(), 2);
    assert_eq!(pack.batches.len(), 1);
    assert_eq!(pack.anchors.len(), 1);

    let report = Verifier::new(VerifyOptions::default()).verify(&pack);
    assert!(report.verified(), "unexpected failures: {:?}", report.failures());
}

#[test]
fn test_read_documents_keeps_raw_json() {
    let temp_dir = TempDir::new().unwrap();
    write_pack(temp_dir.path());

    let reader = PackReader::open(temp_dir.path()).unwrap();
    assert_eq!(reader.dir(), temp_dir.path());
    let docs = reader.read_documents().unwrap();
    assert_eq!(docs.events["events"][0]["Header"]["EventID"], "e1");
    assert_eq!(docs.anchors["anchors"][0]["AnchorID"], "a1");
}

#[test]
fn test_open_rejects_file_path() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("not-a-dir");
    fs::write(&file, b"{}").unwrap();

    let err = PackReader::open(&file).err().unwrap();
    assert!(matches!(err, PackError::NotADirectory { .. }));
}

#[test]
fn test_missing_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    write_pack(temp_dir.path());
    fs::remove_file(temp_dir.path().join(ANCHORS_FILE)).unwrap();

    let err = load_pack(temp_dir.path()).unwrap_err();
    match err {
        PackError::Io { path, .. } => assert!(path.ends_with(ANCHORS_FILE)),
        other => panic!("expected Io error, got {:?}", other),
    }
}

#[test]
fn test_invalid_json_is_json_error() {
    let temp_dir = TempDir::new().unwrap();
    write_pack(temp_dir.path());
    fs::write(temp_dir.path().join(BATCHES_FILE), b"{ not json").unwrap();

    let err = load_pack(temp_dir.path()).unwrap_err();
    match err {
        PackError::Json { path, .. } => assert!(path.ends_with(BATCHES_FILE)),
        other => panic!("expected Json error, got {:?}", other),
    }
}

#[test]
fn test_structural_failure_is_load_error() {
    let temp_dir = TempDir::new().unwrap();
    write_pack(temp_dir.path());
    write_json(temp_dir.path(), EVENTS_FILE, &json!({ "events": [{ "Payload": {} }] }));

    let err = load_pack(temp_dir.path()).unwrap_err();
    assert!(matches!(
        err,
        PackError::Load(LoadError::InvalidEvent { index: 0, .. })
    ));
}

#[test]
fn test_empty_documents_load_as_empty_pack() {
    let temp_dir = TempDir::new().unwrap();
    for name in [EVENTS_FILE, BATCHES_FILE, ANCHORS_FILE] {
        write_json(temp_dir.path(), name, &json!({}));
    }

    let pack = load_pack(temp_dir.path()).unwrap();
    assert!(pack.events.is_empty());
    assert!(pack.batches.is_empty());
    assert!(pack.anchors.is_empty());
}
