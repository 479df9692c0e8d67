//! Integration tests for CLI commands.

use serde_json::{json, Value};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tempfile::TempDir;

// Hashes below are produced by the binary itself (`event-hash`) so the
// fixtures stay valid without linking the library crates.
fn event_hash(event: &Value) -> String {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("event.json");
    fs::write(&path, serde_json::to_vec(event).unwrap()).unwrap();
    let (code, stdout, _) = run_cli(&["event-hash", path.to_str().unwrap()]);
    assert_eq!(code, 0);
    stdout.trim().to_string()
}

fn make_test_event(id: &str, event_type: &str, ts: &str) -> Value {
    let mut event = json!({
        "Header": { "EventID": id, "EventType": event_type, "TimestampISO": ts },
        "Payload": { "id": id },
        "PolicyIdentification": { "PolicyID": "urn:test" }
    });
    let hash = event_hash(&event);
    event["Header"]["EventHash"] = json!(hash);
    event
}

fn write_json(dir: &Path, name: &str, value: &Value) {
    fs::write(dir.join(name), serde_json::to_vec_pretty(value).unwrap()).unwrap();
}

/// Writes a single-leaf pack whose root equals the leaf node of `e1`.
fn create_test_pack(anchor_root: Option<&str>) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let leaf = make_test_event("e1", "ORD", "2025-01-01T00:00:00Z");
    let anchor_event = make_test_event("e2", "VCP_ANCHOR", "2025-01-01T00:00:01Z");
    let root = single_leaf_root(leaf["Header"]["EventHash"].as_str().unwrap());

    write_json(
        temp_dir.path(),
        "events.json",
        &json!({
            "metadata": { "specification": "VCP v1.1", "generator": "cli-tests" },
            "policy_identification": {
                "PolicyID": "urn:test",
                "ConformanceTier": "SILVER",
                "RegistrationPolicy": { "Issuer": "Tester" },
                "VerificationDepth": { "ExternalAnchorRequired": true }
            },
            "events": [leaf, anchor_event]
        }),
    );
    write_json(
        temp_dir.path(),
        "batches.json",
        &json!({ "batches": [{ "BatchID": "b1", "MerkleRoot": root, "InclusionProofs": [] }] }),
    );
    write_json(
        temp_dir.path(),
        "anchors.json",
        &json!({ "anchors": [{ "AnchorID": "a1", "MerkleRoot": anchor_root.unwrap_or(&root), "AnchorTarget": "tsa" }] }),
    );
    temp_dir
}

/// Root of a one-leaf tree, as reported by the verifier for a pack that
/// holds only that leaf.
fn single_leaf_root(leaf_hash: &str) -> String {
    let temp_dir = TempDir::new().unwrap();
    let event = json!({ "Header": { "EventID": "x", "EventType": "ORD", "EventHash": leaf_hash } });
    write_json(temp_dir.path(), "events.json", &json!({ "events": [event] }));
    write_json(temp_dir.path(), "batches.json", &json!({}));
    write_json(temp_dir.path(), "anchors.json", &json!({}));
    let (_, stdout, _) = run_cli(&["verify", temp_dir.path().to_str().unwrap(), "--json"]);
    let report: Value = serde_json::from_str(&stdout).unwrap();
    report["computed_root"].as_str().unwrap().to_string()
}

fn run_cli(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_vcp-verify"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI");

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    (output.status.code().unwrap_or(-1), stdout, stderr)
}

#[test]
fn test_verify_valid_pack() {
    let pack = create_test_pack(None);
    let (code, stdout, _) = run_cli(&["verify", pack.path().to_str().unwrap()]);
    assert_eq!(code, 0, "stdout: {}", stdout);
    assert!(stdout.contains("Overall: ✓ CRYPTOGRAPHICALLY VERIFIED"));
    assert!(stdout.contains("Anchor a1 verified"));
    assert!(stdout.contains("Verification Time:"));
}

#[test]
fn test_verify_anchor_mismatch_exits_one() {
    let bad_root = "00".repeat(32);
    let pack = create_test_pack(Some(&bad_root));
    let (code, stdout, _) = run_cli(&["verify", pack.path().to_str().unwrap()]);
    assert_eq!(code, 1);
    assert!(stdout.contains("Overall: ✗ VERIFICATION FAILED"));
    assert!(stdout.contains("Anchor a1 Merkle root mismatch"));
}

#[test]
fn test_verify_json_output() {
    let pack = create_test_pack(None);
    let (code, stdout, _) = run_cli(&["verify", pack.path().to_str().unwrap(), "--json"]);
    assert_eq!(code, 0);
    let report: Value = serde_json::from_str(&stdout).expect("Invalid JSON");
    assert_eq!(report["verified"], true);
    assert_eq!(report["chain"]["status"], "not_used");
    assert!(report["findings"].as_array().unwrap().len() > 5);
}

#[test]
fn test_verify_missing_dir_exits_two() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope");
    let (code, stdout, stderr) = run_cli(&["verify", missing.to_str().unwrap()]);
    assert_eq!(code, 2);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Error"));
}

#[test]
fn test_verify_malformed_pack_exits_two() {
    let pack = create_test_pack(None);
    fs::write(pack.path().join("batches.json"), b"[1, 2").unwrap();
    let (code, _, stderr) = run_cli(&["verify", pack.path().to_str().unwrap()]);
    assert_eq!(code, 2);
    assert!(stderr.contains("batches.json"));
}

#[test]
fn test_verify_with_config_file() {
    let pack = create_test_pack(None);
    let config = pack.path().join("options.json");
    fs::write(&config, br#"{ "require_event_policy": true }"#).unwrap();

    // Both events carry PolicyIdentification, so the stricter rule still passes.
    let (code, _, _) = run_cli(&[
        "verify",
        pack.path().to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);
    assert_eq!(code, 0);
}

#[test]
fn test_verify_bad_config_exits_one() {
    let pack = create_test_pack(None);
    let config = pack.path().join("options.json");
    fs::write(&config, b"not json").unwrap();
    let (code, _, stderr) = run_cli(&[
        "verify",
        pack.path().to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);
    assert_eq!(code, 1);
    assert!(stderr.contains("invalid config"));
}

#[test]
fn test_canonicalize_command() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("input.json");
    fs::write(&path, br#"{ "b": 1, "a": { "d": [3, 2], "c": "x" } }"#).unwrap();

    let (code, stdout, _) = run_cli(&["canonicalize", path.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), r#"{"a":{"c":"x","d":[3,2]},"b":1}"#);
}

#[test]
fn test_canonicalize_from_stdin() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_vcp-verify"))
        .arg("canonicalize")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(br#"{"z":true,"y":null}"#)
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap().trim(), r#"{"y":null,"z":true}"#);
}

#[test]
fn test_event_hash_ignores_stored_hash() {
    let event = json!({ "Header": { "EventID": "e", "EventType": "ORD" }, "Payload": {} });
    let mut with_hash = event.clone();
    with_hash["Header"]["EventHash"] = json!("ab".repeat(32));

    let hash = event_hash(&event);
    assert_eq!(hash.len(), 64);
    assert_eq!(hash, event_hash(&with_hash));
}

#[test]
fn test_event_hash_rejects_invalid_json() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.json");
    fs::write(&path, b"{").unwrap();
    let (code, _, stderr) = run_cli(&["event-hash", path.to_str().unwrap()]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Invalid JSON"));
}
