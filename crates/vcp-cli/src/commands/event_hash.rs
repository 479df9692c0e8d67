//! Event-hash command implementation.

use vcp_canonical::Canonicalizer;
use vcp_core::compute_event_hash_value;

use super::read_json_input;

pub fn run(input: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let event = read_json_input(input)?;

    let hash = compute_event_hash_value(&event, &Canonicalizer::new())
        .map_err(|e| format!("Cannot hash event: {}", e))?;

    let stored = event
        .get("Header")
        .and_then(|h| h.get("EventHash"))
        .and_then(|v| v.as_str());
    if let Some(stored) = stored {
        if hash != stored {
            eprintln!("warning: stored EventHash {} differs", stored);
        }
    }

    println!("{}", hash);
    Ok(())
}
