//! Canonicalize command implementation.

use vcp_canonical::Canonicalizer;

use super::read_json_input;

pub fn run(input: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let value = read_json_input(input)?;

    let canonical = Canonicalizer::new()
        .canonicalize_to_string(&value)
        .map_err(|e| format!("Canonicalization failed: {}", e))?;

    println!("{}", canonical);
    Ok(())
}
