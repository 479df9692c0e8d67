use serde_json::json;
use vcp_canonical::canonicalizer::Canonicalizer;

fn main() {
    let canonicalizer = Canonicalizer::new();
    let event = json!({
        "Header": {
            "EventID": "019a0000-0000-7000-8000-000000000001",
            "EventType": "ORD",
            "TimestampISO": "2025-12-20T00:00:00.000Z"
        },
        "Payload": {
            "Symbol": "USDJPY",
            "Side": "BUY",
            "Price": 150.25,
            "Quantity": 100000
        }
    });

    match canonicalizer.canonicalize_to_string(&event) {
        Ok(canonical) => println!("{}", canonical),
        Err(err) => {
            eprintln!("canonicalization failed: {}", err);
            std::process::exit(1);
        }
    }
}
