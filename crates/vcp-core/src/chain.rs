use serde::Serialize;

use crate::events::Event;

/// A `PrevHash` that does not match its predecessor's `EventHash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainBreak {
    /// Position of the event carrying the bad link.
    pub index: usize,
    /// Event carrying the bad link.
    pub event_id: String,
    /// Predecessor's `EventHash` (empty when absent).
    pub expected: String,
    /// `PrevHash` actually found.
    pub found: String,
}

/// Outcome of hash-chain validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChainStatus {
    /// No event carries a `PrevHash`. Chaining is optional, so this passes.
    NotUsed,
    /// Every present link matches.
    Intact {
        /// Number of links checked.
        links: usize,
    },
    /// At least one present link is wrong.
    Broken {
        /// Number of links checked.
        links: usize,
        /// The bad links, in pack order.
        breaks: Vec<ChainBreak>,
    },
}

impl ChainStatus {
    /// False only for [`ChainStatus::Broken`].
    pub fn is_valid(&self) -> bool {
        !matches!(self, ChainStatus::Broken { .. })
    }
}

/// Checks backward links between consecutive events in pack order.
///
/// For each event `i > 0` with a non-empty `PrevHash`, the value must equal
/// event `i - 1`'s stored `EventHash`. The first event's `PrevHash` has no
/// predecessor in the pack and is not checked.
pub fn validate_chain(events: &[Event]) -> ChainStatus {
    let mut links = 0;
    let mut breaks = Vec::new();

    for (index, pair) in events.windows(2).enumerate() {
        let (prev, current) = (&pair[0], &pair[1]);
        let Some(found) = current.prev_hash() else {
            continue;
        };
        links += 1;
        let expected = prev.stored_hash().unwrap_or("");
        if found != expected {
            breaks.push(ChainBreak {
                index: index + 1,
                event_id: current.event_id().to_string(),
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
    }

    match (links, breaks.is_empty()) {
        (0, _) => ChainStatus::NotUsed,
        (links, true) => ChainStatus::Intact { links },
        (links, false) => ChainStatus::Broken { links, breaks },
    }
}
