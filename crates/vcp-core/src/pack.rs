use serde::Deserialize;
use serde_json::Value;

use crate::errors::LoadError;
use crate::events::{Anchor, Batch, Event};
use crate::shared::{PackMetadata, PolicyIdentification};

#[derive(Deserialize)]
struct EventsDocument {
    #[serde(default)]
    metadata: Option<PackMetadata>,
    #[serde(default)]
    policy_identification: Option<PolicyIdentification>,
    #[serde(default)]
    events: Vec<Value>,
}

#[derive(Deserialize)]
struct BatchesDocument {
    #[serde(default)]
    batches: Vec<Batch>,
}

#[derive(Deserialize)]
struct AnchorsDocument {
    #[serde(default)]
    anchors: Vec<Anchor>,
}

/// A fully loaded evidence pack: events, batches and anchors.
///
/// Events keep pack order; every order-sensitive check (chain, Merkle
/// leaves, timeline) relies on it.
#[derive(Debug, Clone, PartialEq)]
pub struct EvidencePack {
    /// Pack metadata.
    pub metadata: PackMetadata,
    /// Pack-level policy identification.
    pub policy_identification: Option<PolicyIdentification>,
    /// Events in pack order.
    pub events: Vec<Event>,
    /// Batch summaries.
    pub batches: Vec<Batch>,
    /// External anchors.
    pub anchors: Vec<Anchor>,
}

impl EvidencePack {
    /// Builds a pack from the three already-parsed documents:
    /// `{metadata, policy_identification, events}`, `{batches}`, `{anchors}`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if any document is not an object, a record has
    /// the wrong shape, or an event lacks a usable `Header`.
    pub fn from_documents(
        events: Value,
        batches: Value,
        anchors: Value,
    ) -> Result<Self, LoadError> {
        let events_doc: EventsDocument = parse_document("events", events)?;
        let batches_doc: BatchesDocument = parse_document("batches", batches)?;
        let anchors_doc: AnchorsDocument = parse_document("anchors", anchors)?;

        let events = events_doc
            .events
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                Event::try_from(raw).map_err(|reason| LoadError::InvalidEvent { index, reason })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            metadata: events_doc.metadata.unwrap_or_default(),
            policy_identification: events_doc.policy_identification,
            events,
            batches: batches_doc.batches,
            anchors: anchors_doc.anchors,
        })
    }

    /// Events that are Merkle leaves: every event whose type is not one of
    /// the administrative markers, in pack order.
    pub fn leaf_events<'a>(
        &'a self,
        admin_types: &'a [String],
    ) -> impl Iterator<Item = &'a Event> + 'a {
        self.events
            .iter()
            .filter(move |e| !admin_types.iter().any(|t| t == e.event_type()))
    }
}

fn parse_document<T: for<'de> Deserialize<'de>>(
    document: &'static str,
    value: Value,
) -> Result<T, LoadError> {
    if !value.is_object() {
        return Err(LoadError::NotAnObject { document });
    }
    serde_json::from_value(value).map_err(|source| LoadError::Malformed { document, source })
}
