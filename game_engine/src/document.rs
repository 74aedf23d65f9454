//! The JSON persistence document.
//!
//! ```json
//! {
//!   "current": "english",
//!   "narrative": null,
//!   "possible": {
//!     "english": {
//!       "events": {
//!         "0": { "type": "text", "key": "hello", "event": { "return_text": "Hello!", "enable": true, "persist": true } }
//!       },
//!       "next_id": 1
//!     }
//!   }
//! }
//! ```
//!
//! The `type` tag selects the variant on load; an unregistered tag is an
//! `UnknownEventType` error. `next_id` is optional.

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::contexts::{EventEntry, EventId, GameContext, PlayerContext};
use crate::error::{GameError, GameResult};
use crate::events::Event;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerDocument {
    pub current: Option<String>,
    pub narrative: Option<String>,
    #[serde(default)]
    pub possible: BTreeMap<String, ContextDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextDocument {
    #[serde(default, deserialize_with = "unique_events")]
    pub events: BTreeMap<EventId, EntryDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryDocument {
    #[serde(rename = "type")]
    pub kind: String,
    pub key: String,
    pub event: Value,
}

/// Event table that refuses repeated ids instead of keeping the last one.
fn unique_events<'de, D>(deserializer: D) -> Result<BTreeMap<EventId, EntryDocument>, D::Error>
where
    D: Deserializer<'de>,
{
    struct EventsVisitor;

    impl<'de> Visitor<'de> for EventsVisitor {
        type Value = BTreeMap<EventId, EntryDocument>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map from event ids to entries")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut events = BTreeMap::new();
            while let Some((id, entry)) = map.next_entry::<EventId, EntryDocument>()? {
                if events.insert(id, entry).is_some() {
                    return Err(de::Error::custom(format!("duplicate event id {id}")));
                }
            }
            Ok(events)
        }
    }

    deserializer.deserialize_map(EventsVisitor)
}

impl From<&EventEntry> for EntryDocument {
    fn from(entry: &EventEntry) -> Self {
        Self {
            kind: entry.kind().as_str().to_string(),
            key: entry.key.clone(),
            event: Value::Object(entry.event.attributes()),
        }
    }
}

impl TryFrom<EntryDocument> for EventEntry {
    type Error = GameError;

    fn try_from(doc: EntryDocument) -> GameResult<Self> {
        Ok(EventEntry {
            key: doc.key,
            event: Event::from_attributes(&doc.kind, doc.event)?,
        })
    }
}

impl GameContext {
    pub fn to_document(&self) -> ContextDocument {
        ContextDocument {
            events: self
                .events()
                .map(|(id, entry)| (id, EntryDocument::from(entry)))
                .collect(),
            next_id: Some(self.next_id().0),
        }
    }

    pub fn from_document(doc: ContextDocument) -> GameResult<Self> {
        let events = doc
            .events
            .into_iter()
            .map(|(id, entry)| -> GameResult<_> { Ok((id, EventEntry::try_from(entry)?)) })
            .collect::<GameResult<BTreeMap<_, _>>>()?;
        GameContext::from_parts(events, doc.next_id.unwrap_or(0))
    }
}

impl PlayerContext {
    pub fn to_document(&self) -> PlayerDocument {
        PlayerDocument {
            current: self.current.clone(),
            narrative: self.narrative.clone(),
            possible: self
                .possible
                .iter()
                .map(|(id, context)| (id.clone(), context.to_document()))
                .collect(),
        }
    }

    pub fn from_document(doc: PlayerDocument) -> GameResult<Self> {
        let possible = doc
            .possible
            .into_iter()
            .map(|(id, context)| -> GameResult<_> { Ok((id, GameContext::from_document(context)?)) })
            .collect::<GameResult<BTreeMap<_, _>>>()?;
        Ok(PlayerContext {
            current: doc.current,
            narrative: doc.narrative,
            possible,
        })
    }

    /// Serialize the whole world as a pretty-printed JSON blob.
    pub fn to_serialized(&self) -> GameResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }

    /// Serialize the whole world as compact JSON.
    pub fn to_serialized_compact(&self) -> GameResult<String> {
        Ok(serde_json::to_string(&self.to_document())?)
    }

    /// Rebuild a world from a blob produced by [`PlayerContext::to_serialized`].
    pub fn from_serialized(blob: &str) -> GameResult<Self> {
        let doc: PlayerDocument = serde_json::from_str(blob)?;
        Self::from_document(doc)
    }
}
