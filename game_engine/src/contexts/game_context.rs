//! A single room: an ordered table of keyed events.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

use crate::error::{GameError, GameResult};
use crate::events::{Event, EventKind};

/// Identifier of an event within one context.
///
/// Ids are unique per context only; a foreign event is addressed by the
/// `(context id, event id)` pair. On the wire an id is its decimal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(pub u64);

impl EventId {
    /// Largest id a context hands out or accepts from a document.
    pub const MAX: EventId = EventId(i64::MAX as u64);
}

/// A string that is not the canonical decimal form of an event id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid event id: {0:?}")]
pub struct ParseEventIdError(pub String);

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EventId {
    type Err = ParseEventIdError;

    /// Only plain digits without leading zeros, so every id has one spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseEventIdError(s.to_string());
        let digits_only = !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !digits_only || (s.len() > 1 && s.starts_with('0')) {
            return Err(invalid());
        }
        s.parse().map(EventId).map_err(|_| invalid())
    }
}

impl Serialize for EventId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(<D::Error as serde::de::Error>::custom)
    }
}

/// An event together with the input that triggers it.
#[derive(Debug, Clone, PartialEq)]
pub struct EventEntry {
    pub key: String,
    pub event: Event,
}

impl EventEntry {
    /// The variant tag, fixed for the lifetime of the entry.
    pub fn kind(&self) -> EventKind {
        self.event.kind()
    }
}

/// A room of the world.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameContext {
    events: BTreeMap<EventId, EventEntry>,

    /// Next id to hand out. Never decreases, so removed ids are not reused.
    next_id: u64,
}

impl GameContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a context from saved entries, keeping ids monotonic.
    pub(crate) fn from_parts(
        events: BTreeMap<EventId, EventEntry>,
        next_id: u64,
    ) -> GameResult<Self> {
        let exhausted = || GameError::MalformedDocument("event id space exhausted".to_string());
        let floor = match events.keys().next_back() {
            Some(id) => id.0.checked_add(1).ok_or_else(exhausted)?,
            None => 0,
        };
        let next_id = next_id.max(floor);
        if next_id > EventId::MAX.0 {
            return Err(exhausted());
        }
        Ok(Self { events, next_id })
    }

    /// Add an event under a trigger key.
    ///
    /// Returns the id assigned to it.
    pub fn add_event(&mut self, key: impl Into<String>, event: impl Into<Event>) -> EventId {
        let id = EventId(self.next_id);
        // Loaded counters are capped at EventId::MAX, far below u64::MAX.
        self.next_id = self.next_id.saturating_add(1);

        let entry = EventEntry {
            key: key.into(),
            event: event.into(),
        };
        debug!(event = %id, key = %entry.key, kind = %entry.kind(), "event added");
        self.events.insert(id, entry);
        id
    }

    /// Remove an event, returning it if it was present.
    pub fn remove_event(&mut self, id: EventId) -> Option<EventEntry> {
        self.events.remove(&id)
    }

    pub fn get(&self, id: EventId) -> Option<&EventEntry> {
        self.events.get(&id)
    }

    pub fn get_mut(&mut self, id: EventId) -> Option<&mut EventEntry> {
        self.events.get_mut(&id)
    }

    /// Iterate over entries in id order.
    pub fn events(&self) -> impl Iterator<Item = (EventId, &EventEntry)> {
        self.events.iter().map(|(id, entry)| (*id, entry))
    }

    /// Ids of enabled events keyed on `input`, in id order.
    pub fn matching(&self, input: &str) -> Vec<EventId> {
        self.events
            .iter()
            .filter(|(_, entry)| entry.key == input && entry.event.enable())
            .map(|(id, _)| *id)
            .collect()
    }

    /// Trigger keys of all enabled events, in id order.
    pub fn enabled_keys(&self) -> Vec<&str> {
        self.events
            .values()
            .filter(|entry| entry.event.enable())
            .map(|entry| entry.key.as_str())
            .collect()
    }

    pub fn next_id(&self) -> EventId {
        EventId(self.next_id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{MoveEvent, TextEvent};

    #[test]
    fn test_add_event_assigns_sequential_ids() {
        let mut gc = GameContext::new();

        let a = gc.add_event("hello", TextEvent::new("Hello!"));
        let b = gc.add_event("goodbye", TextEvent::new("Goodbye!"));

        assert_eq!(a, EventId(0));
        assert_eq!(b, EventId(1));
        assert_eq!(gc.get(b).unwrap().key, "goodbye");
        assert_eq!(gc.get(b).unwrap().kind(), EventKind::Text);
    }

    #[test]
    fn test_ids_not_reused_after_removal() {
        let mut gc = GameContext::new();

        gc.add_event("a", TextEvent::new("a"));
        let b = gc.add_event("b", TextEvent::new("b"));
        assert!(gc.remove_event(b).is_some());

        let c = gc.add_event("c", TextEvent::new("c"));
        assert_eq!(c, EventId(2));
        assert_eq!(gc.len(), 2);
    }

    #[test]
    fn test_remove_missing_event() {
        let mut gc = GameContext::new();
        assert!(gc.remove_event(EventId(4)).is_none());
    }

    #[test]
    fn test_id_order_is_numeric() {
        let mut gc = GameContext::new();
        for i in 0..12 {
            gc.add_event(format!("k{i}"), TextEvent::new("x"));
        }

        let ids: Vec<_> = gc.events().map(|(id, _)| id.0).collect();
        assert_eq!(ids, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn test_matching_skips_disabled() {
        let mut gc = GameContext::new();
        let first = gc.add_event("look", TextEvent::new("A"));
        gc.add_event("look", Event::from(TextEvent::new("B")).with_enable(false));
        gc.add_event("north", MoveEvent::new("garden"));
        let last = gc.add_event("look", TextEvent::new("C"));

        assert_eq!(gc.matching("look"), vec![first, last]);
        assert!(gc.matching("south").is_empty());
        assert_eq!(gc.enabled_keys(), ["look", "north", "look"]);
    }

    #[test]
    fn test_from_parts_keeps_counter_ahead() {
        let mut events = BTreeMap::new();
        events.insert(
            EventId(5),
            EventEntry {
                key: "x".into(),
                event: TextEvent::new("x").into(),
            },
        );

        assert_eq!(GameContext::from_parts(events.clone(), 0).unwrap().next_id(), EventId(6));
        assert_eq!(GameContext::from_parts(events, 9).unwrap().next_id(), EventId(9));
        assert_eq!(GameContext::from_parts(BTreeMap::new(), 0).unwrap().next_id(), EventId(0));
    }

    #[test]
    fn test_from_parts_rejects_exhausted_counter() {
        let entry = EventEntry {
            key: "x".into(),
            event: TextEvent::new("x").into(),
        };

        let mut top = BTreeMap::new();
        top.insert(EventId(u64::MAX), entry.clone());
        assert!(matches!(
            GameContext::from_parts(top, 0),
            Err(GameError::MalformedDocument(_))
        ));

        assert!(matches!(
            GameContext::from_parts(BTreeMap::new(), u64::MAX),
            Err(GameError::MalformedDocument(_))
        ));

        let mut last = BTreeMap::new();
        last.insert(EventId(EventId::MAX.0 - 1), entry);
        let mut gc = GameContext::from_parts(last, 0).unwrap();
        assert_eq!(gc.add_event("y", TextEvent::new("y")), EventId::MAX);
    }

    #[test]
    fn test_event_id_canonical_form() {
        assert_eq!("0".parse::<EventId>().unwrap(), EventId(0));
        assert_eq!("42".parse::<EventId>().unwrap(), EventId(42));

        for raw in ["", "01", "00", "+1", "-1", " 1", "1.0", "18446744073709551616"] {
            assert_eq!(
                raw.parse::<EventId>(),
                Err(ParseEventIdError(raw.to_string())),
                "{raw:?} should not parse"
            );
        }
    }

    #[test]
    fn test_event_id_serde() {
        assert_eq!(serde_json::to_string(&EventId(12)).unwrap(), "\"12\"");
        assert_eq!(serde_json::from_str::<EventId>("\"7\"").unwrap(), EventId(7));
        assert!(serde_json::from_str::<EventId>("\"seven\"").is_err());
        assert!(serde_json::from_str::<EventId>("\"07\"").is_err());
    }
}
