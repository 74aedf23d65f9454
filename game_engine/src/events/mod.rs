//! Events - the units of behavior that fire on matching player input.
//!
//! Every variant carries its own attribute schema plus the two flags shared by
//! all events:
//! - **enable**: only enabled events are candidates for matching
//! - **persist**: non-persistent events are removed right after they fire

pub mod attributes;
mod variants;

pub use attributes::Attributes;
pub use variants::*;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::contexts::PlayerContext;
use crate::error::{GameError, GameResult};

/// Tag naming the concrete variant of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Narrative,
    Text,
    Move,
    Update,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::Narrative,
        EventKind::Text,
        EventKind::Move,
        EventKind::Update,
    ];

    /// The type tag used in serialized documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Narrative => "narrative",
            EventKind::Text => "text",
            EventKind::Move => "move",
            EventKind::Update => "update",
        }
    }
}

impl FromStr for EventKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| GameError::UnknownEventType(s.to_string()))
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Capability shared by all event variants.
pub trait EventBehavior {
    fn kind(&self) -> EventKind;

    fn enable(&self) -> bool;

    fn persist(&self) -> bool;

    /// Apply the event to the world, returning text for the player if any.
    fn fire(&self, world: &mut PlayerContext) -> GameResult<Option<String>>;

    /// Full attribute mapping, flags included.
    fn attributes(&self) -> Attributes;

    /// Overwrite a single attribute, checking it against the variant's schema.
    fn set_attribute(&mut self, key: &str, value: Value) -> GameResult<()>;

    fn set_enable(&mut self, enable: bool);

    fn set_persist(&mut self, persist: bool);
}

/// An event of any variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Narrative(NarrativeEvent),
    Text(TextEvent),
    Move(MoveEvent),
    Update(UpdateEvent),
}

impl Event {
    /// Create an event of the given kind with default attributes.
    pub fn new(kind: EventKind) -> Self {
        match kind {
            EventKind::Narrative => NarrativeEvent::new("").into(),
            EventKind::Text => TextEvent::new("").into(),
            EventKind::Move => MoveEvent::new("").into(),
            EventKind::Update => UpdateEvent::new("", "", "", Attributes::new()).into(),
        }
    }

    /// Rebuild an event from its type tag and saved attribute mapping.
    pub fn from_attributes(type_name: &str, attributes: Value) -> GameResult<Self> {
        let event = match type_name.parse::<EventKind>()? {
            EventKind::Narrative => Event::Narrative(serde_json::from_value(attributes)?),
            EventKind::Text => Event::Text(serde_json::from_value(attributes)?),
            EventKind::Move => Event::Move(serde_json::from_value(attributes)?),
            EventKind::Update => Event::Update(serde_json::from_value(attributes)?),
        };
        Ok(event)
    }

    /// Set whether the event is a matching candidate.
    pub fn with_enable(mut self, enable: bool) -> Self {
        self.behavior_mut().set_enable(enable);
        self
    }

    /// Set whether the event survives firing.
    pub fn with_persist(mut self, persist: bool) -> Self {
        self.behavior_mut().set_persist(persist);
        self
    }

    pub fn kind(&self) -> EventKind {
        self.behavior().kind()
    }

    pub fn enable(&self) -> bool {
        self.behavior().enable()
    }

    pub fn persist(&self) -> bool {
        self.behavior().persist()
    }

    pub fn fire(&self, world: &mut PlayerContext) -> GameResult<Option<String>> {
        self.behavior().fire(world)
    }

    pub fn attributes(&self) -> Attributes {
        self.behavior().attributes()
    }

    pub fn set_attribute(&mut self, key: &str, value: Value) -> GameResult<()> {
        self.behavior_mut().set_attribute(key, value)
    }

    /// The `(gc_id, event_id)` pair of an Update event.
    pub fn reference(&self) -> Option<(&str, &str)> {
        match self {
            Event::Update(update) => Some((update.gc_id.as_str(), update.event_id.as_str())),
            _ => None,
        }
    }

    fn behavior(&self) -> &dyn EventBehavior {
        match self {
            Event::Narrative(e) => e,
            Event::Text(e) => e,
            Event::Move(e) => e,
            Event::Update(e) => e,
        }
    }

    fn behavior_mut(&mut self) -> &mut dyn EventBehavior {
        match self {
            Event::Narrative(e) => e,
            Event::Text(e) => e,
            Event::Move(e) => e,
            Event::Update(e) => e,
        }
    }
}

impl From<NarrativeEvent> for Event {
    fn from(event: NarrativeEvent) -> Self {
        Event::Narrative(event)
    }
}

impl From<TextEvent> for Event {
    fn from(event: TextEvent) -> Self {
        Event::Text(event)
    }
}

impl From<MoveEvent> for Event {
    fn from(event: MoveEvent) -> Self {
        Event::Move(event)
    }
}

impl From<UpdateEvent> for Event {
    fn from(event: UpdateEvent) -> Self {
        Event::Update(event)
    }
}
