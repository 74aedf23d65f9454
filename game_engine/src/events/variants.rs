//! The four concrete event variants.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::attributes::{self, Attributes};
use super::{EventBehavior, EventKind};
use crate::contexts::PlayerContext;
use crate::error::GameResult;

fn default_true() -> bool {
    true
}

/// Replaces the player's narrative; emits no text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeEvent {
    #[serde(default)]
    pub return_text: String,
    #[serde(default = "default_true")]
    pub enable: bool,
    #[serde(default = "default_true")]
    pub persist: bool,
}

impl NarrativeEvent {
    pub fn new(return_text: impl Into<String>) -> Self {
        Self {
            return_text: return_text.into(),
            enable: true,
            persist: true,
        }
    }
}

impl EventBehavior for NarrativeEvent {
    fn kind(&self) -> EventKind {
        EventKind::Narrative
    }

    fn enable(&self) -> bool {
        self.enable
    }

    fn persist(&self) -> bool {
        self.persist
    }

    fn fire(&self, world: &mut PlayerContext) -> GameResult<Option<String>> {
        world.narrative = Some(self.return_text.clone());
        Ok(None)
    }

    fn attributes(&self) -> Attributes {
        let mut map = Map::new();
        map.insert("return_text".into(), Value::from(self.return_text.as_str()));
        map.insert("enable".into(), Value::Bool(self.enable));
        map.insert("persist".into(), Value::Bool(self.persist));
        map
    }

    fn set_attribute(&mut self, key: &str, value: Value) -> GameResult<()> {
        let kind = self.kind();
        match key {
            "return_text" => self.return_text = attributes::string(kind, key, value)?,
            "enable" => self.enable = attributes::boolean(kind, key, value)?,
            "persist" => self.persist = attributes::boolean(kind, key, value)?,
            _ => return Err(attributes::unknown_key(kind, key)),
        }
        Ok(())
    }

    fn set_enable(&mut self, enable: bool) {
        self.enable = enable;
    }

    fn set_persist(&mut self, persist: bool) {
        self.persist = persist;
    }
}

/// Returns its text verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextEvent {
    #[serde(default)]
    pub return_text: String,
    #[serde(default = "default_true")]
    pub enable: bool,
    #[serde(default = "default_true")]
    pub persist: bool,
}

impl TextEvent {
    pub fn new(return_text: impl Into<String>) -> Self {
        Self {
            return_text: return_text.into(),
            enable: true,
            persist: true,
        }
    }
}

impl EventBehavior for TextEvent {
    fn kind(&self) -> EventKind {
        EventKind::Text
    }

    fn enable(&self) -> bool {
        self.enable
    }

    fn persist(&self) -> bool {
        self.persist
    }

    fn fire(&self, _world: &mut PlayerContext) -> GameResult<Option<String>> {
        Ok(Some(self.return_text.clone()))
    }

    fn attributes(&self) -> Attributes {
        let mut map = Map::new();
        map.insert("return_text".into(), Value::from(self.return_text.as_str()));
        map.insert("enable".into(), Value::Bool(self.enable));
        map.insert("persist".into(), Value::Bool(self.persist));
        map
    }

    fn set_attribute(&mut self, key: &str, value: Value) -> GameResult<()> {
        let kind = self.kind();
        match key {
            "return_text" => self.return_text = attributes::string(kind, key, value)?,
            "enable" => self.enable = attributes::boolean(kind, key, value)?,
            "persist" => self.persist = attributes::boolean(kind, key, value)?,
            _ => return Err(attributes::unknown_key(kind, key)),
        }
        Ok(())
    }

    fn set_enable(&mut self, enable: bool) {
        self.enable = enable;
    }

    fn set_persist(&mut self, persist: bool) {
        self.persist = persist;
    }
}

/// Moves the player to another context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveEvent {
    #[serde(default)]
    pub next_context: String,
    #[serde(default = "default_true")]
    pub enable: bool,
    #[serde(default = "default_true")]
    pub persist: bool,
}

impl MoveEvent {
    pub fn new(next_context: impl Into<String>) -> Self {
        Self {
            next_context: next_context.into(),
            enable: true,
            persist: true,
        }
    }
}

impl EventBehavior for MoveEvent {
    fn kind(&self) -> EventKind {
        EventKind::Move
    }

    fn enable(&self) -> bool {
        self.enable
    }

    fn persist(&self) -> bool {
        self.persist
    }

    fn fire(&self, world: &mut PlayerContext) -> GameResult<Option<String>> {
        // The destination is only checked by the next interaction.
        if !world.possible.contains_key(&self.next_context) {
            warn!(next_context = %self.next_context, "moving to a context that does not exist");
        }
        info!(from = ?world.current, to = %self.next_context, "player moved");
        world.current = Some(self.next_context.clone());
        Ok(Some(format!("Moved to {}.", self.next_context)))
    }

    fn attributes(&self) -> Attributes {
        let mut map = Map::new();
        map.insert("next_context".into(), Value::from(self.next_context.as_str()));
        map.insert("enable".into(), Value::Bool(self.enable));
        map.insert("persist".into(), Value::Bool(self.persist));
        map
    }

    fn set_attribute(&mut self, key: &str, value: Value) -> GameResult<()> {
        let kind = self.kind();
        match key {
            "next_context" => self.next_context = attributes::string(kind, key, value)?,
            "enable" => self.enable = attributes::boolean(kind, key, value)?,
            "persist" => self.persist = attributes::boolean(kind, key, value)?,
            _ => return Err(attributes::unknown_key(kind, key)),
        }
        Ok(())
    }

    fn set_enable(&mut self, enable: bool) {
        self.enable = enable;
    }

    fn set_persist(&mut self, persist: bool) {
        self.persist = persist;
    }
}

/// Merges `nattributes` into the event at `(gc_id, event_id)`.
///
/// The target is looked up by key pair every time the event fires; nothing
/// holds on to it in between. Update events are one-shot unless told otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateEvent {
    #[serde(default)]
    pub return_text: String,
    #[serde(default)]
    pub gc_id: String,
    #[serde(default)]
    pub event_id: String,
    #[serde(default)]
    pub nattributes: Attributes,
    #[serde(default = "default_true")]
    pub enable: bool,
    #[serde(default)]
    pub persist: bool,
}

impl UpdateEvent {
    pub fn new(
        return_text: impl Into<String>,
        gc_id: impl Into<String>,
        event_id: impl ToString,
        nattributes: Attributes,
    ) -> Self {
        Self {
            return_text: return_text.into(),
            gc_id: gc_id.into(),
            event_id: event_id.to_string(),
            nattributes,
            enable: true,
            persist: false,
        }
    }
}

impl EventBehavior for UpdateEvent {
    fn kind(&self) -> EventKind {
        EventKind::Update
    }

    fn enable(&self) -> bool {
        self.enable
    }

    fn persist(&self) -> bool {
        self.persist
    }

    fn fire(&self, world: &mut PlayerContext) -> GameResult<Option<String>> {
        let target = world.resolve_reference_mut(&self.gc_id, &self.event_id)?;
        // Key-wise overwrite; nested objects are replaced, not merged. The
        // target only changes if every key is accepted.
        let mut updated = target.clone();
        for (key, value) in &self.nattributes {
            updated.set_attribute(key, value.clone())?;
        }
        *target = updated;
        debug!(
            gc_id = %self.gc_id,
            event_id = %self.event_id,
            keys = self.nattributes.len(),
            "updated event attributes"
        );
        Ok(Some(self.return_text.clone()))
    }

    fn attributes(&self) -> Attributes {
        let mut map = Map::new();
        map.insert("return_text".into(), Value::from(self.return_text.as_str()));
        map.insert("gc_id".into(), Value::from(self.gc_id.as_str()));
        map.insert("event_id".into(), Value::from(self.event_id.as_str()));
        map.insert("nattributes".into(), Value::Object(self.nattributes.clone()));
        map.insert("enable".into(), Value::Bool(self.enable));
        map.insert("persist".into(), Value::Bool(self.persist));
        map
    }

    fn set_attribute(&mut self, key: &str, value: Value) -> GameResult<()> {
        let kind = self.kind();
        match key {
            "return_text" => self.return_text = attributes::string(kind, key, value)?,
            "gc_id" => self.gc_id = attributes::string(kind, key, value)?,
            "event_id" => self.event_id = attributes::string(kind, key, value)?,
            "nattributes" => self.nattributes = attributes::object(kind, key, value)?,
            "enable" => self.enable = attributes::boolean(kind, key, value)?,
            "persist" => self.persist = attributes::boolean(kind, key, value)?,
            _ => return Err(attributes::unknown_key(kind, key)),
        }
        Ok(())
    }

    fn set_enable(&mut self, enable: bool) {
        self.enable = enable;
    }

    fn set_persist(&mut self, persist: bool) {
        self.persist = persist;
    }
}
