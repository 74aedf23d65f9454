//! The player's world: where they are, what they were last told, and every room.

use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::{EventEntry, EventId, GameContext};
use crate::error::{GameError, GameResult};
use crate::events::Event;

/// Label reported when no current context has been set.
const UNSET_CONTEXT: &str = "<unset>";

/// Prefix of the reply given when no event matches the input.
pub const HINT_PREFIX: &str = "Try one of these inputs: ";

/// An Update event whose target does not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingRef {
    /// Context holding the Update event.
    pub context: String,
    pub event: EventId,
    pub target_context: String,
    pub target_event: String,
}

/// Result of removing a context from the world.
#[derive(Debug, Clone)]
pub struct RemovedContext {
    pub context: GameContext,
    /// Update events elsewhere that pointed into the removed context.
    pub dangling: Vec<DanglingRef>,
}

/// The complete session state: unit of interaction and of persistence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerContext {
    /// Id of the active context.
    pub current: Option<String>,

    /// Text of the last Narrative event that fired.
    pub narrative: Option<String>,

    /// All contexts by id.
    pub possible: BTreeMap<String, GameContext>,
}

impl PlayerContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the starting context.
    pub fn with_current(mut self, context: impl Into<String>) -> Self {
        self.current = Some(context.into());
        self
    }

    /// Insert (or replace) a context under `name`.
    pub fn add_gamecontext(&mut self, name: impl Into<String>, context: GameContext) -> String {
        let name = name.into();
        info!(context = %name, events = context.len(), "context added");
        self.possible.insert(name.clone(), context);
        name
    }

    /// Remove a context.
    ///
    /// References into it are reported, not repaired; they fail when fired.
    pub fn remove_gamecontext(&mut self, id: &str) -> GameResult<RemovedContext> {
        let context = self
            .possible
            .remove(id)
            .ok_or_else(|| GameError::MissingContext(id.to_string()))?;

        let dangling: Vec<_> = self
            .dangling_references()
            .into_iter()
            .filter(|r| r.target_context == id)
            .collect();
        for r in &dangling {
            warn!(
                context = %r.context,
                event = %r.event,
                target_context = %r.target_context,
                target_event = %r.target_event,
                "update event left dangling"
            );
        }
        info!(context = %id, dangling = dangling.len(), "context removed");

        Ok(RemovedContext { context, dangling })
    }

    pub fn context(&self, id: &str) -> GameResult<&GameContext> {
        self.possible
            .get(id)
            .ok_or_else(|| GameError::MissingContext(id.to_string()))
    }

    pub fn context_mut(&mut self, id: &str) -> GameResult<&mut GameContext> {
        self.possible
            .get_mut(id)
            .ok_or_else(|| GameError::MissingContext(id.to_string()))
    }

    /// The active context.
    pub fn current_context(&self) -> GameResult<&GameContext> {
        let current = self
            .current
            .as_deref()
            .ok_or_else(|| GameError::MissingContext(UNSET_CONTEXT.to_string()))?;
        self.context(current)
    }

    pub fn event(&self, context: &str, id: EventId) -> GameResult<&EventEntry> {
        self.context(context)?
            .get(id)
            .ok_or_else(|| GameError::MissingEvent {
                context: context.to_string(),
                event: id,
            })
    }

    pub fn event_mut(&mut self, context: &str, id: EventId) -> GameResult<&mut EventEntry> {
        self.context_mut(context)?
            .get_mut(id)
            .ok_or_else(|| GameError::MissingEvent {
                context: context.to_string(),
                event: id,
            })
    }

    /// Remove an event from a context.
    pub fn remove_event(&mut self, context: &str, id: EventId) -> GameResult<EventEntry> {
        self.context_mut(context)?
            .remove_event(id)
            .ok_or_else(|| GameError::MissingEvent {
                context: context.to_string(),
                event: id,
            })
    }

    /// Resolve an Update event's `(gc_id, event_id)` pair.
    pub fn resolve_reference_mut(&mut self, gc_id: &str, event_id: &str) -> GameResult<&mut Event> {
        let dangling = || GameError::DanglingReference {
            gc_id: gc_id.to_string(),
            event_id: event_id.to_string(),
        };
        let id: EventId = event_id.parse().map_err(|_| dangling())?;
        self.possible
            .get_mut(gc_id)
            .and_then(|context| context.get_mut(id))
            .map(|entry| &mut entry.event)
            .ok_or_else(dangling)
    }

    fn resolves(&self, gc_id: &str, event_id: &str) -> bool {
        let Ok(id) = event_id.parse::<EventId>() else {
            return false;
        };
        self.possible
            .get(gc_id)
            .is_some_and(|context| context.get(id).is_some())
    }

    /// Every Update event in the world whose target does not resolve.
    pub fn dangling_references(&self) -> Vec<DanglingRef> {
        let mut dangling = Vec::new();
        for (context_id, context) in &self.possible {
            for (id, entry) in context.events() {
                let Some((gc_id, event_id)) = entry.event.reference() else {
                    continue;
                };
                if !self.resolves(gc_id, event_id) {
                    dangling.push(DanglingRef {
                        context: context_id.clone(),
                        event: id,
                        target_context: gc_id.to_string(),
                        target_event: event_id.to_string(),
                    });
                }
            }
        }
        dangling
    }

    /// Resolve one line of player input against the current context.
    ///
    /// Every enabled event keyed on `input` fires, in id order. Returned text
    /// is joined by newlines. Non-persistent events are dropped as soon as they
    /// have fired. Mutations applied before an error are kept.
    pub fn interact(&mut self, input: &str) -> GameResult<String> {
        let origin = self
            .current
            .clone()
            .ok_or_else(|| GameError::MissingContext(UNSET_CONTEXT.to_string()))?;

        let candidates = self.context(&origin)?.matching(input);
        debug!(context = %origin, input, candidates = candidates.len(), "resolving input");

        if candidates.is_empty() {
            let keys = self.context(&origin)?.enabled_keys();
            return Ok(format!("{}{}", HINT_PREFIX, keys.join(", ")));
        }

        let mut output = String::new();
        for id in candidates {
            // Fetched at fire time, not at collection time, so attribute
            // changes made by earlier Update candidates are seen.
            let event = self.event(&origin, id)?.event.clone();

            debug!(context = %origin, event = %id, kind = %event.kind(), "firing event");
            if let Some(text) = event.fire(self)? {
                if !text.is_empty() {
                    output.push_str(&text);
                    output.push('\n');
                }
            }

            if let Some(context) = self.possible.get_mut(&origin) {
                let persist = context.get(id).map_or(true, |entry| entry.event.persist());
                if !persist {
                    context.remove_event(id);
                    debug!(context = %origin, event = %id, "non-persistent event removed");
                }
            }
        }

        Ok(output.trim_end().to_string())
    }
}
