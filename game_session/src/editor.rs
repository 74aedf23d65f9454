//! Form-driven world editing.
//!
//! Forms arrive as flat string maps. Boolean attributes are checkboxes: a field
//! set to `"on"` is true and an absent field is false. String attributes must
//! be present. `nattributes` is submitted as a JSON object.

use game_engine::{DanglingRef, Event, EventId, EventKind, GameContext, PlayerContext};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::info;

use crate::error::{SessionError, SessionResult};

/// A submitted form.
pub type FormFields = HashMap<String, String>;

/// Form field holding an event's trigger key.
pub const KEY_FIELD: &str = "key";

fn required<'f>(form: &'f FormFields, field: &str) -> SessionResult<&'f str> {
    form.get(field)
        .map(String::as_str)
        .ok_or_else(|| SessionError::MissingField(field.to_string()))
}

fn parse_object(field: &str, raw: &str) -> SessionResult<Value> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    let invalid = |message: String| SessionError::InvalidField {
        field: field.to_string(),
        message,
    };
    match serde_json::from_str(raw) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err(invalid("expected a JSON object".to_string())),
        Err(err) => Err(invalid(err.to_string())),
    }
}

/// Overwrite every attribute of `event` from the form.
pub fn apply_form(event: &mut Event, form: &FormFields) -> SessionResult<()> {
    for (key, current) in event.attributes() {
        let value = match current {
            Value::Bool(_) => Value::Bool(form.get(&key).is_some_and(|v| v == "on")),
            Value::Object(_) => parse_object(&key, required(form, &key)?)?,
            _ => Value::String(required(form, &key)?.to_string()),
        };
        event.set_attribute(&key, value)?;
    }
    Ok(())
}

/// Add an empty context.
pub fn add_context(world: &mut PlayerContext, key: &str) -> String {
    world.add_gamecontext(key, GameContext::new())
}

/// Remove a context, returning the Update events it leaves dangling.
pub fn remove_context(world: &mut PlayerContext, key: &str) -> SessionResult<Vec<DanglingRef>> {
    Ok(world.remove_gamecontext(key)?.dangling)
}

/// Create an event of `kind` from a form and add it to a context.
pub fn add_event(
    world: &mut PlayerContext,
    context_id: &str,
    kind: EventKind,
    form: &FormFields,
) -> SessionResult<EventId> {
    let mut event = Event::new(kind);
    apply_form(&mut event, form)?;
    let key = required(form, KEY_FIELD)?;

    let id = world.context_mut(context_id)?.add_event(key, event);
    info!(context = %context_id, event = %id, %kind, "event created from form");
    Ok(id)
}

/// Rewrite an existing event and its trigger key from a form.
///
/// The event is left untouched if any field is rejected.
pub fn edit_event(
    world: &mut PlayerContext,
    context_id: &str,
    event_id: EventId,
    form: &FormFields,
) -> SessionResult<()> {
    let entry = world.event_mut(context_id, event_id)?;

    let mut event = entry.event.clone();
    apply_form(&mut event, form)?;
    let key = required(form, KEY_FIELD)?;

    entry.event = event;
    entry.key = key.to_string();
    info!(context = %context_id, event = %event_id, "event edited from form");
    Ok(())
}

pub fn remove_event(world: &mut PlayerContext, context_id: &str, event_id: EventId) -> SessionResult<()> {
    world.remove_event(context_id, event_id)?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventSummary {
    pub id: EventId,
    pub key: String,
    pub kind: EventKind,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextSummary {
    pub id: String,
    pub current: bool,
    pub events: Vec<EventSummary>,
}

/// Every context and its events, for presentation.
pub fn context_overview(world: &PlayerContext) -> Vec<ContextSummary> {
    world
        .possible
        .iter()
        .map(|(id, context)| ContextSummary {
            id: id.clone(),
            current: world.current.as_deref() == Some(id.as_str()),
            events: context
                .events()
                .map(|(event_id, entry)| EventSummary {
                    id: event_id,
                    key: entry.key.clone(),
                    kind: entry.kind(),
                    enabled: entry.event.enable(),
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample_world::sample_world;
    use game_engine::GameError;
    use serde_json::json;

    fn form(fields: &[(&str, &str)]) -> FormFields {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_add_event_from_form() {
        let mut world = sample_world();
        add_context(&mut world, "garden");

        let id = add_event(
            &mut world,
            "garden",
            EventKind::Text,
            &form(&[("key", "smell"), ("return_text", "Roses."), ("enable", "on")]),
        )
        .unwrap();

        let entry = world.event("garden", id).unwrap();
        assert_eq!(entry.key, "smell");
        assert!(entry.event.enable());
        // Unchecked box means false.
        assert!(!entry.event.persist());

        world.current = Some("garden".into());
        assert_eq!(world.interact("smell").unwrap(), "Roses.");
    }

    #[test]
    fn test_add_update_event_from_form() {
        let mut world = sample_world();

        let id = add_event(
            &mut world,
            "french",
            EventKind::Update,
            &form(&[
                ("key", "hide"),
                ("return_text", "You hide the wine."),
                ("gc_id", "french"),
                ("event_id", "3"),
                ("nattributes", r#"{"enable": false}"#),
                ("enable", "on"),
            ]),
        )
        .unwrap();

        let attributes = world.event("french", id).unwrap().event.attributes();
        assert_eq!(attributes["nattributes"], json!({"enable": false}));
        assert_eq!(attributes["persist"], json!(false));
    }

    #[test]
    fn test_missing_fields() {
        let mut world = sample_world();

        let err = add_event(&mut world, "english", EventKind::Move, &form(&[("key", "up")]))
            .unwrap_err();
        assert!(matches!(err, SessionError::MissingField(f) if f == "next_context"));

        let err = add_event(
            &mut world,
            "english",
            EventKind::Text,
            &form(&[("return_text", "x")]),
        )
        .unwrap_err();
        assert!(matches!(err, SessionError::MissingField(f) if f == "key"));
    }

    #[test]
    fn test_invalid_nattributes() {
        let mut event = Event::new(EventKind::Update);
        let fields = form(&[
            ("return_text", ""),
            ("gc_id", "a"),
            ("event_id", "0"),
            ("nattributes", "[1, 2]"),
        ]);

        assert!(matches!(
            apply_form(&mut event, &fields),
            Err(SessionError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_edit_event() {
        let mut world = sample_world();

        edit_event(
            &mut world,
            "english",
            EventId(0),
            &form(&[("key", "hi"), ("return_text", "Hi there!"), ("enable", "on"), ("persist", "on")]),
        )
        .unwrap();

        assert_eq!(world.interact("hi").unwrap(), "Hi there!");
        assert!(world.interact("hello").unwrap().starts_with("Try one of these inputs: "));
    }

    #[test]
    fn test_rejected_edit_leaves_event_alone() {
        let mut world = sample_world();
        let before = world.event("english", EventId(0)).unwrap().clone();

        assert!(edit_event(&mut world, "english", EventId(0), &form(&[("enable", "on")])).is_err());
        assert_eq!(world.event("english", EventId(0)).unwrap(), &before);
    }

    #[test]
    fn test_edit_unknown_targets() {
        let mut world = sample_world();
        let fields = form(&[("key", "x"), ("return_text", "x")]);

        assert!(matches!(
            edit_event(&mut world, "attic", EventId(0), &fields),
            Err(SessionError::Game(GameError::MissingContext(_)))
        ));
        assert!(matches!(
            edit_event(&mut world, "english", EventId(99), &fields),
            Err(SessionError::Game(GameError::MissingEvent { .. }))
        ));
    }

    #[test]
    fn test_remove_context_reports_dangling() {
        let mut world = sample_world();

        let dangling = remove_context(&mut world, "french").unwrap();
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].context, "english");
        assert_eq!(dangling[0].target_context, "french");
    }

    #[test]
    fn test_remove_event() {
        let mut world = sample_world();

        remove_event(&mut world, "english", EventId(1)).unwrap();
        assert!(remove_event(&mut world, "english", EventId(1)).is_err());
        assert_eq!(
            world.interact("goodbye").unwrap(),
            "Try one of these inputs: hello, french, wine"
        );
    }

    #[test]
    fn test_context_overview() {
        let world = sample_world();
        let overview = context_overview(&world);

        assert_eq!(overview.len(), 2);
        let english = &overview[0];
        assert_eq!(english.id, "english");
        assert!(english.current);
        assert_eq!(english.events.len(), 4);
        assert_eq!(english.events[3].kind, EventKind::Update);

        let french = &overview[1];
        assert!(!french.current);
        assert!(!french.events[3].enabled);
    }

    #[test]
    fn test_context_overview_json() {
        let world = sample_world();
        let value = serde_json::to_value(context_overview(&world)).unwrap();

        assert_eq!(value[0]["id"], json!("english"));
        assert_eq!(value[0]["current"], json!(true));
        assert_eq!(
            value[0]["events"][3],
            json!({"id": "3", "key": "wine", "kind": "update", "enabled": true})
        );
        assert_eq!(
            value[1]["events"][3],
            json!({"id": "3", "key": "drink", "kind": "text", "enabled": false})
        );
    }
}
