//! A small two-room world for new sessions and tests.

use game_engine::{Attributes, Event, GameContext, MoveEvent, PlayerContext, TextEvent, UpdateEvent};
use serde_json::Value;

/// Two linked rooms, `english` and `french`.
///
/// Picking up the wine in `english` enables a one-shot "drink" in `french`.
pub fn sample_world() -> PlayerContext {
    let mut english = GameContext::new();
    english.add_event("hello", TextEvent::new("Hello!"));
    english.add_event("goodbye", TextEvent::new("Goodbye!"));
    english.add_event("french", MoveEvent::new("french"));

    let mut french = GameContext::new();
    french.add_event("bonjour", TextEvent::new("Bonjour!"));
    french.add_event("aurevoir", TextEvent::new("Au revoir!"));
    french.add_event("english", MoveEvent::new("english"));
    let drink = french.add_event(
        "drink",
        Event::from(TextEvent::new("You drink the wine."))
            .with_enable(false)
            .with_persist(false),
    );

    let mut changes = Attributes::new();
    changes.insert("enable".to_string(), Value::Bool(true));
    english.add_event(
        "wine",
        UpdateEvent::new("You pick up the wine.", "french", drink, changes),
    );

    let mut world = PlayerContext::new().with_current("english");
    world.add_gamecontext("english", english);
    world.add_gamecontext("french", french);
    world
}
