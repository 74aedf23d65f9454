//! Contexts - rooms and the player's view of the whole world.

mod game_context;
mod player_context;

pub use game_context::*;
pub use player_context::*;
