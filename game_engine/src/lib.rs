//! # Game Engine
//!
//! The interaction engine of the text adventure. A player stands in one of
//! several named contexts (rooms); each context owns keyed events that fire when
//! the player's input matches their trigger key.
//!
//! ## Core Components
//!
//! - **events**: The four event variants and their attribute schemas
//! - **contexts**: `GameContext` (a room's event table) and `PlayerContext`
//!   (the whole world plus the input-resolution algorithm)
//! - **document**: The JSON persistence document and the round trip
//!
//! The engine performs no I/O. A session is reconstructed from its serialized
//! blob, driven through `PlayerContext::interact`, and serialized again.

pub mod contexts;
pub mod document;
pub mod error;
pub mod events;

pub use contexts::*;
pub use document::*;
pub use error::*;
pub use events::*;
