//! # Game Session
//!
//! Everything that sits around the interaction engine: per-player sessions
//! persisted as opaque blobs, form-driven world editing, a sample world, and
//! configuration for the `adventure` command-line front end.
//!
//! A session never keeps a world in memory between requests. Each request
//! restores the world from its blob, interacts, and writes the blob back.

pub mod config;
pub mod editor;
pub mod error;
pub mod sample_world;
pub mod session;
pub mod store;

pub use config::*;
pub use editor::*;
pub use error::*;
pub use sample_world::*;
pub use session::*;
pub use store::*;
