//! Per-request session lifecycle.
//!
//! 1. **Restore**: Deserialize the world from the session's blob, seeding a new
//!    world when there is none
//! 2. **Interact**: Resolve the player's input, or dump the world for the
//!    debug command
//! 3. **Persist**: Serialize the world back into the store

use game_engine::PlayerContext;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::error::SessionResult;
use crate::sample_world::sample_world;
use crate::store::{BlobStore, SessionId};

/// Build the world a new session starts with.
pub fn seed_world(config: &SessionConfig) -> SessionResult<PlayerContext> {
    match &config.world_file {
        Some(path) => {
            let blob = std::fs::read_to_string(path)?;
            info!(path = %path.display(), "loading world file");
            Ok(PlayerContext::from_serialized(&blob)?)
        }
        None => Ok(sample_world()),
    }
}

/// One player's session, bound to its store for the duration of a request.
pub struct Session<'a, S: BlobStore> {
    store: &'a mut S,
    id: SessionId,
    config: &'a SessionConfig,
    world: PlayerContext,
}

impl<'a, S: BlobStore> Session<'a, S> {
    /// Restore a session, seeding and saving a new world if none is stored.
    pub fn open(store: &'a mut S, id: SessionId, config: &'a SessionConfig) -> SessionResult<Self> {
        match store.load(id) {
            Some(blob) => {
                debug!(session = %id, bytes = blob.len(), "restoring session");
                let world = PlayerContext::from_serialized(&blob)?;
                Ok(Self {
                    store,
                    id,
                    config,
                    world,
                })
            }
            None => {
                warn!(session = %id, "no stored world, starting a new one");
                Self::reset(store, id, config)
            }
        }
    }

    /// Discard any stored world and start over.
    pub fn reset(store: &'a mut S, id: SessionId, config: &'a SessionConfig) -> SessionResult<Self> {
        let mut session = Self {
            store,
            id,
            config,
            world: seed_world(config)?,
        };
        session.persist()?;
        Ok(session)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn world(&self) -> &PlayerContext {
        &self.world
    }

    /// Mutable access for editing; call [`Session::persist`] afterwards.
    pub fn world_mut(&mut self) -> &mut PlayerContext {
        &mut self.world
    }

    /// Answer one line of input and save the resulting world.
    ///
    /// On error nothing is saved, so the stored world stays as it was before
    /// the request.
    pub fn handle_input(&mut self, input: &str) -> SessionResult<String> {
        let response = if input == self.config.debug_command {
            self.world.to_serialized()?
        } else {
            self.world.interact(input)?
        };
        self.persist()?;
        Ok(response)
    }

    /// Write the current world to the store.
    pub fn persist(&mut self) -> SessionResult<()> {
        let blob = if self.config.pretty_json {
            self.world.to_serialized()?
        } else {
            self.world.to_serialized_compact()?
        };
        debug!(session = %self.id, bytes = blob.len(), "persisting session");
        self.store.save(self.id, blob);
        Ok(())
    }

    /// The world as a downloadable JSON document.
    pub fn export(&self) -> SessionResult<String> {
        Ok(self.world.to_serialized()?)
    }
}
