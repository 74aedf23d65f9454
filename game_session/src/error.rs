//! Session-level errors.

use game_engine::GameError;
use thiserror::Error;

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Game(#[from] GameError),

    /// A form submission lacks a field the event's schema requires.
    #[error("missing form field: {0}")]
    MissingField(String),

    /// A form field could not be converted to the attribute's type.
    #[error("invalid form field {field}: {message}")]
    InvalidField { field: String, message: String },

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
