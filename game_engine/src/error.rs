//! Error taxonomy for the interaction engine.

use thiserror::Error;

use crate::contexts::EventId;
use crate::events::EventKind;

pub type GameResult<T> = Result<T, GameError>;

#[derive(Debug, Error)]
pub enum GameError {
    /// The current context, or a referenced one, does not exist.
    #[error("no such context: {0}")]
    MissingContext(String),

    /// An event id is not present in the given context.
    #[error("no event {event} in context {context}")]
    MissingEvent { context: String, event: EventId },

    /// An Update event points at a (context, event) pair that does not resolve.
    #[error("dangling reference to event {event_id} in context {gc_id}")]
    DanglingReference { gc_id: String, event_id: String },

    #[error("unknown event type: {0}")]
    UnknownEventType(String),

    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// A write to an attribute outside the variant's schema, or of the wrong type.
    #[error("invalid attribute {key} for {kind} event: {reason}")]
    InvalidAttribute {
        kind: EventKind,
        key: String,
        reason: String,
    },
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        GameError::MalformedDocument(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_is_malformed_document() {
        let err: GameError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, GameError::MalformedDocument(_)));
    }

    #[test]
    fn test_error_messages() {
        let err = GameError::MissingEvent {
            context: "cellar".into(),
            event: EventId(3),
        };
        assert_eq!(err.to_string(), "no event 3 in context cellar");

        let err = GameError::UnknownEventType("teleport".into());
        assert_eq!(err.to_string(), "unknown event type: teleport");
    }
}
