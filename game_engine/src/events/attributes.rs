//! Typed access to the loosely-typed attribute mapping exposed to editors.

use serde_json::{Map, Value};

use super::EventKind;
use crate::error::{GameError, GameResult};

/// Attribute mapping as exposed to editors and carried by Update events.
pub type Attributes = Map<String, Value>;

pub(crate) fn string(kind: EventKind, key: &str, value: Value) -> GameResult<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(mismatch(kind, key, "a string", &other)),
    }
}

pub(crate) fn boolean(kind: EventKind, key: &str, value: Value) -> GameResult<bool> {
    match value {
        Value::Bool(b) => Ok(b),
        other => Err(mismatch(kind, key, "a boolean", &other)),
    }
}

pub(crate) fn object(kind: EventKind, key: &str, value: Value) -> GameResult<Attributes> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(mismatch(kind, key, "an object", &other)),
    }
}

pub(crate) fn unknown_key(kind: EventKind, key: &str) -> GameError {
    GameError::InvalidAttribute {
        kind,
        key: key.to_string(),
        reason: "not part of the schema".to_string(),
    }
}

fn mismatch(kind: EventKind, key: &str, expected: &str, found: &Value) -> GameError {
    GameError::InvalidAttribute {
        kind,
        key: key.to_string(),
        reason: format!("expected {}, found {}", expected, json_type(found)),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_typed_reads() {
        assert_eq!(string(EventKind::Text, "return_text", json!("hi")).unwrap(), "hi");
        assert!(boolean(EventKind::Text, "enable", json!(false)).is_ok());
        assert_eq!(
            object(EventKind::Update, "nattributes", json!({"enable": true}))
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_type_mismatch_reason() {
        let err = boolean(EventKind::Move, "persist", json!("yes")).unwrap_err();
        match err {
            GameError::InvalidAttribute { kind, key, reason } => {
                assert_eq!(kind, EventKind::Move);
                assert_eq!(key, "persist");
                assert_eq!(reason, "expected a boolean, found a string");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
