//! Error types for the reflection layer.

use thiserror::Error;

/// Errors raised while turning a component into a [`Value`](super::Value).
#[derive(Debug, Error)]
pub enum SerializeError {
    /// The component's `Serialize` impl rejected the conversion.
    #[error("failed to serialize '{component}': {message}")]
    Custom {
        component: &'static str,
        message: String,
    },
}

/// Errors raised while turning a [`Value`](super::Value) back into a
/// component, or while patching one.
#[derive(Debug, Error)]
pub enum DeserializeError {
    /// A field value had an unexpected shape.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// A patch addressed a field the value does not have.
    #[error("no field at path '{path}'")]
    MissingField { path: String },
    /// The component's `Deserialize` impl rejected the value.
    #[error("failed to deserialize '{component}': {message}")]
    Custom {
        component: &'static str,
        message: String,
    },
}
