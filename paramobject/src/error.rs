//! Error types for parametrized objects.

use thiserror::Error;

/// Errors that can occur while declaring, reading or updating parametrized objects.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    /// Invalid class declaration, or a deduced parameter cycle found while resolving
    #[error("Invalid declaration of '{class}': {reason}")]
    Declaration { class: String, reason: String },

    /// Name matches no declared parameter nor caster alias
    #[error("'{class}' has no parameter or alias named '{name}'")]
    UnknownParameter { class: String, name: String },

    /// Stored parameter has neither a value nor a default
    #[error("Parameter '{name}' of '{class}' has no value and no default")]
    MissingParameter { class: String, name: String },

    /// Attempted assignment to a parameter after construction
    #[error("Parameter '{name}' of '{class}' cannot be assigned, use 'with_{name}' instead")]
    ImmutableAttribute { class: String, name: String },

    /// Value could not be converted to the requested type
    #[error("Type mismatch at '{name}': expected type '{expected}'")]
    TypeMismatch { name: String, expected: String },

    /// Wither called with arguments it cannot bind
    #[error("Invalid arguments for 'with_{name}': {reason}")]
    WitherArguments { name: String, reason: String },

    /// Error raised by a user caster, wither or deduced function
    #[error("{0}")]
    Custom(String),
}

impl ParamError {
    /// Build an error from a caster, wither or deduced function message.
    pub fn custom(msg: impl Into<String>) -> Self {
        ParamError::Custom(msg.into())
    }

    pub(crate) fn declaration(class: &str, reason: impl Into<String>) -> Self {
        ParamError::Declaration {
            class: class.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown(class: &str, name: &str) -> Self {
        ParamError::UnknownParameter {
            class: class.to_string(),
            name: name.to_string(),
        }
    }

    pub(crate) fn missing(class: &str, name: &str) -> Self {
        ParamError::MissingParameter {
            class: class.to_string(),
            name: name.to_string(),
        }
    }

    pub(crate) fn type_mismatch<T>(name: &str) -> Self {
        ParamError::TypeMismatch {
            name: name.to_string(),
            expected: std::any::type_name::<T>().to_string(),
        }
    }
}
