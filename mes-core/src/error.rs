//! Errors raised while parsing view definitions and querying component trees.
//!
//! Every variant carries the component path (or element) it was raised for,
//! so a failing view file can be fixed without a debugger.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("Malformed view document at byte {position}: {message}")]
    MalformedDocument { position: usize, message: String },

    #[error("Element <{element}> at '{path}' is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: String,
        attribute: String,
        path: String,
    },

    #[error("Invalid value '{value}' for attribute '{attribute}' at '{path}': {reason}")]
    InvalidAttribute {
        path: String,
        attribute: String,
        value: String,
        reason: String,
    },

    #[error("Unknown component type '{type_name}' at '{path}'")]
    UnknownComponentType { path: String, type_name: String },

    #[error("Entity '{entity}' referenced at '{path}' is not defined")]
    UnresolvedSchemaReference { path: String, entity: String },

    #[error("Field '{field}' referenced at '{path}' does not exist on entity '{entity}'")]
    UnresolvedFieldReference {
        path: String,
        field: String,
        entity: String,
    },

    #[error("Component '{path}' references missing source component '{source_path}'")]
    DanglingComponentReference { path: String, source_path: String },

    #[error("Source references of component '{path}' form a cycle")]
    CyclicComponentReference { path: String },

    #[error("Component '{path}' of type '{type_name}' cannot contain child components")]
    UnexpectedChildComponent { path: String, type_name: String },

    #[error("Duplicate component path '{path}'")]
    DuplicateComponentPath { path: String },

    #[error("Hook '{bean}.{method}' declared at '{path}' is not registered")]
    UnresolvedHook {
        path: String,
        bean: String,
        method: String,
    },

    #[error("Component '{path}' not found")]
    ComponentNotFound { path: String },

    #[error("Component '{path}' was never bound to an entity schema")]
    UnboundComponent { path: String },
}

impl ViewError {
    pub(crate) fn malformed(position: usize, message: impl std::fmt::Display) -> Self {
        ViewError::MalformedDocument {
            position,
            message: message.to_string(),
        }
    }

    pub(crate) fn invalid_attribute(
        path: &str,
        attribute: &str,
        value: &str,
        reason: impl Into<String>,
    ) -> Self {
        ViewError::InvalidAttribute {
            path: path.to_string(),
            attribute: attribute.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
