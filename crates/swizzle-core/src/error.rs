//! Error types shared by the object model.
//!
//! ```text
//! RegistrationError - type table rejected a class or protocol
//! NativeError       - message dispatch and field access failures
//! ```

use thiserror::Error;

use crate::{ObjectHandle, ValueKind};

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors raised while registering classes and protocols.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A referenced class was not found.
    #[error("class not found: {0}")]
    TypeNotFound(String),

    /// A referenced protocol was not found.
    #[error("protocol not found: {0}")]
    ProtocolNotFound(String),

    /// A class with this name already exists.
    #[error("duplicate class: {0}")]
    DuplicateType(String),

    /// A protocol with this name already exists.
    #[error("duplicate protocol: {0}")]
    DuplicateProtocol(String),

    /// A class declares the same selector twice.
    #[error("duplicate method '{selector}' in class '{class}'")]
    DuplicateMethod {
        /// The class being registered.
        class: String,
        /// The repeated selector.
        selector: String,
    },

    /// A field name is already used by the class or one of its ancestors.
    #[error("duplicate field '{field}' in class '{class}'")]
    DuplicateField {
        /// The class being registered.
        class: String,
        /// The repeated field name.
        field: String,
    },
}

// ============================================================================
// Native Errors
// ============================================================================

/// Errors raised by message dispatch, native method bodies and field access.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NativeError {
    /// The handle does not refer to a live object.
    #[error("invalid object handle: {0:?}")]
    InvalidHandle(ObjectHandle),

    /// No class in the receiver's ancestry implements the selector.
    #[error("'{class}' does not respond to '{selector}'")]
    UnknownSelector {
        /// Receiver class name.
        class: String,
        /// The selector that was sent.
        selector: String,
    },

    /// The receiver's layout has no field with this name.
    #[error("'{class}' has no field '{field}'")]
    UnknownField {
        /// Receiver class name.
        class: String,
        /// Requested field name.
        field: String,
    },

    /// A value of the wrong kind was stored into a field.
    #[error("field '{field}' holds {expected}, got {got}")]
    FieldType {
        /// Field name.
        field: String,
        /// Declared kind.
        expected: ValueKind,
        /// Type name of the rejected value.
        got: &'static str,
    },

    /// Wrong number of arguments.
    #[error("expected {expected} arguments, got {got}")]
    ArgumentCount {
        /// Expected argument count.
        expected: usize,
        /// Actual argument count.
        got: usize,
    },

    /// An argument had the wrong type.
    #[error("argument {index}: expected {expected}, got {got}")]
    ArgumentType {
        /// Zero-based argument index.
        index: usize,
        /// Expected type name.
        expected: &'static str,
        /// Actual type name.
        got: &'static str,
    },

    /// A native method reported a failure.
    #[error("{0}")]
    Other(String),
}

impl NativeError {
    /// Create a custom error from any message.
    pub fn other(message: impl Into<String>) -> Self {
        NativeError::Other(message.into())
    }
}
