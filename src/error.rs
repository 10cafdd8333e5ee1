//! Swizzling errors.

use thiserror::Error;

use swizzle_core::{ObjectHandle, RegistrationError, TypeHash};

/// Why a template class cannot be layered onto objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IncompatibilityReason {
    /// The template adds stored fields.
    #[error("declares stored fields: {}", .0.join(", "))]
    DeclaresFields(Vec<String>),

    /// The template declares properties that imply a backing field.
    #[error("declares non-dynamic properties: {}", .0.join(", "))]
    DeclaresStoredProperties(Vec<String>),

    /// No protocol named like the template exists, or the template does not adopt it.
    #[error("does not adopt a capability protocol named '{0}'")]
    MissingCapabilityTag(String),

    /// The template has no base class, so there is no lineage to check objects against.
    #[error("has no base class")]
    NoBaseClass,
}

/// Errors returned by [`Runtime::swizzle`](crate::Runtime::swizzle) and object management.
///
/// None of these leave an object half-swizzled: on error the object's class
/// is exactly what it was before the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SwizzleError {
    /// The template would change the object layout.
    #[error("template '{template}' is incompatible: {reason}")]
    Incompatible {
        /// Template class name.
        template: String,
        /// What the template does wrong.
        reason: IncompatibilityReason,
    },

    /// The object's class is not in the template's lineage.
    #[error("cannot swizzle '{actual}' with '{template}': not a descendant of '{expected}'")]
    NotSwizzlable {
        /// The object's current class name.
        actual: String,
        /// Template class name.
        template: String,
        /// The template's base class name.
        expected: String,
    },

    /// The type table refused the synthetic class.
    #[error("failed to register synthetic class '{name}'")]
    RegistrationFailure {
        /// Derived synthetic class name.
        name: String,
        /// Underlying table error.
        #[source]
        source: RegistrationError,
    },

    /// A class hash that is not registered.
    #[error("unknown class {0}")]
    UnknownType(TypeHash),

    /// A handle that does not refer to a live object.
    #[error("invalid object handle: {0:?}")]
    InvalidObject(ObjectHandle),
}
