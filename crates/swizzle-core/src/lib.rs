//! Core types for the isa-swizzle object model.
//!
//! This crate holds everything the type table and the runtime share:
//! identity hashing, values, class/protocol descriptors, native method
//! plumbing, the object heap and the error types.

pub mod entries;
mod error;
pub mod runtime;
mod type_hash;
mod value;

pub use entries::{
    ClassEntry, FieldEntry, MethodEntry, PropertyAttributes, PropertyEntry, ProtocolEntry,
};
pub use error::{NativeError, RegistrationError};
pub use runtime::{
    CallContext, HeapObject, NativeCallable, NativeMethod, ObjectEnv, ObjectHandle, ObjectHeap,
    PrepareHook,
};
pub use type_hash::{TypeHash, hash_constants};
pub use value::{Value, ValueKind};
