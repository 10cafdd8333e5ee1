//! Runtime-facing object plumbing: handles, the heap, native methods and
//! the environment native code runs against.

mod call_context;
mod native_fn;
mod object_heap;

pub use call_context::CallContext;
pub use native_fn::{NativeCallable, NativeMethod, PrepareHook};
pub use object_heap::{HeapObject, ObjectHandle, ObjectHeap};

use crate::{NativeError, TypeHash, Value};

/// Services a runtime provides to native method bodies and prepare hooks.
///
/// Implemented by the concrete runtime; native code only ever sees this
/// trait, which keeps method tables independent of the runtime crate.
pub trait ObjectEnv {
    /// The object's current class, or `None` for a stale handle.
    fn class_of(&self, object: ObjectHandle) -> Option<TypeHash>;

    /// Name of the object's current class.
    fn class_name(&self, object: ObjectHandle) -> Option<String>;

    /// Read a stored field by name.
    fn field(&self, object: ObjectHandle, name: &str) -> Result<Value, NativeError>;

    /// Write a stored field by name. The value must match the declared kind.
    fn set_field(&self, object: ObjectHandle, name: &str, value: Value) -> Result<(), NativeError>;

    /// Read a side-table entry.
    fn associated(&self, object: ObjectHandle, key: &str) -> Option<Value>;

    /// Write a side-table entry.
    fn set_associated(&self, object: ObjectHandle, key: &str, value: Value) -> Result<(), NativeError>;

    /// Dispatch a message along the object's class ancestry.
    fn send(&self, object: ObjectHandle, selector: &str, args: &[Value]) -> Result<Value, NativeError>;

    /// Dispatch starting at the superclass of `implementing_class`.
    fn send_super(
        &self,
        object: ObjectHandle,
        implementing_class: TypeHash,
        selector: &str,
        args: &[Value],
    ) -> Result<Value, NativeError>;
}
