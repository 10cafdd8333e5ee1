//! Process-wide default runtime.
//!
//! Code that does not need an isolated [`Runtime`] can share this one.
//! Tests should prefer their own `Runtime::new()` so state does not leak
//! between cases.

use lazy_static::lazy_static;

use swizzle_core::{ObjectHandle, TypeHash};

use crate::runtime::Runtime;

lazy_static! {
    static ref GLOBAL_RUNTIME: Runtime = Runtime::new();
}

/// The process-wide runtime.
pub fn global() -> &'static Runtime {
    &GLOBAL_RUNTIME
}

/// Swizzle an object living in the process-wide runtime.
///
/// Returns whether the object carries `template`'s methods afterwards.
pub fn swizzle_object(object: ObjectHandle, template: TypeHash) -> bool {
    global().swizzle_object(object, template)
}
