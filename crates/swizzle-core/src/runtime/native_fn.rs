//! Native method storage and callable trait.

use std::fmt;
use std::sync::Arc;

use crate::{NativeError, TypeHash, Value};

use super::{CallContext, ObjectEnv, ObjectHandle};

/// Type-erased method implementation.
///
/// The inner callable is wrapped in Arc so the same implementation can be
/// installed on several classes. Copying a template's methods onto a
/// synthetic class shares the callable rather than duplicating it.
pub struct NativeMethod {
    /// Method identity (`TypeHash::from_method(owner, selector)`).
    pub id: TypeHash,
    inner: Arc<dyn NativeCallable + Send + Sync>,
}

impl NativeMethod {
    /// Create a new NativeMethod from a callable with a specific ID.
    pub fn new<F>(id: TypeHash, f: F) -> Self
    where
        F: NativeCallable + Send + Sync + 'static,
    {
        Self {
            id,
            inner: Arc::new(f),
        }
    }

    /// Call this method with the given context.
    pub fn call(&self, ctx: &CallContext<'_>) -> Result<Value, NativeError> {
        self.inner.call(ctx)
    }

    /// Re-home this implementation under a new identity, sharing the callable.
    pub fn rebind(&self, id: TypeHash) -> Self {
        Self {
            id,
            inner: Arc::clone(&self.inner),
        }
    }

    /// Check whether two methods share the same underlying callable.
    pub fn same_impl(&self, other: &NativeMethod) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for NativeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeMethod")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl Clone for NativeMethod {
    fn clone(&self) -> Self {
        self.rebind(self.id)
    }
}

/// Trait for callable native methods.
///
/// The `call` method receives a `CallContext` that exposes the receiver,
/// the arguments and the object environment.
pub trait NativeCallable {
    /// Call this method with the given context.
    fn call(&self, ctx: &CallContext<'_>) -> Result<Value, NativeError>;
}

impl<F> NativeCallable for F
where
    F: Fn(&CallContext<'_>) -> Result<Value, NativeError>,
{
    fn call(&self, ctx: &CallContext<'_>) -> Result<Value, NativeError> {
        (self)(ctx)
    }
}

/// Class-level hook run on an object right after it has been swizzled.
///
/// The hook sees the object through its new class, so sending messages from
/// inside it already dispatches to the template's methods.
#[derive(Clone)]
pub struct PrepareHook {
    inner: Arc<dyn Fn(&dyn ObjectEnv, ObjectHandle) + Send + Sync>,
}

impl PrepareHook {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&dyn ObjectEnv, ObjectHandle) + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    pub fn call(&self, env: &dyn ObjectEnv, object: ObjectHandle) {
        (self.inner)(env, object)
    }
}

impl fmt::Debug for PrepareHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrepareHook(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flavored(_: &CallContext<'_>) -> Result<Value, NativeError> {
        Ok(Value::from("flavored"))
    }

    fn void(_: &CallContext<'_>) -> Result<Value, NativeError> {
        Ok(Value::Void)
    }

    #[test]
    fn rebind_shares_callable() {
        let owner = TypeHash::from_name("Flavor");
        let method = NativeMethod::new(TypeHash::from_method(owner, "describe"), flavored);
        let copy = method.rebind(TypeHash::from_method(TypeHash::from_name("Synthetic"), "describe"));
        assert!(method.same_impl(&copy));
        assert_ne!(method.id, copy.id);

        let other = NativeMethod::new(method.id, void);
        assert!(!method.same_impl(&other));
    }

    #[test]
    fn clone_keeps_identity() {
        let method = NativeMethod::new(TypeHash::from_name("m"), flavored);
        let clone = method.clone();
        assert_eq!(clone.id, method.id);
        assert!(clone.same_impl(&method));
    }
}
