//! Method entry.

use crate::{CallContext, NativeError, NativeMethod, TypeHash, Value};

/// A method installed on a class.
#[derive(Debug, Clone)]
pub struct MethodEntry {
    /// Selector (method name).
    pub selector: String,
    /// Owner-independent selector hash.
    pub selector_hash: TypeHash,
    /// Class this entry is installed on.
    pub owner: TypeHash,
    /// Implementation.
    pub imp: NativeMethod,
}

impl MethodEntry {
    /// Create a method from any native callable.
    pub fn new<F>(owner: TypeHash, selector: impl Into<String>, f: F) -> Self
    where
        F: Fn(&CallContext<'_>) -> Result<Value, NativeError> + Send + Sync + 'static,
    {
        let selector = selector.into();
        Self {
            selector_hash: TypeHash::from_selector(&selector),
            imp: NativeMethod::new(TypeHash::from_method(owner, &selector), f),
            owner,
            selector,
        }
    }

    /// Copy this method onto another class, sharing the implementation.
    pub fn copy_to(&self, owner: TypeHash) -> Self {
        Self {
            selector: self.selector.clone(),
            selector_hash: self.selector_hash,
            owner,
            imp: self.imp.rebind(TypeHash::from_method(owner, &self.selector)),
        }
    }
}
