//! Side table for externally backed (dynamic) storage.
//!
//! Values here live outside an object's field block, so templates can keep
//! per-object state without changing the instance layout.

use rustc_hash::FxHashMap;

use swizzle_core::{ObjectHandle, Value};

/// Per-object key/value storage.
#[derive(Debug, Default)]
pub struct SideTable {
    entries: FxHashMap<ObjectHandle, FxHashMap<String, Value>>,
}

impl SideTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, object: ObjectHandle, key: &str) -> Option<&Value> {
        self.entries.get(&object)?.get(key)
    }

    /// Store a value, returning the previous one.
    pub fn set(&mut self, object: ObjectHandle, key: &str, value: Value) -> Option<Value> {
        self.entries
            .entry(object)
            .or_default()
            .insert(key.to_string(), value)
    }

    pub fn remove(&mut self, object: ObjectHandle, key: &str) -> Option<Value> {
        let values = self.entries.get_mut(&object)?;
        let removed = values.remove(key);
        if values.is_empty() {
            self.entries.remove(&object);
        }
        removed
    }

    /// Drop every entry of an object. Returns how many were removed.
    pub fn clear_object(&mut self, object: ObjectHandle) -> usize {
        self.entries.remove(&object).map_or(0, |values| values.len())
    }

    /// Number of objects with at least one entry.
    pub fn object_count(&self) -> usize {
        self.entries.len()
    }
}
