//! Class type entry.
//!
//! This module provides `ClassEntry`, the type descriptor an object's isa
//! points at: its base class, adopted protocols, methods, properties and
//! stored fields.

use crate::{CallContext, NativeError, PrepareHook, TypeHash, Value};

use super::{FieldEntry, MethodEntry, PropertyEntry};

/// Registry entry for a class.
#[derive(Debug, Clone)]
pub struct ClassEntry {
    /// Class name.
    pub name: String,
    /// Type hash for identity.
    pub type_hash: TypeHash,

    // === Inheritance ===
    /// Base class type hash (single inheritance).
    pub base_class: Option<TypeHash>,
    /// Directly adopted protocol hashes.
    pub protocols: Vec<TypeHash>,

    // === Members ===
    /// Methods declared directly on this class.
    pub methods: Vec<MethodEntry>,
    /// Declared properties.
    pub properties: Vec<PropertyEntry>,
    /// Stored fields added by this class.
    pub fields: Vec<FieldEntry>,

    // === Swizzling ===
    /// Hook run on objects swizzled with this class as template.
    pub prepare_hook: Option<PrepareHook>,
    /// Class was generated by the runtime rather than declared.
    pub is_synthetic: bool,
}

impl ClassEntry {
    /// Create a new class entry.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let type_hash = TypeHash::from_name(&name);
        Self {
            name,
            type_hash,
            base_class: None,
            protocols: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
            fields: Vec::new(),
            prepare_hook: None,
            is_synthetic: false,
        }
    }

    /// Create a synthetic class deriving from `base`.
    pub fn synthetic(name: impl Into<String>, base: TypeHash) -> Self {
        let mut entry = Self::new(name).with_base(base);
        entry.is_synthetic = true;
        entry
    }

    // === Builder Methods ===

    /// Set the base class.
    pub fn with_base(mut self, base: TypeHash) -> Self {
        self.base_class = Some(base);
        self
    }

    /// Adopt a protocol.
    pub fn with_protocol(mut self, protocol: TypeHash) -> Self {
        self.protocols.push(protocol);
        self
    }

    /// Add a method implemented by a closure.
    pub fn with_method<F>(mut self, selector: impl Into<String>, f: F) -> Self
    where
        F: Fn(&CallContext<'_>) -> Result<Value, NativeError> + Send + Sync + 'static,
    {
        let method = MethodEntry::new(self.type_hash, selector, f);
        self.methods.push(method);
        self
    }

    /// Add a prebuilt method entry, re-homing it on this class.
    pub fn with_method_entry(mut self, method: &MethodEntry) -> Self {
        self.methods.push(method.copy_to(self.type_hash));
        self
    }

    /// Add a property.
    pub fn with_property(mut self, property: PropertyEntry) -> Self {
        self.properties.push(property);
        self
    }

    /// Add a stored field.
    pub fn with_field(mut self, field: FieldEntry) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the prepare hook.
    pub fn with_prepare_hook(mut self, hook: PrepareHook) -> Self {
        self.prepare_hook = Some(hook);
        self
    }

    // === Query Methods ===

    /// Find a method declared directly on this class.
    pub fn method(&self, selector: &str) -> Option<&MethodEntry> {
        self.methods.iter().find(|m| m.selector == selector)
    }

    /// Check whether this class directly adopts a protocol.
    pub fn adopts(&self, protocol: TypeHash) -> bool {
        self.protocols.contains(&protocol)
    }
}
