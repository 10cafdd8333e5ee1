//! TypeRegistry - class and protocol table.
//!
//! # Storage Model
//!
//! - **Classes**: stored by `TypeHash`, with a name index. Entries are
//!   immutable once registered; a class is fully built (methods, protocols,
//!   fields) before it enters the table.
//! - **Protocols**: stored by `TypeHash`, with a name index.
//! - **Layouts**: the flattened instance layout (ancestor fields first) is
//!   computed once at registration and cached per class.
//!
//! # Thread Safety
//!
//! `TypeRegistry` is not synchronized. The runtime owns it behind a lock and
//! serializes registration; lookups happen under a shared read lock.
//!
//! # Example
//!
//! ```
//! use swizzle_core::{ClassEntry, ProtocolEntry, Value};
//! use swizzle_registry::TypeRegistry;
//!
//! let mut registry = TypeRegistry::new();
//! let tag = registry.register_protocol(ProtocolEntry::new("Greeter")).unwrap();
//! let base = registry
//!     .register_class(
//!         ClassEntry::new("Base")
//!             .with_protocol(tag)
//!             .with_method("greet", |_| Ok(Value::from("hello"))),
//!     )
//!     .unwrap();
//!
//! assert!(registry.class_conforms_to(base, tag));
//! assert!(registry.find_method(base, "greet").is_some());
//! ```

use rustc_hash::{FxHashMap, FxHashSet};

use swizzle_core::{
    ClassEntry, FieldEntry, MethodEntry, ProtocolEntry, RegistrationError, TypeHash, ValueKind,
};

/// Class and protocol table.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    /// Classes by hash (primary storage).
    classes: FxHashMap<TypeHash, ClassEntry>,

    /// Name index for classes.
    class_names: FxHashMap<String, TypeHash>,

    /// Protocols by hash.
    protocols: FxHashMap<TypeHash, ProtocolEntry>,

    /// Name index for protocols.
    protocol_names: FxHashMap<String, TypeHash>,

    /// Flattened instance layout per class (root fields first).
    layouts: FxHashMap<TypeHash, Vec<FieldEntry>>,
}

impl TypeRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with a root class and its protocol.
    ///
    /// The root must have no base class; the protocol is adopted by the root
    /// whether or not the entry lists it. Selectors repeated on the root keep
    /// their first definition.
    pub fn with_root(root_protocol: ProtocolEntry, mut root: ClassEntry) -> Self {
        let mut registry = Self::new();

        root.base_class = None;
        if !root.adopts(root_protocol.type_hash) {
            root.protocols.push(root_protocol.type_hash);
        }
        let mut selectors = FxHashSet::default();
        root.methods.retain(|m| selectors.insert(m.selector.clone()));
        let mut names = FxHashSet::default();
        root.fields.retain(|f| names.insert(f.name.clone()));

        registry.protocol_names.insert(root_protocol.name.clone(), root_protocol.type_hash);
        registry.protocols.insert(root_protocol.type_hash, root_protocol);
        registry.class_names.insert(root.name.clone(), root.type_hash);
        registry.layouts.insert(root.type_hash, root.fields.clone());
        registry.classes.insert(root.type_hash, root);
        registry
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Register a class.
    ///
    /// The base class and every adopted protocol must already be registered.
    /// Fails on a duplicate name, a repeated selector, or a field name that
    /// shadows one already present in the ancestry.
    pub fn register_class(&mut self, entry: ClassEntry) -> Result<TypeHash, RegistrationError> {
        let layout = self.check_class(&entry)?;

        let hash = entry.type_hash;
        self.class_names.insert(entry.name.clone(), hash);
        self.layouts.insert(hash, layout);
        self.classes.insert(hash, entry);
        Ok(hash)
    }

    /// Run every check [`register_class`](Self::register_class) runs,
    /// without touching the table.
    ///
    /// Returns the flattened instance layout the class would get.
    pub fn check_class(&self, entry: &ClassEntry) -> Result<Vec<FieldEntry>, RegistrationError> {
        if self.class_names.contains_key(&entry.name) || self.classes.contains_key(&entry.type_hash) {
            return Err(RegistrationError::DuplicateType(entry.name.clone()));
        }

        let mut layout = match entry.base_class {
            Some(base) => self
                .layouts
                .get(&base)
                .cloned()
                .ok_or_else(|| RegistrationError::TypeNotFound(base.to_string()))?,
            None => Vec::new(),
        };

        for protocol in &entry.protocols {
            if !self.protocols.contains_key(protocol) {
                return Err(RegistrationError::ProtocolNotFound(protocol.to_string()));
            }
        }

        let mut selectors = FxHashSet::default();
        for method in &entry.methods {
            if !selectors.insert(method.selector.as_str()) {
                return Err(RegistrationError::DuplicateMethod {
                    class: entry.name.clone(),
                    selector: method.selector.clone(),
                });
            }
        }

        for field in &entry.fields {
            if layout.iter().any(|f| f.name == field.name) {
                return Err(RegistrationError::DuplicateField {
                    class: entry.name.clone(),
                    field: field.name.clone(),
                });
            }
            layout.push(field.clone());
        }

        Ok(layout)
    }

    /// Register a protocol.
    ///
    /// Refined protocols must already be registered.
    pub fn register_protocol(&mut self, entry: ProtocolEntry) -> Result<TypeHash, RegistrationError> {
        self.check_protocol(&entry)?;

        let hash = entry.type_hash;
        self.protocol_names.insert(entry.name.clone(), hash);
        self.protocols.insert(hash, entry);
        Ok(hash)
    }

    /// Run the checks of [`register_protocol`](Self::register_protocol) without registering.
    pub fn check_protocol(&self, entry: &ProtocolEntry) -> Result<(), RegistrationError> {
        if self.protocol_names.contains_key(&entry.name) || self.protocols.contains_key(&entry.type_hash) {
            return Err(RegistrationError::DuplicateProtocol(entry.name.clone()));
        }
        for base in &entry.base_protocols {
            if !self.protocols.contains_key(base) {
                return Err(RegistrationError::ProtocolNotFound(base.to_string()));
            }
        }
        Ok(())
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    pub fn class(&self, hash: TypeHash) -> Option<&ClassEntry> {
        self.classes.get(&hash)
    }

    pub fn class_by_name(&self, name: &str) -> Option<&ClassEntry> {
        self.class_names.get(name).and_then(|h| self.classes.get(h))
    }

    pub fn contains_class(&self, hash: TypeHash) -> bool {
        self.classes.contains_key(&hash)
    }

    pub fn protocol(&self, hash: TypeHash) -> Option<&ProtocolEntry> {
        self.protocols.get(&hash)
    }

    pub fn protocol_by_name(&self, name: &str) -> Option<&ProtocolEntry> {
        self.protocol_names.get(name).and_then(|h| self.protocols.get(h))
    }

    /// Get a class's base class.
    pub fn superclass(&self, hash: TypeHash) -> Option<TypeHash> {
        self.classes.get(&hash)?.base_class
    }

    /// Iterate a class and its ancestors, most derived first.
    pub fn ancestry(&self, hash: TypeHash) -> Ancestry<'_> {
        Ancestry {
            registry: self,
            next: Some(hash),
        }
    }

    /// Check whether `class` is `ancestor` or derives from it.
    pub fn is_subclass_of(&self, class: TypeHash, ancestor: TypeHash) -> bool {
        self.ancestry(class).any(|c| c.type_hash == ancestor)
    }

    /// Check whether `protocol` is `target` or refines it, transitively.
    pub fn protocol_inherits(&self, protocol: TypeHash, target: TypeHash) -> bool {
        let mut pending = vec![protocol];
        let mut seen = FxHashSet::default();
        while let Some(current) = pending.pop() {
            if current == target {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(entry) = self.protocols.get(&current) {
                pending.extend(entry.base_protocols.iter().copied());
            }
        }
        false
    }

    /// Check whether a class, or any ancestor, adopts `protocol` or a
    /// protocol refining it.
    pub fn class_conforms_to(&self, class: TypeHash, protocol: TypeHash) -> bool {
        self.ancestry(class).any(|c| {
            c.protocols
                .iter()
                .any(|&adopted| self.protocol_inherits(adopted, protocol))
        })
    }

    /// Resolve a selector along a class's ancestry.
    pub fn find_method(&self, class: TypeHash, selector: &str) -> Option<&MethodEntry> {
        self.ancestry(class).find_map(|c| c.method(selector))
    }

    /// Resolve a selector starting at the superclass of `class`.
    pub fn find_super_method(&self, class: TypeHash, selector: &str) -> Option<&MethodEntry> {
        self.find_method(self.superclass(class)?, selector)
    }

    pub fn responds_to(&self, class: TypeHash, selector: &str) -> bool {
        self.find_method(class, selector).is_some()
    }

    // ==========================================================================
    // Layout
    // ==========================================================================

    /// The flattened instance layout of a class.
    pub fn instance_layout(&self, class: TypeHash) -> Option<&[FieldEntry]> {
        self.layouts.get(&class).map(|v| v.as_slice())
    }

    /// Offset and kind of a field in a class's instance layout.
    pub fn field_offset(&self, class: TypeHash, name: &str) -> Option<(usize, ValueKind)> {
        self.instance_layout(class)?
            .iter()
            .enumerate()
            .find(|(_, f)| f.name == name)
            .map(|(i, f)| (i, f.kind))
    }

    // ==========================================================================
    // Statistics
    // ==========================================================================

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn protocol_count(&self) -> usize {
        self.protocols.len()
    }

    /// Iterate over all classes.
    pub fn classes(&self) -> impl Iterator<Item = &ClassEntry> {
        self.classes.values()
    }

    /// Iterate over classes the runtime generated.
    pub fn synthetic_classes(&self) -> impl Iterator<Item = &ClassEntry> {
        self.classes.values().filter(|c| c.is_synthetic)
    }
}

/// Iterator over a class and its ancestors.
pub struct Ancestry<'a> {
    registry: &'a TypeRegistry,
    next: Option<TypeHash>,
}

impl<'a> Iterator for Ancestry<'a> {
    type Item = &'a ClassEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.registry.classes.get(&self.next?)?;
        self.next = entry.base_class;
        Some(entry)
    }
}
