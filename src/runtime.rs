//! The object runtime: type table, heap, side table and message dispatch.

use parking_lot::{Mutex, RwLock};

use swizzle_core::{
    CallContext, ClassEntry, HeapObject, NativeError, ObjectEnv, ObjectHandle, ObjectHeap,
    ProtocolEntry, RegistrationError, TypeHash, Value, ValueKind,
};
use swizzle_registry::TypeRegistry;

use crate::config::RuntimeConfig;
use crate::error::SwizzleError;
use crate::side_table::SideTable;
use crate::swizzle::{InFlightSwizzles, SyntheticCache};

/// Name of the root class every runtime starts with.
pub const ROOT_CLASS: &str = "Object";

/// A self-contained object runtime.
///
/// Owns the class table, the object heap and the side table. All methods
/// take `&self`; the runtime is `Send + Sync` and may be shared across
/// threads. Native code (methods, prepare hooks) never runs while the
/// runtime holds one of its locks.
pub struct Runtime {
    config: RuntimeConfig,
    pub(crate) registry: RwLock<TypeRegistry>,
    heap: RwLock<ObjectHeap>,
    side_table: Mutex<SideTable>,
    /// Synthetic class cache; its lock is the synthesis critical section.
    pub(crate) synthesized: Mutex<SyntheticCache>,
    /// Objects with a swizzle in progress.
    pub(crate) in_flight: InFlightSwizzles,
    root: TypeHash,
}

impl Runtime {
    /// Create a runtime with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    /// Create a runtime with an explicit configuration.
    pub fn with_config(config: RuntimeConfig) -> Self {
        let root = root_class();
        let root_hash = root.type_hash;
        Self {
            config,
            registry: RwLock::new(TypeRegistry::with_root(ProtocolEntry::new(ROOT_CLASS), root)),
            heap: RwLock::new(ObjectHeap::new()),
            side_table: Mutex::new(SideTable::new()),
            synthesized: Mutex::new(SyntheticCache::default()),
            in_flight: InFlightSwizzles::default(),
            root: root_hash,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// The root class.
    pub fn root_class(&self) -> TypeHash {
        self.root
    }

    // ==========================================================================
    // Type table
    // ==========================================================================

    pub fn register_protocol(&self, entry: ProtocolEntry) -> Result<TypeHash, RegistrationError> {
        self.registry.write().register_protocol(entry)
    }

    pub fn register_class(&self, entry: ClassEntry) -> Result<TypeHash, RegistrationError> {
        self.registry.write().register_class(entry)
    }

    /// Run a read-only query against the class table.
    pub fn with_registry<R>(&self, f: impl FnOnce(&TypeRegistry) -> R) -> R {
        f(&self.registry.read())
    }

    pub fn class_hash(&self, name: &str) -> Option<TypeHash> {
        self.registry.read().class_by_name(name).map(|c| c.type_hash)
    }

    /// Name of a registered class.
    pub fn name_of(&self, class: TypeHash) -> Option<String> {
        self.registry.read().class(class).map(|c| c.name.clone())
    }

    /// Number of classes the runtime has synthesized.
    pub fn synthetic_type_count(&self) -> usize {
        self.registry.read().synthetic_classes().count()
    }

    // ==========================================================================
    // Objects
    // ==========================================================================

    /// Allocate an object of `class` with default field values.
    pub fn instantiate(&self, class: TypeHash) -> Result<ObjectHandle, SwizzleError> {
        let fields: Vec<Value> = {
            let registry = self.registry.read();
            registry
                .instance_layout(class)
                .ok_or(SwizzleError::UnknownType(class))?
                .iter()
                .map(|f| f.kind.default_value())
                .collect()
        };
        Ok(self.heap.write().allocate(class, fields))
    }

    pub fn retain(&self, object: ObjectHandle) -> bool {
        self.heap.write().add_ref(object)
    }

    /// Drop a reference. Freeing an object also drops its side-table entries.
    ///
    /// Returns true if the object was freed.
    pub fn release(&self, object: ObjectHandle) -> bool {
        // Lock order: heap, then side table.
        let mut heap = self.heap.write();
        let freed = heap.release(object);
        if freed {
            self.side_table.lock().clear_object(object);
        }
        freed
    }

    pub fn is_alive(&self, object: ObjectHandle) -> bool {
        self.heap.read().contains(object)
    }

    /// Run `f` against a live object under the shared heap lock.
    pub(crate) fn with_object<R>(
        &self,
        object: ObjectHandle,
        f: impl FnOnce(&HeapObject) -> R,
    ) -> Result<R, SwizzleError> {
        self.heap
            .read()
            .get(object)
            .map(f)
            .ok_or(SwizzleError::InvalidObject(object))
    }

    /// The object's current class.
    pub fn isa(&self, object: ObjectHandle) -> Result<TypeHash, SwizzleError> {
        self.with_object(object, |o| o.isa())
    }

    /// Snapshot of an object's stored fields, in layout order.
    pub fn fields(&self, object: ObjectHandle) -> Result<Vec<Value>, SwizzleError> {
        self.with_object(object, |o| o.fields().to_vec())
    }

    // ==========================================================================
    // Introspection
    // ==========================================================================

    /// Check whether the object's class is `class` or derives from it.
    pub fn is_kind_of(&self, object: ObjectHandle, class: TypeHash) -> bool {
        self.class_of(object)
            .is_some_and(|isa| self.registry.read().is_subclass_of(isa, class))
    }

    /// Capability query: does the object's class conform to `protocol`?
    ///
    /// This is how callers check that an object has been swizzled with a
    /// template before relying on the template's methods.
    pub fn conforms_to(&self, object: ObjectHandle, protocol: TypeHash) -> bool {
        self.class_of(object)
            .is_some_and(|isa| self.registry.read().class_conforms_to(isa, protocol))
    }

    /// [`conforms_to`](Self::conforms_to) by protocol name.
    pub fn conforms_to_name(&self, object: ObjectHandle, protocol: &str) -> bool {
        self.conforms_to(object, TypeHash::from_protocol(protocol))
    }

    pub fn responds_to(&self, object: ObjectHandle, selector: &str) -> bool {
        self.class_of(object)
            .is_some_and(|isa| self.registry.read().responds_to(isa, selector))
    }

    // ==========================================================================
    // Dispatch
    // ==========================================================================

    /// Look up `selector` starting at `start` and call it on `object`.
    ///
    /// The implementation is cloned out of the table so no lock is held
    /// while native code runs.
    fn dispatch(
        &self,
        object: ObjectHandle,
        start: Option<TypeHash>,
        selector: &str,
        args: &[Value],
    ) -> Result<Value, NativeError> {
        let isa = self.class_of(object).ok_or(NativeError::InvalidHandle(object))?;
        let (imp, owner) = {
            let registry = self.registry.read();
            match start.and_then(|class| registry.find_method(class, selector)) {
                Some(method) => (method.imp.clone(), method.owner),
                None => {
                    return Err(NativeError::UnknownSelector {
                        class: registry
                            .class(isa)
                            .map(|c| c.name.clone())
                            .unwrap_or_else(|| isa.to_string()),
                        selector: selector.to_string(),
                    });
                }
            }
        };
        let ctx = CallContext::new(self, object, owner, selector, args);
        imp.call(&ctx)
    }

    fn field_slot(&self, object: ObjectHandle, name: &str) -> Result<(usize, ValueKind), NativeError> {
        let isa = self.class_of(object).ok_or(NativeError::InvalidHandle(object))?;
        let registry = self.registry.read();
        registry
            .field_offset(isa, name)
            .ok_or_else(|| NativeError::UnknownField {
                class: registry
                    .class(isa)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| isa.to_string()),
                field: name.to_string(),
            })
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("config", &self.config)
            .field("classes", &self.registry.read().class_count())
            .field("heap", &*self.heap.read())
            .finish_non_exhaustive()
    }
}

impl ObjectEnv for Runtime {
    fn class_of(&self, object: ObjectHandle) -> Option<TypeHash> {
        self.heap.read().get(object).map(|o| o.isa())
    }

    fn class_name(&self, object: ObjectHandle) -> Option<String> {
        self.name_of(self.class_of(object)?)
    }

    fn field(&self, object: ObjectHandle, name: &str) -> Result<Value, NativeError> {
        let (offset, _) = self.field_slot(object, name)?;
        self.heap
            .read()
            .get(object)
            .and_then(|o| o.fields().get(offset).cloned())
            .ok_or(NativeError::InvalidHandle(object))
    }

    fn set_field(&self, object: ObjectHandle, name: &str, value: Value) -> Result<(), NativeError> {
        let (offset, kind) = self.field_slot(object, name)?;
        if value.kind() != Some(kind) {
            return Err(NativeError::FieldType {
                field: name.to_string(),
                expected: kind,
                got: value.type_name(),
            });
        }
        let mut heap = self.heap.write();
        let slot = heap
            .get_mut(object)
            .and_then(|o| o.fields_mut().get_mut(offset))
            .ok_or(NativeError::InvalidHandle(object))?;
        *slot = value;
        Ok(())
    }

    fn associated(&self, object: ObjectHandle, key: &str) -> Option<Value> {
        self.side_table.lock().get(object, key).cloned()
    }

    fn set_associated(&self, object: ObjectHandle, key: &str, value: Value) -> Result<(), NativeError> {
        // The heap lock is held across the insert so `release` cannot clear
        // the object's entries in between.
        let heap = self.heap.read();
        if !heap.contains(object) {
            return Err(NativeError::InvalidHandle(object));
        }
        self.side_table.lock().set(object, key, value);
        Ok(())
    }

    fn send(&self, object: ObjectHandle, selector: &str, args: &[Value]) -> Result<Value, NativeError> {
        let isa = self.class_of(object);
        self.dispatch(object, isa, selector, args)
    }

    fn send_super(
        &self,
        object: ObjectHandle,
        implementing_class: TypeHash,
        selector: &str,
        args: &[Value],
    ) -> Result<Value, NativeError> {
        let start = self.registry.read().superclass(implementing_class);
        self.dispatch(object, start, selector, args)
    }
}

/// The root class: every class the runtime knows descends from it.
fn root_class() -> ClassEntry {
    ClassEntry::new(ROOT_CLASS)
        .with_protocol(TypeHash::from_protocol(ROOT_CLASS))
        .with_method("class_name", |ctx| {
            let name = ctx
                .env()
                .class_name(ctx.receiver())
                .ok_or(NativeError::InvalidHandle(ctx.receiver()))?;
            Ok(Value::String(name))
        })
        .with_method("description", |ctx| {
            let name = ctx.send("class_name", &[])?;
            Ok(Value::String(format!("<{}>", name.as_str().unwrap_or_default())))
        })
}
