//! TemplateBuilder for declaring template classes.
//!
//! A template class is only usable for swizzling if a protocol with the
//! same name exists and the template adopts it. The builder registers both
//! in one step.
//!
//! # Example
//!
//! ```
//! use isa_swizzle::{Runtime, Value, ValueKind};
//!
//! let runtime = Runtime::new();
//! let flavor = runtime
//!     .define_template("Flavor", runtime.root_class())
//!     .method("describe", |_| Ok(Value::from("flavored")))
//!     .dynamic_property("topping", ValueKind::String)
//!     .prepare(|env, object| {
//!         let _ = env.set_associated(object, "topping", Value::from("sprinkles"));
//!     })
//!     .build()
//!     .unwrap();
//!
//! let object = runtime.instantiate(runtime.root_class()).unwrap();
//! assert!(runtime.swizzle_object(object, flavor));
//! assert!(runtime.conforms_to_name(object, "Flavor"));
//! ```

use swizzle_core::{
    CallContext, ClassEntry, FieldEntry, NativeError, ObjectEnv, ObjectHandle, PrepareHook,
    PropertyEntry, ProtocolEntry, RegistrationError, TypeHash, Value, ValueKind,
};

use crate::runtime::Runtime;

/// Builder for a template class and its capability protocol.
///
/// Created by [`Runtime::define_template`]. Nothing is registered until
/// [`build`](Self::build). The builder does not check compatibility; an
/// incompatible template registers fine and is rejected when swizzled.
pub struct TemplateBuilder<'r> {
    runtime: &'r Runtime,
    class: ClassEntry,
    refines: Vec<TypeHash>,
}

impl<'r> TemplateBuilder<'r> {
    fn new(runtime: &'r Runtime, name: &str, base: TypeHash) -> Self {
        Self {
            runtime,
            class: ClassEntry::new(name).with_base(base),
            refines: Vec::new(),
        }
    }

    /// Add a method.
    pub fn method<F>(mut self, selector: &str, f: F) -> Self
    where
        F: Fn(&CallContext<'_>) -> Result<Value, NativeError> + Send + Sync + 'static,
    {
        self.class = self.class.with_method(selector, f);
        self
    }

    /// Declare a property whose storage lives in the side table.
    pub fn dynamic_property(mut self, name: &str, kind: ValueKind) -> Self {
        self.class = self.class.with_property(PropertyEntry::dynamic(name, kind));
        self
    }

    /// Declare an arbitrary property.
    pub fn property(mut self, property: PropertyEntry) -> Self {
        self.class = self.class.with_property(property);
        self
    }

    /// Declare a stored field. Templates with fields cannot be swizzled.
    pub fn field(mut self, name: &str, kind: ValueKind) -> Self {
        self.class = self.class.with_field(FieldEntry::new(name, kind));
        self
    }

    /// Adopt an additional, already registered protocol.
    pub fn adopts(mut self, protocol: TypeHash) -> Self {
        self.class = self.class.with_protocol(protocol);
        self
    }

    /// Make the capability protocol refine an already registered protocol.
    pub fn tag_refines(mut self, protocol: TypeHash) -> Self {
        self.refines.push(protocol);
        self
    }

    /// Set the hook run on each object right after it is swizzled.
    pub fn prepare<F>(mut self, f: F) -> Self
    where
        F: Fn(&dyn ObjectEnv, ObjectHandle) + Send + Sync + 'static,
    {
        self.class = self.class.with_prepare_hook(PrepareHook::new(f));
        self
    }

    /// Register the capability protocol and the template class.
    ///
    /// Both are checked before either is registered, under one lock, so a
    /// rejected template leaves nothing behind.
    pub fn build(self) -> Result<TypeHash, RegistrationError> {
        let Self {
            runtime,
            class,
            refines,
        } = self;
        let tag = refines
            .into_iter()
            .fold(ProtocolEntry::new(class.name.clone()), |tag, base| tag.with_base(base));

        let mut registry = runtime.registry.write();
        registry.check_class(&class)?;
        registry.check_protocol(&tag)?;

        let tag = registry.register_protocol(tag)?;
        registry.register_class(class.with_protocol(tag))
    }
}

impl Runtime {
    /// Start declaring a template class deriving from `base`.
    pub fn define_template(&self, name: &str, base: TypeHash) -> TemplateBuilder<'_> {
        TemplateBuilder::new(self, name, base)
    }
}
