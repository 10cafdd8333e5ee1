//! Per-object runtime type substitution ("isa swizzling").
//!
//! Objects in a [`Runtime`] carry a pointer to their class. Swizzling an
//! object with a *template* class replaces that pointer with a synthetic
//! class that derives from the object's current class and adds the
//! template's methods. The object keeps its memory and field values; only
//! dispatch changes.
//!
//! Templates must not add storage. Per-object state they need goes in the
//! side table through dynamic properties.
//!
//! ```
//! use isa_swizzle::{ClassEntry, FieldEntry, ObjectEnv, Runtime, Value, ValueKind};
//!
//! let runtime = Runtime::new();
//! let base = runtime
//!     .register_class(
//!         ClassEntry::new("Base")
//!             .with_base(runtime.root_class())
//!             .with_field(FieldEntry::new("id", ValueKind::Int))
//!             .with_method("describe", |_| Ok(Value::from("plain"))),
//!     )
//!     .unwrap();
//! let flavor = runtime
//!     .define_template("Flavor", base)
//!     .method("describe", |_| Ok(Value::from("flavored")))
//!     .build()
//!     .unwrap();
//!
//! let object = runtime.instantiate(base).unwrap();
//! runtime.set_field(object, "id", Value::Int(7)).unwrap();
//!
//! assert!(runtime.swizzle_object(object, flavor));
//! assert_eq!(runtime.send(object, "describe", &[]).unwrap(), Value::from("flavored"));
//! assert_eq!(runtime.field(object, "id").unwrap(), Value::Int(7));
//! assert!(runtime.conforms_to_name(object, "Flavor"));
//! ```

mod config;
mod error;
mod global;
mod runtime;
mod side_table;
pub mod swizzle;
mod template;

pub use config::{DEFAULT_SYNTHETIC_PREFIX, RuntimeConfig};
pub use error::{IncompatibilityReason, SwizzleError};
pub use global::{global, swizzle_object};
pub use runtime::{ROOT_CLASS, Runtime};
pub use side_table::SideTable;
pub use swizzle::SwizzleOutcome;
pub use template::TemplateBuilder;

pub use swizzle_core::{
    CallContext, ClassEntry, FieldEntry, MethodEntry, NativeError, ObjectEnv, ObjectHandle,
    PropertyAttributes, PropertyEntry, ProtocolEntry, RegistrationError, TypeHash, Value, ValueKind,
};
pub use swizzle_registry::TypeRegistry;
