//! Registry entry types.
//!
//! - [`ClassEntry`] - Class descriptors (what an object's isa points at)
//! - [`ProtocolEntry`] - Marker protocols used as capability tags
//! - [`MethodEntry`] - Methods with their native implementation
//!
//! Supporting types:
//! - [`FieldEntry`], [`PropertyEntry`], [`PropertyAttributes`] - Members

mod class;
mod common;
mod method;
mod protocol;

pub use class::ClassEntry;
pub use common::{FieldEntry, PropertyAttributes, PropertyEntry};
pub use method::MethodEntry;
pub use protocol::ProtocolEntry;
